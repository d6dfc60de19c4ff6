//! 包围盒统计
//!
//! 对扁平位置序列做一次线性扫描，得到三个轴上的 (min, max)，
//! 供相机设置居中和取景使用。

use crate::math::Vec3;

/// 轴对齐包围盒，每个轴一个 (min, max)
///
/// 空输入保持初始值 (+inf, -inf)，用 `is_empty` 判断“没有数据”。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f32, f32),
    pub y: (f32, f32),
    pub z: (f32, f32),
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        x: (f32::INFINITY, f32::NEG_INFINITY),
        y: (f32::INFINITY, f32::NEG_INFINITY),
        z: (f32::INFINITY, f32::NEG_INFINITY),
    };

    /// 把一个点并入包围盒（NaN 分量不影响结果）
    #[inline]
    pub fn include(&mut self, x: f32, y: f32, z: f32) {
        extend(&mut self.x, x);
        extend(&mut self.y, y);
        extend(&mut self.z, z);
    }

    /// 是否没有包含任何点
    pub fn is_empty(&self) -> bool {
        self.x.0 > self.x.1 || self.y.0 > self.y.1 || self.z.0 > self.z.1
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.0, self.y.0, self.z.0)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.1, self.y.1, self.z.1)
    }

    pub fn center(&self) -> Vec3 {
        (self.min() + self.max()) / 2.0
    }

    /// 每个轴上的长度
    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    /// 把模型中心移到原点的平移量
    pub fn recenter_translation(&self) -> Vec3 {
        -self.center()
    }

    /// 沿 z 轴放置相机的距离：z 方向长度乘以 `factor`
    pub fn viewing_distance(&self, factor: f32) -> f32 {
        self.extent().z * factor
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[inline]
fn extend(range: &mut (f32, f32), value: f32) {
    if value < range.0 {
        range.0 = value;
    }
    if range.1 < value {
        range.1 = value;
    }
}

/// 计算扁平位置序列 (x0, y0, z0, x1, ...) 的包围盒
///
/// 末尾不足 3 个的分量被忽略。
pub fn compute_bounds(points: &[f32]) -> Bounds {
    let mut bounds = Bounds::EMPTY;
    for p in points.chunks_exact(3) {
        bounds.include(p[0], p[1], p[2]);
    }
    bounds
}
