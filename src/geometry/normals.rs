//! 平滑顶点法线
//!
//! 从索引三角形重建每个顶点的法线：面法线累加到三个顶点后归一化。
//! 没有被任何三角形引用的顶点得到零向量。

use crate::math::Vec3;

/// 计算平滑顶点法线
///
/// # 参数
///
/// - `points`: 扁平位置序列 (x0, y0, z0, x1, ...)
/// - `indices`: 索引数组（每3个索引定义一个三角形）
///
/// # 返回
///
/// 与 `points` 中顶点数一致的扁平法线序列。引用越界顶点的三角形被跳过。
pub fn compute_vertex_normals(points: &[f32], indices: &[u32]) -> Vec<f32> {
    let point_count = points.len() / 3;
    let point = |i: u32| -> Option<Vec3> {
        let i = i as usize;
        (i < point_count).then(|| Vec3::new(points[i * 3], points[i * 3 + 1], points[i * 3 + 2]))
    };

    let mut sums = vec![Vec3::zeros(); point_count];
    let mut touched = vec![false; point_count];

    for triangle in indices.chunks_exact(3) {
        let (Some(p0), Some(p1), Some(p2)) =
            (point(triangle[0]), point(triangle[1]), point(triangle[2]))
        else {
            continue;
        };

        let face_normal = (p0 - p1).cross(&(p0 - p2)).normalize();

        for &i in triangle {
            sums[i as usize] += face_normal;
            touched[i as usize] = true;
        }
    }

    let mut normals = Vec::with_capacity(point_count * 3);
    for (sum, touched) in sums.iter().zip(&touched) {
        let n = if *touched { sum.normalize() } else { Vec3::zeros() };
        normals.extend_from_slice(&[n.x, n.y, n.z]);
    }
    normals
}
