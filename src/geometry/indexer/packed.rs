//! 按位比较的顶点键

use crate::math::{Vec2, Vec3};

/// (position, uv, normal) 的规范键
///
/// 每个分量以 `f32::to_bits` 的整数形式保存，按 position.xyz、uv.xy、normal.xyz
/// 的固定顺序逐分量比较。两个键相等当且仅当所有位都相同：
/// `0.0` 与 `-0.0` 不同；位模式相同的 NaN 相等，与 IEEE 比较相反。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackedVertex {
    bits: [u32; 8],
}

impl PackedVertex {
    pub fn new(position: &Vec3, uv: &Vec2, normal: &Vec3) -> Self {
        Self {
            bits: [
                position.x.to_bits(),
                position.y.to_bits(),
                position.z.to_bits(),
                uv.x.to_bits(),
                uv.y.to_bits(),
                normal.x.to_bits(),
                normal.y.to_bits(),
                normal.z.to_bits(),
            ],
        }
    }
}
