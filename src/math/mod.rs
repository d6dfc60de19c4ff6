//! 数学类型
//!
//! 基于 `nalgebra`，为网格管线提供简洁的向量类型名称。
//! 扁平的逐角点序列使用这些类型；上传到 GPU 的缓冲区使用 `[f32; N]` 数组。

pub use nalgebra::{Vector2, Vector3};

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;

/// 分量绝对差是否都小于 `tolerance`
#[inline]
pub fn near<const N: usize>(a: [f32; N], b: [f32; N], tolerance: f32) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < tolerance)
}
