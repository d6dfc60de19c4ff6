//! 切线空间计算
//!
//! 为每个角点计算与 UV 参数化一致的切线和副切线，用于法线贴图。
//!
//! # 算法
//!
//! 1. 对于每个三角形 (p0, p1, p2):
//!    - 位置导数: e1 = p1 - p0, e2 = p2 - p0
//!    - UV 导数: d1 = uv1 - uv0, d2 = uv2 - uv0
//!    - r = 1 / (d1.x * d2.y - d1.y * d2.x)
//!    - tangent = (e1 * d2.y - e2 * d1.y) * r
//!    - bitangent = (e2 * d1.x - e1 * d2.x) * r
//!    - 三个角点使用相同的值（不做平均）
//!
//! 2. 所有三角形处理完之后，逐角点:
//!    - Gram-Schmidt: t = normalize(t - n * dot(n, t))
//!    - 若 dot(cross(n, t), b) < 0 则翻转 t
//!
//! UV 共线（行列式为零）的三角形不做特殊处理，
//! 产生的非有限值会一直传到输出缓冲区，由 `non_finite_count` 报告。

use super::mesh::FlatMesh;
use crate::math::Vec3;

/// 逐角点切线空间，与对应 `FlatMesh` 的序列等长
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TangentBasis {
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
}

impl TangentBasis {
    #[inline]
    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }

    /// 切线或副切线含 NaN / 无穷大的角点数（退化 UV 三角形）
    pub fn non_finite_count(&self) -> usize {
        self.tangents
            .iter()
            .zip(&self.bitangents)
            .filter(|(t, b)| !is_finite(t) || !is_finite(b))
            .count()
    }
}

/// 计算逐角点切线空间
///
/// 末尾不足 3 个的角点被忽略。
pub fn compute_tangent_basis(mesh: &FlatMesh) -> TangentBasis {
    let mut basis = TangentBasis {
        tangents: Vec::with_capacity(mesh.corner_count()),
        bitangents: Vec::with_capacity(mesh.corner_count()),
    };

    for (p, uv) in mesh.positions.chunks_exact(3).zip(mesh.uvs.chunks_exact(3)) {
        let e1 = p[1] - p[0];
        let e2 = p[2] - p[0];

        let d1 = uv[1] - uv[0];
        let d2 = uv[2] - uv[0];

        let r = 1.0 / (d1.x * d2.y - d1.y * d2.x);
        let tangent = (e1 * d2.y - e2 * d1.y) * r;
        let bitangent = (e2 * d1.x - e1 * d2.x) * r;

        basis.tangents.extend_from_slice(&[tangent; 3]);
        basis.bitangents.extend_from_slice(&[bitangent; 3]);
    }

    // 必须在所有三角形都赋值之后进行
    for ((t, b), n) in basis
        .tangents
        .iter_mut()
        .zip(&basis.bitangents)
        .zip(&mesh.normals)
    {
        let tangent = *t;
        let mut orthogonal = (tangent - *n * n.dot(&tangent)).normalize();

        // 手性
        if n.cross(&orthogonal).dot(b) < 0.0 {
            orthogonal = -orthogonal;
        }

        *t = orthogonal;
    }

    basis
}

#[inline]
fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    fn triangle(positions: [[f32; 3]; 3], uvs: [[f32; 2]; 3], normal: [f32; 3]) -> FlatMesh {
        let mut mesh = FlatMesh::new();
        for i in 0..3 {
            mesh.push_corner(
                Vec3::from(positions[i]),
                Vec2::from(uvs[i]),
                Vec3::from(normal),
            );
        }
        mesh
    }

    #[test]
    fn test_axis_aligned_triangle() {
        let mesh = triangle(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            [0.0, 0.0, 1.0],
        );

        let basis = compute_tangent_basis(&mesh);

        assert_eq!(basis.len(), 3);
        for (t, b) in basis.tangents.iter().zip(&basis.bitangents) {
            assert!((t - Vec3::x()).norm() < 1e-6, "tangent = {:?}", t);
            assert!((b - Vec3::y()).norm() < 1e-6, "bitangent = {:?}", b);
        }
        assert_eq!(basis.non_finite_count(), 0);
    }

    #[test]
    fn test_tangent_orthogonal_to_normal() {
        // 法线故意不与三角形平面垂直，正交化后切线仍须与法线垂直
        let n = Vec3::new(0.3, 0.2, 1.0).normalize();
        let mesh = triangle(
            [[0.0, 0.0, 0.0], [2.0, 0.5, 0.1], [0.3, 1.5, -0.2]],
            [[0.1, 0.2], [0.9, 0.3], [0.2, 0.8]],
            n.into(),
        );

        let basis = compute_tangent_basis(&mesh);

        for ((t, b), n) in basis.tangents.iter().zip(&basis.bitangents).zip(&mesh.normals) {
            assert!(n.dot(t).abs() < 1e-5, "切线应该与法线正交: dot = {}", n.dot(t));
            assert!((t.norm() - 1.0).abs() < 1e-5, "切线应已归一化: {:?}", t);
            assert!(n.cross(t).dot(b) >= 0.0, "手性不一致");
        }
    }

    #[test]
    fn test_handedness_flip_for_mirrored_uvs() {
        // U 方向镜像：未翻转前 cross(n, t) 与 b 反向
        let mesh = triangle(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[1.0, 0.0], [0.0, 0.0], [1.0, 1.0]],
            [0.0, 0.0, 1.0],
        );

        let basis = compute_tangent_basis(&mesh);

        for ((t, b), n) in basis.tangents.iter().zip(&basis.bitangents).zip(&mesh.normals) {
            assert!(n.cross(t).dot(b) >= 0.0);
            assert!((t - Vec3::x()).norm() < 1e-6, "tangent = {:?}", t);
        }
    }

    #[test]
    fn test_degenerate_uvs_produce_non_finite() {
        let mesh = triangle(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.5, 0.5], [0.5, 0.5], [0.5, 0.5]],
            [0.0, 0.0, 1.0],
        );

        let basis = compute_tangent_basis(&mesh);

        assert_eq!(basis.len(), 3);
        assert_eq!(basis.non_finite_count(), 3);
    }

    #[test]
    fn test_trailing_corners_ignored() {
        let mut mesh = triangle(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            [0.0, 0.0, 1.0],
        );
        mesh.push_corner(Vec3::zeros(), Vec2::zeros(), Vec3::z());

        assert_eq!(compute_tangent_basis(&mesh).len(), 3);
    }
}
