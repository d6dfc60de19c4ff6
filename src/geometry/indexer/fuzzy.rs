/// 容差匹配的顶点去重
///
/// 对每个角点线性扫描已经输出的顶点记录，position、uv、normal 的 8 个分量
/// 与候选的绝对差都小于容差时视为同一顶点，第一个匹配胜出。
/// 复杂度 O(M²)，适合小网格或作为正确性参照。
///
/// 这种匹配可能把精确匹配会分开的顶点合并在一起，两种策略的输出不保证相同。

use super::VertexIndexer;
use crate::geometry::mesh::{Corner, FlatMesh, IndexedMesh};
use crate::geometry::tangent::TangentBasis;
use crate::math::near;

/// 默认匹配容差
pub const DEFAULT_TOLERANCE: f32 = 0.01;

/// 容差匹配去重器
#[derive(Debug, Clone, Copy)]
pub struct FuzzyIndexer {
    tolerance: f32,
}

impl FuzzyIndexer {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// 在已输出的记录中查找相似顶点
    fn find_similar(&self, out: &IndexedMesh, corner: &Corner) -> Option<usize> {
        let position: [f32; 3] = corner.position.into();
        let uv: [f32; 2] = corner.uv.into();
        let normal: [f32; 3] = corner.normal.into();

        out.positions
            .iter()
            .zip(&out.uvs)
            .zip(&out.normals)
            .position(|((p, t), n)| {
                near(position, *p, self.tolerance)
                    && near(uv, *t, self.tolerance)
                    && near(normal, *n, self.tolerance)
            })
    }
}

impl Default for FuzzyIndexer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl VertexIndexer for FuzzyIndexer {
    fn deduplicate(&self, mesh: &FlatMesh, basis: Option<&TangentBasis>) -> IndexedMesh {
        let mut out = IndexedMesh::new();
        out.indices.reserve(mesh.corner_count());

        for corner in mesh.corners(basis) {
            match self.find_similar(&out, &corner) {
                Some(index) => {
                    out.indices.push(index as u16);
                    out.accumulate_frame(index, &corner);
                }
                None => {
                    let index = out.push_corner(&corner);
                    out.indices.push(index as u16);
                }
            }
        }

        out
    }

    fn name(&self) -> &'static str {
        "fuzzy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::indexer::ExactIndexer;
    use crate::math::{Vec2, Vec3};

    fn pair(second_x: f32) -> FlatMesh {
        let mut mesh = FlatMesh::new();
        mesh.push_corner(Vec3::new(1.0, 0.0, 0.0), Vec2::zeros(), Vec3::z());
        mesh.push_corner(Vec3::new(second_x, 0.0, 0.0), Vec2::zeros(), Vec3::z());
        mesh
    }

    #[test]
    fn test_within_tolerance_merges() {
        let indexed = FuzzyIndexer::default().deduplicate(&pair(1.0099), None);

        assert_eq!(indexed.vertex_count(), 1);
        assert_eq!(indexed.indices, vec![0, 0]);
        // 保留第一次出现的值
        assert_eq!(indexed.positions[0], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_outside_tolerance_stays_distinct() {
        let indexed = FuzzyIndexer::default().deduplicate(&pair(1.011), None);

        assert_eq!(indexed.vertex_count(), 2);
        assert_eq!(indexed.indices, vec![0, 1]);
    }

    #[test]
    fn test_every_component_is_compared() {
        let mut mesh = FlatMesh::new();
        mesh.push_corner(Vec3::zeros(), Vec2::new(0.5, 0.5), Vec3::z());
        mesh.push_corner(Vec3::zeros(), Vec2::new(0.5, 0.52), Vec3::z());
        mesh.push_corner(Vec3::zeros(), Vec2::new(0.5, 0.5), Vec3::new(0.0, 0.02, 1.0));

        let indexed = FuzzyIndexer::default().deduplicate(&mesh, None);
        assert_eq!(indexed.vertex_count(), 3);
    }

    #[test]
    fn test_first_match_wins() {
        let mut mesh = FlatMesh::new();
        mesh.push_corner(Vec3::new(0.0, 0.0, 0.0), Vec2::zeros(), Vec3::z());
        mesh.push_corner(Vec3::new(0.015, 0.0, 0.0), Vec2::zeros(), Vec3::z());
        // 与两个记录都相近，匹配先输出的那个
        mesh.push_corner(Vec3::new(0.008, 0.0, 0.0), Vec2::zeros(), Vec3::z());

        let indexed = FuzzyIndexer::default().deduplicate(&mesh, None);
        assert_eq!(indexed.indices, vec![0, 1, 0]);
    }

    #[test]
    fn test_merges_at_least_what_exact_merges() {
        let mut mesh = FlatMesh::new();
        for x in [0.0, 0.004, 0.0, 0.5, 0.004, 0.5] {
            mesh.push_corner(Vec3::new(x, 0.0, 0.0), Vec2::zeros(), Vec3::z());
        }

        let exact = ExactIndexer.deduplicate(&mesh, None);
        let fuzzy = FuzzyIndexer::default().deduplicate(&mesh, None);

        assert_eq!(exact.vertex_count(), 3);
        assert_eq!(fuzzy.vertex_count(), 2);
        for (e, f) in exact.expand_positions().iter().zip(fuzzy.expand_positions()) {
            assert!(near(*e, f, DEFAULT_TOLERANCE));
        }
    }

    #[test]
    fn test_tangents_accumulate_on_match() {
        let mesh = pair(1.001);
        let basis = TangentBasis {
            tangents: vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            bitangents: vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0)],
        };

        let indexed = FuzzyIndexer::default().deduplicate(&mesh, Some(&basis));

        assert_eq!(indexed.vertex_count(), 1);
        assert_eq!(indexed.tangents[0], [1.0, 1.0, 0.0]);
        assert_eq!(indexed.bitangents[0], [0.0, 0.0, 2.0]);
    }
}
