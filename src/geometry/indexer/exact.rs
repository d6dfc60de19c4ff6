/// 按位精确匹配的顶点去重
///
/// 用有序映射记录每个 `PackedVertex` 第一次出现时分配的输出索引，
/// 复杂度 O(M log M)。输出顶点表的顺序就是每个不同键第一次出现的顺序，
/// 相同输入总是得到相同输出。

use std::collections::BTreeMap;

use super::packed::PackedVertex;
use super::VertexIndexer;
use crate::geometry::mesh::{FlatMesh, IndexedMesh};
use crate::geometry::tangent::TangentBasis;

/// 精确匹配去重器
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactIndexer;

impl ExactIndexer {
    pub fn new() -> Self {
        Self
    }
}

impl VertexIndexer for ExactIndexer {
    fn deduplicate(&self, mesh: &FlatMesh, basis: Option<&TangentBasis>) -> IndexedMesh {
        let mut lookup: BTreeMap<PackedVertex, u16> = BTreeMap::new();
        let mut out = IndexedMesh::new();
        out.indices.reserve(mesh.corner_count());

        for corner in mesh.corners(basis) {
            let key = PackedVertex::new(&corner.position, &corner.uv, &corner.normal);

            match lookup.get(&key) {
                Some(&index) => {
                    out.indices.push(index);
                    out.accumulate_frame(index as usize, &corner);
                }
                None => {
                    // 超过 u16 容量时截断，见 `ensure_index_capacity`
                    let index = out.push_corner(&corner) as u16;
                    lookup.insert(key, index);
                    out.indices.push(index);
                }
            }
        }

        out
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}
