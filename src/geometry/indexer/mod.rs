/// 顶点去重模块
///
/// 把逐角点扁平序列压缩成去重后的顶点表加 16 位索引序列。
/// 两种可互换的策略实现同一个 `VertexIndexer` trait：
///
/// - `ExactIndexer`：按位精确匹配，O(n log n)，推荐使用
/// - `FuzzyIndexer`：容差匹配，O(n²)，用于小网格或作为参照
///
/// 两者的输出允许不同，调用方按网格大小和精度需求选择。
///
/// # 切线空间
///
/// 提供 `TangentBasis` 时，匹配到已有记录的角点会把切线和副切线累加到该记录上，
/// position/uv/normal 保持第一次出现的值。累加结果不做归一化，
/// 需要单位切线的调用方在去重后调用 `IndexedMesh::normalize_tangents`。

use std::collections::BTreeSet;

use crate::core::config::IndexStrategy;
use crate::core::error::{DistMeshError, Result};
use crate::geometry::mesh::{FlatMesh, IndexedMesh};
use crate::geometry::tangent::TangentBasis;

pub mod exact;
pub mod fuzzy;
pub mod packed;

pub use exact::ExactIndexer;
pub use fuzzy::FuzzyIndexer;
pub use packed::PackedVertex;

/// 16 位索引能够寻址的最大顶点数
pub const MAX_INDEXED_VERTICES: usize = u16::MAX as usize + 1;

/// 顶点去重器 trait
pub trait VertexIndexer {
    /// 去重并生成索引网格
    ///
    /// 输出的 `indices` 与输入角点一一对应。超过 `MAX_INDEXED_VERTICES`
    /// 个不同顶点时索引被截断，不会报错。
    fn deduplicate(&self, mesh: &FlatMesh, basis: Option<&TangentBasis>) -> IndexedMesh;

    /// 策略名称，用于日志
    fn name(&self) -> &'static str;
}

impl IndexStrategy {
    /// 创建该策略对应的去重器
    pub fn indexer(&self, tolerance: f32) -> Box<dyn VertexIndexer> {
        match self {
            IndexStrategy::Exact => Box::new(ExactIndexer::new()),
            IndexStrategy::Fuzzy => Box::new(FuzzyIndexer::new(tolerance)),
        }
    }
}

/// 统计按位不同的角点数
pub fn count_distinct_corners(mesh: &FlatMesh) -> usize {
    mesh.corners(None)
        .map(|c| PackedVertex::new(&c.position, &c.uv, &c.normal))
        .collect::<BTreeSet<_>>()
        .len()
}

/// 去重前检查精确匹配的输出能否用 16 位索引表示
///
/// 按位不同的角点数等于精确匹配的顶点数。容差匹配可能合并得更多，
/// 它的输出应在去重后用 `ensure_vertex_table_fits` 检查。返回不同角点数。
pub fn ensure_index_capacity(mesh: &FlatMesh) -> Result<usize> {
    let distinct = count_distinct_corners(mesh);
    check_capacity(distinct)?;
    Ok(distinct)
}

/// 去重后检查顶点表能否用 16 位索引表示
pub fn ensure_vertex_table_fits(mesh: &IndexedMesh) -> Result<()> {
    check_capacity(mesh.vertex_count())
}

fn check_capacity(distinct: usize) -> Result<()> {
    if distinct > MAX_INDEXED_VERTICES {
        return Err(DistMeshError::IndexOverflow {
            distinct,
            limit: MAX_INDEXED_VERTICES,
        });
    }
    Ok(())
}
