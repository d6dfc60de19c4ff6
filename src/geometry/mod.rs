/// 网格预处理模块
///
/// 把文本模型转换成可以直接上传到GPU的索引网格。
///
/// # 模块结构
///
/// - `loaders`: 模型解析器（OBJ → 逐角点扁平序列）
/// - `tangent`: 逐角点切线空间计算
/// - `indexer`: 顶点去重（精确 / 容差两种策略）
/// - `bounds`: 包围盒统计
/// - `normals`: 平滑顶点法线重建
/// - `mesh`: `FlatMesh` 和 `IndexedMesh` 数据结构
/// - `vertex`: 交错顶点布局
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ)
///     ↓
/// ObjLoader            → FlatMesh（每个角点一份属性）
///     ↓
/// compute_tangent_basis → TangentBasis
///     ↓
/// VertexIndexer        → IndexedMesh（顶点表 + u16 索引）
///     ↓
/// GPU 上传（外部）
/// ```

pub mod bounds;
pub mod indexer;
pub mod loaders;
pub mod mesh;
pub mod normals;
pub mod tangent;
pub mod vertex;

// 重新导出常用类型
pub use bounds::{compute_bounds, Bounds};
pub use indexer::{ExactIndexer, FuzzyIndexer, VertexIndexer};
pub use mesh::{Corner, FlatMesh, IndexedMesh};
pub use tangent::{compute_tangent_basis, TangentBasis};
pub use vertex::Vertex;
