//! DistMesh - 网格预处理库
//!
//! 把 Wavefront OBJ 模型转换成可以直接上传到GPU的索引网格：
//! 解析、切线空间计算、顶点去重和包围盒统计。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、错误处理、作用域守卫）
//! - `math`: 向量类型别名和容差比较
//! - `geometry`: 网格数据结构和各处理阶段
//! - `pipeline`: 按配置串联各阶段的管线
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_mesh::core::PipelineConfig;
//! use dist_mesh::pipeline::MeshPipeline;
//! use std::path::Path;
//!
//! let pipeline = MeshPipeline::new(PipelineConfig::default());
//! let prepared = pipeline.run_file(Path::new("model.obj"))?;
//!
//! println!(
//!     "{} 个顶点, {} 个索引",
//!     prepared.mesh.vertex_count(),
//!     prepared.mesh.index_count()
//! );
//! # Ok::<(), dist_mesh::core::DistMeshError>(())
//! ```

pub mod core;
pub mod geometry;
pub mod math;
pub mod pipeline;
