//! 网格预处理管线
//!
//! 按 `PipelineConfig` 串联各个阶段：
//!
//! ```text
//! load → tangent basis → capacity check → deduplicate → normalize → bounds
//! ```
//!
//! 每次调用都拥有自己的输入并返回新分配的结果，管线本身只保存配置，
//! 可以重复使用。

use std::path::Path;

use tracing::info_span;

use crate::core::config::PipelineConfig;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::bounds::Bounds;
use crate::core::config::IndexStrategy;
use crate::geometry::indexer::{ensure_index_capacity, ensure_vertex_table_fits};
use crate::geometry::loaders::{load_mesh, ObjLoader, ParseOptions};
use crate::geometry::mesh::{FlatMesh, IndexedMesh};
use crate::geometry::tangent::compute_tangent_basis;
use crate::{mesh_debug, mesh_info, mesh_warn};

/// 管线输出
#[derive(Debug, Clone)]
pub struct PreparedMesh {
    /// 去重后的索引网格
    pub mesh: IndexedMesh,
    /// 去重后顶点位置的包围盒
    pub bounds: Bounds,
    /// 源文件中的三角形数
    pub source_triangles: usize,
    /// 切线或副切线不是有限值的角点数（UV 退化）
    pub degenerate_corners: usize,
}

/// 网格预处理管线
#[derive(Debug, Clone, Default)]
pub struct MeshPipeline {
    config: PipelineConfig,
}

impl MeshPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            flip_v: self.config.flip_v,
        }
    }

    /// 加载模型文件并处理
    pub fn run_file(&self, path: &Path) -> Result<PreparedMesh> {
        let mesh = load_mesh(path, self.parse_options())?;
        mesh_info!(
            path = %path.display(),
            triangles = mesh.triangle_count(),
            "Mesh loaded"
        );
        self.process(&mesh)
    }

    /// 解析内存中的 OBJ 源文本并处理
    pub fn run_source(&self, source: &str) -> Result<PreparedMesh> {
        let mesh = ObjLoader::new(self.parse_options()).parse_str(source)?;
        self.process(&mesh)
    }

    /// 处理已经展开的扁平网格
    pub fn process(&self, mesh: &FlatMesh) -> Result<PreparedMesh> {
        let _span = info_span!("process", strategy = self.config.strategy.name()).entered();

        mesh.validate().map_err(MeshLoadError::ValidationError)?;

        let basis = self.config.compute_tangents.then(|| compute_tangent_basis(mesh));
        let degenerate_corners = basis.as_ref().map_or(0, |b| b.non_finite_count());
        if degenerate_corners > 0 {
            mesh_warn!(
                corners = degenerate_corners,
                "Degenerate texture coordinates produced non-finite tangents"
            );
        }

        // 精确匹配的顶点数可以提前算出，容差匹配只能在去重后检查
        let check_exact =
            self.config.check_index_capacity && self.config.strategy == IndexStrategy::Exact;
        if check_exact {
            let distinct = ensure_index_capacity(mesh)?;
            mesh_debug!(distinct, "Index capacity checked");
        }

        let indexer = self.config.strategy.indexer(self.config.fuzzy_tolerance);
        let mut indexed = indexer.deduplicate(mesh, basis.as_ref());

        if self.config.check_index_capacity && !check_exact {
            ensure_vertex_table_fits(&indexed)?;
        }

        if self.config.normalize_tangents && indexed.has_tangents() {
            let zero_length = indexed.normalize_tangents();
            if zero_length > 0 {
                mesh_warn!(vectors = zero_length, "Accumulated tangent frame cancelled to zero");
            }
        }
        if self.config.smooth_normals {
            indexed.recompute_normals();
        }

        let bounds = indexed.bounds();

        mesh_info!(
            strategy = indexer.name(),
            corners = mesh.corner_count(),
            vertices = indexed.vertex_count(),
            indices = indexed.index_count(),
            "Mesh indexed"
        );

        Ok(PreparedMesh {
            mesh: indexed,
            bounds,
            source_triangles: mesh.triangle_count(),
            degenerate_corners,
        })
    }
}
