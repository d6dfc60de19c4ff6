/// 模型加载器模块
///
/// 提供统一的加载接口和具体格式的实现。加载器只负责把源文件展开成
/// 逐角点的 `FlatMesh`，切线空间和顶点去重由后续阶段完成。
///
/// # 支持的格式
///
/// - **OBJ**: 只包含三角形面、每个角点带 v/vt/vn 三个索引的 Wavefront OBJ
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_mesh::geometry::loaders::{load_mesh, ParseOptions};
/// use std::path::Path;
///
/// let mesh = load_mesh(Path::new("model.obj"), ParseOptions::default())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::FlatMesh;
use std::path::Path;

pub mod obj_loader;

// 重新导出加载器
pub use obj_loader::{ObjLoader, ParseOptions};

/// 网格加载器 trait
///
/// 所有格式的加载器都实现此 trait。加载器不持有解析状态，
/// 只保存解析选项，同一个加载器可以重复使用。
pub trait MeshLoader {
    /// 从文件路径加载网格
    ///
    /// # 错误
    ///
    /// - 文件不存在：`MeshLoadError::FileNotFound`
    /// - 其他读取失败：`DistMeshError::Io`
    /// - 结构错误：整个解析中止，不返回部分网格
    fn load_from_file(&self, path: &Path) -> Result<FlatMesh>;

    /// 从内存数据加载网格
    fn load_from_memory(&self, data: &[u8]) -> Result<FlatMesh>;

    /// 支持的扩展名列表（小写，不含点号）
    fn supported_extensions(&self) -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
pub fn load_mesh(path: &Path, options: ParseOptions) -> Result<FlatMesh> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string()))?;

    let loader = ObjLoader::new(options);
    if loader.supported_extensions().contains(&extension.as_str()) {
        loader.load_from_file(path)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
    }
}
