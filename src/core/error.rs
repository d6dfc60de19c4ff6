//! 错误处理模块
//!
//! 定义了网格管线中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 手写 `Display` / `Error` / `From` 实现，不依赖额外的派生宏
//! - 结构性解析错误携带源文件行号
//! - 数值边界情况（退化 UV）不是错误，见 `geometry::tangent`

use std::fmt;
use std::path::PathBuf;

/// 管线统一的 Result 类型
pub type Result<T> = std::result::Result<T, DistMeshError>;

/// dist_mesh 的错误类型
#[derive(Debug)]
pub enum DistMeshError {
    /// 配置错误
    Config(ConfigError),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// 去重后的顶点数超出 16 位索引的容量
    IndexOverflow { distinct: usize, limit: usize },

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 面引用的顶点属性种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
}

/// 网格加载相关的错误
#[derive(Debug, Clone, PartialEq)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// `f` 行不是恰好 9 个整数（非三角形或缺少属性索引）
    MalformedFace { line: usize, content: String },

    /// `v` / `vt` / `vn` 行缺少分量或分量不是数字
    MalformedAttribute { line: usize, tag: String },

    /// 面引用的索引超出已解析的属性池
    IndexOutOfRange {
        line: usize,
        attribute: AttributeKind,
        index: i64,
        len: usize,
    },

    /// 数据验证失败
    ValidationError(String),
}

impl fmt::Display for DistMeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistMeshError::Config(e) => write!(f, "Configuration error: {}", e),
            DistMeshError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            DistMeshError::IndexOverflow { distinct, limit } => write!(
                f,
                "Index overflow: {} distinct vertices exceed the 16-bit limit of {}",
                distinct, limit
            ),
            DistMeshError::Io(e) => write!(f, "IO error: {}", e),
            DistMeshError::Log(msg) => write!(f, "Log error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::TexCoord => "texcoord",
            AttributeKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Mesh file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
            MeshLoadError::MalformedFace { line, content } => write!(
                f,
                "Malformed face on line {}: '{}' (expected three v/vt/vn corners)",
                line, content
            ),
            MeshLoadError::MalformedAttribute { line, tag } => {
                write!(f, "Malformed '{}' attribute on line {}", tag, line)
            }
            MeshLoadError::IndexOutOfRange {
                line,
                attribute,
                index,
                len,
            } => write!(
                f,
                "Face on line {} references {} index {} but only {} are defined",
                line, attribute, index, len
            ),
            MeshLoadError::ValidationError(msg) => write!(f, "Mesh validation failed: {}", msg),
        }
    }
}

impl std::error::Error for DistMeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DistMeshError::Io(e) => Some(e),
            DistMeshError::Config(e) => Some(e),
            DistMeshError::MeshLoading(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for MeshLoadError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for DistMeshError {
    fn from(err: std::io::Error) -> Self {
        DistMeshError::Io(err)
    }
}

impl From<ConfigError> for DistMeshError {
    fn from(err: ConfigError) -> Self {
        DistMeshError::Config(err)
    }
}

impl From<MeshLoadError> for DistMeshError {
    fn from(err: MeshLoadError) -> Self {
        DistMeshError::MeshLoading(err)
    }
}
