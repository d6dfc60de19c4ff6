//! 核心功能模块
//!
//! 提供与具体网格算法无关的基础设施：日志系统、配置管理、错误处理，
//! 以及作用域退出时执行的延迟动作。
//!
//! # 模块组织
//!
//! - `log`：日志系统，基于 `tracing` 的结构化日志
//! - `config`：配置管理，支持从 TOML 文件加载管线设置
//! - `error`：错误处理，定义统一的错误类型
//! - `defer`：作用域守卫

pub mod config;
pub mod defer;
pub mod error;
pub mod log;

// 重新导出常用类型，方便使用
pub use config::{Config, IndexStrategy, PipelineConfig};
pub use error::{DistMeshError, MeshLoadError, Result};
