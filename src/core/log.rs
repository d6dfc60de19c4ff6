//! 日志系统模块
//!
//! 基于 `tracing` 输出结构化日志。控制台始终输出，可选再写入按天滚动的日志文件。
//! 设置了 `RUST_LOG` 时以环境变量为准，配置中的级别只作为默认值。
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_mesh::core::{log, config::LogLevel};
//!
//! log::init_logger(LogLevel::Info, false, None)?;
//! tracing::info!(vertices = 24, "Mesh indexed");
//! # Ok::<(), dist_mesh::core::DistMeshError>(())
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use super::config::LogLevel;
use super::error::{DistMeshError, Result};

/// 未指定路径时使用的日志文件名
pub const DEFAULT_LOG_FILE: &str = "dist_mesh.log";

/// 初始化日志系统
///
/// 进程内只能成功调用一次，重复调用返回 `DistMeshError::Log`。
///
/// * `level` - 默认日志级别
/// * `file_output` - 是否同时写入日志文件
/// * `log_file_path` - 日志文件路径，缺省为 [`DEFAULT_LOG_FILE`]
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy();

    let file_layer = file_output.then(|| {
        let (directory, filename) = split_log_path(log_file_path.unwrap_or(DEFAULT_LOG_FILE));
        let appender = RollingFileAppender::new(Rotation::DAILY, directory, filename);
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(appender)
    });

    let console_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| DistMeshError::Log(e.to_string()))
}

/// 拆分日志路径为 (目录, 文件名)，滚动文件以文件名为前缀
fn split_log_path(path: &str) -> (PathBuf, String) {
    let path = Path::new(path);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_LOG_FILE)
        .to_string();
    (directory, filename)
}

/// 管线日志 - Info 级别
#[macro_export]
macro_rules! mesh_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "dist_mesh::pipeline", $($arg)*)
    };
}

/// 管线日志 - Warn 级别
#[macro_export]
macro_rules! mesh_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "dist_mesh::pipeline", $($arg)*)
    };
}

/// 管线日志 - Debug 级别
#[macro_export]
macro_rules! mesh_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "dist_mesh::pipeline", $($arg)*)
    };
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}
