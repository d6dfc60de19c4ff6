//! 配置管理模块
//!
//! 提供管线配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [pipeline]
//! flip_v = true             # 加载时对 vt 的 v 分量取反
//! compute_tangents = true
//! strategy = "exact"        # 或 "fuzzy"
//! fuzzy_tolerance = 0.01
//! check_index_capacity = true
//! normalize_tangents = true
//! smooth_normals = false
//!
//! [logging]
//! level = "info"            # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};

/// 管线配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 网格处理配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 网格处理配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 对 `vt` 的 v 分量取反（目标采样器的 UV 原点在左上角时使用）
    #[serde(default = "default_flip_v")]
    pub flip_v: bool,

    /// 是否计算切线空间
    #[serde(default = "default_compute_tangents")]
    pub compute_tangents: bool,

    /// 顶点去重策略
    #[serde(default = "default_strategy")]
    pub strategy: IndexStrategy,

    /// 模糊匹配的绝对容差
    #[serde(default = "default_fuzzy_tolerance")]
    pub fuzzy_tolerance: f32,

    /// 去重前检查 16 位索引容量
    #[serde(default = "default_check_index_capacity")]
    pub check_index_capacity: bool,

    /// 合并后重新归一化累加的切线
    #[serde(default = "default_normalize_tangents")]
    pub normalize_tangents: bool,

    /// 用面法线重建平滑顶点法线
    #[serde(default = "default_smooth_normals")]
    pub smooth_normals: bool,
}

/// 顶点去重策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStrategy {
    /// 按位精确匹配（有序映射，O(n log n)）
    Exact,
    /// 容差匹配（线性扫描，O(n²)）
    Fuzzy,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_flip_v() -> bool { true }
fn default_compute_tangents() -> bool { true }
fn default_strategy() -> IndexStrategy { IndexStrategy::Exact }
fn default_fuzzy_tolerance() -> f32 { 0.01 }
fn default_check_index_capacity() -> bool { true }
fn default_normalize_tangents() -> bool { true }
fn default_smooth_normals() -> bool { false }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "dist_mesh.log".to_string() }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            flip_v: default_flip_v(),
            compute_tangents: default_compute_tangents(),
            strategy: default_strategy(),
            fuzzy_tolerance: default_fuzzy_tolerance(),
            check_index_capacity: default_check_index_capacity(),
            normalize_tangents: default_normalize_tangents(),
            smooth_normals: default_smooth_normals(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--fuzzy` / `--exact`: 选择去重策略
    /// - `--tolerance <value>`: 模糊匹配容差
    /// - `--no-flip-v`: 不翻转 v 分量
    /// - `--no-tangents`: 跳过切线空间计算
    /// - `--smooth-normals`: 重建平滑法线
    /// - `--log-level <level>`: 日志级别
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let has = |flag: &str| args.iter().any(|a| a == flag);
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|idx| args.get(idx + 1))
        };

        if has("--fuzzy") {
            self.pipeline.strategy = IndexStrategy::Fuzzy;
        }
        if has("--exact") {
            self.pipeline.strategy = IndexStrategy::Exact;
        }
        if has("--no-flip-v") {
            self.pipeline.flip_v = false;
        }
        if has("--no-tangents") {
            self.pipeline.compute_tangents = false;
        }
        if has("--smooth-normals") {
            self.pipeline.smooth_normals = true;
        }

        if let Some(tolerance) = value_of("--tolerance").and_then(|s| s.parse().ok()) {
            self.pipeline.fuzzy_tolerance = tolerance;
        }

        if let Some(level) = value_of("--log-level").and_then(|s| LogLevel::parse(s)) {
            self.logging.level = level;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        let tolerance = self.pipeline.fuzzy_tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.fuzzy_tolerance".to_string(),
                reason: format!("Tolerance must be a positive finite number, got {}", tolerance),
            }
            .into());
        }

        Ok(())
    }
}

impl IndexStrategy {
    /// 获取策略名称
    pub fn name(&self) -> &'static str {
        match self {
            IndexStrategy::Exact => "exact",
            IndexStrategy::Fuzzy => "fuzzy",
        }
    }
}

impl LogLevel {
    /// 解析命令行中的日志级别（不区分大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}
