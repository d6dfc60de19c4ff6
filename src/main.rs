//! DistMesh - 网格预处理命令行工具
//!
//! 加载一个 OBJ 模型，计算切线空间并生成索引网格，最后输出统计摘要。
//! 处理参数来自配置文件，命令行参数可以覆盖。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件（config.toml）
//! cargo run -- model.obj
//!
//! # 使用容差去重并跳过切线计算
//! cargo run -- model.obj --fuzzy --no-tangents
//!
//! # 指定配置文件
//! cargo run -- model.obj --config other.toml
//! ```
//!
//! # 处理流程
//!
//! ```text
//! model.obj → ObjLoader → 切线空间 → 顶点去重 → 包围盒 → 日志摘要
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{debug, info};

use dist_mesh::core::{defer::defer, log, Config};
use dist_mesh::pipeline::MeshPipeline;

/// 带值的命令行参数，解析模型路径时跳过它们的值
const VALUE_FLAGS: [&str; 3] = ["--config", "--tolerance", "--log-level"];

/// 相机取景距离相对于包围盒尺寸的倍数
const VIEW_DISTANCE_FACTOR: f32 = 1.5;

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（默认 config.toml，可用 `--config` 指定）
/// 2. 应用命令行参数覆盖
/// 3. 验证配置
/// 4. 初始化日志系统
/// 5. 运行管线并输出摘要
///
/// # 命令行参数
///
/// - `<model.obj>`: 要处理的模型文件
/// - `--config <file>`: 配置文件路径
/// - `--fuzzy` / `--exact`: 去重策略
/// - `--tolerance <value>`: 容差去重的绝对容差
/// - `--no-flip-v`: 不翻转纹理坐标的 v 分量
/// - `--no-tangents`: 跳过切线空间计算
/// - `--smooth-normals`: 重建平滑法线
/// - `--log-level <level>`: 日志级别
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // 1. 加载配置（在初始化日志之前）
    let config_path = flag_value(&args, "--config").unwrap_or("config.toml");
    let mut config = Config::from_file_or_default(config_path);

    // 2. 应用命令行参数
    config.apply_args(&args);

    // 3. 验证配置
    config.validate().context("Invalid configuration")?;

    // 4. 初始化日志系统
    let log_file = config
        .logging
        .file_output
        .then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file)
        .context("Failed to initialize logger")?;

    info!(version = env!("CARGO_PKG_VERSION"), "DistMesh starting...");
    let _shutdown = defer(|| info!("DistMesh finished"));

    let Some(model) = model_path(&args) else {
        bail!("Usage: dist_mesh <model.obj> [--fuzzy] [--no-flip-v] [--no-tangents] [--config <file>]");
    };

    debug!(
        config = %config_path,
        strategy = config.pipeline.strategy.name(),
        tolerance = config.pipeline.fuzzy_tolerance,
        flip_v = config.pipeline.flip_v,
        tangents = config.pipeline.compute_tangents,
        "Pipeline configuration"
    );

    // 5. 运行管线
    let pipeline = MeshPipeline::new(config.pipeline.clone());
    let prepared = pipeline
        .run_file(&model)
        .with_context(|| format!("Failed to prepare mesh {}", model.display()))?;

    let mesh = &prepared.mesh;
    info!(
        triangles = prepared.source_triangles,
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        tangents = mesh.has_tangents(),
        degenerate = prepared.degenerate_corners,
        "Mesh summary"
    );

    let bounds = &prepared.bounds;
    let center = bounds.center();
    info!(
        x = ?bounds.x,
        y = ?bounds.y,
        z = ?bounds.z,
        center = ?[center.x, center.y, center.z],
        view_distance = bounds.viewing_distance(VIEW_DISTANCE_FACTOR),
        "Mesh bounds"
    );

    Ok(())
}

/// 查找带值参数的值
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|idx| args.get(idx + 1))
        .map(String::as_str)
}

/// 第一个既不是开关也不是开关值的参数
fn model_path(args: &[String]) -> Option<PathBuf> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with("--") {
            return Some(PathBuf::from(arg));
        }
    }
    None
}
