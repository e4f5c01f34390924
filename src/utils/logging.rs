//! # 日志初始化
//!
//! 诊断信息使用 `tracing` 输出到 stderr；面向用户的提示仍由 `output.rs` 打印。
//! `RUST_LOG` 优先，否则 `-v` 对应 debug，默认 warn。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber`

use tracing_subscriber::EnvFilter;

/// 安装全局 subscriber，重复调用时忽略
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("watermarker={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
