//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 安装全局 tracing 订阅者
///
/// 优先使用 `RUST_LOG`，否则 `verbose` 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("roll_results={},info", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
