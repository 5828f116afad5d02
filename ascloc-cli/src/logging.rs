use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Diagnostics go to stderr so they never mix with menus and reports on
/// stdout. Verbosity is controlled with `RUST_LOG`.
pub fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
