use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing for the process.
///
/// Default: info for our crates, warn for everything else. Override with
/// `RUST_LOG`.
pub fn init(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,wge=info,wge_core=info,wge_bridge=info,wge_server=info,{service_name}=info"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .init();
}
