//! Initialisation des logs

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ysxsconfig::Config;

/// Installs the global subscriber
///
/// `RUST_LOG` wins over the configured `host.logger.min_level`.
pub fn init_logging(config: &Config) {
    let min_level = config.log_min_level();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&min_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = config.log_console_enabled().then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .init();
}
