pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use shared::{AppConfig, AppError, LoggingConfig, Result};
pub use state::{AppState, BootstrapReport, Collaborators};

/// ログ設定の初期化。`RUST_LOG` があればそちらを優先する。
///
/// 既にサブスクライバーが設定済みなら何もせず false を返す。
pub fn init_logging(config: &LoggingConfig) -> bool {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
