//! Tracing initialisation.
//!
//! ## Log Levels
//!
//! - **DEBUG**: Selector construction, matrix builds, supply acquire/release
//! - **TRACE**: Individual k-opt draws and cache refills

use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Safe to call multiple times - only the first call has effect. Without
/// `RUST_LOG`, the move generation crate logs at `info`.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(default_directive())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    });
}

fn default_directive() -> tracing_subscriber::filter::Directive {
    match "listforge_solver=info".parse() {
        Ok(directive) => directive,
        Err(_) => LevelFilter::INFO.into(),
    }
}
