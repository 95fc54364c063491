//! Logging setup using `tracing-subscriber`.
//!
//! Library events go to stderr so command output on stdout stays clean.
//! `RUST_LOG` overrides the level chosen from `--verbose`.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Call once at startup.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(verbose);

    tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(layer)
        .init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn
        EnvFilter::new(format!(
            "warn,sheetlens={level},sheetlens_cli={level}",
            level = level.as_str().to_lowercase()
        ))
    })
}
