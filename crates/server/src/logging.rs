// Logging module, powered by tracing-subscriber
//
// All crates log through `tracing` macros with `registro::*` targets; this
// module installs the single global subscriber for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

/// Third-party targets that are too chatty at the base level.
const NOISY_TARGETS: &[(&str, &str)] = &[
    ("mongodb", "warn"),
    ("hyper", "warn"),
    ("tower", "warn"),
    ("axum::rejection", "warn"),
];

/// Build the `EnvFilter` from the base level plus noisy-crate overrides.
pub fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY_TARGETS {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Initialize logging based on configuration.
///
/// Writes to stdout, either compact text or JSON lines. Calling this twice
/// is an error because the global subscriber can only be set once.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_env_filter(&config.level)?;

    let layer = match config.format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).try_init()?;

    tracing::trace!(
        target: "registro::server",
        level = %config.level,
        format = ?config.format,
        "Logging initialized"
    );
    Ok(())
}
