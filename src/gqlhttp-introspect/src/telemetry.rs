//! Logging setup for the CLI
//!
//! Everything goes to stderr so stdout carries only the schema JSON:
//! - Human-readable lines by default
//! - JSON lines when `log_json` is set in the config
//! - `RUST_LOG` wins over the built-in defaults

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "gqlhttp_introspect=info,gqlhttp_rs=warn,gqlhttp_core=warn";
const VERBOSE_FILTER: &str = "gqlhttp_introspect=debug,gqlhttp_rs=debug,gqlhttp_core=debug";

/// Install the global subscriber
///
/// Returns a guard that must be kept alive to ensure logs are flushed
pub fn init_telemetry(verbose: bool, filter: Option<&str>, json: bool) -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
        }),
    };

    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(writer.clone())
            .with_target(verbose)
    });

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    Ok(guard)
}
