use crate::config::{LogFormat, LoggingSettings};
use crate::error::CoreError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured level.
pub fn init_tracing(service_name: &str, settings: &LoggingSettings) -> Result<(), CoreError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match settings.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .flatten_event(true),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
    };

    result.map_err(|e| {
        eprintln!(
            "Failed to initialize tracing for service '{}': {}",
            service_name, e
        );
        CoreError::Logging(e.to_string())
    })?;

    tracing::info!(service = service_name, level = %settings.level, "Tracing initialized");
    Ok(())
}
