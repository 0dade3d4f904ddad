use std::{env, error::Error, io};

use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{Builder, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{ConfigPaths, GeneralConfig, LogFormat};

const DAYS_TO_KEEP: usize = 7;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn env_filter(general: &GeneralConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(general.log_level.to_string()))
}

fn log_format(general: &GeneralConfig) -> LogFormat {
    env::var("CMDTREE_LOG_FORMAT")
        .ok()
        .and_then(|format| format.parse().ok())
        .unwrap_or(general.log_format)
}

fn stderr_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

fn file_layer(format: LogFormat, writer: NonBlocking) -> BoxedLayer {
    let layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(writer);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.compact().boxed(),
    }
}

/// Initialize tracing for the application
///
/// Filtering follows `RUST_LOG` when set, otherwise the configured level.
/// Events go to stderr, pretty or JSON per `CMDTREE_LOG_FORMAT` or the
/// configured format. With `log_file`, they are also written to a daily
/// rolling file under [`ConfigPaths::log_dir`]; keep the returned guard
/// alive until exit so buffered lines get flushed.
///
/// # Errors
/// Returns error if the log directory cannot be created or a subscriber is
/// already installed
pub fn init(
    general: &GeneralConfig,
    log_file: bool,
) -> Result<Option<WorkerGuard>, Box<dyn Error>> {
    let format = log_format(general);
    let mut layers = vec![stderr_layer(format)];
    let mut guard = None;

    if log_file {
        let appender = Builder::new()
            .rotation(Rotation::DAILY)
            .max_log_files(DAYS_TO_KEEP)
            .filename_prefix("cmdtree")
            .filename_suffix("log")
            .build(ConfigPaths::log_dir()?)?;
        let (writer, worker) = tracing_appender::non_blocking(appender);
        layers.push(file_layer(format, writer));
        guard = Some(worker);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(general))
        .try_init()?;

    Ok(guard)
}
