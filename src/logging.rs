use std::result::Result;

use snafu::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{registry, EnvFilter, Layer as _};

use crate::config::Config;
use crate::error::{InitError, InitializeLoggerSnafu};

/// Installs the global subscriber: a pretty console layer filtered through
/// `RUST_LOG`, plus a daily-rolling JSON file layer under [Config::log_dir].
///
/// The embedding application must hold the returned guard for the lifetime
/// of the process, otherwise buffered file output is lost.
pub fn init(config: &Config) -> Result<WorkerGuard, InitError> {
    let (file_layer, guard) = {
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "decklog.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = layer().with_ansi(false).json().with_writer(non_blocking);

        (layer, guard)
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = layer().pretty().with_writer(std::io::stdout).with_filter(filter);

    let subscriber = registry().with(console_layer).with(file_layer);
    tracing::subscriber::set_global_default(subscriber).context(InitializeLoggerSnafu)?;

    Ok(guard)
}
