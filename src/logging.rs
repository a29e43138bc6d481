//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events. Binaries and test suites decide
//! where they go, either globally through [`init`] or for a scope through
//! `tracing::subscriber::with_default` with a subscriber from
//! [`build_subscriber`].

use crate::config::LogSettings;
use anyhow::Context;
use std::path::Path;
use std::sync::Once;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TEST_INIT: Once = Once::new();

/// Build a console subscriber plus, when a log file is configured, a
/// daily-rolling file layer.
///
/// `RUST_LOG` takes precedence over `settings.level`. The returned guard must
/// be kept alive for buffered file output to be flushed.
pub fn build_subscriber(
    settings: &LogSettings,
) -> anyhow::Result<(impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>)> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("invalid log level '{}'", settings.level))?,
    };

    let (file_layer, guard) = match &settings.file_path {
        Some(path) => {
            let appender = daily_appender(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .with(file_layer);

    Ok((subscriber, guard))
}

/// Install the subscriber from [`build_subscriber`] as the global default.
///
/// Fails if a global subscriber is already set.
pub fn init(settings: &LogSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let (subscriber, guard) = build_subscriber(settings)?;
    subscriber
        .try_init()
        .context("failed to install global tracing subscriber")?;
    tracing::info!(
        level = %settings.level,
        file = ?settings.file_path,
        "logging initialized"
    );
    Ok(guard)
}

/// Route tracing output through the test harness writer.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    TEST_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,nifi_api_harness=debug"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer().compact())
            .try_init();
    });
}

fn daily_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .build(directory)
        .with_context(|| format!("failed to open log file in {}", directory.display()))
}
