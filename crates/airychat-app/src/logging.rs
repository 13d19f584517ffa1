use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use airychat_logging::get_logs_dir;

/// Diagnostics file written under `~/.airychat/logs` when not verbose
pub const LOG_FILE_NAME: &str = "airychat.log";

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug,hyper=info,reqwest=info"
    } else {
        "warn"
    }
}

/// Where diagnostics go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// stderr, shared with the chat
    Terminal,
    /// A file in the given directory
    File(PathBuf),
}

/// The chat screen only carries diagnostics with `--verbose`; otherwise they
/// go to the logs directory, or nowhere when it is unavailable.
pub fn log_target(verbose: bool, logs_dir: Option<PathBuf>) -> Option<LogTarget> {
    if verbose {
        Some(LogTarget::Terminal)
    } else {
        logs_dir.map(LogTarget::File)
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
}

/// Subscriber appending plain-text events to `dir/airychat.log`.
/// Events are flushed when the guard is dropped.
pub fn file_subscriber(
    dir: &Path,
    filter: EnvFilter,
) -> Result<(impl tracing::Subscriber + Send + Sync + 'static, WorkerGuard)> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
        .with_context(|| format!("failed to open log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    Ok((subscriber, guard))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `--verbose` for the filter. The returned
/// guard must be held for the life of the process.
pub fn init_tracing(verbose: bool) -> Result<Option<WorkerGuard>> {
    match log_target(verbose, get_logs_dir().ok()) {
        Some(LogTarget::Terminal) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(true))
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
            Ok(None)
        }
        Some(LogTarget::File(dir)) => match file_subscriber(&dir, env_filter(false)) {
            Ok((subscriber, guard)) => {
                tracing::subscriber::set_global_default(subscriber)
                    .context("failed to initialize logging")?;
                Ok(Some(guard))
            }
            Err(e) => {
                eprintln!("Diagnostics disabled: {:#}", e);
                Ok(None)
            }
        },
        None => Ok(None),
    }
}
