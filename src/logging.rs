//! Diagnostic logging.
//!
//! The TUI owns stdout, so log lines go to a file. `MDSEEK_LOG` takes the
//! usual `EnvFilter` directives (`mdseek::search=trace`) and overrides the
//! configured level.

use crate::config::LoggingConfig;
use color_eyre::eyre::WrapErr;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MDSEEK_LOG";

/// Default log location: `<cache dir>/mdseek/mdseek.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("mdseek").join("mdseek.log"))
}

/// Pick the filter directives: a valid `MDSEEK_LOG` wins, then the
/// configured level, then `info`.
fn filter_directives(env: Option<&str>, level: &str) -> String {
    [env, Some(level)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|d| !d.is_empty() && EnvFilter::try_new(d).is_ok())
        .unwrap_or("info")
        .to_string()
}

/// Install the global subscriber. Returns the log file path, or `None` when
/// no writable location exists.
pub fn init(config: &LoggingConfig) -> color_eyre::Result<Option<PathBuf>> {
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::new(filter_directives(env.as_deref(), &config.level));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    tracing::debug!(path = %path.display(), "logging initialised");
    Ok(Some(path))
}
