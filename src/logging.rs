//! Tracing setup. The terminal belongs to the UI, so events only go to a
//! log file under `<data_local_dir>/keynav/logs/`.
//!
//! Filter priority: `KEYNAV_LOG` > `RUST_LOG` > `warn,keynav=info`.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,keynav=info";

/// Keeps the background writer alive; dropping it flushes the log file.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub fn init(log_file: Option<PathBuf>) -> Result<LogGuard> {
    let (dir, filename) = resolve_log_path(log_file);
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, &filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter_from(env::var("KEYNAV_LOG").ok(), env::var("RUST_LOG").ok()))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(LogGuard {
        _file_guard: guard,
        log_file: dir.join(filename),
    })
}

fn filter_from(keynav: Option<String>, rust: Option<String>) -> EnvFilter {
    keynav
        .or(rust)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("keynav-{}.log", std::process::id());
    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }
    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keynav")
        .join("logs");
    (dir, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_override() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/x/keys.log")));
        assert_eq!(dir, PathBuf::from("/tmp/x"));
        assert_eq!(name, "keys.log");
    }

    #[test]
    fn test_directory_override() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert!(name.starts_with("keynav-"));
    }

    #[test]
    fn test_filter_priority() {
        let filter = filter_from(Some("debug".into()), Some("error".into()));
        assert_eq!(filter.to_string(), "debug");
        let filter = filter_from(None, Some("error".into()));
        assert_eq!(filter.to_string(), "error");
        let filter = filter_from(None, None).to_string();
        assert!(filter.contains("keynav=info"));
        assert!(filter.contains("warn"));
    }
}
