use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use glob::glob;
use serde::{Deserialize, Serialize};

/// # Logger Local Options
///
/// Controls where `setup_logging` sends log lines.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogOptions {
    /// Prefix of the log file name, e.g. `fishery` → `fishery_20260101_120000.log`.
    pub app_name: String,
    /// Directory for the log file. `None` disables file output.
    pub log_dir: Option<PathBuf>,
    /// `trace`, `debug`, `info`, `warn` or `error`. Anything else means `info`.
    pub level: String,
    /// Also echo log lines to stdout.
    pub use_tty: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            app_name: "fishery".to_string(),
            log_dir: None,
            level: "info".to_string(),
            use_tty: true,
        }
    }
}

/// Maps a level name to a filter, defaulting to `Info`.
pub fn parse_level(level: &str) -> log::LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" | "warning" => log::LevelFilter::Warn,
        "error" | "fatal" => log::LevelFilter::Error,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    }
}

/// Installs the global `fern` logger.
///
/// Lines look like `[2026-10-19 12:00:00][target][INFO] message`. When a log
/// directory is configured it is created if needed, older log files of the
/// same app are removed and a fresh timestamped file is opened.
///
/// Returns the path of the log file, if any.
///
/// # Errors
/// Fails if the directory or file cannot be created, or if a global logger
/// is already installed.
pub fn setup_logging(options: &LogOptions) -> anyhow::Result<Option<PathBuf>> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(parse_level(&options.level));

    if options.use_tty {
        dispatch = dispatch.chain(std::io::stdout());
    }

    let mut log_path = None;
    if let Some(log_dir) = &options.log_dir {
        fs::create_dir_all(log_dir)?;
        rotate_logs(&options.app_name, log_dir);

        let file_name = format!(
            "{}_{}.log",
            options.app_name,
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = log_dir.join(file_name);
        dispatch = dispatch.chain(fern::log_file(&path)?);
        log_path = Some(path);
    }

    dispatch.apply()?;
    Ok(log_path)
}

/// Deletes every `{app_name}_*.log` in `log_dir` except the newest one.
///
/// File names carry a sortable timestamp, so the newest sorts last.
pub fn rotate_logs(app_name: &str, log_dir: &Path) {
    let pattern = format!("{}/{}_*.log", log_dir.display(), app_name);
    let mut log_files: Vec<PathBuf> = match glob(&pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(e) => {
            eprintln!("Invalid log rotation pattern {}: {}", pattern, e);
            return;
        }
    };

    log_files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

    for old_file in log_files.iter().skip(1) {
        if let Err(e) = fs::remove_file(old_file) {
            eprintln!("Error deleting old log file {}: {}", old_file.display(), e);
        }
    }
}
