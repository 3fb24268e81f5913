use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const PATTERN: &str = "{d(%H:%M:%S)(utc)} {l} {t} - {m}{n}";

pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizwheel")
        .join("log")
}

/// `<dir>/<YYYY-MM-DD>.log`, one file per UTC day.
pub fn log_file_path(dir: &Path) -> PathBuf {
    let current_date = chrono::offset::Utc::now().date_naive().to_string();
    dir.join(format!("{current_date}.log"))
}

/// Route the `log` facade to a file. The terminal belongs to the TUI, so
/// nothing is written to stdout or stderr.
pub fn init_file_logger(dir: &Path, level: LevelFilter) -> Result<PathBuf> {
    let path = log_file_path(dir);
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))
        .context("invalid logger configuration")?;

    log4rs::init_config(config).context("logger already initialized")?;
    info!("File logger initialized at {level}");

    Ok(path)
}
