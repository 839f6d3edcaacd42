use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Logger writing timestamped lines to a rotating file
struct FileLogger {
    writer: Mutex<RollingFileAppender>,
    level: LevelFilter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = chrono::Local::now();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(
                writer,
                "{} [{}] {}: {}",
                timestamp.format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Parse log level string to LevelFilter
pub fn parse_level(level_str: &str) -> LevelFilter {
    match level_str.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn, // stdout is the image, keep stderr quiet
    }
}

/// Raise `level` by `steps` (one per `-v`), saturating at trace.
pub fn raise_level(level: LevelFilter, steps: u8) -> LevelFilter {
    let mut level = level;
    for _ in 0..steps {
        level = match level {
            LevelFilter::Off => LevelFilter::Error,
            LevelFilter::Error => LevelFilter::Warn,
            LevelFilter::Warn => LevelFilter::Info,
            LevelFilter::Info => LevelFilter::Debug,
            LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
        };
    }
    level
}

/// Initialize the global logger
///
/// With a `log_file`, logs go to a daily rotated file (3 kept). Otherwise
/// they go to stderr through env_logger, with `RUST_LOG` taking precedence
/// over `level`.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let Some(log_file) = log_file else {
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .try_init()
            .context("Failed to set global logger")?;
        return Ok(());
    };

    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory).context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(
            log_file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("termpix"),
        )
        .filename_suffix(
            log_file
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("log"),
        )
        .build(directory)
        .context("Failed to create rotating file appender")?;

    let logger = FileLogger {
        writer: Mutex::new(file_appender),
        level,
    };

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(level);

    Ok(())
}
