//! File logging for the aggregation and layout paths.
//!
//! # Responsibility
//! - Route `log` records from the session, layout and pipeline threads into
//!   size-rotated `wordcloud*.log` files.
//! - Report the active settings to hosts.
//!
//! # Invariants
//! - The backend starts at most once per process; repeating init with equal
//!   settings is a no-op and different settings are rejected.
//! - Diagnostic lines are metadata only
//!   (`event=<name> module=<module> status=<status> key=value`); chat text
//!   never reaches a line above `debug`.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "wordcloud";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static ACTIVE: OnceCell<(LogSettings, LoggerHandle)> = OnceCell::new();

/// Level and absolute directory of the rolling log files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub log_dir: PathBuf,
}

impl LogSettings {
    /// Parses a level name (`trace` .. `error`, any case) and an absolute
    /// directory.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, LoggingError> {
        let level = match level.trim().parse::<LevelFilter>() {
            Ok(LevelFilter::Off) | Err(_) => {
                return Err(LoggingError::UnsupportedLevel(level.trim().to_string()))
            }
            Ok(parsed) => parsed,
        };
        let log_dir = Path::new(log_dir.trim());
        if !log_dir.is_absolute() {
            return Err(LoggingError::RelativeDir(log_dir.to_path_buf()));
        }
        Ok(Self {
            level,
            log_dir: log_dir.to_path_buf(),
        })
    }
}

/// Parses settings and starts file logging.
///
/// # Errors
/// - [`LoggingError::UnsupportedLevel`] / [`LoggingError::RelativeDir`] for
///   bad input.
/// - [`LoggingError::AlreadyActive`] when logging runs with other settings.
/// - [`LoggingError::CreateDir`] / [`LoggingError::Backend`] when the sink
///   cannot start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    start_logging(LogSettings::parse(level, log_dir)?)
}

/// Starts file logging with already parsed settings.
pub fn start_logging(settings: LogSettings) -> Result<(), LoggingError> {
    let (active, _) = ACTIVE.get_or_try_init(|| {
        let handle = open_backend(&settings)?;
        info!(
            "event=logging_start module=logging status=ok version={} level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            settings.level,
            settings.log_dir.display()
        );
        Ok::<_, LoggingError>((settings.clone(), handle))
    })?;

    if *active != settings {
        return Err(LoggingError::AlreadyActive {
            active: active.clone(),
            requested: settings,
        });
    }
    Ok(())
}

/// Settings of the running backend, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|(settings, _)| settings.clone())
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn open_backend(settings: &LogSettings) -> Result<LoggerHandle, LoggingError> {
    std::fs::create_dir_all(&settings.log_dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.log_dir.clone(),
        source,
    })?;

    Logger::with(LogSpecification::builder().default(settings.level).build())
        .log_to_file(
            FileSpec::default()
                .directory(settings.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)
}

/// Logging bootstrap errors.
#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    RelativeDir(PathBuf),
    AlreadyActive {
        active: LogSettings,
        requested: LogSettings,
    },
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::AlreadyActive { active, requested } => write!(
                f,
                "logging already active with {} at `{}`; refusing {} at `{}`",
                active.level,
                active.log_dir.display(),
                requested.level,
                requested.log_dir.display()
            ),
            Self::CreateDir { dir, source } => {
                write!(f, "failed to create `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogSettings, LoggingError};
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn parse_accepts_any_case_and_trims() {
        let settings =
            LogSettings::parse(" WARN ", " /var/log/wordcloud ").expect("valid settings");
        assert_eq!(settings.level, LevelFilter::Warn);
        assert_eq!(settings.log_dir, Path::new("/var/log/wordcloud"));
    }

    #[test]
    fn parse_rejects_off_unknown_and_relative() {
        assert!(matches!(
            LogSettings::parse("off", "/tmp"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
        assert!(matches!(
            LogSettings::parse("verbose", "/tmp"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
        assert!(matches!(
            LogSettings::parse("info", "logs/dev"),
            Err(LoggingError::RelativeDir(_))
        ));
        assert!(matches!(
            LogSettings::parse("info", "   "),
            Err(LoggingError::RelativeDir(_))
        ));
    }
}
