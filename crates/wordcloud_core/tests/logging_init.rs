use log::LevelFilter;
use wordcloud_core::{init_logging, logging_status, start_logging, LogSettings, LoggingError};

// Logging state is process-wide, so every assertion lives in one test.
#[test]
fn init_logging_is_idempotent_and_rejects_conflicts() {
    assert!(matches!(
        init_logging("info", "relative/logs"),
        Err(LoggingError::RelativeDir(_))
    ));
    assert!(matches!(
        init_logging("verbose", "/tmp"),
        Err(LoggingError::UnsupportedLevel(_))
    ));
    assert!(logging_status().is_none());

    let dir = tempfile::tempdir().expect("create temp dir");
    let log_dir = dir.path().join("logs");
    let log_dir_str = log_dir.to_str().expect("utf-8 temp path");

    init_logging("info", log_dir_str).expect("first init");
    init_logging("INFO", log_dir_str).expect("repeat init with same settings");
    let active = logging_status().expect("logging active");
    assert_eq!(active.level, LevelFilter::Info);
    assert_eq!(active.log_dir, log_dir);
    assert!(log_dir.is_dir());

    let err = init_logging("debug", log_dir_str).unwrap_err();
    let LoggingError::AlreadyActive { active, requested } = &err else {
        panic!("expected conflict, got {err:?}");
    };
    assert_eq!(active.level, LevelFilter::Info);
    assert_eq!(requested.level, LevelFilter::Debug);

    let other = LogSettings {
        level: LevelFilter::Info,
        log_dir: dir.path().join("other"),
    };
    assert!(matches!(
        start_logging(other),
        Err(LoggingError::AlreadyActive { .. })
    ));
    assert_eq!(logging_status().map(|settings| settings.log_dir), Some(log_dir));
}
