//! Integration tests for logging functionality
//!
//! A global subscriber can be installed once per process, so initialization
//! is exercised by a single test in this binary.

use journal_search::config::LoggingConfig;
use journal_search::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "/var/log/journal-search");
}

#[test]
fn test_init_logging_writes_json_file_once() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_dir.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).expect("first initialization succeeds");
    assert!(log_dir.exists());

    // The global subscriber is already set
    assert!(init_logging("info", &config).is_err());

    drop(guard);

    let content = std::fs::read_to_string(log_dir.join("journal-search.log")).unwrap();
    let first_line = content.lines().next().expect("at least one log line");
    let event: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(event["fields"]["message"], "Logging initialized");
}

#[test]
fn test_init_logging_rejects_bad_level() {
    let config = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };
    assert!(init_logging("verbose", &config).is_err());
}
