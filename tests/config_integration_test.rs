//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX`.

use journal_search::config::{load_config, Environment};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in [
        "JOURNAL_APPLICATION_LOG_LEVEL",
        "JOURNAL_ENVIRONMENT",
        "JOURNAL_FHIR_BASE_URL",
        "JOURNAL_FHIR_TLS_VERIFY",
        "JOURNAL_SEARCH_MAX_CONCURRENT_LOOKUPS",
        "JOURNAL_SEARCH_DEDUP_PRACTITIONER_PATIENTS",
        "JOURNAL_AUDIT_FILE_ENABLED",
        "TEST_FHIR_PASSWORD",
        "TEST_FHIR_TOKEN",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
environment = "staging"

[application]
log_level = "debug"

[fhir]
base_url = "https://fhir.example.com/fhir"
auth_type = "basic"
username = "test_user"
password = "test_pass"
tls_verify = true
timeout_seconds = 45

[fhir.retry]
max_retries = 5
initial_delay_ms = 100
max_delay_ms = 5000
backoff_multiplier = 1.5

[search]
max_concurrent_lookups = 16
dedup_practitioner_patients = false

[audit]
file_enabled = true
path = "/tmp/journal-search/audit.jsonl"

[logging]
local_enabled = false
local_path = "/tmp/journal-search"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.fhir.base_url, "https://fhir.example.com/fhir");
    assert_eq!(config.fhir.auth_type, "basic");
    assert_eq!(config.fhir.username, Some("test_user".to_string()));
    assert_eq!(
        config.fhir.password.as_ref().unwrap().expose_secret().to_string(),
        "test_pass"
    );
    assert_eq!(config.fhir.timeout_seconds, 45);
    assert_eq!(config.fhir.retry.max_retries, 5);
    assert_eq!(config.fhir.retry.initial_delay_ms, 100);

    assert_eq!(config.search.max_concurrent_lookups, 16);
    assert!(!config.search.dedup_practitioner_patients);

    assert!(config.audit.file_enabled);
    assert_eq!(config.audit.path, "/tmp/journal-search/audit.jsonl");

    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "http://localhost:8080/fhir"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.fhir.auth_type, "none");
    assert!(config.fhir.tls_verify);
    assert_eq!(config.fhir.timeout_seconds, 30);
    assert_eq!(config.fhir.retry.max_retries, 3);
    assert_eq!(config.search.max_concurrent_lookups, 8);
    assert!(config.search.dedup_practitioner_patients);
    assert!(!config.audit.file_enabled);
    assert_eq!(config.logging.local_rotation, "daily");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_FHIR_TOKEN", "secret_token");

    let temp_file = write_config(
        r#"
[fhir]
base_url = "https://fhir.example.com/fhir"
auth_type = "bearer"
token = "${TEST_FHIR_TOKEN}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(
        config.fhir.token.as_ref().unwrap().expose_secret().to_string(),
        "secret_token"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "https://fhir.example.com/fhir"
auth_type = "basic"
username = "user"
password = "${TEST_FHIR_PASSWORD}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_FHIR_PASSWORD"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("JOURNAL_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("JOURNAL_FHIR_BASE_URL", "https://override.example.com/fhir");
    std::env::set_var("JOURNAL_SEARCH_MAX_CONCURRENT_LOOKUPS", "2");
    std::env::set_var("JOURNAL_SEARCH_DEDUP_PRACTITIONER_PATIENTS", "false");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[fhir]
base_url = "http://localhost:8080/fhir"

[search]
max_concurrent_lookups = 8
"#,
    );

    let result = load_config(temp_file.path());
    cleanup_env_vars();

    let config = result.expect("Failed to load config");
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.fhir.base_url, "https://override.example.com/fhir");
    assert_eq!(config.search.max_concurrent_lookups, 2);
    assert!(!config.search.dedup_practitioner_patients);
}

#[test]
fn test_override_is_validated() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("JOURNAL_ENVIRONMENT", "production");
    std::env::set_var("JOURNAL_FHIR_TLS_VERIFY", "false");

    let temp_file = write_config(
        r#"
[fhir]
base_url = "https://fhir.example.com/fhir"
"#,
    );

    let result = load_config(temp_file.path());
    cleanup_env_vars();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("TLS certificate verification"));
}

#[test]
fn test_invalid_values_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[fhir]\nbase_url = \"ftp://fhir.example.com\"",
        "[fhir]\nbase_url = \"http://x\"\nauth_type = \"oauth\"",
        "[fhir]\nbase_url = \"http://x\"\nauth_type = \"bearer\"",
        "[fhir]\nbase_url = \"http://x\"\ntimeout_seconds = 0",
        "[fhir]\nbase_url = \"http://x\"\n\n[search]\nmax_concurrent_lookups = 65",
        "[fhir]\nbase_url = \"http://x\"\n\n[logging]\nlocal_rotation = \"size\"",
        "[application]\nlog_level = \"verbose\"\n\n[fhir]\nbase_url = \"http://x\"",
    ];

    for case in cases {
        let temp_file = write_config(case);
        assert!(
            load_config(temp_file.path()).is_err(),
            "expected rejection for:\n{case}"
        );
    }
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[fhir\nbase_url = ");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}
