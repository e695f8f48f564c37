//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{Environment, SearchConfig};
use super::secret::secret_string;
use crate::domain::errors::SearchError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SearchConfig
/// 4. Applies environment variable overrides (JOURNAL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SearchError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use journal_search::config::loader::load_config;
///
/// let config = load_config("journal-search.toml").expect("Failed to load config");
/// println!("FHIR server: {}", config.fhir.base_url);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SearchConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SearchError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SearchError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SearchConfig = toml::from_str(&contents)
        .map_err(|e| SearchError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SearchError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SearchError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SearchError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the JOURNAL_* prefix
///
/// Variables follow the pattern `JOURNAL_<SECTION>_<KEY>`, for example
/// `JOURNAL_FHIR_BASE_URL` or `JOURNAL_SEARCH_MAX_CONCURRENT_LOOKUPS`.
fn apply_env_overrides(config: &mut SearchConfig) -> Result<()> {
    if let Ok(val) = std::env::var("JOURNAL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("JOURNAL_ENVIRONMENT") {
        config.environment = match val.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(SearchError::Configuration(format!(
                    "Invalid JOURNAL_ENVIRONMENT '{other}'. Must be one of: development, staging, production"
                )))
            }
        };
    }

    // FHIR overrides
    if let Ok(val) = std::env::var("JOURNAL_FHIR_BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Ok(val) = std::env::var("JOURNAL_FHIR_AUTH_TYPE") {
        config.fhir.auth_type = val;
    }
    if let Ok(val) = std::env::var("JOURNAL_FHIR_USERNAME") {
        config.fhir.username = Some(val);
    }
    if let Ok(val) = std::env::var("JOURNAL_FHIR_PASSWORD") {
        config.fhir.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("JOURNAL_FHIR_TOKEN") {
        config.fhir.token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("JOURNAL_FHIR_TLS_VERIFY") {
        config.fhir.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("JOURNAL_FHIR_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.fhir.timeout_seconds = timeout;
        }
    }

    // Search overrides
    if let Ok(val) = std::env::var("JOURNAL_SEARCH_MAX_CONCURRENT_LOOKUPS") {
        if let Ok(limit) = val.parse() {
            config.search.max_concurrent_lookups = limit;
        }
    }
    if let Ok(val) = std::env::var("JOURNAL_SEARCH_DEDUP_PRACTITIONER_PATIENTS") {
        config.search.dedup_practitioner_patients = val.parse().unwrap_or(true);
    }

    // Audit overrides
    if let Ok(val) = std::env::var("JOURNAL_AUDIT_FILE_ENABLED") {
        config.audit.file_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("JOURNAL_AUDIT_PATH") {
        config.audit.path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("JOURNAL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("JOURNAL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("JOURNAL_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${JOURNAL_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("JOURNAL_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("JOURNAL_LOADER_MISSING_VAR");
        let input = "password = \"${JOURNAL_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("JOURNAL_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("JOURNAL_LOADER_COMMENTED_VAR");
        let input = "# token = \"${JOURNAL_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(SearchError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[fhir]
base_url = "https://fhir.example.com/fhir"
auth_type = "basic"
username = "user"
password = "pass"

[search]
max_concurrent_lookups = 4

[logging]
local_enabled = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.fhir.base_url, "https://fhir.example.com/fhir");
        assert_eq!(config.search.max_concurrent_lookups, 4);
        assert!(!config.audit.file_enabled);
    }
}
