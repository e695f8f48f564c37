//! Configuration schema types
//!
//! This module defines the configuration structure for journal-search.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// FHIR server configuration
    pub fhir: FhirConfig,

    /// Search orchestration settings
    #[serde(default)]
    pub search: SearchSettings,

    /// Audit trail configuration
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SearchConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.fhir.validate(&self.environment)?;
        self.search.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration for FHIR requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (1 = no retry)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "fhir.retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "fhir.retry.backoff_multiplier must be at least 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "fhir.retry.initial_delay_ms cannot exceed fhir.retry.max_delay_ms".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// FHIR server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR server, e.g. `http://localhost:8080/fhir`
    pub base_url: String,

    /// Authentication type (none, basic, bearer)
    #[serde(default = "default_auth_type")]
    pub auth_type: String,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Token for bearer authentication
    #[serde(default)]
    pub token: Option<SecretString>,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes the service to
    /// man-in-the-middle attacks. Validation rejects `false` in production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl FhirConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("fhir.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("fhir.base_url must start with http:// or https://".to_string());
        }

        let valid_auth_types = ["none", "basic", "bearer"];
        if !valid_auth_types.contains(&self.auth_type.as_str()) {
            return Err(format!(
                "Invalid auth_type '{}'. Must be one of: {}",
                self.auth_type,
                valid_auth_types.join(", ")
            ));
        }

        if self.auth_type == "basic" {
            if self.username.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
                return Err("fhir.username cannot be empty when auth_type is 'basic'".to_string());
            }

            if self
                .password
                .as_ref()
                .map(|s| s.expose_secret().is_empty())
                .unwrap_or(true)
            {
                return Err("fhir.password cannot be empty when auth_type is 'basic'".to_string());
            }
        }

        if self.auth_type == "bearer"
            && self
                .token
                .as_ref()
                .map(|s| s.expose_secret().is_empty())
                .unwrap_or(true)
        {
            return Err("fhir.token cannot be empty when auth_type is 'bearer'".to_string());
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(format!(
                "fhir.timeout_seconds must be between 1 and 300, got {}",
                self.timeout_seconds
            ));
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true', or use environment = \"development\" or \"staging\" for testing."
                    .to_string(),
            );
        }

        self.retry.validate()?;
        Ok(())
    }
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/fhir".to_string(),
            auth_type: default_auth_type(),
            username: None,
            password: None,
            token: None,
            tls_verify: true,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

/// Search orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Upper bound on concurrent per-entry lookups within one request
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,

    /// Collapse repeated patients in practitioner-based patient search
    #[serde(default = "default_true")]
    pub dedup_practitioner_patients: bool,
}

impl SearchSettings {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_lookups == 0 || self.max_concurrent_lookups > 64 {
            return Err(format!(
                "search.max_concurrent_lookups must be between 1 and 64, got {}",
                self.max_concurrent_lookups
            ));
        }
        Ok(())
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: default_max_concurrent_lookups(),
            dedup_practitioner_patients: true,
        }
    }
}

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Write JSON-lines audit records to `path` in addition to tracing
    #[serde(default)]
    pub file_enabled: bool,

    /// Audit log file
    #[serde(default = "default_audit_path")]
    pub path: String,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.file_enabled && self.path.trim().is_empty() {
            return Err("audit.path cannot be empty when audit.file_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            path: default_audit_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_auth_type() -> String {
    "none".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_concurrent_lookups() -> usize {
    8
}

fn default_audit_path() -> String {
    "/var/log/journal-search/audit.jsonl".to_string()
}

fn default_log_path() -> String {
    "/var/log/journal-search".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
