//! Configuration management for journal-search.
//!
//! # Overview
//!
//! journal-search reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `JOURNAL_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`FhirConfig`] - FHIR server connection, authentication and retries
//! - [`SearchSettings`] - fan-out limit and practitioner de-duplication
//! - [`AuditConfig`] - optional JSON-lines audit file
//! - [`LoggingConfig`] - local log files
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [fhir]
//! base_url = "https://fhir.example.com/fhir"
//! auth_type = "bearer"
//! token = "${JOURNAL_FHIR_TOKEN}"
//!
//! [search]
//! max_concurrent_lookups = 8
//!
//! [audit]
//! file_enabled = true
//! path = "/var/log/journal-search/audit.jsonl"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuditConfig, Environment, FhirConfig, LoggingConfig, RetryConfig,
    SearchConfig, SearchSettings,
};
pub use secret::{secret_string, SecretString, SecretValue};
