//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the journal-search configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after substitution and overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  FHIR Server: {}", config.fhir.base_url);
        println!("  Auth Type: {}", config.fhir.auth_type);
        println!("  TLS Verify: {}", config.fhir.tls_verify);
        println!("  Timeout: {}s", config.fhir.timeout_seconds);
        println!("  Max Retries: {}", config.fhir.retry.max_retries);
        println!(
            "  Max Concurrent Lookups: {}",
            config.search.max_concurrent_lookups
        );
        println!(
            "  Dedup Practitioner Patients: {}",
            config.search.dedup_practitioner_patients
        );
        if config.audit.file_enabled {
            println!("  Audit File: {}", config.audit.path);
        }
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_accepts_minimal_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[fhir]\nbase_url = \"http://localhost:8080/fhir\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_concurrency() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[fhir]\nbase_url = \"http://localhost:8080/fhir\"\n\n[search]\nmax_concurrent_lookups = 0"
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
