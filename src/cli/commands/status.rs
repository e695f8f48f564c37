//! Status command implementation
//!
//! Checks that the configured FHIR server answers its capability statement.

use crate::adapters::fhir::HttpFhirClient;
use crate::cli::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking FHIR server status");

        println!("📊 FHIR Server Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let client = match HttpFhirClient::new(config.fhir.clone()) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to create FHIR client");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("  Server: {}", config.fhir.base_url);
        println!("  Auth: {}", config.fhir.auth_type);

        match client.health_check().await {
            Ok(()) => {
                println!("✅ Server is reachable");
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Server is not reachable");
                println!("   Error: {e}");
                Ok(EXIT_CONNECTION)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_missing_config() {
        let code = StatusArgs {}
            .execute("/nonexistent/journal-search.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
