//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "journal-search.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing journal-search configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your FHIR server URL", self.output);
                println!("  2. For authenticated servers, set auth_type and create a .env file:");
                println!("     - JOURNAL_FHIR_USERNAME and JOURNAL_FHIR_PASSWORD (basic)");
                println!("     - JOURNAL_FHIR_TOKEN (bearer)");
                println!("  3. Validate configuration: journal-search validate-config");
                println!(
                    "  4. Search: journal-search --user doc1 --roles doctor patients --name Anna"
                );
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# journal-search configuration

environment = "development"

[application]
log_level = "info"

[fhir]
base_url = "http://localhost:8080/fhir"
auth_type = "none"
tls_verify = true
timeout_seconds = 30

[fhir.retry]
max_retries = 3
initial_delay_ms = 200
max_delay_ms = 2000

[search]
max_concurrent_lookups = 8
dedup_practitioner_patients = true

[audit]
file_enabled = false
path = "/var/log/journal-search/audit.jsonl"

[logging]
local_enabled = true
local_path = "/var/log/journal-search"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# journal-search configuration
#
# Role-gated search over patients, conditions and encounters held in a
# FHIR R4 server. Values of the form ${VAR} are read from the environment;
# JOURNAL_* variables override individual keys (e.g. JOURNAL_FHIR_BASE_URL).

# ============================================================================
# Environment
# ============================================================================
# development | staging | production
# TLS verification cannot be disabled in production.
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# FHIR Server Configuration
# ============================================================================
[fhir]
# Base URL of the FHIR server (HAPI FHIR default shown)
base_url = "http://localhost:8080/fhir"

# Authentication type: none | basic | bearer
auth_type = "none"

# Basic authentication (use environment variables)
# username = "${JOURNAL_FHIR_USERNAME}"
# password = "${JOURNAL_FHIR_PASSWORD}"

# Bearer token (use environment variable)
# token = "${JOURNAL_FHIR_TOKEN}"

# TLS/SSL verification
tls_verify = true

# Request timeout in seconds (1-300)
timeout_seconds = 30

# Retry with exponential backoff on connection errors, timeouts and 5xx
[fhir.retry]
max_retries = 3
initial_delay_ms = 200
max_delay_ms = 2000
backoff_multiplier = 2.0

# ============================================================================
# Search Settings
# ============================================================================
[search]
# Patient lookups run concurrently per request, at most this many (1-64)
max_concurrent_lookups = 8

# Report each patient once when searching by practitioner
dedup_practitioner_patients = true

# ============================================================================
# Audit Trail
# ============================================================================
[audit]
# Audit records always go to the tracing target "audit".
# Enable to also append JSON lines to a file. Search terms are SHA-256 hashed.
file_enabled = false
path = "/var/log/journal-search/audit.jsonl"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = true

# Local log directory
local_path = "/var/log/journal-search"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
