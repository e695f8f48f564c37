//! CLI command implementations
//!
//! Search commands print JSON on stdout; diagnostics go to stderr.

pub mod encounters;
pub mod init;
pub mod patients;
pub mod status;
pub mod validate;
pub mod whoami;

use super::{EXIT_ACCESS_DENIED, EXIT_CONFIG};
use crate::config::load_config;
use crate::core::search::SearchService;
use crate::domain::{Caller, Result, Role};
use anyhow::Context;
use serde::Serialize;

/// Checks the caller against `allowed`, or the exit code to stop with
pub(crate) fn authorize(
    caller: Result<Caller>,
    allowed: &[Role],
) -> std::result::Result<Caller, i32> {
    let checked = caller.and_then(|c| c.require_any(allowed).map(|_| c));
    checked.map_err(|e| {
        tracing::warn!(error = %e, "Request rejected at boundary");
        eprintln!("❌ {e}");
        EXIT_ACCESS_DENIED
    })
}

/// Loads configuration and builds the search service, or the exit code to stop with
pub(crate) fn build_service(config_path: &str) -> std::result::Result<SearchService, i32> {
    let config = load_config(config_path).map_err(|e| {
        eprintln!("❌ Failed to load configuration file: {config_path}");
        eprintln!("   Error: {e}");
        EXIT_CONFIG
    })?;

    SearchService::from_config(&config).map_err(|e| {
        eprintln!("❌ Failed to set up search service");
        eprintln!("   Error: {e}");
        EXIT_CONFIG
    })
}

/// Prints `value` as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    println!("{json}");
    Ok(())
}
