//! Patients command implementation
//!
//! Searches patients by name, condition text or practitioner. When several
//! parameters are given, name wins over condition, which wins over
//! practitioner.

use super::{authorize, build_service, print_json};
use crate::cli::EXIT_OK;
use crate::domain::caller::PATIENT_SEARCH_ROLES;
use crate::domain::{Caller, Result};
use clap::Args;

/// Arguments for the patients command
#[derive(Args, Debug)]
pub struct PatientsArgs {
    /// Patient name (partial match)
    #[arg(long)]
    pub name: Option<String>,

    /// Condition text, e.g. "Diabetes"
    #[arg(long)]
    pub condition: Option<String>,

    /// Practitioner id or personal identifier
    #[arg(long)]
    pub practitioner_id: Option<String>,
}

impl PatientsArgs {
    /// Execute the patients command
    pub async fn execute(&self, caller: Result<Caller>, config_path: &str) -> anyhow::Result<i32> {
        let caller = match authorize(caller, PATIENT_SEARCH_ROLES) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let service = match build_service(config_path) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let results = service
            .search_patients(
                &caller,
                self.name.as_deref(),
                self.condition.as_deref(),
                self.practitioner_id.as_deref(),
            )
            .await;

        tracing::info!(results = results.len(), "Patient search completed");
        print_json(&results)?;
        Ok(EXIT_OK)
    }
}
