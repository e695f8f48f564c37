//! Encounters command implementation

use super::{authorize, build_service, print_json};
use crate::cli::EXIT_OK;
use crate::domain::caller::ENCOUNTER_SEARCH_ROLES;
use crate::domain::{Caller, Result};
use clap::Args;

/// Arguments for the encounters command
#[derive(Args, Debug)]
pub struct EncountersArgs {
    /// Practitioner id or personal identifier
    #[arg(long)]
    pub practitioner_id: Option<String>,

    /// Restrict to one date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

impl EncountersArgs {
    /// Execute the encounters command
    pub async fn execute(&self, caller: Result<Caller>, config_path: &str) -> anyhow::Result<i32> {
        let caller = match authorize(caller, ENCOUNTER_SEARCH_ROLES) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let service = match build_service(config_path) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let results = service
            .search_encounters(
                &caller,
                self.practitioner_id.as_deref(),
                self.date.as_deref(),
            )
            .await;

        tracing::info!(results = results.len(), "Encounter search completed");
        print_json(&results)?;
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EXIT_ACCESS_DENIED;
    use crate::domain::Role;

    #[tokio::test]
    async fn test_staff_cannot_search_encounters() {
        let args = EncountersArgs {
            practitioner_id: Some("9999994392".to_string()),
            date: None,
        };
        let caller = Caller::new("staff1", [Role::Staff]);
        let code = args.execute(Ok(caller), "unused.toml").await.unwrap();
        assert_eq!(code, EXIT_ACCESS_DENIED);
    }
}
