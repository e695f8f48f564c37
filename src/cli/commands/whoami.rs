//! Whoami command implementation

use super::{authorize, print_json};
use crate::cli::EXIT_OK;
use crate::domain::caller::WHOAMI_ROLES;
use crate::domain::{Caller, Result};
use clap::Args;

/// Arguments for the whoami command
#[derive(Args, Debug)]
pub struct WhoamiArgs {}

impl WhoamiArgs {
    /// Execute the whoami command
    pub async fn execute(&self, caller: Result<Caller>) -> anyhow::Result<i32> {
        match authorize(caller, WHOAMI_ROLES) {
            Ok(caller) => {
                print_json(&caller)?;
                Ok(EXIT_OK)
            }
            Err(code) => Ok(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EXIT_ACCESS_DENIED;
    use crate::domain::Role;

    #[tokio::test]
    async fn test_whoami_accepts_patient() {
        let caller = Caller::new("pat1", [Role::Patient]);
        assert_eq!(WhoamiArgs {}.execute(Ok(caller)).await.unwrap(), EXIT_OK);
    }

    #[tokio::test]
    async fn test_whoami_requires_a_role() {
        let caller = Caller::new("nobody", Vec::<Role>::new());
        assert_eq!(
            WhoamiArgs {}.execute(Ok(caller)).await.unwrap(),
            EXIT_ACCESS_DENIED
        );
    }
}
