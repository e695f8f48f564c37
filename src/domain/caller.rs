//! Authenticated callers and their roles

use super::errors::SearchError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Roles issued by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Staff,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Staff => "staff",
            Role::Patient => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "doctor" => Ok(Role::Doctor),
            "staff" => Ok(Role::Staff),
            "patient" => Ok(Role::Patient),
            other => Err(SearchError::Validation(format!(
                "Unknown role '{other}'. Must be one of: doctor, staff, patient"
            ))),
        }
    }
}

/// Roles allowed to search patients
pub const PATIENT_SEARCH_ROLES: &[Role] = &[Role::Doctor, Role::Staff];

/// Roles allowed to search encounters
pub const ENCOUNTER_SEARCH_ROLES: &[Role] = &[Role::Doctor];

/// Roles allowed to ask who they are
pub const WHOAMI_ROLES: &[Role] = &[Role::Doctor, Role::Staff, Role::Patient];

/// An already-authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Caller {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Parses a comma separated role list such as `doctor,staff`
    pub fn parse_roles(raw: &str) -> Result<BTreeSet<Role>> {
        raw.split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(Role::from_str)
            .collect()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Succeeds when the caller holds at least one of `allowed`
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Authorization`] otherwise.
    pub fn require_any(&self, allowed: &[Role]) -> Result<()> {
        if allowed.iter().any(|r| self.has_role(*r)) {
            return Ok(());
        }
        let allowed: Vec<&str> = allowed.iter().map(Role::as_str).collect();
        Err(SearchError::Authorization(format!(
            "user '{}' needs one of the roles: {}",
            self.username,
            allowed.join(", ")
        )))
    }
}
