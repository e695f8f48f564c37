//! CLI interface and argument parsing
//!
//! The command line is the caller boundary: it establishes who is asking,
//! checks their roles and prints results as JSON on stdout.

pub mod commands;

use crate::domain::{Caller, Result, SearchError};
use clap::{Parser, Subcommand};

/// Exit code for a successful command
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the caller lacks a required role
pub const EXIT_ACCESS_DENIED: i32 = 3;
/// Exit code when the FHIR server cannot be reached
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for any other failure
pub const EXIT_FATAL: i32 = 5;

/// journal-search - role-gated search over FHIR clinical records
#[derive(Parser, Debug)]
#[command(name = "journal-search")]
#[command(version, about, long_about = None)]
#[command(author = "journal-search contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "journal-search.toml", env = "JOURNAL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "JOURNAL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Authenticated user name
    #[arg(short, long, env = "JOURNAL_USER")]
    pub user: Option<String>,

    /// Comma separated roles of the user (doctor, staff, patient)
    #[arg(short, long, env = "JOURNAL_ROLES")]
    pub roles: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The caller named by `--user` and `--roles`
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Authorization`] without a user name and
    /// [`SearchError::Validation`] for an unknown role.
    pub fn caller(&self) -> Result<Caller> {
        let username = self
            .user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| SearchError::Authorization("no user given (--user)".to_string()))?;
        let roles = match self.roles.as_deref() {
            Some(raw) => Caller::parse_roles(raw)?,
            None => Default::default(),
        };
        Ok(Caller {
            username: username.to_string(),
            roles,
        })
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search patients by name, condition or practitioner
    Patients(commands::patients::PatientsArgs),

    /// Search a practitioner's encounters
    Encounters(commands::encounters::EncountersArgs),

    /// Show the current user and roles
    Whoami(commands::whoami::WhoamiArgs),

    /// Check that the FHIR server answers
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
