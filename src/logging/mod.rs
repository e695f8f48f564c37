//! Logging and observability
//!
//! Structured logging with:
//! - Console output on stderr (stdout carries command results)
//! - JSON-formatted log files with rotation
//! - Configurable log levels
//!
//! # Example
//!
//! ```no_run
//! use journal_search::logging::init_logging;
//! use journal_search::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the resolution path chosen for a request
///
/// # Example
///
/// ```no_run
/// use journal_search::log_search_branch;
/// use journal_search::domain::SearchBranch;
///
/// log_search_branch!("doc1", SearchBranch::Name);
/// ```
#[macro_export]
macro_rules! log_search_branch {
    ($username:expr, $branch:expr) => {
        tracing::info!(
            username = %$username,
            branch = %$branch,
            "Dispatching search"
        );
    };
}

/// Log a bundle entry left out of the results
///
/// # Example
///
/// ```no_run
/// use journal_search::log_entry_dropped;
///
/// log_entry_dropped!("enc-1", "no subject reference");
/// ```
#[macro_export]
macro_rules! log_entry_dropped {
    ($entry:expr, $reason:expr) => {
        tracing::warn!(
            entry = %$entry,
            reason = %$reason,
            "Dropping entry"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use journal_search::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying request"
        );
    };
}
