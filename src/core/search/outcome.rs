//! Stage outcomes for search pipelines
//!
//! Two failure scopes exist and are kept apart by type:
//!
//! - [`Recovery`]: the whole call is normalized to an empty list (primary
//!   query failed or returned no bundle, or the practitioner did not resolve).
//! - [`DropReason`]: a single entry is left out while the others survive.

use crate::domain::{Bundle, Result};
use std::fmt;

/// Why a whole search was normalized to an empty result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// The primary query errored (network, non-success status, bad body)
    PrimaryFailed(String),
    /// The primary query answered without a bundle
    PrimaryAbsent,
    /// The practitioner token did not map to a canonical id
    NotResolved,
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recovery::PrimaryFailed(e) => write!(f, "primary query failed: {e}"),
            Recovery::PrimaryAbsent => f.write_str("primary query returned no bundle"),
            Recovery::NotResolved => f.write_str("practitioner not found"),
        }
    }
}

/// Result of one search pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    Found(Vec<T>),
    Recovered(Recovery),
}

impl<T> SearchOutcome<T> {
    /// Results, empty when the search was recovered
    pub fn into_results(self) -> Vec<T> {
        match self {
            SearchOutcome::Found(results) => results,
            SearchOutcome::Recovered(_) => Vec::new(),
        }
    }

    pub fn recovery(&self) -> Option<&Recovery> {
        match self {
            SearchOutcome::Found(_) => None,
            SearchOutcome::Recovered(r) => Some(r),
        }
    }
}

impl<T> From<std::result::Result<Vec<T>, Recovery>> for SearchOutcome<T> {
    fn from(value: std::result::Result<Vec<T>, Recovery>) -> Self {
        match value {
            Ok(results) => SearchOutcome::Found(results),
            Err(recovery) => SearchOutcome::Recovered(recovery),
        }
    }
}

/// Why a single entry was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The entry has no subject patient reference
    MissingSubject,
    /// The referenced patient does not exist
    PatientNotFound(String),
    /// Fetching the referenced patient failed
    LookupFailed(String),
    /// The resource carries no id to report
    MissingId,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingSubject => f.write_str("no subject reference"),
            DropReason::PatientNotFound(id) => write!(f, "patient {id} not found"),
            DropReason::LookupFailed(e) => write!(f, "patient lookup failed: {e}"),
            DropReason::MissingId => f.write_str("resource has no id"),
        }
    }
}

/// Result of composing one bundle entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome<T> {
    Kept(T),
    Dropped { entry: String, reason: DropReason },
}

impl<T> EntryOutcome<T> {
    pub fn dropped(entry: impl Into<String>, reason: DropReason) -> Self {
        EntryOutcome::Dropped {
            entry: entry.into(),
            reason,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EntryOutcome<U> {
        match self {
            EntryOutcome::Kept(value) => EntryOutcome::Kept(f(value)),
            EntryOutcome::Dropped { entry, reason } => EntryOutcome::Dropped { entry, reason },
        }
    }
}

/// Keeps the surviving entries in order, logging each drop
pub(crate) fn keep<T>(outcomes: Vec<EntryOutcome<T>>) -> Vec<T> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            EntryOutcome::Kept(value) => Some(value),
            EntryOutcome::Dropped { entry, reason } => {
                crate::log_entry_dropped!(entry, reason);
                None
            }
        })
        .collect()
}

/// Unwraps a primary query response or names the recovery to apply
pub(crate) fn primary(
    stage: &'static str,
    response: Result<Option<Bundle>>,
) -> std::result::Result<Bundle, Recovery> {
    match response {
        Ok(Some(bundle)) => {
            tracing::debug!(
                stage = stage,
                entries = bundle.entry.len(),
                total = ?bundle.total,
                "Primary query returned bundle"
            );
            Ok(bundle)
        }
        Ok(None) => {
            tracing::warn!(stage = stage, "Primary query returned no bundle");
            Err(Recovery::PrimaryAbsent)
        }
        Err(e) => {
            tracing::error!(stage = stage, error = %e, "Primary query failed");
            Err(Recovery::PrimaryFailed(e.to_string()))
        }
    }
}

/// Label for an entry in logs: its id, or a placeholder
pub(crate) fn entry_label(id: Option<&str>) -> String {
    id.unwrap_or("<no id>").to_string()
}
