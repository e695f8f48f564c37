//! Search queries built from raw caller parameters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns the trimmed value, or `None` when the parameter is missing or blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A patient search: exactly one variant is active per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientQuery {
    ByName(String),
    ByCondition(String),
    /// Canonical practitioner id or an external personal identifier
    ByPractitioner(String),
}

impl PatientQuery {
    /// Chooses the query from optional parameters in priority order
    ///
    /// Name wins over condition, which wins over practitioner. Returns `None`
    /// when no parameter carries a usable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use journal_search::domain::PatientQuery;
    ///
    /// let query = PatientQuery::from_params(Some("Anna"), Some("Diabetes"), None);
    /// assert_eq!(query, Some(PatientQuery::ByName("Anna".to_string())));
    ///
    /// assert_eq!(PatientQuery::from_params(Some("  "), None, None), None);
    /// ```
    pub fn from_params(
        name: Option<&str>,
        condition: Option<&str>,
        practitioner_id: Option<&str>,
    ) -> Option<Self> {
        if let Some(name) = non_blank(name) {
            Some(PatientQuery::ByName(name.to_string()))
        } else if let Some(condition) = non_blank(condition) {
            Some(PatientQuery::ByCondition(condition.to_string()))
        } else {
            non_blank(practitioner_id).map(|p| PatientQuery::ByPractitioner(p.to_string()))
        }
    }

    /// Branch name used in audit records
    pub fn branch(&self) -> SearchBranch {
        match self {
            PatientQuery::ByName(_) => SearchBranch::Name,
            PatientQuery::ByCondition(_) => SearchBranch::Condition,
            PatientQuery::ByPractitioner(_) => SearchBranch::Practitioner,
        }
    }

    /// The search term the caller typed
    pub fn term(&self) -> &str {
        match self {
            PatientQuery::ByName(t) | PatientQuery::ByCondition(t) | PatientQuery::ByPractitioner(t) => t,
        }
    }
}

/// An encounter search for one practitioner, optionally narrowed to a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterQuery {
    pub practitioner: String,
    pub date: Option<String>,
}

impl EncounterQuery {
    /// Builds the query, `None` when the practitioner token is missing or blank
    pub fn from_params(practitioner_id: Option<&str>, date: Option<&str>) -> Option<Self> {
        let practitioner = non_blank(practitioner_id)?;
        Some(Self {
            practitioner: practitioner.to_string(),
            date: non_blank(date).map(str::to_string),
        })
    }
}

/// Resolution path chosen for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBranch {
    Name,
    Condition,
    Practitioner,
    Encounters,
    /// No usable parameter; nothing was searched
    None,
}

impl SearchBranch {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchBranch::Name => "name",
            SearchBranch::Condition => "condition",
            SearchBranch::Practitioner => "practitioner",
            SearchBranch::Encounters => "encounters",
            SearchBranch::None => "none",
        }
    }
}

impl fmt::Display for SearchBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
