//! Normalized search results returned to callers

use super::resource::{Encounter, Patient};
use serde::{Deserialize, Serialize};

/// One patient found by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSearchResult {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub social_security_number: String,
}

impl PatientSearchResult {
    /// Normalizes a patient resource; `None` when the resource has no id
    pub fn from_patient(patient: &Patient) -> Option<Self> {
        let id = patient.id.as_deref().filter(|id| !id.trim().is_empty())?;
        Some(Self {
            id: id.to_string(),
            first_name: patient.first_name(),
            last_name: patient.last_name(),
            social_security_number: patient.primary_identifier(),
        })
    }
}

/// One encounter found by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterSearchResult {
    pub id: String,
    pub patient_id: String,
    pub practitioner_name: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl EncounterSearchResult {
    /// Builds a result; period strings are passed through as received
    pub fn new(encounter: &Encounter, patient_id: String, practitioner_name: String) -> Self {
        Self {
            id: encounter.id.clone().unwrap_or_default(),
            patient_id,
            practitioner_name,
            start_time: encounter.start().map(str::to_string),
            end_time: encounter.end().map(str::to_string),
        }
    }
}
