//! Domain models and types for journal-search.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers and references** ([`PatientId`], [`PractitionerId`], [`Reference`])
//! - **FHIR resources** ([`Resource`], [`Bundle`]) as read from the server
//! - **Queries** ([`PatientQuery`], [`EncounterQuery`]) built from caller input
//! - **Results** ([`PatientSearchResult`], [`EncounterSearchResult`])
//! - **Callers and roles** ([`Caller`], [`Role`])
//! - **Error types** ([`SearchError`], [`FhirError`]) and the [`Result`] alias
//!
//! # Resources
//!
//! Resources deserialize in one step into a closed enum keyed on
//! `resourceType`:
//!
//! ```rust
//! use journal_search::domain::Resource;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let json = r#"{"resourceType": "Patient", "id": "123", "name": [{"given": ["Anna"], "family": "Andersson"}]}"#;
//! let resource: Resource = serde_json::from_str(json)?;
//! let patient = resource.into_patient().expect("a patient");
//! assert_eq!(patient.first_name(), "Anna");
//! # Ok(())
//! # }
//! ```

pub mod caller;
pub mod errors;
pub mod ids;
pub mod query;
pub mod resource;
pub mod result;
pub mod results;

// Re-export commonly used types for convenience
pub use caller::{Caller, Role};
pub use errors::{FhirError, SearchError};
pub use ids::{PatientId, PractitionerId, Reference, ResourceKind};
pub use query::{EncounterQuery, PatientQuery, SearchBranch};
pub use resource::{Bundle, Condition, Encounter, Patient, Practitioner, Resource};
pub use result::Result;
pub use results::{EncounterSearchResult, PatientSearchResult};
