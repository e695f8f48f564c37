//! Clinical-data API trait
//!
//! `ClinicalDataApi` is the seam between search orchestration and the FHIR
//! server. The HTTP implementation lives in [`super::http`]; tests substitute
//! in-memory fakes.

use crate::domain::{Bundle, Resource, Result};
use async_trait::async_trait;

/// Read-only queries the search core issues against the FHIR server
///
/// Search operations return `Ok(None)` when the server answered without a
/// bundle. Read operations return `Ok(None)` when the resource does not exist.
#[async_trait]
pub trait ClinicalDataApi: Send + Sync {
    /// `Patient?name=<name>`
    async fn search_patients_by_name(&self, name: &str) -> Result<Option<Bundle>>;

    /// `Condition?code:text=<text>`
    async fn search_conditions_by_text(&self, text: &str) -> Result<Option<Bundle>>;

    /// `Patient/<id>`
    async fn get_patient(&self, id: &str) -> Result<Option<Resource>>;

    /// `Practitioner/<id>`
    async fn get_practitioner(&self, id: &str) -> Result<Option<Resource>>;

    /// `Practitioner?identifier=<token>`
    async fn search_practitioner_by_identifier(&self, token: &str) -> Result<Option<Bundle>>;

    /// `Encounter?participant=<reference or id>`
    async fn search_encounters_by_practitioner(&self, practitioner: &str)
        -> Result<Option<Bundle>>;

    /// `Encounter?participant=<id>&date=<date>`
    async fn search_encounters_by_practitioner_and_date(
        &self,
        practitioner_id: &str,
        date: &str,
    ) -> Result<Option<Bundle>>;

    /// Base URL of the server, for logging
    fn base_url(&self) -> &str;
}
