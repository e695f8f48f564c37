//! Query dispatcher
//!
//! Entry point of the search core. Picks exactly one resolution path per
//! request, records it in the audit trail and hands it to the composer.
//! Role checks happen before a request reaches this layer.

use super::audit::{AuditRecord, AuditTrail, SearchAuditor};
use super::composer::ResultComposer;
use crate::adapters::fhir::{ClinicalDataApi, HttpFhirClient};
use crate::config::{SearchConfig, SearchSettings};
use crate::domain::{
    Caller, EncounterQuery, EncounterSearchResult, PatientQuery, PatientSearchResult, Result,
    SearchBranch,
};
use std::sync::Arc;

/// Role-agnostic search over the clinical-data API
///
/// Searches never fail: every failure below this layer yields an empty list.
pub struct SearchService {
    api: Arc<dyn ClinicalDataApi>,
    auditor: Arc<dyn SearchAuditor>,
    settings: SearchSettings,
}

impl SearchService {
    pub fn new(
        api: Arc<dyn ClinicalDataApi>,
        auditor: Arc<dyn SearchAuditor>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            api,
            auditor,
            settings,
        }
    }

    /// Builds the HTTP client and audit trail from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the audit file cannot be set up.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let api = Arc::new(HttpFhirClient::new(config.fhir.clone())?);
        let auditor = Arc::new(AuditTrail::from_config(&config.audit)?);

        tracing::info!(
            base_url = %api.base_url(),
            max_concurrent_lookups = config.search.max_concurrent_lookups,
            "Search service ready"
        );

        Ok(Self::new(api, auditor, config.search.clone()))
    }

    pub fn api(&self) -> &dyn ClinicalDataApi {
        self.api.as_ref()
    }

    fn composer(&self) -> ResultComposer<'_> {
        ResultComposer::new(self.api.as_ref(), &self.settings)
    }

    fn audit(&self, caller: &Caller, branch: SearchBranch, term: Option<&str>) {
        crate::log_search_branch!(caller.username, branch);
        self.auditor
            .record(&AuditRecord::new(caller.username.as_str(), branch, term));
    }

    /// Patient search from raw optional parameters
    ///
    /// Priority is name, then condition, then practitioner id. With no usable
    /// parameter nothing is queried and the result is empty.
    pub async fn search_patients(
        &self,
        caller: &Caller,
        name: Option<&str>,
        condition: Option<&str>,
        practitioner_id: Option<&str>,
    ) -> Vec<PatientSearchResult> {
        match PatientQuery::from_params(name, condition, practitioner_id) {
            Some(query) => self.search_patients_by(caller, &query).await,
            None => {
                self.audit(caller, SearchBranch::None, None);
                Vec::new()
            }
        }
    }

    pub async fn search_patients_by(
        &self,
        caller: &Caller,
        query: &PatientQuery,
    ) -> Vec<PatientSearchResult> {
        self.audit(caller, query.branch(), Some(query.term()));

        let composer = self.composer();
        let outcome = match query {
            PatientQuery::ByName(name) => composer.patients_by_name(name).await,
            PatientQuery::ByCondition(text) => composer.patients_by_condition(text).await,
            PatientQuery::ByPractitioner(token) => composer.patients_by_practitioner(token).await,
        };

        if let Some(recovery) = outcome.recovery() {
            tracing::info!(
                branch = %query.branch(),
                reason = %recovery,
                "Patient search recovered to empty"
            );
        }
        let results = outcome.into_results();
        tracing::debug!(
            branch = %query.branch(),
            results = results.len(),
            "Patient search done"
        );
        results
    }

    /// Encounter search for a practitioner, optionally on one date
    ///
    /// A blank practitioner yields an empty list without any query; a blank
    /// date counts as absent.
    pub async fn search_encounters(
        &self,
        caller: &Caller,
        practitioner_id: Option<&str>,
        date: Option<&str>,
    ) -> Vec<EncounterSearchResult> {
        let Some(query) = EncounterQuery::from_params(practitioner_id, date) else {
            self.audit(caller, SearchBranch::None, None);
            return Vec::new();
        };

        self.audit(caller, SearchBranch::Encounters, Some(&query.practitioner));

        let outcome = self.composer().encounters(&query).await;
        if let Some(recovery) = outcome.recovery() {
            tracing::info!(reason = %recovery, "Encounter search recovered to empty");
        }
        outcome.into_results()
    }
}
