//! Result composition
//!
//! Each search path is a short pipeline: resolve the practitioner when needed,
//! fetch the primary bundle, look up the referenced patient per entry, and
//! normalize. Primary failures recover the whole call to an empty list;
//! per-entry failures drop only that entry (see [`super::outcome`]).
//!
//! Per-entry lookups run concurrently, at most `max_concurrent_lookups` at a
//! time. Output follows bundle order.

use super::outcome::{
    entry_label, keep, primary, DropReason, EntryOutcome, Recovery, SearchOutcome,
};
use super::resolver::{IdentifierResolver, ResolvedPractitioner};
use crate::adapters::fhir::ClinicalDataApi;
use crate::config::SearchSettings;
use crate::domain::{
    Encounter, EncounterQuery, EncounterSearchResult, PatientSearchResult, Resource,
};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

/// Builds normalized results from FHIR bundles
pub struct ResultComposer<'a> {
    api: &'a dyn ClinicalDataApi,
    settings: &'a SearchSettings,
}

impl<'a> ResultComposer<'a> {
    pub fn new(api: &'a dyn ClinicalDataApi, settings: &'a SearchSettings) -> Self {
        Self { api, settings }
    }

    fn concurrency(&self) -> usize {
        self.settings.max_concurrent_lookups.max(1)
    }

    /// Patients whose name matches; the bundle already holds full patients
    pub async fn patients_by_name(&self, name: &str) -> SearchOutcome<PatientSearchResult> {
        let response = self.api.search_patients_by_name(name).await;
        primary("patients_by_name", response)
            .map(|bundle| {
                let outcomes: Vec<_> = bundle
                    .patients()
                    .map(|patient| match PatientSearchResult::from_patient(patient) {
                        Some(result) => EntryOutcome::Kept(result),
                        None => EntryOutcome::dropped(entry_label(None), DropReason::MissingId),
                    })
                    .collect();
                keep(outcomes)
            })
            .into()
    }

    /// Patients with a condition whose text matches
    pub async fn patients_by_condition(&self, text: &str) -> SearchOutcome<PatientSearchResult> {
        self.try_patients_by_condition(text).await.into()
    }

    async fn try_patients_by_condition(
        &self,
        text: &str,
    ) -> Result<Vec<PatientSearchResult>, Recovery> {
        let bundle = primary(
            "conditions_by_text",
            self.api.search_conditions_by_text(text).await,
        )?;

        let outcomes: Vec<_> = stream::iter(bundle.conditions())
            .map(|condition| {
                self.fetch_patient(entry_label(condition.id.as_deref()), condition.patient_id())
            })
            .buffered(self.concurrency())
            .collect()
            .await;

        Ok(keep(outcomes))
    }

    /// Patients the practitioner has had encounters with
    pub async fn patients_by_practitioner(
        &self,
        token: &str,
    ) -> SearchOutcome<PatientSearchResult> {
        self.try_patients_by_practitioner(token).await.into()
    }

    async fn try_patients_by_practitioner(
        &self,
        token: &str,
    ) -> Result<Vec<PatientSearchResult>, Recovery> {
        let practitioner = self.resolve(token).await?;
        let bundle = primary(
            "encounters_by_practitioner_reference",
            self.api
                .search_encounters_by_practitioner(&practitioner.id.reference())
                .await,
        )?;

        // One lookup per patient; entries without a subject still pass to be dropped
        let dedup = self.settings.dedup_practitioner_patients;
        let mut seen: HashSet<&str> = HashSet::new();
        let encounters = bundle.encounters().filter(|encounter| {
            match encounter.patient_id() {
                Some(patient_id) if dedup => seen.insert(patient_id),
                _ => true,
            }
        });

        let outcomes: Vec<_> = stream::iter(encounters)
            .map(|encounter| {
                self.fetch_patient(entry_label(encounter.id.as_deref()), encounter.patient_id())
            })
            .buffered(self.concurrency())
            .collect()
            .await;

        Ok(keep(outcomes))
    }

    /// Encounters of a practitioner, optionally on one date
    pub async fn encounters(&self, query: &EncounterQuery) -> SearchOutcome<EncounterSearchResult> {
        self.try_encounters(query).await.into()
    }

    async fn try_encounters(
        &self,
        query: &EncounterQuery,
    ) -> Result<Vec<EncounterSearchResult>, Recovery> {
        let practitioner = self.resolve(&query.practitioner).await?;

        let bundle = match query.date.as_deref() {
            Some(date) => primary(
                "encounters_by_practitioner_and_date",
                self.api
                    .search_encounters_by_practitioner_and_date(practitioner.id.as_str(), date)
                    .await,
            )?,
            None => primary(
                "encounters_by_practitioner",
                self.api
                    .search_encounters_by_practitioner(practitioner.id.as_str())
                    .await,
            )?,
        };

        if bundle.encounters().next().is_none() {
            return Ok(Vec::new());
        }

        let practitioner_name = self.practitioner_name(&practitioner).await;

        let outcomes: Vec<_> = stream::iter(bundle.encounters())
            .map(|encounter| self.compose_encounter(encounter, practitioner_name.as_deref()))
            .buffered(self.concurrency())
            .collect()
            .await;

        Ok(keep(outcomes))
    }

    async fn compose_encounter(
        &self,
        encounter: &Encounter,
        practitioner_name: Option<&str>,
    ) -> EntryOutcome<EncounterSearchResult> {
        let label = entry_label(encounter.id.as_deref());
        if encounter.id.is_none() {
            return EntryOutcome::dropped(label, DropReason::MissingId);
        }

        self.fetch_patient(label, encounter.patient_id())
            .await
            .map(|patient| {
                let name = practitioner_name
                    .or_else(|| encounter.practitioner_display())
                    .unwrap_or_default()
                    .to_string();
                EncounterSearchResult::new(encounter, patient.id, name)
            })
    }

    async fn resolve(&self, token: &str) -> Result<ResolvedPractitioner, Recovery> {
        IdentifierResolver::new(self.api)
            .resolve(token)
            .await
            .canonical()
    }

    /// Display name of the practitioner, `None` if it cannot be read
    ///
    /// A record already read during resolution is reused as-is.
    async fn practitioner_name(&self, practitioner: &ResolvedPractitioner) -> Option<String> {
        if let Some(record) = &practitioner.record {
            return Some(record.display_name()).filter(|name| !name.is_empty());
        }

        let id = &practitioner.id;
        match self.api.get_practitioner(id.as_str()).await {
            Ok(Some(resource)) => resource
                .into_practitioner()
                .map(|p| p.display_name())
                .filter(|name| !name.is_empty()),
            Ok(None) => {
                tracing::warn!(practitioner_id = %id, "Practitioner not found for display name");
                None
            }
            Err(e) => {
                tracing::warn!(
                    practitioner_id = %id,
                    error = %e,
                    "Practitioner lookup failed, using participant display"
                );
                None
            }
        }
    }

    /// Fetches the patient an entry refers to
    async fn fetch_patient(
        &self,
        entry: String,
        patient_id: Option<&str>,
    ) -> EntryOutcome<PatientSearchResult> {
        let Some(patient_id) = patient_id else {
            return EntryOutcome::dropped(entry, DropReason::MissingSubject);
        };

        match self.api.get_patient(patient_id).await {
            Ok(Some(Resource::Patient(patient))) => {
                match PatientSearchResult::from_patient(&patient) {
                    Some(result) => EntryOutcome::Kept(result),
                    None => EntryOutcome::dropped(entry, DropReason::MissingId),
                }
            }
            Ok(_) => EntryOutcome::dropped(entry, DropReason::PatientNotFound(patient_id.to_string())),
            Err(e) => EntryOutcome::dropped(entry, DropReason::LookupFailed(e.to_string())),
        }
    }
}
