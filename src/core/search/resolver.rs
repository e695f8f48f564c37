//! Practitioner identifier resolution
//!
//! Callers may name a practitioner either by the server's canonical id or by
//! an externally issued personal identifier. The resolver hides that choice
//! from the rest of the pipeline.

use super::outcome::Recovery;
use crate::adapters::fhir::ClinicalDataApi;
use crate::domain::{Practitioner, PractitionerId, Resource};

/// A practitioner token mapped to the server's id
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPractitioner {
    pub id: PractitionerId,
    /// The resource read while resolving; absent when the token was a UUID
    pub record: Option<Practitioner>,
}

impl ResolvedPractitioner {
    fn from_record(practitioner: Practitioner) -> Option<Self> {
        let id = PractitionerId::new(practitioner.id.clone()?).ok()?;
        Some(Self {
            id,
            record: Some(practitioner),
        })
    }
}

/// Outcome of resolving a practitioner token
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Canonical(ResolvedPractitioner),
    NotFound,
}

impl Resolution {
    /// Resolved practitioner, or the recovery that ends the search
    pub fn canonical(self) -> Result<ResolvedPractitioner, Recovery> {
        match self {
            Resolution::Canonical(resolved) => Ok(resolved),
            Resolution::NotFound => Err(Recovery::NotResolved),
        }
    }
}

/// Maps practitioner tokens to canonical ids
pub struct IdentifierResolver<'a> {
    api: &'a dyn ClinicalDataApi,
}

impl<'a> IdentifierResolver<'a> {
    pub fn new(api: &'a dyn ClinicalDataApi) -> Self {
        Self { api }
    }

    /// Resolves `token` to a canonical practitioner id
    ///
    /// UUID-shaped tokens are canonical as-is. Anything else is first read
    /// directly as a Practitioner id; failing that, it is searched as an
    /// identifier value and the first match wins. Lookup errors count as
    /// "not found".
    pub async fn resolve(&self, token: &str) -> Resolution {
        let token = token.trim();

        if PractitionerId::is_canonical(token) {
            if let Ok(id) = PractitionerId::new(token) {
                return Resolution::Canonical(ResolvedPractitioner { id, record: None });
            }
        }

        match self.api.get_practitioner(token).await {
            Ok(Some(Resource::Practitioner(practitioner))) => {
                if let Some(resolved) = ResolvedPractitioner::from_record(practitioner) {
                    tracing::debug!(
                        practitioner_id = %resolved.id,
                        "Practitioner token addressed directly"
                    );
                    return Resolution::Canonical(resolved);
                }
            }
            Ok(_) => {
                tracing::debug!("Practitioner token is not a resource id");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Direct practitioner read failed");
            }
        }

        match self.api.search_practitioner_by_identifier(token).await {
            Ok(Some(bundle)) => {
                let resolved = bundle
                    .practitioners()
                    .find(|p| p.id.is_some())
                    .cloned()
                    .and_then(ResolvedPractitioner::from_record);
                match resolved {
                    Some(resolved) => {
                        tracing::info!(
                            practitioner_id = %resolved.id,
                            matches = bundle.practitioners().count(),
                            "Resolved practitioner identifier"
                        );
                        Resolution::Canonical(resolved)
                    }
                    None => {
                        tracing::info!("No practitioner carries the given identifier");
                        Resolution::NotFound
                    }
                }
            }
            Ok(None) => {
                tracing::warn!("Practitioner identifier search returned no bundle");
                Resolution::NotFound
            }
            Err(e) => {
                tracing::warn!(error = %e, "Practitioner identifier search failed");
                Resolution::NotFound
            }
        }
    }
}
