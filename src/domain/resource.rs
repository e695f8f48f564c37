//! FHIR resources as read from the clinical-data server
//!
//! Resources arrive as JSON objects discriminated by `resourceType`. They are
//! deserialized in one step into the closed [`Resource`] enum; each variant
//! carries only the fields search needs and ignores the rest.

use super::ids::{Reference, ResourceKind};
use serde::{Deserialize, Serialize};

/// A typed FHIR resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(Patient),
    Practitioner(Practitioner),
    Condition(Condition),
    Encounter(Encounter),
    /// Any resource type this service does not read (OperationOutcome, ...)
    #[serde(other)]
    Other,
}

impl Resource {
    /// Resource kind, `None` for [`Resource::Other`]
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Resource::Patient(_) => Some(ResourceKind::Patient),
            Resource::Practitioner(_) => Some(ResourceKind::Practitioner),
            Resource::Condition(_) => Some(ResourceKind::Condition),
            Resource::Encounter(_) => Some(ResourceKind::Encounter),
            Resource::Other => None,
        }
    }

    pub fn into_patient(self) -> Option<Patient> {
        match self {
            Resource::Patient(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_practitioner(self) -> Option<Practitioner> {
        match self {
            Resource::Practitioner(p) => Some(p),
            _ => None,
        }
    }
}

/// A person's name (`HumanName`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

impl HumanName {
    /// Given names followed by the family name, e.g. `Dr. Erik Karlsson`
    ///
    /// Falls back to the free-text form when no structured parts exist.
    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = self.given.iter().map(|g| g.trim()).collect();
        if let Some(family) = self.family.as_deref() {
            parts.push(family.trim());
        }
        let joined = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            self.text.clone().unwrap_or_default().trim().to_string()
        } else {
            joined
        }
    }
}

/// Business identifier attached to a person (national ID, HSA-id, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Picks the name to show: the `official` one if present, else the first
fn preferred_name(names: &[HumanName]) -> Option<&HumanName> {
    names
        .iter()
        .find(|n| n.name_use.as_deref() == Some("official"))
        .or_else(|| names.first())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl Patient {
    /// First given name of the preferred name, empty when absent
    pub fn first_name(&self) -> String {
        preferred_name(&self.name)
            .and_then(|n| n.given.first())
            .cloned()
            .unwrap_or_default()
    }

    /// Family name of the preferred name, empty when absent
    pub fn last_name(&self) -> String {
        preferred_name(&self.name)
            .and_then(|n| n.family.clone())
            .unwrap_or_default()
    }

    /// Value of the first identifier (the social security number in practice)
    pub fn primary_identifier(&self) -> String {
        self.identifier
            .iter()
            .find_map(|i| i.value.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
}

impl Practitioner {
    /// Full display name, empty when the resource carries no name
    pub fn display_name(&self) -> String {
        preferred_name(&self.name)
            .map(HumanName::display)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<String>,
}

impl Condition {
    /// Id of the patient this condition is recorded for
    pub fn patient_id(&self) -> Option<&str> {
        self.subject.as_ref()?.id_for(ResourceKind::Patient)
    }
}

/// Start and end of an encounter, kept as the server sent them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant: Vec<Participant>,
}

impl Encounter {
    /// Id of the patient the encounter is about
    pub fn patient_id(&self) -> Option<&str> {
        self.subject.as_ref()?.id_for(ResourceKind::Patient)
    }

    /// Display text the server attached to the first practitioner participant
    pub fn practitioner_display(&self) -> Option<&str> {
        self.participant
            .iter()
            .filter_map(|p| p.individual.as_ref())
            .filter(|r| r.id_for(ResourceKind::Practitioner).is_some())
            .find_map(|r| r.display.as_deref())
    }

    pub fn start(&self) -> Option<&str> {
        self.period.as_ref()?.start.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.period.as_ref()?.end.as_deref()
    }
}

/// A search-set bundle returned by one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

impl Bundle {
    /// Builds a search-set bundle around the given resources
    pub fn searchset(resources: impl IntoIterator<Item = Resource>) -> Self {
        let entry: Vec<BundleEntry> = resources
            .into_iter()
            .map(|resource| BundleEntry {
                full_url: None,
                resource: Some(resource),
            })
            .collect();
        Self {
            bundle_type: Some("searchset".to_string()),
            total: Some(entry.len() as u64),
            entry,
        }
    }

    /// All resources in entry order, skipping entries without one
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }

    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.resources().filter_map(|r| match r {
            Resource::Patient(p) => Some(p),
            _ => None,
        })
    }

    pub fn practitioners(&self) -> impl Iterator<Item = &Practitioner> {
        self.resources().filter_map(|r| match r {
            Resource::Practitioner(p) => Some(p),
            _ => None,
        })
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.resources().filter_map(|r| match r {
            Resource::Condition(c) => Some(c),
            _ => None,
        })
    }

    pub fn encounters(&self) -> impl Iterator<Item = &Encounter> {
        self.resources().filter_map(|r| match r {
            Resource::Encounter(e) => Some(e),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_patient() {
        let value = json!({
            "resourceType": "Patient",
            "id": "123",
            "meta": {"versionId": "1"},
            "name": [{"use": "official", "family": "Andersson", "given": ["Anna", "Maria"]}],
            "identifier": [{"system": "http://electronichealth.se/identifier/personnummer", "value": "197001011234"}],
            "birthDate": "1970-01-01"
        });

        let resource: Resource = serde_json::from_value(value).unwrap();
        let patient = resource.into_patient().unwrap();
        assert_eq!(patient.id.as_deref(), Some("123"));
        assert_eq!(patient.first_name(), "Anna");
        assert_eq!(patient.last_name(), "Andersson");
        assert_eq!(patient.primary_identifier(), "197001011234");
        assert_eq!(patient.birth_date.as_deref(), Some("1970-01-01"));
    }

    #[test]
    fn test_patient_without_name_or_identifier() {
        let resource: Resource =
            serde_json::from_value(json!({"resourceType": "Patient", "id": "9"})).unwrap();
        let patient = resource.into_patient().unwrap();
        assert_eq!(patient.first_name(), "");
        assert_eq!(patient.last_name(), "");
        assert_eq!(patient.primary_identifier(), "");
    }

    #[test]
    fn test_unknown_resource_type_is_other() {
        let resource: Resource = serde_json::from_value(json!({
            "resourceType": "OperationOutcome",
            "issue": [{"severity": "error"}]
        }))
        .unwrap();
        assert_eq!(resource, Resource::Other);
        assert_eq!(resource.kind(), None);
    }

    #[test]
    fn test_practitioner_display_name() {
        let practitioner = Practitioner {
            id: Some("999".to_string()),
            name: vec![HumanName {
                given: vec!["Dr. Erik".to_string()],
                family: Some("Karlsson".to_string()),
                ..Default::default()
            }],
            identifier: vec![],
        };
        assert_eq!(practitioner.display_name(), "Dr. Erik Karlsson");
    }

    #[test]
    fn test_human_name_falls_back_to_text() {
        let name = HumanName {
            text: Some("Erik Karlsson".to_string()),
            ..Default::default()
        };
        assert_eq!(name.display(), "Erik Karlsson");
        assert_eq!(HumanName::default().display(), "");
    }

    #[test]
    fn test_preferred_name_is_official() {
        let patient = Patient {
            name: vec![
                HumanName {
                    name_use: Some("nickname".to_string()),
                    given: vec!["Annie".to_string()],
                    ..Default::default()
                },
                HumanName {
                    name_use: Some("official".to_string()),
                    given: vec!["Anna".to_string()],
                    family: Some("Andersson".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(patient.first_name(), "Anna");
    }

    #[test]
    fn test_encounter_accessors() {
        let resource: Resource = serde_json::from_value(json!({
            "resourceType": "Encounter",
            "id": "enc1",
            "status": "finished",
            "subject": {"reference": "Patient/123"},
            "period": {"start": "2024-01-01T10:00:00", "end": "2024-01-01T11:00:00"},
            "participant": [{"individual": {"reference": "Practitioner/999", "display": "Dr. Erik Karlsson"}}]
        }))
        .unwrap();

        let Resource::Encounter(encounter) = resource else {
            panic!("Expected Encounter");
        };
        assert_eq!(encounter.patient_id(), Some("123"));
        assert_eq!(encounter.start(), Some("2024-01-01T10:00:00"));
        assert_eq!(encounter.end(), Some("2024-01-01T11:00:00"));
        assert_eq!(encounter.practitioner_display(), Some("Dr. Erik Karlsson"));
    }

    #[test]
    fn test_condition_patient_id() {
        let condition = Condition {
            id: Some("cond1".to_string()),
            subject: Some(Reference::new("Patient/123")),
            ..Default::default()
        };
        assert_eq!(condition.patient_id(), Some("123"));
        assert_eq!(Condition::default().patient_id(), None);
    }

    #[test]
    fn test_bundle_typed_iterators() {
        let value = json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 3,
            "entry": [
                {"fullUrl": "http://fhir/Patient/1", "resource": {"resourceType": "Patient", "id": "1"}},
                {"resource": {"resourceType": "OperationOutcome"}},
                {"search": {"mode": "include"}},
                {"resource": {"resourceType": "Patient", "id": "2"}}
            ]
        });

        let bundle: Bundle = serde_json::from_value(value).unwrap();
        assert_eq!(bundle.total, Some(3));
        assert_eq!(bundle.bundle_type.as_deref(), Some("searchset"));
        assert_eq!(bundle.resources().count(), 3);
        assert_eq!(bundle.patients().count(), 2);
        assert_eq!(bundle.encounters().count(), 0);
    }

    #[test]
    fn test_bundle_without_entries() {
        let bundle: Bundle =
            serde_json::from_value(json!({"resourceType": "Bundle", "total": 0})).unwrap();
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_searchset_builder() {
        let bundle = Bundle::searchset(vec![Resource::Patient(Patient::default())]);
        assert_eq!(bundle.total, Some(1));
        assert_eq!(bundle.patients().count(), 1);
    }
}
