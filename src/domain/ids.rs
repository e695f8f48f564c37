//! Domain identifier types with validation
//!
//! Newtype wrappers for FHIR resource identifiers and the `"<Type>/<id>"`
//! references that link one resource to another.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kinds of FHIR resources this service reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Patient,
    Practitioner,
    Condition,
    Encounter,
}

impl ResourceKind {
    /// FHIR resource type name, as used in URLs and references
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Patient => "Patient",
            ResourceKind::Practitioner => "Practitioner",
            ResourceKind::Condition => "Condition",
            ResourceKind::Encounter => "Encounter",
        }
    }
}

/// Whether `id` has FHIR logical-id syntax: 1-64 of `A-Z a-z 0-9 - .`
///
/// Dot-only ids are rejected so an id can never act as a path segment like
/// `..`. Ids failing this check must not be placed in a request path.
///
/// # Examples
///
/// ```
/// use journal_search::domain::ids::is_resource_id;
///
/// assert!(is_resource_id("30681750-1667-311a-a3e3-878ae10a35bb"));
/// assert!(!is_resource_id("x/../999"));
/// ```
pub fn is_resource_id(id: &str) -> bool {
    (1..=64).contains(&id.len())
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !id.chars().all(|c| c == '.')
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use journal_search::domain::ids::PatientId;
///
/// let id = PatientId::new("123").unwrap();
/// assert_eq!(id.as_str(), "123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical practitioner identifier
///
/// This is the server-native id of a Practitioner resource, as opposed to an
/// externally issued personal identifier (e.g. a Swedish personnummer) that a
/// caller may type in. See [`PractitionerId::is_canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PractitionerId(String);

impl PractitionerId {
    /// Creates a new PractitionerId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Practitioner ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Whether a caller-supplied token already has the canonical (UUID) shape
    ///
    /// # Examples
    ///
    /// ```
    /// use journal_search::domain::ids::PractitionerId;
    ///
    /// assert!(PractitionerId::is_canonical("30681750-1667-311a-a3e3-878ae10a35bb"));
    /// assert!(!PractitionerId::is_canonical("9999994392"));
    /// ```
    pub fn is_canonical(token: &str) -> bool {
        Uuid::parse_str(token.trim()).is_ok()
    }

    /// Returns the practitioner ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reference string addressing this practitioner (`Practitioner/<id>`)
    pub fn reference(&self) -> String {
        format!("{}/{}", ResourceKind::Practitioner, self.0)
    }
}

impl fmt::Display for PractitionerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PractitionerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A FHIR reference such as `Patient/123`
///
/// Absolute references (`https://fhir.example.org/Patient/123`) and versioned
/// references (`Patient/123/_history/2`) are understood as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Creates a reference from its string form
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            display: None,
        }
    }

    /// Extracts the id of the referenced resource when it is of `kind`
    ///
    /// A bare id without any `/` is accepted as-is. A reference to a
    /// different resource type yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use journal_search::domain::ids::{Reference, ResourceKind};
    ///
    /// let subject = Reference::new("Patient/123");
    /// assert_eq!(subject.id_for(ResourceKind::Patient), Some("123"));
    /// assert_eq!(subject.id_for(ResourceKind::Practitioner), None);
    /// ```
    pub fn id_for(&self, kind: ResourceKind) -> Option<&str> {
        let raw = self.reference.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if !raw.contains('/') {
            return Some(raw);
        }

        let segments: Vec<&str> = raw.split('/').collect();
        let position = segments.iter().rposition(|s| *s == kind.as_str())?;
        segments
            .get(position + 1)
            .copied()
            .filter(|id| !id.is_empty() && *id != "_history")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_syntax() {
        assert!(is_resource_id("123"));
        assert!(is_resource_id("prac-7.v2"));
        assert!(is_resource_id("19121212-1212"));

        for bad in ["", ".", "..", "x/../999", "999?_format=xml", "999#frag", "a b", "ä"] {
            assert!(!is_resource_id(bad), "{bad:?} accepted");
        }
        assert!(!is_resource_id(&"a".repeat(65)));
    }

    #[test]
    fn test_patient_id_validation() {
        assert!(PatientId::new("123").is_ok());
        assert!(PatientId::new("").is_err());
        assert!(PatientId::new("   ").is_err());
    }

    #[test]
    fn test_canonical_practitioner_tokens() {
        assert!(PractitionerId::is_canonical(
            "30681750-1667-311a-a3e3-878ae10a35bb"
        ));
        assert!(PractitionerId::is_canonical(
            " 30681750-1667-311a-a3e3-878ae10a35bb "
        ));
        assert!(!PractitionerId::is_canonical("9999994392"));
        assert!(!PractitionerId::is_canonical("999"));
        assert!(!PractitionerId::is_canonical(""));
    }

    #[test]
    fn test_practitioner_reference() {
        let id = PractitionerId::new("30681750-1667-311a-a3e3-878ae10a35bb").unwrap();
        assert_eq!(
            id.reference(),
            "Practitioner/30681750-1667-311a-a3e3-878ae10a35bb"
        );
    }

    #[test]
    fn test_reference_id_for_relative() {
        let r = Reference::new("Patient/123");
        assert_eq!(r.id_for(ResourceKind::Patient), Some("123"));
    }

    #[test]
    fn test_reference_id_for_absolute_and_versioned() {
        let r = Reference::new("https://fhir.example.org/fhir/Patient/abc/_history/3");
        assert_eq!(r.id_for(ResourceKind::Patient), Some("abc"));
    }

    #[test]
    fn test_reference_id_for_bare_id() {
        let r = Reference::new("123");
        assert_eq!(r.id_for(ResourceKind::Patient), Some("123"));
    }

    #[test]
    fn test_reference_id_for_wrong_kind_or_empty() {
        assert_eq!(
            Reference::new("Group/7").id_for(ResourceKind::Patient),
            None
        );
        assert_eq!(Reference::new("Patient/").id_for(ResourceKind::Patient), None);
        assert_eq!(Reference::new("").id_for(ResourceKind::Patient), None);

        let empty = Reference {
            reference: None,
            display: Some("Anna".to_string()),
        };
        assert_eq!(empty.id_for(ResourceKind::Patient), None);
    }
}
