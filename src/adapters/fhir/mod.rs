//! FHIR adapter implementation
//!
//! This module provides the integration with the FHIR resource server: the
//! [`ClinicalDataApi`] trait the search core depends on and its HTTP
//! implementation.

pub mod api;
pub mod http;

pub use api::ClinicalDataApi;
pub use http::HttpFhirClient;
