//! External system integrations for journal-search.
//!
//! - [`fhir`] - FHIR resource server integration
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the search core can
//! be exercised against in-memory implementations.
//!
//! ```rust,no_run
//! use journal_search::adapters::fhir::HttpFhirClient;
//! use journal_search::config::{secret_string, FhirConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FhirConfig {
//!     base_url: "https://fhir.example.com/fhir".to_string(),
//!     auth_type: "bearer".to_string(),
//!     token: Some(secret_string("token".to_string())),
//!     ..Default::default()
//! };
//!
//! let client = HttpFhirClient::new(config)?;
//! client.health_check().await?;
//! # Ok(())
//! # }
//! ```

pub mod fhir;
