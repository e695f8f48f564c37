//! Core search logic for journal-search.
//!
//! # Search workflow
//!
//! 1. **Dispatch**: pick one resolution path from the caller's parameters
//! 2. **Resolve**: map a practitioner token to its canonical id
//! 3. **Fetch**: run the primary FHIR search
//! 4. **Compose**: look up the patient behind each entry and normalize
//! 5. **Recover**: any primary failure yields an empty list
//!
//! # Example
//!
//! ```rust,no_run
//! use journal_search::config::load_config;
//! use journal_search::core::search::SearchService;
//! use journal_search::domain::{Caller, Role};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("journal-search.toml")?;
//! let service = SearchService::from_config(&config)?;
//!
//! let caller = Caller::new("doc1", [Role::Doctor]);
//! let patients = service
//!     .search_patients(&caller, Some("Anna"), None, None)
//!     .await;
//!
//! println!("Found {} patients", patients.len());
//! # Ok(())
//! # }
//! ```

pub mod search;
