// journal-search - Role-gated search over FHIR clinical records
// Copyright (c) 2025 journal-search contributors
// Licensed under the MIT License

//! # journal-search - clinical search over FHIR
//!
//! journal-search answers role-gated questions about patients, conditions and
//! encounters held in an external FHIR R4 resource server such as HAPI FHIR.
//!
//! ## Overview
//!
//! - **Dispatching** each request to exactly one resolution path
//! - **Resolving** practitioner tokens (canonical id or personal identifier)
//! - **Composing** results from a primary search plus per-entry patient lookups
//! - **Recovering** every failure to an empty, valid result list
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface, caller identity and role checks
//! - [`core`] - Search orchestration (dispatcher, resolver, composer, audit)
//! - [`adapters`] - FHIR server client
//! - [`domain`] - Resources, queries, results, callers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use journal_search::config::load_config;
//! use journal_search::core::search::SearchService;
//! use journal_search::domain::{Caller, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("journal-search.toml")?;
//!     let service = SearchService::from_config(&config)?;
//!
//!     let caller = Caller::new("doc1", [Role::Doctor]);
//!     let encounters = service
//!         .search_encounters(&caller, Some("9999994392"), Some("2024-01-15"))
//!         .await;
//!
//!     println!("{}", serde_json::to_string_pretty(&encounters)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure handling
//!
//! Searches never return an error. A failed or empty primary query, or a
//! practitioner that cannot be resolved, yields an empty list. A failed
//! lookup for one entry drops only that entry:
//!
//! ```rust,no_run
//! use journal_search::core::search::{DropReason, EntryOutcome};
//!
//! let outcome: EntryOutcome<String> =
//!     EntryOutcome::dropped("enc-7", DropReason::MissingSubject);
//! assert!(matches!(outcome, EntryOutcome::Dropped { .. }));
//! ```
//!
//! ## Error Handling
//!
//! Configuration and client code use [`domain::SearchError`]:
//!
//! ```rust,no_run
//! use journal_search::domain::SearchError;
//!
//! fn example() -> Result<(), SearchError> {
//!     let _config = journal_search::config::load_config("journal-search.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
