//! Search orchestration
//!
//! - [`dispatcher`] - [`SearchService`], the entry point; picks one path per request
//! - [`resolver`] - practitioner token to canonical id
//! - [`composer`] - primary fetch, per-entry lookups, normalization
//! - [`outcome`] - whole-call recovery vs per-entry drop
//! - [`audit`] - one audit record per request

pub mod audit;
pub mod composer;
pub mod dispatcher;
pub mod outcome;
pub mod resolver;

pub use audit::{AuditRecord, AuditTrail, FileAuditLogger, SearchAuditor, TracingAuditor};
pub use composer::ResultComposer;
pub use dispatcher::SearchService;
pub use outcome::{DropReason, EntryOutcome, Recovery, SearchOutcome};
pub use resolver::{IdentifierResolver, Resolution, ResolvedPractitioner};
