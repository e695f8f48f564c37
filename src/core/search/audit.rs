//! Search audit trail
//!
//! Every dispatched request leaves one record naming the caller and the
//! branch taken. Search terms identify patients, so only their SHA-256 hash
//! is ever written.

use crate::config::AuditConfig;
use crate::domain::{Result, SearchBranch, SearchError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

/// One audited search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub branch: SearchBranch,
    /// SHA-256 of the search term, absent for the `none` branch
    pub term_sha256: Option<String>,
}

impl AuditRecord {
    pub fn new(username: impl Into<String>, branch: SearchBranch, term: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            username: username.into(),
            branch,
            term_sha256: term.map(hash_term),
        }
    }
}

/// Hash a search term using SHA-256
pub fn hash_term(term: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(term.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sink for audit records
///
/// Recording must not fail the search; implementations log their own errors.
pub trait SearchAuditor: Send + Sync {
    fn record(&self, record: &AuditRecord);
}

/// Emits audit records as tracing events on the `audit` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditor;

impl SearchAuditor for TracingAuditor {
    fn record(&self, record: &AuditRecord) {
        tracing::info!(
            target: "audit",
            username = %record.username,
            branch = %record.branch,
            term_sha256 = record.term_sha256.as_deref().unwrap_or(""),
            "Search request"
        );
    }
}

/// Appends audit records to a JSON-lines file
///
/// Records are handed to a background writer thread so a request never
/// waits on file I/O. Dropping the logger flushes what is still queued.
pub struct FileAuditLogger {
    log_path: PathBuf,
    writer: NonBlocking,
    _guard: WorkerGuard,
}

impl FileAuditLogger {
    /// Create a file audit logger, creating the parent directory and the file
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if the directory or file cannot be created.
    pub fn new(log_path: impl Into<PathBuf>) -> Result<Self> {
        let log_path = log_path.into();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SearchError::Io(format!(
                    "Failed to create audit log directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| {
                SearchError::Io(format!(
                    "Failed to open audit log {}: {e}",
                    log_path.display()
                ))
            })?;

        // Audit lines are never dropped; a full queue makes the caller wait
        let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);

        Ok(Self {
            log_path,
            writer,
            _guard: guard,
        })
    }

    fn write_record(&self, record: &AuditRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        // One write per record keeps lines whole across concurrent callers
        self.writer.clone().write_all(line.as_bytes())?;
        Ok(())
    }
}

impl SearchAuditor for FileAuditLogger {
    fn record(&self, record: &AuditRecord) {
        if let Err(e) = self.write_record(record) {
            tracing::warn!(
                path = %self.log_path.display(),
                error = %e,
                "Failed to write audit record"
            );
        }
    }
}

/// Forwards each record to several sinks
#[derive(Default)]
pub struct AuditTrail {
    sinks: Vec<Box<dyn SearchAuditor>>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl SearchAuditor + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Tracing always; the JSON-lines file when enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the audit file directory cannot be created.
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        let mut trail = Self::new().with(TracingAuditor);
        if config.file_enabled {
            trail = trail.with(FileAuditLogger::new(&config.path)?);
        }
        Ok(trail)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SearchAuditor for AuditTrail {
    fn record(&self, record: &AuditRecord) {
        for sink in &self.sinks {
            sink.record(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_hash_term_is_stable_hex() {
        let a = hash_term("Anna");
        let b = hash_term("Anna");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_term("anna"));
    }

    #[test]
    fn test_record_never_holds_plain_term() {
        let record = AuditRecord::new("doc1", SearchBranch::Name, Some("Anna"));
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("Anna"));
        assert!(json.contains("\"branch\":\"name\""));
    }

    #[test]
    fn test_none_branch_has_no_hash() {
        let record = AuditRecord::new("doc1", SearchBranch::None, None);
        assert_eq!(record.term_sha256, None);
    }

    #[test]
    fn test_file_logger_appends_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");
        let logger = FileAuditLogger::new(&path).unwrap();

        logger.record(&AuditRecord::new("doc1", SearchBranch::Name, Some("Anna")));
        logger.record(&AuditRecord::new("staff1", SearchBranch::Condition, Some("Diabetes")));
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["username"], "doc1");
        assert_eq!(first["term_sha256"], hash_term("Anna"));
    }

    #[test]
    fn test_file_logger_keeps_lines_whole_across_threads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = FileAuditLogger::new(&path).unwrap();

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let logger = &logger;
                scope.spawn(move || {
                    for i in 0..25 {
                        let user = format!("user{worker}");
                        let term = format!("term{i}");
                        logger.record(&AuditRecord::new(user, SearchBranch::Name, Some(&term)));
                    }
                });
            }
        });
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 100);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["branch"], "name");
        }
    }

    #[test]
    fn test_file_logger_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(&path, "{\"earlier\":true}\n").unwrap();

        let logger = FileAuditLogger::new(&path).unwrap();
        logger.record(&AuditRecord::new("doc1", SearchBranch::None, None));
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("{\"earlier\":true}"));
    }

    #[test]
    fn test_trail_from_config() {
        let dir = tempdir().unwrap();
        let config = AuditConfig {
            file_enabled: true,
            path: dir.path().join("audit.jsonl").display().to_string(),
        };
        assert_eq!(AuditTrail::from_config(&config).unwrap().len(), 2);
        assert_eq!(
            AuditTrail::from_config(&AuditConfig::default()).unwrap().len(),
            1
        );
    }
}
