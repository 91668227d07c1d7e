//! Audit logging — structured records of briefing access.
//!
//! Every request outcome is recorded as an [`AuditEntry`] and fanned out to
//! the configured sinks. The production sink ([`TracingSink`]) is stateless;
//! [`MemorySink`] keeps entries around for tests and diagnostics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A single audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
    pub briefing_id: String,
    pub outcome: AuditOutcome,
    pub details: Option<String>,
}

/// Types of auditable briefing events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Request arrived without a password
    CredentialMissing,
    /// Request carried the wrong password
    CredentialRejected,
    /// No briefing, or a malformed one, under the requested id
    BriefingNotFound,
    /// A templated field failed to render
    RenderFailed,
    /// Briefing rendered and returned
    BriefingServed { items: usize },
}

impl AuditEvent {
    /// Human-readable summary used by log sinks.
    pub fn describe(&self) -> &'static str {
        match self {
            AuditEvent::CredentialMissing => "No password provided for flash briefing",
            AuditEvent::CredentialRejected => "Wrong password for flash briefing",
            AuditEvent::BriefingNotFound => "No configured flash briefing was found",
            AuditEvent::RenderFailed => "Failed to render flash briefing",
            AuditEvent::BriefingServed { .. } => "Served flash briefing",
        }
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
    Denied,
}

/// Trait for audit log sinks (where events are written).
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// Fans audit entries out to a set of sinks.
#[derive(Clone)]
pub struct AuditLogger {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

/// Logs through [`TracingSink`].
impl Default for AuditLogger {
    fn default() -> Self {
        Self::new().with_sink(Arc::new(TracingSink))
    }
}

impl AuditLogger {
    /// Create a logger with no sinks.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink.
    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Record an audit event.
    pub fn log(
        &self,
        event: AuditEvent,
        briefing_id: &str,
        outcome: AuditOutcome,
        details: Option<String>,
    ) {
        let entry = AuditEntry {
            timestamp: Utc::now(),
            event,
            briefing_id: briefing_id.into(),
            outcome,
            details,
        };

        for sink in &self.sinks {
            sink.record(&entry);
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

/// A tracing-based audit sink.
///
/// Denials log at `warn`, failures at `error`, successes at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, entry: &AuditEntry) {
        let message = entry.event.describe();
        match entry.outcome {
            AuditOutcome::Denied => tracing::warn!(
                briefing_id = %entry.briefing_id,
                event = ?entry.event,
                "{message}: {}",
                entry.briefing_id
            ),
            AuditOutcome::Failure => tracing::error!(
                briefing_id = %entry.briefing_id,
                event = ?entry.event,
                details = ?entry.details,
                "{message}: {}",
                entry.briefing_id
            ),
            AuditOutcome::Success => tracing::debug!(
                briefing_id = %entry.briefing_id,
                event = ?entry.event,
                "{message}: {}",
                entry.briefing_id
            ),
        }
    }
}

/// Maximum number of entries a [`MemorySink`] keeps by default.
const DEFAULT_MEMORY_CAPACITY: usize = 1_000;

/// In-memory audit sink. Oldest entries are evicted at capacity.
pub struct MemorySink {
    capacity: usize,
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySink")
            .field("capacity", &self.capacity)
            .field("entry_count", &self.count())
            .finish()
    }
}

impl MemorySink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<AuditEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded entries, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Get entries filtered by outcome.
    pub fn entries_by_outcome(&self, outcome: AuditOutcome) -> Vec<AuditEntry> {
        self.lock()
            .iter()
            .filter(|e| e.outcome == outcome)
            .cloned()
            .collect()
    }

    /// Clear all stored entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Count of stored entries.
    pub fn count(&self) -> usize {
        self.lock().len()
    }
}

impl AuditSink for MemorySink {
    fn record(&self, entry: &AuditEntry) {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry.clone());
    }
}
