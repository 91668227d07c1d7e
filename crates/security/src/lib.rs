//! Security module for Briefcast — credential checks and audit logging.
//!
//! Provides:
//! - **Credentials**: Constant-time verification of the shared briefing password
//! - **Audit logging**: Structured records of every briefing request outcome

pub mod audit;
pub mod credential;

pub use audit::{
    AuditEntry, AuditEvent, AuditLogger, AuditOutcome, AuditSink, MemorySink, TracingSink,
};
pub use credential::SharedSecret;
