//! Error types for the Briefcast domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type.

use thiserror::Error;

/// Failures of a single briefing request.
///
/// Only `Unauthorized` and `NotFound` are user-visible; `Render` is an
/// internal fault that the HTTP layer turns into a generic failure.
#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("Unauthorized request for flash briefing: {briefing_id}")]
    Unauthorized { briefing_id: String },

    #[error("No configured flash briefing was found for: {briefing_id}")]
    NotFound { briefing_id: String },

    #[error("Failed to render flash briefing: {0}")]
    Render(#[from] TemplateError),
}

impl BriefingError {
    /// The briefing id the failed request asked for, when known.
    pub fn briefing_id(&self) -> Option<&str> {
        match self {
            BriefingError::Unauthorized { briefing_id }
            | BriefingError::NotFound { briefing_id } => Some(briefing_id),
            BriefingError::Render(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("Template syntax error at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: String },

    #[error("Undefined template variable: {0}")]
    UndefinedVariable(String),

    #[error("Unknown template filter: {0}")]
    UnknownFilter(String),

    #[error("Invalid argument for filter {filter}: {reason}")]
    InvalidFilterArgument { filter: String, reason: String },
}
