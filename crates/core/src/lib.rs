//! # Briefcast Core
//!
//! Domain types, traits, and error definitions for the Briefcast flash
//! briefing server. This crate has **no framework dependencies** — it defines
//! the domain model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator of the briefing responder is a trait here:
//! - [`TemplateRenderer`] renders dynamic briefing fields
//! - [`Clock`] supplies the current UTC time
//!
//! Implementations live in their respective crates, so tests can swap in
//! fixed clocks or stub renderers.

pub mod briefing;
pub mod calendar;
pub mod error;
pub mod render;

// Re-export key types at crate root for ergonomics
pub use briefing::{
    BriefingConfig, BriefingEntry, BriefingItem, BriefingOutput, DATE_FORMAT, FieldValue,
};
pub use error::{BriefingError, TemplateError};
pub use render::{Clock, FixedClock, RenderContext, SystemClock, TemplateRenderer};
