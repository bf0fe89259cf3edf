//! Core domain model types for harvest.
//!
//! This module contains the work units moving through the engine:
//! - Links and their relation tags
//! - Payloads and their derived states
//! - Content type classification

pub mod content_type;
mod link;
mod payload;

pub use content_type::{ContentKind, APPLICATION_JSON, TEXT_HTML};
pub use link::{Link, REL_EXTERNAL, REL_NEXT};
pub use payload::{Payload, PayloadState};
