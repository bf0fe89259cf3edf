//! Payload processing engine.
//!
//! This module provides:
//! - The pipeline that drives payloads to terminal records
//! - A builder that wires configuration, registries and event sinks

mod builder;
mod integration_tests;
mod pipeline;

pub use builder::PipelineBuilder;
pub use pipeline::Pipeline;
