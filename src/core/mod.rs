//! Core domain models for gantry
//!
//! This module defines the fundamental data structures that represent
//! pipeline runs, steps, guards and their configuration.

pub mod config;
pub mod context;
pub mod guard;
pub mod pipeline;
pub mod state;
pub mod step;
pub mod workflow;

pub use config::{ConfigError, PipelineConfig, StepConfig};
pub use context::*;
pub use guard::*;
pub use pipeline::*;
pub use state::*;
pub use step::*;
