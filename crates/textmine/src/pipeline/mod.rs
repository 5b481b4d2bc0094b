//! Pipeline module.
//!
//! This module provides the main text-mining pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, MiningStage, ProgressReporter, ProgressUpdate};
