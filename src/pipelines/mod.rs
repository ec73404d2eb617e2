//! Pipelines.
//!
//! A pipeline is an ordered list of [stage::Stage]s driven by a [runner::Runner],
//! and exposed through the light [pipeline::Pipeline] trait.
pub mod langdir;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod runner;
pub mod stage;
pub mod wenetspeech;

pub use pipeline::Pipeline;
pub use runner::{RunReport, Runner};
pub use stage::{Completion, Stage};
pub use wenetspeech::WenetSpeechPrep;
