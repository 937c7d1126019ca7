//! Two-stage quiz solving pipeline.
//!
//! Stage one reads the configured reference material once and extracts
//! per-question facts in a single bulk call. Stage two solves each
//! question sequentially, streaming progress events as it goes.

pub mod backend;
pub mod context_stage;
pub mod events;
pub mod pipeline;
pub mod prompt;

pub use backend::Completion;
pub use context_stage::ContextMap;
pub use events::StreamEvent;
pub use pipeline::{Pacing, RunOutcome, SolverPipeline};
