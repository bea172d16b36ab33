//! Draft-update workflow: a fixed six-stage pipeline with one loop-back.
//!
//! There is no generic graph engine here. The stages run in a statically
//! declared order (`Stage::next`) and the single conditional edge, the one
//! re-entering analysis after finalization, is a pure predicate over the
//! run state. That covers the full behavior of the dynamic workflow this
//! design replaces, at a fraction of the machinery.

pub mod engine;
pub mod state;

pub use engine::WorkflowEngine;
pub use state::{AnalysisRecord, Stage, SuggestionRecord, WorkflowRunState};
