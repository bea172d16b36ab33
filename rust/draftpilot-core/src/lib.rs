//! Draftpilot Core - Real-time Writing Assistance Engine
//!
//! This crate is the orchestration and scoring core of a real-time writing
//! assistant: given an evolving draft it produces keyword suggestions,
//! flags weak passages, and computes a multi-factor quality score,
//! refining all three as the draft changes. It offers:
//!
//! - **Session workflow**: a six-stage pipeline per draft update, with a
//!   bounded loop-back when the draft changes significantly mid-analysis
//! - **Deterministic scoring**: six independent 0-100 factors combined
//!   with fixed weights, plus threshold-gated recommendations
//! - **Resilience**: bounded exponential-backoff retry and a three-state
//!   circuit breaker around the external analyzer
//! - **Historical learning**: a bounded per-key log of past successful
//!   keywords that boosts future suggestions
//!
//! HTTP routing, storage, authentication, and the concrete language-model
//! client live outside this crate; the model is consumed through the
//! [`analyzer::TextAnalyzer`] trait and everything else through the
//! [`Orchestrator`] facade.
//!
//! # Architecture
//!
//! - [`config`]: typed configuration with serde defaults
//! - [`domain`]: profiles, posts, scores, suggestions
//! - [`analyzer`]: the external analyzer boundary and response sanitization
//! - [`retry`] / [`circuit_breaker`]: resilience around analyzer calls
//! - [`session`] / [`history`]: concurrent session and pattern stores
//! - [`scoring`]: the pure multi-factor scoring engine
//! - [`workflow`]: the per-update stage machine
//! - [`orchestrator`]: the public facade
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use draftpilot_core::{Orchestrator, domain::UserProfile};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(Arc::new(MyAnalyzer::connect()?));
//!
//!     let session = orchestrator
//!         .start_session(UserProfile::new("writer-1"))
//!         .await?;
//!     let payload = orchestrator
//!         .update_draft(&session, "Opening paragraph of the draft...", Some(0))
//!         .await?;
//!     println!("score: {}", payload.realtime_score.overall_score);
//!
//!     orchestrator.end_session(&session).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod analyzer;
pub mod circuit_breaker;
pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod logging;
pub mod orchestrator;
pub mod retry;
pub mod scoring;
pub mod session;
pub mod workflow;

pub use analyzer::TextAnalyzer;
pub use config::AssistConfig;
pub use error::{AssistError, AssistResult};
pub use orchestrator::Orchestrator;
pub use scoring::{ComprehensiveScore, ScoringEngine};
