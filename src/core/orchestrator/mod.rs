//! Concurrent backup orchestration
//!
//! - [`coordinator`] - nested fan-out over targets and sub-units, fan-in to the reporter
//! - [`job`] - sub-unit job lifecycle
//! - [`summary`] - run totals

pub mod coordinator;
pub mod job;
pub mod summary;

pub use coordinator::Orchestrator;
pub use job::{JobState, SubUnitJob};
pub use summary::{JobFailure, RunSummary, TargetFailure, TargetOutcome};
