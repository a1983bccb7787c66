//! Core backup logic
//!
//! - [`orchestrator`] - runs all targets concurrently and reports their artifacts
//! - [`paths`] - where artifacts are written
//!
//! # Run Workflow
//!
//! 1. **Load**: the CLI fetches the due targets from the control plane
//! 2. **Connect**: one session per target through its engine adapter
//! 3. **Enumerate**: list the target's collections or tables
//! 4. **Export**: one job per sub-unit, all running concurrently
//! 5. **Report**: a single consumer forwards each record as it arrives
//! 6. **Summarize**: totals are logged once every job and report is done

pub mod orchestrator;
pub mod paths;
