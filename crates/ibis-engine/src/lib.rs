//! Run orchestration for the Ibis FSI framework.
//!
//! The [`Sequencer`] drives the fixed per-step coupling order: time
//! advance, force transfer, solid solve, geometry update, fluid
//! solve, closure correction, processor-boundary reconciliation, and
//! checkpointing. Everything else in this crate serves that loop: the
//! case configuration it validates at startup, the adaptive time
//! controller, the first-iteration restart guard, and the per-step
//! metrics it reports.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod consistency;
pub mod metrics;
pub mod restart;
pub mod sequencer;
pub mod time;

pub use config::{CaseConfig, ConfigError, RunContext};
pub use consistency::ParallelConsistencyManager;
pub use metrics::StepMetrics;
pub use restart::CheckpointGuard;
pub use sequencer::{CaseSolvers, RunSummary, Sequencer};
pub use time::TimeController;
