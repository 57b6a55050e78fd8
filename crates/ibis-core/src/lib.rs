//! Core types for the Ibis fluid-structure interaction framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Ibis workspace:
//! typed identifiers, time-layered field storage, the simulation clock
//! value, and the error taxonomy shared by every subsystem.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod time;

pub use error::{ExchangeError, Phase, SolverError, StepError, TransferError};
pub use field::{ClosureFieldsMut, FlowField, SurfaceLoad, TimeLayered, Vec2};
pub use id::{LoadPointId, StepId};
pub use time::TimeState;
