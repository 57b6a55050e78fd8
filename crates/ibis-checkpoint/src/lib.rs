//! Binary checkpoint format for Ibis restart files.
//!
//! A checkpoint captures current-time state only: the flow fields,
//! the background-mesh classification and volumes, the solid
//! positions and velocities, and the time state. Old-time layers are
//! deliberately not written; a resumed run reconstructs them on its
//! first iteration the same way a fresh run does, which is what makes
//! restarted runs bitwise-identical to uninterrupted ones.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod snapshot;
pub mod store;

pub use error::CheckpointError;
pub use snapshot::Snapshot;
pub use store::CheckpointStore;

/// Magic bytes at the start of every checkpoint file.
pub const MAGIC: [u8; 4] = *b"IBCP";

/// Current checkpoint format version.
pub const FORMAT_VERSION: u8 = 1;
