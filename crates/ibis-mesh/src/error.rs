//! Mesh construction errors.

use std::error::Error;
use std::fmt;

/// Errors detected while constructing mesh structures.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshError {
    /// A grid dimension is zero.
    ZeroDimension,
    /// A cell spacing is not positive and finite.
    InvalidSpacing {
        /// The offending spacing value.
        value: f64,
    },
    /// The solid surface has fewer than three vertices or zero area.
    DegenerateSurface {
        /// Description of the degeneracy.
        reason: String,
    },
    /// A partition was requested with more ranks than cell rows.
    TooManyRanks {
        /// Requested rank count.
        ranks: usize,
        /// Available cell rows.
        rows: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "grid dimensions must be nonzero"),
            Self::InvalidSpacing { value } => {
                write!(f, "cell spacing must be positive and finite, got {value}")
            }
            Self::DegenerateSurface { reason } => {
                write!(f, "degenerate solid surface: {reason}")
            }
            Self::TooManyRanks { ranks, rows } => {
                write!(f, "{ranks} ranks requested but only {rows} cell rows to split")
            }
        }
    }
}

impl Error for MeshError {}
