//! Slab decomposition of the background mesh across ranks.
//!
//! Rows are split into contiguous slabs, one per rank; with row-major
//! cell ordering each rank owns one contiguous range of cell indices.
//! Between two adjacent slabs sits a processor-boundary patch: the
//! facing rows whose field values must stay consistent across the two
//! owning ranks.

use std::ops::Range;

use indexmap::IndexMap;

use crate::background::BackgroundMesh;
use crate::error::MeshError;

/// One side of a processor-decomposition interface, as seen from a
/// particular rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryPatch {
    /// The rank on the other side of the interface.
    pub neighbor: usize,
    /// Cells this rank owns on the interface, canonical order.
    pub owned: Vec<usize>,
    /// The facing cells owned by `neighbor`, canonical order. These
    /// are the halo copies reconciliation overwrites.
    pub halo: Vec<usize>,
}

/// Mapping from background-mesh cells to owning ranks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelPartition {
    nx: usize,
    ny: usize,
    row_slabs: Vec<Range<usize>>,
}

impl ParallelPartition {
    /// Split `mesh` into `n_ranks` row slabs of near-equal height.
    pub fn new(mesh: &BackgroundMesh, n_ranks: usize) -> Result<Self, MeshError> {
        if n_ranks == 0 || n_ranks > mesh.ny() {
            return Err(MeshError::TooManyRanks {
                ranks: n_ranks,
                rows: mesh.ny(),
            });
        }
        let ny = mesh.ny();
        let mut row_slabs = Vec::with_capacity(n_ranks);
        for rank in 0..n_ranks {
            let start = rank * ny / n_ranks;
            let end = (rank + 1) * ny / n_ranks;
            row_slabs.push(start..end);
        }
        Ok(Self {
            nx: mesh.nx(),
            ny,
            row_slabs,
        })
    }

    /// Number of ranks.
    pub fn n_ranks(&self) -> usize {
        self.row_slabs.len()
    }

    /// The contiguous cell-index range owned by `rank`.
    pub fn owned_cells(&self, rank: usize) -> Range<usize> {
        let rows = &self.row_slabs[rank];
        rows.start * self.nx..rows.end * self.nx
    }

    /// The rank owning a cell.
    pub fn owner_of(&self, cell: usize) -> usize {
        let row = cell / self.nx;
        self.row_slabs
            .iter()
            .position(|slab| slab.contains(&row))
            .expect("cell row inside mesh")
    }

    /// Processor-boundary patches for `rank`, keyed by neighbor rank in
    /// ascending order. Empty for single-rank partitions.
    pub fn patches(&self, rank: usize) -> IndexMap<usize, BoundaryPatch> {
        let mut out = IndexMap::new();
        let slab = &self.row_slabs[rank];
        if rank > 0 {
            // Interface below: my first row faces the neighbor's last.
            out.insert(
                rank - 1,
                BoundaryPatch {
                    neighbor: rank - 1,
                    owned: self.row_cells(slab.start),
                    halo: self.row_cells(slab.start - 1),
                },
            );
        }
        if rank + 1 < self.n_ranks() {
            // Interface above: my last row faces the neighbor's first.
            out.insert(
                rank + 1,
                BoundaryPatch {
                    neighbor: rank + 1,
                    owned: self.row_cells(slab.end - 1),
                    halo: self.row_cells(slab.end),
                },
            );
        }
        out
    }

    fn row_cells(&self, row: usize) -> Vec<usize> {
        let start = row * self.nx;
        (start..start + self.nx).collect()
    }
}
