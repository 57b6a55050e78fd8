//! The fixed-topology background fluid mesh.
//!
//! Topology never changes during a run. What does change, every step,
//! is the per-cell immersed-boundary classification and the derived
//! fluid fractions and volumes; the geometry updater in
//! `ibis-coupling` is their sole writer.

use ibis_core::{TimeLayered, Vec2};
use smallvec::SmallVec;

use crate::error::MeshError;

/// Immersed-boundary classification of a background cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellClass {
    /// Entirely on the fluid side of the immersed boundary.
    Fluid,
    /// Entirely covered by the solid.
    Solid,
    /// Intersected by the solid surface.
    Cut,
}

/// Fixed Cartesian background mesh with per-cell IBM state.
///
/// Cells are stored row-major: cell `r * nx + c` covers
/// `origin + (c·dx, r·dy) .. origin + ((c+1)·dx, (r+1)·dy)`.
/// Cell volumes carry current and old-time layers; the old layer feeds
/// flux-conservation ratios in the fluid solve and is seeded by the
/// restart guard on the first iteration of any run.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundMesh {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    origin: Vec2,
    class: Vec<CellClass>,
    fluid_fraction: Vec<f64>,
    volume: TimeLayered<f64>,
}

impl BackgroundMesh {
    /// Construct an all-fluid mesh of `nx × ny` cells.
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64, origin: Vec2) -> Result<Self, MeshError> {
        if nx == 0 || ny == 0 {
            return Err(MeshError::ZeroDimension);
        }
        for spacing in [dx, dy] {
            if !(spacing.is_finite() && spacing > 0.0) {
                return Err(MeshError::InvalidSpacing { value: spacing });
            }
        }
        let n = nx * ny;
        Ok(Self {
            nx,
            ny,
            dx,
            dy,
            origin,
            class: vec![CellClass::Fluid; n],
            fluid_fraction: vec![1.0; n],
            volume: TimeLayered::new(n, dx * dy),
        })
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Columns (x direction).
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Rows (y direction).
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Cell spacing in x.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Cell spacing in y.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Smallest cell extent, the length scale for Courant numbers and
    /// interpolation radii.
    pub fn h_min(&self) -> f64 {
        self.dx.min(self.dy)
    }

    /// Row-major index of cell `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.ny && col < self.nx);
        row * self.nx + col
    }

    /// `(row, col)` of a flat cell index.
    pub fn row_col(&self, cell: usize) -> (usize, usize) {
        (cell / self.nx, cell % self.nx)
    }

    /// Geometric center of a cell.
    pub fn center(&self, cell: usize) -> Vec2 {
        let (r, c) = self.row_col(cell);
        [
            self.origin[0] + (c as f64 + 0.5) * self.dx,
            self.origin[1] + (r as f64 + 0.5) * self.dy,
        ]
    }

    /// The four corner points of a cell, counter-clockwise from the
    /// lower-left.
    pub fn corners(&self, cell: usize) -> [Vec2; 4] {
        let (r, c) = self.row_col(cell);
        let x0 = self.origin[0] + c as f64 * self.dx;
        let y0 = self.origin[1] + r as f64 * self.dy;
        [
            [x0, y0],
            [x0 + self.dx, y0],
            [x0 + self.dx, y0 + self.dy],
            [x0, y0 + self.dy],
        ]
    }

    /// Face-neighbour cells (4-connectivity), in-bounds only.
    pub fn neighbours4(&self, cell: usize) -> SmallVec<[usize; 4]> {
        let (r, c) = self.row_col(cell);
        let mut out = SmallVec::new();
        if r > 0 {
            out.push(self.index(r - 1, c));
        }
        if c > 0 {
            out.push(self.index(r, c - 1));
        }
        if c + 1 < self.nx {
            out.push(self.index(r, c + 1));
        }
        if r + 1 < self.ny {
            out.push(self.index(r + 1, c));
        }
        out
    }

    /// Classification of a cell.
    pub fn class(&self, cell: usize) -> CellClass {
        self.class[cell]
    }

    /// All classifications, canonical cell order.
    pub fn classes(&self) -> &[CellClass] {
        &self.class
    }

    /// Fluid fraction of a cell: 1 for fluid, 0 for solid, the
    /// uncovered fraction for cut cells. Doubles as the immersed-patch
    /// interpolation weight.
    pub fn fluid_fraction(&self, cell: usize) -> f64 {
        self.fluid_fraction[cell]
    }

    /// All fluid fractions, canonical cell order.
    pub fn fluid_fractions(&self) -> &[f64] {
        &self.fluid_fraction
    }

    /// Replace classification and fluid fractions, recomputing current
    /// cell volumes. Geometry-updater use only; old-time volumes are
    /// untouched so flux ratios can still see the pre-update state.
    pub fn set_classification(&mut self, class: Vec<CellClass>, fluid_fraction: Vec<f64>) {
        assert_eq!(class.len(), self.cell_count());
        assert_eq!(fluid_fraction.len(), self.cell_count());
        self.class = class;
        self.fluid_fraction = fluid_fraction;
        let full = self.dx * self.dy;
        for (v, frac) in self
            .volume
            .current_mut()
            .iter_mut()
            .zip(&self.fluid_fraction)
        {
            *v = full * frac;
        }
    }

    /// Whether the cell is a fluid-side neighbour of the immersed
    /// boundary: cut itself, or fluid with a cut face-neighbour.
    pub fn is_boundary_adjacent(&self, cell: usize) -> bool {
        match self.class[cell] {
            CellClass::Cut => true,
            CellClass::Solid => false,
            CellClass::Fluid => self
                .neighbours4(cell)
                .iter()
                .any(|&n| self.class[n] == CellClass::Cut),
        }
    }

    /// Current cell volumes.
    pub fn volumes(&self) -> &[f64] {
        self.volume.current()
    }

    /// Old-time cell volumes, `None` until seeded or rotated.
    pub fn old_volumes(&self) -> Option<&[f64]> {
        self.volume.old()
    }

    /// Whether old-time volumes exist.
    pub fn has_old_volumes(&self) -> bool {
        self.volume.has_old()
    }

    /// Force old-time volumes equal to current (restart-guard seeding).
    pub fn seed_old_volumes(&mut self) {
        self.volume.seed_old();
    }

    /// Rotate volume time levels at the end of a completed step.
    pub fn rotate_volumes(&mut self) {
        self.volume.rotate();
    }

    /// Restore current volumes from a checkpointed vector.
    ///
    /// The old layer stays unseeded; the guard re-seeds it on resume.
    pub fn restore_volumes(&mut self, volumes: Vec<f64>) {
        assert_eq!(volumes.len(), self.cell_count());
        self.volume = TimeLayered::from_current(volumes);
    }
}
