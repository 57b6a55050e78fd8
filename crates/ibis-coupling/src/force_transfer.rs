//! Cell-to-surface force transfer.
//!
//! Maps fluid-side pressure and near-wall shear onto the solid
//! surface's load points. Works under spatial domain decomposition:
//! each rank accumulates weighted contributions from the cells it
//! owns, in ascending global cell order, and the partial sums are
//! combined across ranks in rank order. The resulting surface load is
//! therefore invariant to how the domain is partitioned, up to
//! floating-point tolerance.

use ibis_core::{LoadPointId, SurfaceLoad, TransferError, Vec2};
use ibis_exchange::Communicator;
use ibis_mesh::{geom, BackgroundMesh, CellClass, ParallelPartition, SolidMesh};

use crate::shear::WallShearModel;

/// Number of accumulator slots per load point: weight, weighted
/// pressure, weighted velocity (2), weighted wall distance.
const SLOTS: usize = 5;

/// Transfers fluid-side loads onto solid-surface load points.
pub struct ForceTransferEngine {
    stencil_radius: f64,
    viscosity: f64,
    shear: Box<dyn WallShearModel>,
}

impl ForceTransferEngine {
    /// Create an engine.
    ///
    /// `stencil_radius` is in units of the smallest cell extent;
    /// `viscosity` is the dynamic viscosity entering the shear
    /// estimate.
    pub fn new(stencil_radius: f64, viscosity: f64, shear: Box<dyn WallShearModel>) -> Self {
        Self {
            stencil_radius,
            viscosity,
            shear,
        }
    }

    /// Name of the wall-shear policy in use.
    pub fn shear_model_name(&self) -> &str {
        self.shear.name()
    }

    /// Compute the surface load from the prior step's converged fields.
    ///
    /// For every load point, interpolates pressure and velocity from
    /// the fluid-side boundary-adjacent cells inside the stencil
    /// radius (inverse-distance weights), estimates wall shear from
    /// the tangential velocity
    /// relative to the moving wall, and combines both into a traction
    /// `-p n + tau t` scaled by nothing: tractions are per unit
    /// length, the solid solver integrates over segment lengths.
    ///
    /// Cells reclassified as fluid by the latest geometry update
    /// contribute their current field values; the classification read
    /// here is always the freshest one.
    pub fn compute_surface_load(
        &self,
        flow: &ibis_core::FlowField,
        mesh: &BackgroundMesh,
        solid: &SolidMesh,
        partition: &ParallelPartition,
        comm: &dyn Communicator,
    ) -> Result<SurfaceLoad, TransferError> {
        let points = solid.load_points();
        let radius = self.stencil_radius * mesh.h_min();

        // Per-rank partial accumulation over owned cells only, in
        // ascending global cell order.
        let mut partial = vec![0.0; points.len() * SLOTS];
        let u = flow.u.current();
        let p = flow.p.current();
        for cell in partition.owned_cells(comm.rank()) {
            // Only fluid cells touching the immersed boundary carry
            // near-wall values worth sampling.
            if mesh.class(cell) != CellClass::Fluid || !mesh.is_boundary_adjacent(cell) {
                continue;
            }
            let center = mesh.center(cell);
            for (i, point) in points.iter().enumerate() {
                let d = geom::distance(center, point.position);
                if d > radius {
                    continue;
                }
                let w = 1.0 / (d + 0.1 * mesh.h_min());
                let acc = &mut partial[i * SLOTS..(i + 1) * SLOTS];
                acc[0] += w;
                acc[1] += w * p[cell];
                acc[2] += w * u[cell][0];
                acc[3] += w * u[cell][1];
                acc[4] += w * d;
            }
        }

        // Rank-ordered global combine; identical on every rank.
        let global = comm.all_reduce_sum(&partial)?;

        let mut tractions: Vec<(LoadPointId, Vec2)> = Vec::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            let acc = &global[i * SLOTS..(i + 1) * SLOTS];
            let w = acc[0];
            if w <= 0.0 {
                return Err(TransferError::EmptySupport { point: i });
            }
            let pressure = acc[1] / w;
            let velocity = [acc[2] / w, acc[3] / w];
            let wall_distance = acc[4] / w;

            let wall_velocity = solid.load_point_velocity(i);
            let tangential = (velocity[0] - wall_velocity[0]) * point.tangent[0]
                + (velocity[1] - wall_velocity[1]) * point.tangent[1];
            let tau = self
                .shear
                .wall_shear(tangential, wall_distance, self.viscosity);

            tractions.push((
                LoadPointId(i as u32),
                [
                    -pressure * point.normal[0] + tau * point.tangent[0],
                    -pressure * point.normal[1] + tau * point.tangent[1],
                ],
            ));
        }

        Ok(SurfaceLoad { tractions })
    }
}
