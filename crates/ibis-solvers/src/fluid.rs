//! Relaxation fluid solver.

use ibis_core::{FlowField, SolverError, TimeState};
use ibis_coupling::FluidSolver;
use ibis_mesh::{BackgroundMesh, CellClass};

/// Fluid solver that relaxes the field toward a uniform inflow.
///
/// Not a discretization of the momentum equations; it is the smallest
/// model that honors the coupling contract. Velocity advances from the
/// old time level toward the inflow weighted by the cut-cell fluid
/// fraction, pressure relaxes toward a Bernoulli estimate scaled by
/// the old-to-current cell volume ratio, so the solve genuinely
/// consumes last step's fields and geometry. Solid-covered cells are
/// zeroed.
#[derive(Debug, Clone)]
pub struct RelaxationFluid {
    /// Uniform far-field velocity.
    pub inflow: [f64; 2],
    /// Fluid density entering the pressure estimate.
    pub density: f64,
    /// Relaxation factor per step, in `(0, 1]`.
    pub relaxation: f64,
}

impl RelaxationFluid {
    /// Create a solver relaxing toward `inflow`.
    pub fn new(inflow: [f64; 2], density: f64, relaxation: f64) -> Self {
        Self {
            inflow,
            density,
            relaxation,
        }
    }
}

impl FluidSolver for RelaxationFluid {
    fn name(&self) -> &str {
        "relaxationFluid"
    }

    fn solve(
        &mut self,
        flow: &mut FlowField,
        mesh: &BackgroundMesh,
        _state: &TimeState,
    ) -> Result<(), SolverError> {
        // Field and volume history must have been seeded before the
        // first call.
        let old_u = flow.old_u()?.to_vec();
        let old_volumes = mesh.old_volumes().ok_or(SolverError::MissingHistory {
            what: "old cell volumes",
        })?;
        let volumes = mesh.volumes();
        let inflow_sq = self.inflow[0] * self.inflow[0] + self.inflow[1] * self.inflow[1];

        for cell in 0..mesh.cell_count() {
            if mesh.class(cell) == CellClass::Solid {
                flow.u.current_mut()[cell] = [0.0, 0.0];
                flow.p.current_mut()[cell] = 0.0;
                continue;
            }

            let frac = mesh.fluid_fraction(cell);
            let alpha = self.relaxation * frac;
            let prev = old_u[cell];
            let u = &mut flow.u.current_mut()[cell];
            u[0] = prev[0] + alpha * (self.inflow[0] - prev[0]);
            u[1] = prev[1] + alpha * (self.inflow[1] - prev[1]);
            let speed_sq = u[0] * u[0] + u[1] * u[1];

            // Swept-volume correction: a cell the surface just vacated
            // carries its old volume into the pressure estimate.
            let ratio = if volumes[cell] > 0.0 {
                old_volumes[cell] / volumes[cell]
            } else {
                1.0
            };
            let target = 0.5 * self.density * (inflow_sq - speed_sq) * ratio;
            let p = &mut flow.p.current_mut()[cell];
            *p += self.relaxation * (target - *p);

            if !p.is_finite() || !u[0].is_finite() || !u[1].is_finite() {
                return Err(SolverError::Diverged {
                    reason: format!("non-finite field at cell {cell}"),
                });
            }
        }
        Ok(())
    }
}
