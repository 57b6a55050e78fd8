//! Closure models: laminar no-op and an algebraic k-epsilon.

use std::ops::Range;

use ibis_core::{FlowField, SolverError, TimeState};
use ibis_coupling::{ClosureKind, ClosureModel};
use ibis_mesh::{BackgroundMesh, CellClass};

const C_MU: f64 = 0.09;
const SMALL: f64 = 1e-12;

/// The no-closure case. `correct` does nothing and the sequencer
/// skips closure-field reconciliation entirely.
#[derive(Debug, Default, Clone)]
pub struct LaminarClosure;

impl ClosureModel for LaminarClosure {
    fn kind(&self) -> ClosureKind {
        ClosureKind::Laminar
    }

    fn correct(
        &mut self,
        _flow: &mut FlowField,
        _mesh: &BackgroundMesh,
        _state: &TimeState,
    ) -> Result<(), SolverError> {
        Ok(())
    }
}

/// Algebraic k-epsilon closure.
///
/// Estimates turbulent kinetic energy from the local speed and a
/// turbulence intensity, dissipation from a mixing length, and the
/// eddy viscosity as `c_mu k^2 / epsilon`.
///
/// When `owned` is set the correction only touches that cell range,
/// mirroring an external closure that updates its own partition but
/// gives no guarantee about processor-boundary cells. The values it
/// leaves stale there are exactly what the reconciliation pass after
/// it repairs.
#[derive(Debug, Clone)]
pub struct KEpsilonClosure {
    /// Turbulence intensity, typically a few percent.
    pub intensity: f64,
    /// Mixing length for the dissipation estimate.
    pub mixing_length: f64,
    owned: Option<Range<usize>>,
}

impl KEpsilonClosure {
    /// Closure that corrects every cell.
    pub fn new(intensity: f64, mixing_length: f64) -> Self {
        Self {
            intensity,
            mixing_length,
            owned: None,
        }
    }

    /// Closure that corrects only the cells in `owned`.
    pub fn with_owned_range(intensity: f64, mixing_length: f64, owned: Range<usize>) -> Self {
        Self {
            intensity,
            mixing_length,
            owned: Some(owned),
        }
    }
}

impl ClosureModel for KEpsilonClosure {
    fn kind(&self) -> ClosureKind {
        ClosureKind::Turbulent("kEpsilon")
    }

    fn correct(
        &mut self,
        flow: &mut FlowField,
        mesh: &BackgroundMesh,
        _state: &TimeState,
    ) -> Result<(), SolverError> {
        let range = self
            .owned
            .clone()
            .unwrap_or(0..mesh.cell_count());
        let u: Vec<[f64; 2]> = flow.u.current().to_vec();
        let fields = flow.closure_fields_mut();

        for cell in range {
            if mesh.class(cell) == CellClass::Solid {
                fields.k[cell] = 0.0;
                fields.epsilon[cell] = 0.0;
                fields.nut[cell] = 0.0;
                continue;
            }
            let speed_sq = u[cell][0] * u[cell][0] + u[cell][1] * u[cell][1];
            let k = 1.5 * self.intensity * self.intensity * speed_sq;
            let epsilon = C_MU.powf(0.75) * k.powf(1.5) / self.mixing_length;
            let nut = C_MU * k * k / (epsilon + SMALL);
            if !nut.is_finite() {
                return Err(SolverError::Diverged {
                    reason: format!("non-finite eddy viscosity at cell {cell}"),
                });
            }
            fields.k[cell] = k;
            fields.epsilon[cell] = epsilon;
            fields.nut[cell] = nut;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> BackgroundMesh {
        BackgroundMesh::new(8, 8, 0.1, 0.1, [0.0, 0.0]).unwrap()
    }

    #[test]
    fn laminar_is_a_no_op() {
        let mesh = mesh();
        let mut flow = FlowField::zeros(mesh.cell_count());
        flow.k.current_mut()[5] = 3.0;
        let before = flow.clone();
        LaminarClosure
            .correct(&mut flow, &mesh, &TimeState::initial(0.01))
            .unwrap();
        assert_eq!(flow, before);
    }

    #[test]
    fn faster_flow_means_more_eddy_viscosity() {
        let mesh = mesh();
        let mut flow = FlowField::zeros(mesh.cell_count());
        flow.u.current_mut()[0] = [1.0, 0.0];
        flow.u.current_mut()[1] = [4.0, 0.0];
        let mut closure = KEpsilonClosure::new(0.05, 0.07);
        closure
            .correct(&mut flow, &mesh, &TimeState::initial(0.01))
            .unwrap();
        assert!(flow.nut.current()[1] > flow.nut.current()[0]);
        assert!(flow.nut.current()[0] > 0.0);
    }

    #[test]
    fn owned_range_leaves_other_cells_stale() {
        let mesh = mesh();
        let n = mesh.cell_count();
        let mut flow = FlowField::zeros(n);
        for cell in 0..n {
            flow.u.current_mut()[cell] = [2.0, 0.0];
        }
        let mut closure = KEpsilonClosure::with_owned_range(0.05, 0.07, 0..n / 2);
        closure
            .correct(&mut flow, &mesh, &TimeState::initial(0.01))
            .unwrap();
        assert!(flow.nut.current()[0] > 0.0);
        assert_eq!(flow.nut.current()[n - 1], 0.0, "cell outside owned range");
    }
}
