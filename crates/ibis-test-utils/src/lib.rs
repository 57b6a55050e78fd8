//! Test fixtures and case builders for Ibis development.
//!
//! Provides recording implementations of the solver-boundary traits
//! for asserting call order, a failing fluid solver for abort-path
//! tests, and small ready-made cases for integration tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::{Arc, Mutex};

use ibis_core::{FlowField, SolverError, SurfaceLoad, TimeState, Vec2};
use ibis_coupling::{ClosureKind, ClosureModel, FluidSolver, SolidSolver};
use ibis_engine::{CaseConfig, CaseSolvers};
use ibis_mesh::{BackgroundMesh, CellClass, SolidMesh};
use ibis_solvers::{KEpsilonClosure, LaminarClosure, RelaxationFluid, SpringSolid};

// ── Event log ──────────────────────────────────────────────────────

/// Shared append-only log the recording fixtures write to.
///
/// Cloning shares the underlying log, so one log can observe every
/// collaborator of a sequencer.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// Shared probe position the recording solid publishes after each
/// solve, so the recording fluid solver can check the classification
/// caught up with the motion.
#[derive(Clone, Default)]
pub struct ProbePoint {
    point: Arc<Mutex<Option<Vec2>>>,
}

impl ProbePoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, p: Vec2) {
        *self.point.lock().unwrap() = Some(p);
    }

    pub fn get(&self) -> Option<Vec2> {
        *self.point.lock().unwrap()
    }
}

// ── Recording fixtures ─────────────────────────────────────────────

/// Solid solver that translates the surface a fixed displacement per
/// step, records the call, and publishes the new centroid.
pub struct RecordingSolid {
    log: EventLog,
    probe: ProbePoint,
    pub displacement: Vec2,
}

impl RecordingSolid {
    pub fn new(log: EventLog, probe: ProbePoint, displacement: Vec2) -> Self {
        Self {
            log,
            probe,
            displacement,
        }
    }
}

impl SolidSolver for RecordingSolid {
    fn name(&self) -> &str {
        "recordingSolid"
    }

    fn solve(
        &mut self,
        _load: &SurfaceLoad,
        solid: &mut SolidMesh,
        state: &TimeState,
    ) -> Result<(), SolverError> {
        self.log.record("solid");
        let displacement = vec![self.displacement; solid.vertex_count()];
        solid.apply_displacement(&displacement, state.dt);
        self.probe.publish(centroid(solid.positions()));
        Ok(())
    }
}

/// Fluid solver that records whether the classification caught up
/// with the solid motion before the fluid solve ran.
///
/// Records `fluid` when the published centroid sits in a solid or cut
/// cell, `fluid-stale-geometry` when it does not: the second event in
/// a log means the sequencer ran the fluid solve before the geometry
/// update.
pub struct RecordingFluid {
    log: EventLog,
    probe: ProbePoint,
}

impl RecordingFluid {
    pub fn new(log: EventLog, probe: ProbePoint) -> Self {
        Self { log, probe }
    }
}

impl FluidSolver for RecordingFluid {
    fn name(&self) -> &str {
        "recordingFluid"
    }

    fn solve(
        &mut self,
        _flow: &mut FlowField,
        mesh: &BackgroundMesh,
        _state: &TimeState,
    ) -> Result<(), SolverError> {
        let fresh = match self.probe.get().and_then(|p| cell_at(mesh, p)) {
            Some(cell) => mesh.class(cell) != CellClass::Fluid,
            None => false,
        };
        self.log
            .record(if fresh { "fluid" } else { "fluid-stale-geometry" });
        Ok(())
    }
}

/// Closure that records the call and reports a configurable kind.
pub struct RecordingClosure {
    log: EventLog,
    kind: ClosureKind,
}

impl RecordingClosure {
    pub fn laminar(log: EventLog) -> Self {
        Self {
            log,
            kind: ClosureKind::Laminar,
        }
    }

    pub fn turbulent(log: EventLog) -> Self {
        Self {
            log,
            kind: ClosureKind::Turbulent("recording"),
        }
    }
}

impl ClosureModel for RecordingClosure {
    fn kind(&self) -> ClosureKind {
        self.kind
    }

    fn correct(
        &mut self,
        _flow: &mut FlowField,
        _mesh: &BackgroundMesh,
        _state: &TimeState,
    ) -> Result<(), SolverError> {
        self.log.record("closure");
        Ok(())
    }
}

/// Fluid solver that succeeds `healthy_calls` times, then diverges.
pub struct FailingFluid {
    healthy_calls: u64,
    calls: u64,
}

impl FailingFluid {
    pub fn after(healthy_calls: u64) -> Self {
        Self {
            healthy_calls,
            calls: 0,
        }
    }
}

impl FluidSolver for FailingFluid {
    fn name(&self) -> &str {
        "failingFluid"
    }

    fn solve(
        &mut self,
        _flow: &mut FlowField,
        _mesh: &BackgroundMesh,
        _state: &TimeState,
    ) -> Result<(), SolverError> {
        self.calls += 1;
        if self.calls > self.healthy_calls {
            Err(SolverError::Diverged {
                reason: format!("scripted failure on call {}", self.calls),
            })
        } else {
            Ok(())
        }
    }
}

// ── Case builders ──────────────────────────────────────────────────

/// A small circle-in-channel case: 24x24 cells, one immersed circle
/// off-center, adaptive timestep, no checkpoint cadence.
pub fn small_case(n_ranks: usize) -> CaseConfig {
    CaseConfig {
        nx: 24,
        ny: 24,
        dx: 0.05,
        dy: 0.05,
        origin: [0.0, 0.0],
        solid: SolidMesh::circle([0.5, 0.6], 0.15, 16).expect("valid test circle"),
        dt_initial: 0.005,
        adjust_dt: true,
        min_dt: 1e-8,
        max_dt: 0.05,
        target_courant: 0.5,
        end_time: 1.0,
        checkpoint_every: None,
        viscosity: 1e-3,
        stencil_radius: 3.0,
        n_ranks,
    }
}

/// Reference solvers for a laminar run of [`small_case`].
pub fn laminar_solvers() -> CaseSolvers {
    CaseSolvers {
        solid: Box::new(SpringSolid::new(200.0, 4.0, 1.0)),
        fluid: Box::new(RelaxationFluid::new([1.0, 0.0], 1.0, 0.3)),
        closure: Box::new(LaminarClosure),
    }
}

/// Reference solvers for a turbulent run of [`small_case`].
pub fn turbulent_solvers() -> CaseSolvers {
    CaseSolvers {
        solid: Box::new(SpringSolid::new(200.0, 4.0, 1.0)),
        fluid: Box::new(RelaxationFluid::new([1.0, 0.0], 1.0, 0.3)),
        closure: Box::new(KEpsilonClosure::new(0.05, 0.07)),
    }
}

fn centroid(points: &[Vec2]) -> Vec2 {
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold([0.0, 0.0], |acc, p| [acc[0] + p[0], acc[1] + p[1]]);
    [sum[0] / n, sum[1] / n]
}

fn cell_at(mesh: &BackgroundMesh, p: Vec2) -> Option<usize> {
    let col = ((p[0] - mesh.center(0)[0] + mesh.dx() / 2.0) / mesh.dx()).floor();
    let row = ((p[1] - mesh.center(0)[1] + mesh.dy() / 2.0) / mesh.dy()).floor();
    if col < 0.0 || row < 0.0 || col >= mesh.nx() as f64 || row >= mesh.ny() as f64 {
        return None;
    }
    Some(mesh.index(row as usize, col as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_cell_lookup_matches_mesh_indexing() {
        let mesh = BackgroundMesh::new(4, 4, 0.5, 0.5, [1.0, 2.0]).unwrap();
        // Center of cell (row 2, col 3).
        let p = mesh.center(mesh.index(2, 3));
        assert_eq!(cell_at(&mesh, p), Some(mesh.index(2, 3)));
        assert_eq!(cell_at(&mesh, [0.0, 0.0]), None);
    }

    #[test]
    fn failing_fluid_counts_down() {
        let mesh = BackgroundMesh::new(2, 2, 1.0, 1.0, [0.0, 0.0]).unwrap();
        let mut flow = FlowField::zeros(4);
        let mut fluid = FailingFluid::after(2);
        let state = TimeState::initial(0.01);
        assert!(fluid.solve(&mut flow, &mesh, &state).is_ok());
        assert!(fluid.solve(&mut flow, &mesh, &state).is_ok());
        assert!(matches!(
            fluid.solve(&mut flow, &mesh, &state),
            Err(SolverError::Diverged { .. })
        ));
    }

    #[test]
    fn small_case_validates() {
        assert!(small_case(1).validate().is_ok());
        assert!(small_case(4).validate().is_ok());
    }
}
