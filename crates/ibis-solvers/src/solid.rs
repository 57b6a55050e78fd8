//! Damped-spring structural solver.

use ibis_core::{SolverError, SurfaceLoad, TimeState, Vec2};
use ibis_coupling::SolidSolver;
use ibis_mesh::SolidMesh;

/// Structural solver that tethers every vertex to its reference
/// position with a damped linear spring.
///
/// The surface tractions are integrated over segment lengths and
/// split between segment endpoints, then each vertex advances one
/// semi-implicit Euler step of `m a = f - k (x - x_ref) - c v`.
#[derive(Debug, Clone)]
pub struct SpringSolid {
    /// Spring stiffness toward the reference shape.
    pub stiffness: f64,
    /// Velocity damping coefficient.
    pub damping: f64,
    /// Lumped mass per vertex.
    pub mass: f64,
}

impl SpringSolid {
    /// Create a solver with the given spring parameters.
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }
}

impl SolidSolver for SpringSolid {
    fn name(&self) -> &str {
        "springSolid"
    }

    fn solve(
        &mut self,
        load: &SurfaceLoad,
        solid: &mut SolidMesh,
        time: &TimeState,
    ) -> Result<(), SolverError> {
        let points = solid.load_points();
        if load.len() != points.len() {
            return Err(SolverError::Failed {
                reason: format!(
                    "load has {} points, surface has {}",
                    load.len(),
                    points.len()
                ),
            });
        }

        // Nodal forces from per-length tractions, half to each
        // segment endpoint. Entries resolve through their load-point
        // id, not their position in the vector.
        let n = solid.vertex_count();
        let mut force: Vec<Vec2> = vec![[0.0, 0.0]; n];
        for (id, traction) in &load.tractions {
            let i = id.0 as usize;
            let point = points.get(i).ok_or_else(|| SolverError::Failed {
                reason: format!("load point {id} outside surface with {} points", points.len()),
            })?;
            let f = [
                traction[0] * point.length * 0.5,
                traction[1] * point.length * 0.5,
            ];
            for v in [i, (i + 1) % n] {
                force[v][0] += f[0];
                force[v][1] += f[1];
            }
        }

        let dt = time.dt;
        let positions = solid.positions().to_vec();
        let reference = solid.reference().to_vec();
        let velocities = solid.velocities().to_vec();
        let mut displacement = Vec::with_capacity(n);
        for v in 0..n {
            let mut d = [0.0; 2];
            for axis in 0..2 {
                let spring = -self.stiffness * (positions[v][axis] - reference[v][axis]);
                let damp = -self.damping * velocities[v][axis];
                let a = (force[v][axis] + spring + damp) / self.mass;
                let vel = velocities[v][axis] + a * dt;
                d[axis] = vel * dt;
            }
            if !d[0].is_finite() || !d[1].is_finite() {
                return Err(SolverError::Diverged {
                    reason: format!("non-finite displacement at vertex {v}"),
                });
            }
            displacement.push(d);
        }

        solid.apply_displacement(&displacement, dt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibis_core::StepId;

    fn quiet_time() -> TimeState {
        TimeState {
            t: 0.0,
            dt: 0.01,
            step: StepId::from(0),
        }
    }

    fn zero_load(n: usize) -> SurfaceLoad {
        SurfaceLoad::from_tractions(vec![[0.0, 0.0]; n])
    }

    #[test]
    fn no_load_at_reference_stays_put() {
        let mut solid = SolidMesh::circle([0.0, 0.0], 1.0, 8).unwrap();
        let mut solver = SpringSolid::new(100.0, 1.0, 1.0);
        let load = zero_load(solid.vertex_count());
        solver.solve(&load, &mut solid, &quiet_time()).unwrap();
        for (p, r) in solid.positions().iter().zip(solid.reference()) {
            assert!((p[0] - r[0]).abs() < 1e-12);
            assert!((p[1] - r[1]).abs() < 1e-12);
        }
    }

    #[test]
    fn uniform_traction_translates_surface() {
        let mut solid = SolidMesh::circle([0.0, 0.0], 1.0, 16).unwrap();
        let mut solver = SpringSolid::new(0.0, 0.0, 1.0);
        let load = SurfaceLoad::from_tractions(vec![[1.0, 0.0]; solid.vertex_count()]);
        let before = solid.positions().to_vec();
        solver.solve(&load, &mut solid, &quiet_time()).unwrap();
        for (after, b) in solid.positions().iter().zip(&before) {
            assert!(after[0] > b[0], "vertex did not move with the load");
        }
    }

    #[test]
    fn displaced_surface_relaxes_toward_reference() {
        let mut solid = SolidMesh::circle([0.0, 0.0], 1.0, 8).unwrap();
        let shove = vec![[0.2, 0.0]; solid.vertex_count()];
        solid.apply_displacement(&shove, 0.01);
        solid.restore(solid.positions().to_vec(), vec![[0.0, 0.0]; 8]);

        let mut solver = SpringSolid::new(50.0, 5.0, 1.0);
        let load = zero_load(solid.vertex_count());
        let offset_before: f64 = solid
            .positions()
            .iter()
            .zip(solid.reference())
            .map(|(p, r)| (p[0] - r[0]).abs())
            .sum();
        for _ in 0..10 {
            solver.solve(&load, &mut solid, &quiet_time()).unwrap();
        }
        let offset_after: f64 = solid
            .positions()
            .iter()
            .zip(solid.reference())
            .map(|(p, r)| (p[0] - r[0]).abs())
            .sum();
        assert!(offset_after < offset_before);
    }

    #[test]
    fn mismatched_load_is_rejected() {
        let mut solid = SolidMesh::circle([0.0, 0.0], 1.0, 8).unwrap();
        let mut solver = SpringSolid::new(1.0, 1.0, 1.0);
        let load = zero_load(3);
        assert!(matches!(
            solver.solve(&load, &mut solid, &quiet_time()),
            Err(SolverError::Failed { .. })
        ));
    }

    #[test]
    fn entries_resolve_by_load_point_id() {
        // Reversing the entry order must not change the outcome: the
        // id, not the vector position, names the load point.
        let mut ordered = SolidMesh::circle([0.0, 0.0], 1.0, 8).unwrap();
        let mut reversed = ordered.clone();

        let tractions: Vec<[f64; 2]> = (0..8).map(|i| [i as f64 * 0.1, 0.0]).collect();
        let load = SurfaceLoad::from_tractions(tractions);
        let mut flipped = load.clone();
        flipped.tractions.reverse();

        let mut solver = SpringSolid::new(10.0, 1.0, 1.0);
        solver.solve(&load, &mut ordered, &quiet_time()).unwrap();
        solver.solve(&flipped, &mut reversed, &quiet_time()).unwrap();
        assert_eq!(ordered.positions(), reversed.positions());
    }

    #[test]
    fn out_of_range_load_point_is_rejected() {
        let mut solid = SolidMesh::circle([0.0, 0.0], 1.0, 8).unwrap();
        let mut solver = SpringSolid::new(1.0, 1.0, 1.0);
        let mut load = zero_load(solid.vertex_count());
        load.tractions[0].0 = ibis_core::LoadPointId(99);
        assert!(matches!(
            solver.solve(&load, &mut solid, &quiet_time()),
            Err(SolverError::Failed { .. })
        ));
    }
}
