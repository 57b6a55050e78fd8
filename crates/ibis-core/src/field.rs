//! Time-layered field storage for the background mesh.
//!
//! Every flow quantity carries a "current" and an "old-time"
//! (previous-timestep) value per cell. The old-time layer feeds
//! time-derivative and flux-conservation computations; it starts
//! unseeded and the restart guard copies current values into it on the
//! first executed iteration of any run, fresh or resumed.

use crate::error::SolverError;
use crate::id::LoadPointId;

/// A 2D vector value, `[x, y]`.
pub type Vec2 = [f64; 2];

/// Per-cell storage with a current and an old-time layer.
///
/// The old layer is absent until first seeded (restart guard) or
/// rotated (end of a completed step). Consumers that need history must
/// go through [`old()`](TimeLayered::old) and treat `None` as the
/// fatal precondition violation it is.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeLayered<T> {
    current: Vec<T>,
    old: Option<Vec<T>>,
}

impl<T: Clone> TimeLayered<T> {
    /// Create storage for `n` cells, all set to `init`, old layer unseeded.
    pub fn new(n: usize, init: T) -> Self {
        Self {
            current: vec![init; n],
            old: None,
        }
    }

    /// Wrap existing current values, old layer unseeded.
    ///
    /// This is how checkpointed state re-enters the time loop: the
    /// snapshot carries current values only.
    pub fn from_current(current: Vec<T>) -> Self {
        Self { current, old: None }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The current-time values.
    pub fn current(&self) -> &[T] {
        &self.current
    }

    /// Mutable access to the current-time values.
    pub fn current_mut(&mut self) -> &mut [T] {
        &mut self.current
    }

    /// The old-time values, or `None` if never seeded.
    pub fn old(&self) -> Option<&[T]> {
        self.old.as_deref()
    }

    /// Whether the old-time layer has been seeded.
    pub fn has_old(&self) -> bool {
        self.old.is_some()
    }

    /// Force the old-time layer equal to the current layer.
    ///
    /// Restart-safety seeding: called once per run by the guard before
    /// the first solve, so no downstream computation ever observes an
    /// undefined history.
    pub fn seed_old(&mut self) {
        self.old = Some(self.current.clone());
    }

    /// Rotate time levels: old takes the current values.
    ///
    /// Called once at the end of each completed step.
    pub fn rotate(&mut self) {
        match &mut self.old {
            Some(old) => old.clone_from(&self.current),
            None => self.old = Some(self.current.clone()),
        }
    }
}

/// Velocity, pressure, and closure-model fields on the background mesh.
///
/// Current values are mutated exactly once per step by their designated
/// owners: the fluid solver writes velocity and pressure, the closure
/// model writes `k`, `epsilon`, and `nut`. The single sanctioned
/// exception is [`closure_fields_mut`](FlowField::closure_fields_mut),
/// used by processor-boundary reconciliation.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    /// Velocity per cell.
    pub u: TimeLayered<Vec2>,
    /// Pressure per cell.
    pub p: TimeLayered<f64>,
    /// Turbulent kinetic energy per cell.
    pub k: TimeLayered<f64>,
    /// Turbulent dissipation rate per cell.
    pub epsilon: TimeLayered<f64>,
    /// Turbulent (eddy) viscosity per cell.
    pub nut: TimeLayered<f64>,
}

impl FlowField {
    /// Create a zero-initialized field over `n` cells.
    pub fn zeros(n: usize) -> Self {
        Self {
            u: TimeLayered::new(n, [0.0, 0.0]),
            p: TimeLayered::new(n, 0.0),
            k: TimeLayered::new(n, 0.0),
            epsilon: TimeLayered::new(n, 0.0),
            nut: TimeLayered::new(n, 0.0),
        }
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.u.len()
    }

    /// Whether every layer has a seeded old-time copy.
    pub fn has_history(&self) -> bool {
        self.u.has_old()
            && self.p.has_old()
            && self.k.has_old()
            && self.epsilon.has_old()
            && self.nut.has_old()
    }

    /// Seed all old-time layers from current values.
    pub fn seed_history(&mut self) {
        self.u.seed_old();
        self.p.seed_old();
        self.k.seed_old();
        self.epsilon.seed_old();
        self.nut.seed_old();
    }

    /// Rotate all time levels at the end of a completed step.
    pub fn rotate(&mut self) {
        self.u.rotate();
        self.p.rotate();
        self.k.rotate();
        self.epsilon.rotate();
        self.nut.rotate();
    }

    /// Old-time velocity, or a `MissingHistory` error.
    ///
    /// Convenience for solvers that consume history and must fail
    /// loudly if sequencing ever let them run unseeded.
    pub fn old_u(&self) -> Result<&[Vec2], SolverError> {
        self.u
            .old()
            .ok_or(SolverError::MissingHistory { what: "velocity" })
    }

    /// Mutable access to the closure scalar fields, all three at once.
    ///
    /// This is the one sanctioned mutation of post-solve closure state:
    /// processor-boundary reconciliation overwrites halo values after
    /// the closure correction, because the correction does not refresh
    /// inter-rank coupled values itself. Nothing else may hold this.
    pub fn closure_fields_mut(&mut self) -> ClosureFieldsMut<'_> {
        ClosureFieldsMut {
            k: self.k.current_mut(),
            epsilon: self.epsilon.current_mut(),
            nut: self.nut.current_mut(),
        }
    }
}

/// Narrow mutable view of the three closure scalar fields.
///
/// See [`FlowField::closure_fields_mut`] for the access policy.
pub struct ClosureFieldsMut<'a> {
    /// Turbulent kinetic energy, current layer.
    pub k: &'a mut [f64],
    /// Turbulent dissipation rate, current layer.
    pub epsilon: &'a mut [f64],
    /// Eddy viscosity, current layer.
    pub nut: &'a mut [f64],
}

/// Tractions on the solid surface, keyed by load point.
///
/// Produced fresh each step by the force transfer engine from the
/// prior step's converged fluid state, consumed exactly once by the
/// solid solver, then discarded. Entries are in load-point order so
/// consumers may either index positionally or resolve through the id.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceLoad {
    /// Traction vector per load point, force per unit length.
    pub tractions: Vec<(LoadPointId, Vec2)>,
}

impl SurfaceLoad {
    /// Build a load from tractions in load-point order.
    pub fn from_tractions(tractions: Vec<Vec2>) -> Self {
        Self {
            tractions: tractions
                .into_iter()
                .enumerate()
                .map(|(i, t)| (LoadPointId(i as u32), t))
                .collect(),
        }
    }

    /// Number of load points.
    pub fn len(&self) -> usize {
        self.tractions.len()
    }

    /// Whether the load is empty.
    pub fn is_empty(&self) -> bool {
        self.tractions.is_empty()
    }

    /// Traction at a given load point, `None` if the point is absent.
    pub fn traction(&self, id: LoadPointId) -> Option<Vec2> {
        self.tractions
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, t)| *t)
    }

    /// Sum of traction magnitudes over all load points.
    ///
    /// A scalar proxy for the total load, used for convergence
    /// reporting and the end-to-end stabilization checks.
    pub fn total_magnitude(&self) -> f64 {
        self.tractions
            .iter()
            .map(|(_, t)| (t[0] * t[0] + t[1] * t[1]).sqrt())
            .sum()
    }
}
