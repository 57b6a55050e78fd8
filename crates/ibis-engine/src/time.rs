//! Adaptive time control.

use ibis_core::{FlowField, StepError, StepId, TimeState};
use ibis_mesh::{BackgroundMesh, CellClass};

/// Growth damping for the adaptive timestep. A step may shrink as far
/// as the Courant target demands but can only grow by this factor.
const MAX_GROWTH: f64 = 1.2;

const SMALL_CO: f64 = 1e-12;

/// Owns the simulation clock and chooses each step's timestep.
///
/// With `adjust_dt` set, the timestep tracks the configured Courant
/// target: it shrinks immediately when the flow speeds up and grows
/// damped when it slows down, clamped to the configured bounds. With
/// it unset the initial timestep is kept for the whole run.
#[derive(Clone, Debug)]
pub struct TimeController {
    state: TimeState,
    adjust_dt: bool,
    min_dt: f64,
    max_dt: f64,
    target_courant: f64,
    checkpoint_every: Option<u64>,
}

impl TimeController {
    /// Controller at the start of a fresh run.
    pub fn new(
        dt_initial: f64,
        adjust_dt: bool,
        min_dt: f64,
        max_dt: f64,
        target_courant: f64,
        checkpoint_every: Option<u64>,
    ) -> Self {
        Self {
            state: TimeState::initial(dt_initial),
            adjust_dt,
            min_dt,
            max_dt,
            target_courant,
            checkpoint_every,
        }
    }

    /// Controller resuming from a checkpointed clock.
    pub fn resume(mut self, state: TimeState) -> Self {
        self.state = state;
        self
    }

    /// The clock as of the last completed advance.
    pub fn state(&self) -> TimeState {
        self.state
    }

    /// Maximum convective Courant number of `flow` over non-solid
    /// cells, for the timestep currently on the clock.
    pub fn courant(&self, flow: &FlowField, mesh: &BackgroundMesh) -> f64 {
        let u = flow.u.current();
        let mut co: f64 = 0.0;
        for cell in 0..mesh.cell_count() {
            if mesh.class(cell) == CellClass::Solid {
                continue;
            }
            let local = (u[cell][0].abs() / mesh.dx() + u[cell][1].abs() / mesh.dy())
                * self.state.dt;
            // f64::max ignores NaN; a poisoned field must poison the
            // Courant number, not vanish.
            if !local.is_finite() {
                return f64::NAN;
            }
            co = co.max(local);
        }
        co
    }

    /// Choose the next timestep and advance the clock.
    ///
    /// Fails with [`StepError::DivergedTimestep`] when the chosen
    /// timestep comes out non-positive or non-finite, which means the
    /// flow field upstream already blew up.
    pub fn advance(
        &mut self,
        flow: &FlowField,
        mesh: &BackgroundMesh,
    ) -> Result<TimeState, StepError> {
        if self.adjust_dt {
            let co = self.courant(flow, mesh);
            if !co.is_finite() {
                return Err(StepError::DivergedTimestep { value: co });
            }
            let by_target = self.target_courant / co.max(SMALL_CO);
            let factor = by_target.min(MAX_GROWTH);
            let dt = (self.state.dt * factor).min(self.max_dt).max(self.min_dt);
            if !dt.is_finite() || dt <= 0.0 {
                return Err(StepError::DivergedTimestep { value: dt });
            }
            self.state.dt = dt;
        }

        self.state.t += self.state.dt;
        self.state.step = StepId(self.state.step.0 + 1);
        Ok(self.state)
    }

    /// Whether the step just completed is a checkpoint step.
    pub fn output_due(&self) -> bool {
        match self.checkpoint_every {
            Some(every) => self.state.step.0 > 0 && self.state.step.0 % every == 0,
            None => false,
        }
    }
}
