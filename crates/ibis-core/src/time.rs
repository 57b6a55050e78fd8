//! The simulation clock value.

use crate::id::StepId;

/// Snapshot of the simulation clock after a time advance.
///
/// Mutated once per step by the time controller; read by every
/// component that needs "now". The timestep stored here is the one the
/// upcoming solves must integrate over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeState {
    /// Current simulated time, seconds.
    pub t: f64,
    /// Timestep chosen for the step ending at `t`, seconds.
    pub dt: f64,
    /// Step index; step 0 is the pre-loop initial state.
    pub step: StepId,
}

impl TimeState {
    /// The clock at the start of a fresh run.
    pub fn initial(dt: f64) -> Self {
        Self {
            t: 0.0,
            dt,
            step: StepId(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_starts_at_zero() {
        let state = TimeState::initial(0.01);
        assert_eq!(state.t, 0.0);
        assert_eq!(state.dt, 0.01);
        assert_eq!(state.step, StepId(0));
    }
}
