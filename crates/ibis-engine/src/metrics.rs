//! Per-step metrics from the sequencer.

use ibis_core::Phase;

/// Timing and diagnostic data collected during a single coupled step.
///
/// All durations are in microseconds. The sequencer populates one of
/// these after each `step()` call; consumers read the most recent one
/// for logging or adaptive policies.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Per-phase execution times in execution order: `(phase, us)`.
    pub phase_us: Vec<(Phase, u64)>,
    /// Maximum Courant number of the step's starting field.
    pub courant: f64,
    /// The timestep the step integrated over.
    pub dt: f64,
    /// Summed traction magnitude over the surface.
    pub surface_load_magnitude: f64,
    /// Processor-boundary patch exchanges performed this step.
    pub reconcile_exchanges: u64,
    /// Whether this step wrote a checkpoint.
    pub checkpoint_written: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert!(m.phase_us.is_empty());
        assert_eq!(m.reconcile_exchanges, 0);
        assert!(!m.checkpoint_written);
    }

    #[test]
    fn phase_entries_keep_execution_order() {
        let m = StepMetrics {
            phase_us: vec![
                (Phase::ForceTransfer, 10),
                (Phase::Solid, 5),
                (Phase::Geometry, 7),
                (Phase::Fluid, 30),
            ],
            ..Default::default()
        };
        let order: Vec<Phase> = m.phase_us.iter().map(|(p, _)| *p).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }
}
