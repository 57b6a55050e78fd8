//! Integration test: the per-step phase order is fixed.
//!
//! Recording fixtures log every solver call; the fluid fixture also
//! checks the classification caught up with the solid motion, which
//! pins the geometry update between the solid and fluid solves.

use ibis_engine::{CaseSolvers, Sequencer};
use ibis_exchange::SingleProcess;
use ibis_test_utils::{
    small_case, EventLog, ProbePoint, RecordingClosure, RecordingFluid, RecordingSolid,
};

fn recording_solvers(log: &EventLog, probe: &ProbePoint) -> CaseSolvers {
    CaseSolvers {
        solid: Box::new(RecordingSolid::new(
            log.clone(),
            probe.clone(),
            [0.01, 0.0],
        )),
        fluid: Box::new(RecordingFluid::new(log.clone(), probe.clone())),
        closure: Box::new(RecordingClosure::laminar(log.clone())),
    }
}

#[test]
fn every_step_runs_solid_geometry_fluid_closure_in_order() {
    let log = EventLog::new();
    let probe = ProbePoint::new();
    let mut sequencer = Sequencer::new(
        small_case(1),
        recording_solvers(&log, &probe),
        Box::new(SingleProcess::new()),
        None,
    )
    .unwrap();

    for _ in 0..5 {
        sequencer.step().unwrap();
    }

    let events = log.events();
    assert_eq!(events.len(), 15);
    for step in events.chunks(3) {
        assert_eq!(step, ["solid", "fluid", "closure"]);
    }
}

#[test]
fn phase_timings_are_reported_in_execution_order() {
    let log = EventLog::new();
    let probe = ProbePoint::new();
    let mut sequencer = Sequencer::new(
        small_case(1),
        recording_solvers(&log, &probe),
        Box::new(SingleProcess::new()),
        None,
    )
    .unwrap();

    let metrics = sequencer.step().unwrap();
    let phases: Vec<_> = metrics.phase_us.iter().map(|(p, _)| *p).collect();
    let mut sorted = phases.clone();
    sorted.sort();
    assert_eq!(phases, sorted, "phase log out of execution order");
    assert_eq!(phases.len(), 5, "serial laminar run times five phases");
}
