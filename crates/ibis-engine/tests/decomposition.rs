//! Integration tests for decomposed runs: the surface load does not
//! depend on the partitioning, and laminar runs never exchange
//! closure patches.

use std::thread;

use ibis_core::Vec2;
use ibis_engine::Sequencer;
use ibis_exchange::{Communicator, LocalComm, SingleProcess};
use ibis_test_utils::{laminar_solvers, small_case, turbulent_solvers};

const STEPS: usize = 3;
const TOLERANCE: f64 = 1e-12;

/// Strip the load-point keys, which are partition-independent by
/// construction; the floating-point payload is what varies.
fn tractions_of(load: ibis_core::SurfaceLoad) -> Vec<Vec2> {
    load.tractions.into_iter().map(|(_, t)| t).collect()
}

/// Run the reference case on `n_ranks` in-process ranks and return
/// rank 0's surface load after [`STEPS`] steps.
fn surface_load_on(n_ranks: usize) -> Vec<Vec2> {
    if n_ranks == 1 {
        let mut sequencer = Sequencer::new(
            small_case(1),
            laminar_solvers(),
            Box::new(SingleProcess::new()),
            None,
        )
        .unwrap();
        for _ in 0..STEPS {
            sequencer.step().unwrap();
        }
        return tractions_of(sequencer.surface_load().unwrap());
    }

    let handles: Vec<_> = LocalComm::connect(n_ranks)
        .into_iter()
        .map(|comm| {
            thread::spawn(move || {
                let rank = comm.rank();
                let mut sequencer = Sequencer::new(
                    small_case(comm.size()),
                    laminar_solvers(),
                    Box::new(comm),
                    None,
                )
                .unwrap();
                for _ in 0..STEPS {
                    sequencer.step().unwrap();
                }
                (rank, tractions_of(sequencer.surface_load().unwrap()))
            })
        })
        .collect();

    let mut rank0 = None;
    for handle in handles {
        let (rank, load) = handle.join().unwrap();
        if rank == 0 {
            rank0 = Some(load);
        }
    }
    rank0.expect("rank 0 must report")
}

#[test]
fn surface_load_is_partition_invariant() {
    let serial = surface_load_on(1);
    for n_ranks in [2, 4] {
        let parallel = surface_load_on(n_ranks);
        assert_eq!(serial.len(), parallel.len());
        for (point, (a, b)) in serial.iter().zip(&parallel).enumerate() {
            for axis in 0..2 {
                assert!(
                    (a[axis] - b[axis]).abs() <= TOLERANCE,
                    "load point {point} axis {axis}: {} vs {} on {n_ranks} ranks",
                    a[axis],
                    b[axis]
                );
            }
        }
    }
}

#[test]
fn laminar_runs_never_exchange_closure_patches() {
    let handles: Vec<_> = LocalComm::connect(2)
        .into_iter()
        .map(|comm| {
            thread::spawn(move || {
                let mut sequencer = Sequencer::new(
                    small_case(comm.size()),
                    laminar_solvers(),
                    Box::new(comm),
                    None,
                )
                .unwrap();
                let mut total = 0;
                for _ in 0..STEPS {
                    total += sequencer.step().unwrap().reconcile_exchanges;
                }
                total
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 0);
    }
}

#[test]
fn turbulent_runs_reconcile_every_step() {
    let handles: Vec<_> = LocalComm::connect(2)
        .into_iter()
        .map(|comm| {
            thread::spawn(move || {
                let mut sequencer = Sequencer::new(
                    small_case(comm.size()),
                    turbulent_solvers(),
                    Box::new(comm),
                    None,
                )
                .unwrap();
                let mut per_step = Vec::new();
                for _ in 0..STEPS {
                    per_step.push(sequencer.step().unwrap().reconcile_exchanges);
                }
                per_step
            })
        })
        .collect();
    for handle in handles {
        // One interior interface per rank in a two-slab split.
        assert_eq!(handle.join().unwrap(), vec![1; STEPS]);
    }
}
