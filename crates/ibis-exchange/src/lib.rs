//! Inter-rank communication for distributed Ibis runs.
//!
//! The sequencer and force-transfer engine talk to their peers through
//! the [`Communicator`] trait: a rank-ordered sum reduction for
//! decomposition-invariant gathers, a point-to-point value swap for
//! processor-boundary patches, and an abort flag that propagates fatal
//! errors to every rank so lockstep collectives never wait on a dead
//! peer.
//!
//! Two implementations ship: [`SingleProcess`] for undecomposed runs
//! (every collective degenerates to a local copy) and [`LocalComm`],
//! an in-process cluster over crossbeam channels where each rank runs
//! on its own thread. The trait is the seam a real MPI transport would
//! implement.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use ibis_core::ExchangeError;

/// Collective and point-to-point operations across ranks.
///
/// All ranks must call the same collectives in the same order; the
/// operations block until every participating peer arrives. That is
/// the lockstep contract the step sequencer is built on.
pub trait Communicator: Send {
    /// This rank's index, `0..size`.
    fn rank(&self) -> usize;

    /// Total number of ranks.
    fn size(&self) -> usize;

    /// Whether the run spans more than one rank.
    fn is_parallel(&self) -> bool {
        self.size() > 1
    }

    /// Element-wise sum of `local` across all ranks.
    ///
    /// Partial vectors are combined in ascending rank order on every
    /// rank, so all ranks obtain bitwise-identical results and the
    /// reduction is independent of arrival timing.
    fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, ExchangeError>;

    /// Swap a value buffer with one neighbor rank.
    ///
    /// Sends `send` to `neighbor` and returns the buffer `neighbor`
    /// sent here. Both sides must call with matching buffer lengths.
    fn exchange(&self, neighbor: usize, send: &[f64]) -> Result<Vec<f64>, ExchangeError>;

    /// Mark the whole run as aborted.
    ///
    /// Every fatal error calls this before returning, so peers polling
    /// [`aborted`](Communicator::aborted) stop instead of blocking in
    /// the next collective.
    fn signal_abort(&self);

    /// Whether any rank has aborted the run.
    fn aborted(&self) -> bool;
}

// ── SingleProcess ───────────────────────────────────────────────────

/// The trivial communicator for undecomposed runs.
///
/// Reductions return the local values unchanged; point-to-point
/// exchange is an error because no peer exists.
#[derive(Debug, Default)]
pub struct SingleProcess {
    abort: AtomicBool,
}

impl SingleProcess {
    /// Create a single-rank communicator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Communicator for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, ExchangeError> {
        Ok(local.to_vec())
    }

    fn exchange(&self, neighbor: usize, _send: &[f64]) -> Result<Vec<f64>, ExchangeError> {
        Err(ExchangeError::NoSuchRank { rank: neighbor })
    }

    fn signal_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }
}

// ── LocalComm ───────────────────────────────────────────────────────

/// One rank's endpoint of an in-process cluster.
///
/// Built by [`LocalComm::connect`]; each endpoint is moved to its own
/// thread. Channels are unbounded so symmetric send-then-receive
/// patterns cannot deadlock.
pub struct LocalComm {
    rank: usize,
    size: usize,
    to_peer: Vec<Option<Sender<Vec<f64>>>>,
    from_peer: Vec<Option<Receiver<Vec<f64>>>>,
    abort: Arc<AtomicBool>,
}

impl LocalComm {
    /// Build a fully connected cluster of `size` rank endpoints.
    ///
    /// The returned vector is indexed by rank; give each endpoint to
    /// exactly one thread.
    pub fn connect(size: usize) -> Vec<LocalComm> {
        assert!(size > 0, "cluster needs at least one rank");
        let abort = Arc::new(AtomicBool::new(false));

        // Channel matrix: channels[from][to].
        let mut senders: Vec<Vec<Option<Sender<Vec<f64>>>>> = Vec::with_capacity(size);
        let mut receivers: Vec<Vec<Option<Receiver<Vec<f64>>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        for from in 0..size {
            let mut row = Vec::with_capacity(size);
            for to in 0..size {
                if from == to {
                    row.push(None);
                } else {
                    let (tx, rx) = unbounded();
                    row.push(Some(tx));
                    receivers[to][from] = Some(rx);
                }
            }
            senders.push(row);
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (to_peer, from_peer))| LocalComm {
                rank,
                size,
                to_peer,
                from_peer,
                abort: Arc::clone(&abort),
            })
            .collect()
    }

    fn recv_from(&self, peer: usize, expected: usize) -> Result<Vec<f64>, ExchangeError> {
        let rx = self
            .from_peer
            .get(peer)
            .and_then(|slot| slot.as_ref())
            .ok_or(ExchangeError::NoSuchRank { rank: peer })?;
        let buf = rx
            .recv()
            .map_err(|_| ExchangeError::Disconnected { peer })?;
        if buf.len() != expected {
            return Err(ExchangeError::SizeMismatch {
                expected,
                got: buf.len(),
            });
        }
        Ok(buf)
    }

    fn send_to(&self, peer: usize, buf: Vec<f64>) -> Result<(), ExchangeError> {
        let tx = self
            .to_peer
            .get(peer)
            .and_then(|slot| slot.as_ref())
            .ok_or(ExchangeError::NoSuchRank { rank: peer })?;
        tx.send(buf)
            .map_err(|_| ExchangeError::Disconnected { peer })
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, ExchangeError> {
        // Everyone broadcasts its partial, then sums all partials in
        // ascending rank order. Same arithmetic on every rank, same
        // order regardless of message arrival: bitwise-identical
        // results everywhere.
        for peer in 0..self.size {
            if peer != self.rank {
                self.send_to(peer, local.to_vec())?;
            }
        }
        let mut total = vec![0.0; local.len()];
        for peer in 0..self.size {
            let part = if peer == self.rank {
                local.to_vec()
            } else {
                self.recv_from(peer, local.len())?
            };
            for (acc, v) in total.iter_mut().zip(&part) {
                *acc += v;
            }
        }
        Ok(total)
    }

    fn exchange(&self, neighbor: usize, send: &[f64]) -> Result<Vec<f64>, ExchangeError> {
        self.send_to(neighbor, send.to_vec())?;
        self.recv_from(neighbor, send.len())
    }

    fn signal_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn single_process_reduce_is_identity() {
        let comm = SingleProcess::new();
        let out = comm.all_reduce_sum(&[1.0, 2.0]).unwrap();
        assert_eq!(out, vec![1.0, 2.0]);
        assert!(!comm.is_parallel());
    }

    #[test]
    fn single_process_exchange_has_no_peer() {
        let comm = SingleProcess::new();
        match comm.exchange(1, &[0.0]) {
            Err(ExchangeError::NoSuchRank { rank: 1 }) => {}
            other => panic!("expected NoSuchRank, got {other:?}"),
        }
    }

    #[test]
    fn cluster_reduce_sums_across_ranks() {
        let comms = LocalComm::connect(3);
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                thread::spawn(move || {
                    let local = vec![comm.rank() as f64, 1.0];
                    comm.all_reduce_sum(&local).unwrap()
                })
            })
            .collect();
        for handle in handles {
            let total = handle.join().unwrap();
            assert_eq!(total, vec![3.0, 3.0]);
        }
    }

    #[test]
    fn cluster_reduce_is_bitwise_identical_on_all_ranks() {
        let comms = LocalComm::connect(4);
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                thread::spawn(move || {
                    // Values chosen so summation order matters in
                    // floating point.
                    let local = vec![0.1 * (comm.rank() as f64 + 1.0), 1e-16];
                    comm.all_reduce_sum(&local).unwrap()
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results[1..] {
            assert_eq!(r[0].to_bits(), results[0][0].to_bits());
            assert_eq!(r[1].to_bits(), results[0][1].to_bits());
        }
    }

    #[test]
    fn neighbor_exchange_swaps_buffers() {
        let comms = LocalComm::connect(2);
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                thread::spawn(move || {
                    let mine = vec![comm.rank() as f64; 3];
                    let theirs = comm.exchange(1 - comm.rank(), &mine).unwrap();
                    (comm.rank(), theirs)
                })
            })
            .collect();
        for handle in handles {
            let (rank, theirs) = handle.join().unwrap();
            assert_eq!(theirs, vec![(1 - rank) as f64; 3]);
        }
    }

    #[test]
    fn abort_flag_is_shared_across_ranks() {
        let comms = LocalComm::connect(2);
        comms[0].signal_abort();
        assert!(comms[1].aborted());
    }

    #[test]
    fn dropped_peer_surfaces_as_disconnected() {
        let mut comms = LocalComm::connect(2);
        let survivor = comms.remove(0);
        drop(comms);
        match survivor.exchange(1, &[1.0]) {
            Err(ExchangeError::Disconnected { peer: 1 }) => {}
            other => panic!("expected Disconnected, got {other:?}"),
        }
    }
}
