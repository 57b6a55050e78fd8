//! Processor-boundary reconciliation of closure fields.

use log::trace;

use ibis_core::{ExchangeError, FlowField};
use ibis_exchange::Communicator;
use ibis_mesh::ParallelPartition;

/// Fields packed per cell into one exchange buffer: k, epsilon, nut.
const FIELDS: usize = 3;

/// Repairs closure fields on processor-boundary cells.
///
/// The closure model updates the cells its rank owns but gives no
/// guarantee about halo copies of neighbor-owned cells; after its
/// correction those copies are stale. For each boundary patch this
/// manager sends the owned-side values to the neighbor and overwrites
/// the local halo with what the neighbor sent, through the one
/// sanctioned mutable accessor for post-solve closure fields.
///
/// Invoked only for decomposed turbulent runs; the sequencer skips it
/// entirely for single-rank or laminar cases.
#[derive(Debug, Default)]
pub struct ParallelConsistencyManager {
    exchanges: u64,
}

impl ParallelConsistencyManager {
    /// A manager with a zeroed exchange counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total patch exchanges performed so far.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Reconcile this rank's halo copies with every neighbor.
    ///
    /// Returns the number of patch exchanges performed. Patches are
    /// walked in insertion order, ascending neighbor rank, so paired
    /// ranks always meet in the same collective.
    pub fn reconcile(
        &mut self,
        flow: &mut FlowField,
        partition: &ParallelPartition,
        comm: &dyn Communicator,
    ) -> Result<u64, ExchangeError> {
        let mut performed = 0;
        for (neighbor, patch) in partition.patches(comm.rank()) {
            let mut send = Vec::with_capacity(patch.owned.len() * FIELDS);
            {
                let k = flow.k.current();
                let epsilon = flow.epsilon.current();
                let nut = flow.nut.current();
                for &cell in &patch.owned {
                    send.push(k[cell]);
                    send.push(epsilon[cell]);
                    send.push(nut[cell]);
                }
            }

            let recv = comm.exchange(neighbor, &send)?;
            let expected = patch.halo.len() * FIELDS;
            if recv.len() != expected {
                return Err(ExchangeError::SizeMismatch {
                    expected,
                    got: recv.len(),
                });
            }

            let fields = flow.closure_fields_mut();
            for (i, &cell) in patch.halo.iter().enumerate() {
                fields.k[cell] = recv[i * FIELDS];
                fields.epsilon[cell] = recv[i * FIELDS + 1];
                fields.nut[cell] = recv[i * FIELDS + 2];
            }

            trace!(
                "reconciled {} halo cells with rank {neighbor}",
                patch.halo.len()
            );
            performed += 1;
            self.exchanges += 1;
        }
        Ok(performed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibis_exchange::{LocalComm, SingleProcess};
    use ibis_mesh::BackgroundMesh;

    #[test]
    fn single_rank_performs_no_exchanges() {
        let mesh = BackgroundMesh::new(4, 4, 0.25, 0.25, [0.0, 0.0]).unwrap();
        let partition = ParallelPartition::new(&mesh, 1).unwrap();
        let mut flow = FlowField::zeros(mesh.cell_count());
        let comm = SingleProcess::new();
        let mut manager = ParallelConsistencyManager::new();
        let performed = manager.reconcile(&mut flow, &partition, &comm).unwrap();
        assert_eq!(performed, 0);
        assert_eq!(manager.exchanges(), 0);
    }

    #[test]
    fn two_ranks_swap_boundary_strips() {
        let mesh = BackgroundMesh::new(4, 4, 0.25, 0.25, [0.0, 0.0]).unwrap();
        let partition = ParallelPartition::new(&mesh, 2).unwrap();
        let comms = LocalComm::connect(2);

        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                let mesh = mesh.clone();
                let partition = partition.clone();
                std::thread::spawn(move || {
                    // Each rank marks the cells it owns with its rank
                    // number so halo overwrites are observable.
                    let mut flow = FlowField::zeros(mesh.cell_count());
                    for cell in partition.owned_cells(comm.rank()) {
                        flow.k.current_mut()[cell] = comm.rank() as f64 + 1.0;
                    }
                    let mut manager = ParallelConsistencyManager::new();
                    let performed =
                        manager.reconcile(&mut flow, &partition, &comm).unwrap();
                    assert_eq!(performed, 1);

                    let patch = &partition.patches(comm.rank())[0];
                    let neighbor_mark = patch.neighbor as f64 + 1.0;
                    for &cell in &patch.halo {
                        assert_eq!(flow.k.current()[cell], neighbor_mark);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
