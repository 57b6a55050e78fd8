//! The per-step coupling sequencer.
//!
//! One logical thread per rank walks the fixed phase order; in
//! decomposed runs the collectives inside force transfer and
//! reconciliation keep all ranks in lockstep. There is no step-level
//! retry or rollback: any failure signals an abort to every peer and
//! ends the run.

use std::time::Instant;

use log::info;

use ibis_checkpoint::{CheckpointStore, Snapshot};
use ibis_core::{FlowField, Phase, StepError, SurfaceLoad, TimeState};
use ibis_coupling::{
    ClosureModel, FluidSolver, ForceTransferEngine, GeometryUpdater, SolidSolver,
    WallGradientShear, WallShearModel,
};
use ibis_exchange::Communicator;
use ibis_mesh::{ibm_mask, BackgroundMesh, ParallelPartition, SolidMesh};

use crate::config::{CaseConfig, ConfigError, RunContext};
use crate::consistency::ParallelConsistencyManager;
use crate::metrics::StepMetrics;
use crate::restart::CheckpointGuard;
use crate::time::TimeController;

/// The three solver collaborators of a case.
pub struct CaseSolvers {
    /// Structural solver.
    pub solid: Box<dyn SolidSolver>,
    /// Pressure-velocity fluid solver.
    pub fluid: Box<dyn FluidSolver>,
    /// Closure model.
    pub closure: Box<dyn ClosureModel>,
}

/// What a completed run looked like.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Steps executed by this invocation of `run`.
    pub steps: u64,
    /// Simulated time at exit.
    pub final_time: f64,
}

/// Drives the fixed per-step coupling sequence for one rank.
pub struct Sequencer {
    ctx: RunContext,
    flow: FlowField,
    mesh: BackgroundMesh,
    solid: SolidMesh,
    partition: ParallelPartition,
    comm: Box<dyn Communicator>,
    solvers: CaseSolvers,
    transfer: ForceTransferEngine,
    geometry: GeometryUpdater,
    consistency: ParallelConsistencyManager,
    time: TimeController,
    guard: CheckpointGuard,
    store: Option<CheckpointStore>,
    end_time: f64,
    last_metrics: StepMetrics,
}

impl Sequencer {
    /// Build a fresh case with the default wall-shear policy.
    pub fn new(
        config: CaseConfig,
        solvers: CaseSolvers,
        comm: Box<dyn Communicator>,
        store: Option<CheckpointStore>,
    ) -> Result<Self, ConfigError> {
        Self::with_shear(config, solvers, comm, store, Box::new(WallGradientShear))
    }

    /// Build a fresh case with an explicit wall-shear policy.
    pub fn with_shear(
        config: CaseConfig,
        solvers: CaseSolvers,
        comm: Box<dyn Communicator>,
        store: Option<CheckpointStore>,
        shear: Box<dyn WallShearModel>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if comm.size() != config.n_ranks {
            return Err(ConfigError::RankMismatch {
                configured: config.n_ranks,
                communicator: comm.size(),
            });
        }

        let mut mesh = BackgroundMesh::new(config.nx, config.ny, config.dx, config.dy, config.origin)?;
        let solid = config.solid.clone();
        let geometry = GeometryUpdater::new();
        geometry.update(&mut mesh, &solid);
        let partition = ParallelPartition::new(&mesh, config.n_ranks)?;

        let transfer = ForceTransferEngine::new(config.stencil_radius, config.viscosity, shear);
        let time = TimeController::new(
            config.dt_initial,
            config.adjust_dt,
            config.min_dt,
            config.max_dt,
            config.target_courant,
            config.checkpoint_every,
        );
        let flow = FlowField::zeros(mesh.cell_count());
        let ctx = RunContext::new(comm.rank(), comm.size());

        info!(
            "rank {}/{}: case {}x{} cells, {} surface vertices, closure {}",
            ctx.rank,
            ctx.n_ranks,
            config.nx,
            config.ny,
            solid.vertex_count(),
            solvers.closure.kind().name()
        );

        Ok(Self {
            ctx,
            flow,
            mesh,
            solid,
            partition,
            comm,
            solvers,
            transfer,
            geometry,
            consistency: ParallelConsistencyManager::new(),
            time,
            guard: CheckpointGuard::new(),
            store,
            end_time: config.end_time,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Build a case resuming from a checkpoint snapshot.
    ///
    /// The restored state has no old-time layers; the guard seeds them
    /// on the first step exactly as it would for a fresh run.
    pub fn resume(
        config: CaseConfig,
        solvers: CaseSolvers,
        comm: Box<dyn Communicator>,
        store: Option<CheckpointStore>,
        snapshot: &Snapshot,
    ) -> Result<Self, ConfigError> {
        let mut sequencer = Self::new(config, solvers, comm, store)?;
        let state = snapshot
            .restore_into(
                &mut sequencer.flow,
                &mut sequencer.mesh,
                &mut sequencer.solid,
            )
            .map_err(|e| ConfigError::Restart {
                detail: e.to_string(),
            })?;
        sequencer.time = sequencer.time.clone().resume(state);
        info!(
            "rank {}: resumed at t={:.6}, step {}",
            sequencer.ctx.rank, state.t, state.step
        );
        Ok(sequencer)
    }

    /// Execute one coupled step.
    pub fn step(&mut self) -> Result<StepMetrics, StepError> {
        if self.comm.aborted() {
            return Err(StepError::PeerAborted);
        }
        let step_start = Instant::now();
        let mut phase_us = Vec::with_capacity(7);

        // 1. Seed old-time state, first executed iteration only.
        self.guard
            .ensure_seeded(&mut self.flow, &mut self.mesh, &mut self.solid);

        // 2. Advance the clock against the starting field.
        let courant = self.time.courant(&self.flow, &self.mesh);
        let state = match self.time.advance(&self.flow, &self.mesh) {
            Ok(state) => state,
            Err(e) => return self.abort(e),
        };

        // 3. Transfer fluid loads onto the surface.
        let phase_start = Instant::now();
        let load = match self.transfer.compute_surface_load(
            &self.flow,
            &self.mesh,
            &self.solid,
            &self.partition,
            self.comm.as_ref(),
        ) {
            Ok(load) => load,
            Err(e) => return self.abort(e.into()),
        };
        phase_us.push((Phase::ForceTransfer, elapsed_us(phase_start)));

        // 4. Solid response.
        let phase_start = Instant::now();
        if let Err(reason) = self.solvers.solid.solve(&load, &mut self.solid, &state) {
            return self.abort(StepError::SolverFailed {
                phase: Phase::Solid,
                reason,
            });
        }
        phase_us.push((Phase::Solid, elapsed_us(phase_start)));

        // 5. Reclassify against the moved surface, unconditionally.
        let phase_start = Instant::now();
        self.geometry.update(&mut self.mesh, &self.solid);
        phase_us.push((Phase::Geometry, elapsed_us(phase_start)));

        // 6. Fluid solve on the fresh classification.
        let phase_start = Instant::now();
        if let Err(reason) = self.solvers.fluid.solve(&mut self.flow, &self.mesh, &state) {
            return self.abort(StepError::SolverFailed {
                phase: Phase::Fluid,
                reason,
            });
        }
        phase_us.push((Phase::Fluid, elapsed_us(phase_start)));

        // 7. Closure correction.
        let phase_start = Instant::now();
        if let Err(reason) = self
            .solvers
            .closure
            .correct(&mut self.flow, &self.mesh, &state)
        {
            return self.abort(StepError::SolverFailed {
                phase: Phase::Closure,
                reason,
            });
        }
        phase_us.push((Phase::Closure, elapsed_us(phase_start)));

        // 8. Repair processor-boundary closure values. Single-rank and
        // laminar runs perform zero exchanges.
        let mut reconcile_exchanges = 0;
        if self.ctx.parallel() && !self.solvers.closure.kind().is_laminar() {
            let phase_start = Instant::now();
            reconcile_exchanges = match self.consistency.reconcile(
                &mut self.flow,
                &self.partition,
                self.comm.as_ref(),
            ) {
                Ok(n) => n,
                Err(e) => return self.abort(e.into()),
            };
            phase_us.push((Phase::Reconcile, elapsed_us(phase_start)));
        }

        // 9. Rotate time levels; this step's values become history.
        self.flow.rotate();
        self.mesh.rotate_volumes();
        self.solid.commit_prev();

        // 10. Checkpoint on cadence, root rank only.
        let mut checkpoint_written = false;
        if self.time.output_due() {
            if let (Some(store), true) = (&self.store, self.ctx.is_root()) {
                let phase_start = Instant::now();
                let snapshot = Snapshot::capture(&state, &self.flow, &self.mesh, &self.solid);
                if let Err(e) = store.write(&snapshot) {
                    return self.abort(StepError::CheckpointFailed {
                        reason: e.to_string(),
                    });
                }
                checkpoint_written = true;
                phase_us.push((Phase::Checkpoint, elapsed_us(phase_start)));
            }
        }

        let metrics = StepMetrics {
            total_us: elapsed_us(step_start),
            phase_us,
            courant,
            dt: state.dt,
            surface_load_magnitude: load.total_magnitude(),
            reconcile_exchanges,
            checkpoint_written,
        };
        info!(
            "step {} t={:.6} dt={:.3e} co={:.3} |load|={:.4e} exchanges={}",
            state.step, state.t, state.dt, courant, metrics.surface_load_magnitude,
            reconcile_exchanges
        );
        self.last_metrics = metrics.clone();
        Ok(metrics)
    }

    /// Step until the simulated end time is reached.
    pub fn run(&mut self) -> Result<RunSummary, StepError> {
        let mut steps = 0;
        while self.time.state().t < self.end_time {
            self.step()?;
            steps += 1;
        }
        Ok(RunSummary {
            steps,
            final_time: self.time.state().t,
        })
    }

    fn abort(&self, err: StepError) -> Result<StepMetrics, StepError> {
        self.comm.signal_abort();
        Err(err)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Where this rank sits in the run.
    pub fn context(&self) -> RunContext {
        self.ctx
    }

    /// The clock as of the last completed step.
    pub fn time_state(&self) -> TimeState {
        self.time.state()
    }

    /// The flow field.
    pub fn flow(&self) -> &FlowField {
        &self.flow
    }

    /// The background mesh.
    pub fn mesh(&self) -> &BackgroundMesh {
        &self.mesh
    }

    /// The solid surface.
    pub fn solid(&self) -> &SolidMesh {
        &self.solid
    }

    /// The most recent surface load magnitude and timings.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Post-processing immersed-boundary mask, recomputed on demand.
    pub fn visualization_mask(&self) -> Vec<f64> {
        ibm_mask(&self.mesh)
    }

    /// Recompute the current surface load without stepping.
    pub fn surface_load(&self) -> Result<SurfaceLoad, StepError> {
        self.transfer
            .compute_surface_load(
                &self.flow,
                &self.mesh,
                &self.solid,
                &self.partition,
                self.comm.as_ref(),
            )
            .map_err(StepError::from)
    }
}

fn elapsed_us(since: Instant) -> u64 {
    since.elapsed().as_micros() as u64
}
