//! First-iteration restart guard.

use log::debug;

use ibis_core::FlowField;
use ibis_mesh::{BackgroundMesh, SolidMesh};

/// Seeds old-time state on the first executed iteration of a run.
///
/// Checkpoints store current values only, and a freshly constructed
/// case has no old-time layers either, so the first step of any run
/// (fresh or resumed) starts without the history the fluid solve
/// consumes. The guard copies current values into every old-time slot
/// exactly once, silently; missing history at this point is an
/// expected condition, not an error. The sequencer runs the guard
/// before anything else touches the fields, which is what makes the
/// fluid solve's history demand always satisfiable.
#[derive(Debug)]
pub struct CheckpointGuard {
    armed: bool,
}

impl CheckpointGuard {
    /// A guard armed for the first iteration.
    pub fn new() -> Self {
        Self { armed: true }
    }

    /// Whether the guard has not yet fired.
    pub fn armed(&self) -> bool {
        self.armed
    }

    /// Seed any missing old-time state, first call only.
    ///
    /// Later calls are no-ops: once the loop is running, old-time
    /// layers are maintained by the end-of-step rotation and must not
    /// be overwritten mid-run.
    pub fn ensure_seeded(
        &mut self,
        flow: &mut FlowField,
        mesh: &mut BackgroundMesh,
        solid: &mut SolidMesh,
    ) {
        if !self.armed {
            return;
        }
        self.armed = false;

        if !flow.has_history() {
            debug!("seeding old-time flow fields from current values");
            flow.seed_history();
        }
        if !mesh.has_old_volumes() {
            debug!("seeding old-time cell volumes from current values");
            mesh.seed_old_volumes();
        }
        if !solid.has_prev() {
            debug!("seeding prior solid position from current position");
            solid.seed_prev();
        }
    }
}

impl Default for CheckpointGuard {
    fn default() -> Self {
        Self::new()
    }
}
