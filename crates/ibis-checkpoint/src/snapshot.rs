//! Checkpoint snapshot: captured state and its binary layout.

use std::io::{Read, Write};

use ibis_core::{FlowField, StepId, TimeLayered, TimeState, Vec2};
use ibis_mesh::{BackgroundMesh, CellClass, SolidMesh};

use crate::codec::{
    read_class_vec, read_f64_le, read_f64_vec, read_u64_le, read_u8, read_vec2_vec,
    write_class_vec, write_f64_le, write_f64_vec, write_u64_le, write_u8, write_vec2_vec,
};
use crate::error::CheckpointError;
use crate::{FORMAT_VERSION, MAGIC};

/// One checkpoint's worth of state, current time level only.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Simulation time at capture.
    pub time: TimeState,
    /// Current velocity field.
    pub u: Vec<Vec2>,
    /// Current pressure field.
    pub p: Vec<f64>,
    /// Current turbulent kinetic energy.
    pub k: Vec<f64>,
    /// Current turbulent dissipation.
    pub epsilon: Vec<f64>,
    /// Current eddy viscosity.
    pub nut: Vec<f64>,
    /// Cell classification at capture.
    pub classes: Vec<CellClass>,
    /// Cut-cell fluid fractions.
    pub fractions: Vec<f64>,
    /// Current effective cell volumes.
    pub volumes: Vec<f64>,
    /// Solid vertex positions.
    pub solid_positions: Vec<Vec2>,
    /// Solid vertex velocities.
    pub solid_velocity: Vec<Vec2>,
}

impl Snapshot {
    /// Capture the current time level of a running case.
    pub fn capture(
        time: &TimeState,
        flow: &FlowField,
        mesh: &BackgroundMesh,
        solid: &SolidMesh,
    ) -> Self {
        Self {
            time: *time,
            u: flow.u.current().to_vec(),
            p: flow.p.current().to_vec(),
            k: flow.k.current().to_vec(),
            epsilon: flow.epsilon.current().to_vec(),
            nut: flow.nut.current().to_vec(),
            classes: mesh.classes().to_vec(),
            fractions: mesh.fluid_fractions().to_vec(),
            volumes: mesh.volumes().to_vec(),
            solid_positions: solid.positions().to_vec(),
            solid_velocity: solid.velocities().to_vec(),
        }
    }

    /// Restore the captured state into a case.
    ///
    /// All old-time layers come back unseeded, exactly as after fresh
    /// construction; the first-iteration guard seeds them on resume.
    /// Returns the restored time state.
    pub fn restore_into(
        &self,
        flow: &mut FlowField,
        mesh: &mut BackgroundMesh,
        solid: &mut SolidMesh,
    ) -> Result<TimeState, CheckpointError> {
        if self.u.len() != mesh.cell_count() {
            return Err(CheckpointError::Corrupt {
                detail: format!(
                    "checkpoint has {} cells, case has {}",
                    self.u.len(),
                    mesh.cell_count()
                ),
            });
        }
        if self.solid_positions.len() != solid.vertex_count() {
            return Err(CheckpointError::Corrupt {
                detail: format!(
                    "checkpoint has {} solid vertices, case has {}",
                    self.solid_positions.len(),
                    solid.vertex_count()
                ),
            });
        }
        *flow = FlowField {
            u: TimeLayered::from_current(self.u.clone()),
            p: TimeLayered::from_current(self.p.clone()),
            k: TimeLayered::from_current(self.k.clone()),
            epsilon: TimeLayered::from_current(self.epsilon.clone()),
            nut: TimeLayered::from_current(self.nut.clone()),
        };
        mesh.set_classification(self.classes.clone(), self.fractions.clone());
        mesh.restore_volumes(self.volumes.clone());
        solid.restore(self.solid_positions.clone(), self.solid_velocity.clone());
        Ok(self.time)
    }

    /// Encode to a byte sink, header first.
    pub fn encode(&self, w: &mut dyn Write) -> Result<(), CheckpointError> {
        w.write_all(&MAGIC)?;
        write_u8(w, FORMAT_VERSION)?;
        write_f64_le(w, self.time.t)?;
        write_f64_le(w, self.time.dt)?;
        write_u64_le(w, self.time.step.0)?;
        write_vec2_vec(w, &self.u)?;
        write_f64_vec(w, &self.p)?;
        write_f64_vec(w, &self.k)?;
        write_f64_vec(w, &self.epsilon)?;
        write_f64_vec(w, &self.nut)?;
        write_class_vec(w, &self.classes)?;
        write_f64_vec(w, &self.fractions)?;
        write_f64_vec(w, &self.volumes)?;
        write_vec2_vec(w, &self.solid_positions)?;
        write_vec2_vec(w, &self.solid_velocity)?;
        Ok(())
    }

    /// Decode from a byte source, validating magic and version.
    pub fn decode(r: &mut dyn Read) -> Result<Self, CheckpointError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(CheckpointError::InvalidMagic);
        }
        let version = read_u8(r)?;
        if version != FORMAT_VERSION {
            return Err(CheckpointError::UnsupportedVersion { found: version });
        }
        let t = read_f64_le(r)?;
        let dt = read_f64_le(r)?;
        let step = StepId(read_u64_le(r)?);
        let snapshot = Self {
            time: TimeState { t, dt, step },
            u: read_vec2_vec(r)?,
            p: read_f64_vec(r)?,
            k: read_f64_vec(r)?,
            epsilon: read_f64_vec(r)?,
            nut: read_f64_vec(r)?,
            classes: read_class_vec(r)?,
            fractions: read_f64_vec(r)?,
            volumes: read_f64_vec(r)?,
            solid_positions: read_vec2_vec(r)?,
            solid_velocity: read_vec2_vec(r)?,
        };
        let n = snapshot.u.len();
        if snapshot.p.len() != n || snapshot.classes.len() != n || snapshot.volumes.len() != n {
            return Err(CheckpointError::Corrupt {
                detail: "field lengths disagree".into(),
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case() -> (TimeState, FlowField, BackgroundMesh, SolidMesh) {
        let mesh = BackgroundMesh::new(6, 6, 0.5, 0.5, [0.0, 0.0]).unwrap();
        let mut flow = FlowField::zeros(mesh.cell_count());
        for cell in 0..mesh.cell_count() {
            flow.u.current_mut()[cell] = [cell as f64, -1.0];
            flow.p.current_mut()[cell] = cell as f64 * 0.1;
        }
        let solid = SolidMesh::circle([1.5, 1.5], 0.6, 8).unwrap();
        let time = TimeState {
            t: 1.25,
            dt: 0.005,
            step: StepId(250),
        };
        (time, flow, mesh, solid)
    }

    #[test]
    fn encode_decode_is_identity() {
        let (time, flow, mesh, solid) = case();
        let snapshot = Snapshot::capture(&time, &flow, &mesh, &solid);
        let mut buf = Vec::new();
        snapshot.encode(&mut buf).unwrap();
        let back = Snapshot::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(snapshot, back);
    }

    #[test]
    fn restore_leaves_history_unseeded() {
        let (time, mut flow, mut mesh, mut solid) = case();
        flow.seed_history();
        mesh.seed_old_volumes();
        let snapshot = Snapshot::capture(&time, &flow, &mesh, &solid);

        let restored_time = snapshot
            .restore_into(&mut flow, &mut mesh, &mut solid)
            .unwrap();
        assert_eq!(restored_time, time);
        assert!(!flow.has_history());
        assert!(!mesh.has_old_volumes());
        assert!(!solid.has_prev());
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut buf = b"NOPE".to_vec();
        buf.extend_from_slice(&[FORMAT_VERSION]);
        assert!(matches!(
            Snapshot::decode(&mut buf.as_slice()),
            Err(CheckpointError::InvalidMagic)
        ));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut buf = MAGIC.to_vec();
        buf.push(FORMAT_VERSION + 1);
        assert!(matches!(
            Snapshot::decode(&mut buf.as_slice()),
            Err(CheckpointError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn cell_count_mismatch_is_corrupt() {
        let (time, flow, mesh, solid) = case();
        let snapshot = Snapshot::capture(&time, &flow, &mesh, &solid);
        let mut other_mesh = BackgroundMesh::new(3, 3, 0.5, 0.5, [0.0, 0.0]).unwrap();
        let mut other_flow = FlowField::zeros(other_mesh.cell_count());
        let mut other_solid = SolidMesh::circle([0.5, 0.5], 0.2, 8).unwrap();
        assert!(matches!(
            snapshot.restore_into(&mut other_flow, &mut other_mesh, &mut other_solid),
            Err(CheckpointError::Corrupt { .. })
        ));
    }
}
