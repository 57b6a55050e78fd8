//! Directory-backed checkpoint store.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::CheckpointError;
use crate::snapshot::Snapshot;

/// Writes and locates checkpoint files in a case directory.
///
/// Files are named `step-<index>.ibcp` with a zero-padded step index
/// so lexicographic order is step order. Writes go through a
/// temporary file renamed into place; a crash mid-write never leaves
/// a half-written checkpoint under a valid name.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The store's directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `snapshot` and return the path of the finished file.
    pub fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, CheckpointError> {
        let name = format!("step-{:010}.ibcp", snapshot.time.step.0);
        let path = self.dir.join(&name);
        let tmp = self.dir.join(format!("{name}.tmp"));

        let mut writer = BufWriter::new(File::create(&tmp)?);
        snapshot.encode(&mut writer)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        fs::rename(&tmp, &path)?;

        info!(
            "wrote checkpoint {} at t={:.6}",
            path.display(),
            snapshot.time.t
        );
        Ok(path)
    }

    /// Read the snapshot stored at `path`.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Snapshot, CheckpointError> {
        let mut reader = BufReader::new(File::open(path.as_ref())?);
        Snapshot::decode(&mut reader)
    }

    /// Path of the highest-step checkpoint present, if any.
    pub fn latest(&self) -> Result<Option<PathBuf>, CheckpointError> {
        let mut best: Option<PathBuf> = None;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_checkpoint = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("step-") && n.ends_with(".ibcp"));
            if !is_checkpoint {
                continue;
            }
            if best.as_ref().is_none_or(|b| path > *b) {
                best = Some(path);
            }
        }
        Ok(best)
    }
}
