//! Post-processing IBM mask.
//!
//! A per-cell scalar view of the classification (1 fluid, 0.5 cut,
//! 0 solid) for visualization and downstream post-processing. The mask
//! has no effect on the physics and is recomputed on demand rather
//! than stored on the mesh.

use crate::background::{BackgroundMesh, CellClass};

/// Compute the visualization mask for the current classification.
pub fn ibm_mask(mesh: &BackgroundMesh) -> Vec<f64> {
    mesh.classes()
        .iter()
        .map(|class| match class {
            CellClass::Fluid => 1.0,
            CellClass::Cut => 0.5,
            CellClass::Solid => 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_reflects_classification() {
        let mut mesh = BackgroundMesh::new(3, 1, 1.0, 1.0, [0.0, 0.0]).unwrap();
        mesh.set_classification(
            vec![CellClass::Fluid, CellClass::Cut, CellClass::Solid],
            vec![1.0, 0.5, 0.0],
        );
        assert_eq!(ibm_mask(&mesh), vec![1.0, 0.5, 0.0]);
    }
}
