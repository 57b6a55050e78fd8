//! Background-mesh reclassification after solid motion.

use ibis_mesh::{BackgroundMesh, CellClass, SolidMesh};

/// Reclassifies background cells against the current solid surface.
///
/// Pure function of the meshes: running it twice against the same
/// surface yields identical classifications. Updates current cell
/// volumes through [`BackgroundMesh::set_classification`]; old-time
/// volumes are untouched.
#[derive(Debug, Default)]
pub struct GeometryUpdater;

impl GeometryUpdater {
    /// Create an updater.
    pub fn new() -> Self {
        Self
    }

    /// Reclassify every cell of `mesh` against `solid`.
    ///
    /// A cell with all four corners inside the surface is solid, one
    /// with no corner inside and no edge crossing is fluid, anything
    /// else is cut. The fluid fraction is the share of corners
    /// outside the surface, a coarse but conservative cut-cell
    /// estimate.
    pub fn update(&self, mesh: &mut BackgroundMesh, solid: &SolidMesh) {
        let n = mesh.cell_count();
        let mut class = Vec::with_capacity(n);
        let mut fraction = Vec::with_capacity(n);
        for cell in 0..n {
            let corners = mesh.corners(cell);
            let inside = corners
                .iter()
                .filter(|&&c| solid.contains_point(c))
                .count();
            let c = match inside {
                4 => CellClass::Solid,
                0 if !cell_edge_crossed(&corners, solid) => CellClass::Fluid,
                _ => CellClass::Cut,
            };
            class.push(c);
            fraction.push(match c {
                CellClass::Solid => 0.0,
                CellClass::Fluid => 1.0,
                CellClass::Cut => (4 - inside) as f64 / 4.0,
            });
        }
        mesh.set_classification(class, fraction);
    }
}

/// True if any of the four cell edges crosses the surface. Catches
/// thin solid features that pass between corners.
fn cell_edge_crossed(corners: &[ibis_core::Vec2; 4], solid: &SolidMesh) -> bool {
    (0..4).any(|i| solid.intersects_segment(corners[i], corners[(i + 1) % 4]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn classified(center: ibis_core::Vec2, radius: f64) -> (BackgroundMesh, SolidMesh) {
        let mut mesh = BackgroundMesh::new(20, 20, 0.1, 0.1, [0.0, 0.0]).unwrap();
        let solid = SolidMesh::circle(center, radius, 24).unwrap();
        GeometryUpdater::new().update(&mut mesh, &solid);
        (mesh, solid)
    }

    #[test]
    fn circle_produces_all_three_classes() {
        let (mesh, _) = classified([1.0, 1.0], 0.35);
        let classes = mesh.classes();
        assert!(classes.contains(&CellClass::Fluid));
        assert!(classes.contains(&CellClass::Solid));
        assert!(classes.contains(&CellClass::Cut));
        // Center cell of the circle must be fully covered.
        let c = mesh.index(10, 10);
        assert_eq!(mesh.class(c), CellClass::Solid);
        assert_eq!(mesh.fluid_fraction(c), 0.0);
    }

    #[test]
    fn update_is_idempotent() {
        let (mut mesh, solid) = classified([1.0, 1.0], 0.35);
        let first: Vec<_> = mesh.classes().to_vec();
        let fractions = mesh.fluid_fractions().to_vec();
        GeometryUpdater::new().update(&mut mesh, &solid);
        assert_eq!(mesh.classes(), &first[..]);
        assert_eq!(mesh.fluid_fractions(), &fractions[..]);
    }

    #[test]
    fn old_volumes_survive_reclassification() {
        let (mut mesh, _) = classified([1.0, 1.0], 0.35);
        mesh.seed_old_volumes();
        let old = mesh.old_volumes().unwrap().to_vec();
        let moved = SolidMesh::circle([1.3, 1.0], 0.35, 24).unwrap();
        GeometryUpdater::new().update(&mut mesh, &moved);
        assert_eq!(mesh.old_volumes().unwrap(), &old[..]);
        // Current volumes did change under the moved surface.
        assert_ne!(mesh.volumes(), &old[..]);
    }

    #[test]
    fn random_motions_keep_fractions_consistent() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut mesh = BackgroundMesh::new(20, 20, 0.1, 0.1, [0.0, 0.0]).unwrap();
        for _ in 0..20 {
            let cx = rng.random_range(0.5..1.5);
            let cy = rng.random_range(0.5..1.5);
            let solid = SolidMesh::circle([cx, cy], 0.3, 24).unwrap();
            GeometryUpdater::new().update(&mut mesh, &solid);
            for cell in 0..mesh.cell_count() {
                let f = mesh.fluid_fraction(cell);
                match mesh.class(cell) {
                    CellClass::Fluid => assert_eq!(f, 1.0),
                    CellClass::Solid => assert_eq!(f, 0.0),
                    CellClass::Cut => assert!(f >= 0.0 && f <= 1.0),
                }
            }
        }
    }

    proptest! {
        #[test]
        fn classification_is_pure(cx in 0.2f64..1.8, cy in 0.2f64..1.8, r in 0.1f64..0.4) {
            let mut a = BackgroundMesh::new(16, 16, 0.125, 0.125, [0.0, 0.0]).unwrap();
            let mut b = BackgroundMesh::new(16, 16, 0.125, 0.125, [0.0, 0.0]).unwrap();
            let solid = SolidMesh::circle([cx, cy], r, 16).unwrap();
            GeometryUpdater::new().update(&mut a, &solid);
            GeometryUpdater::new().update(&mut b, &solid);
            prop_assert_eq!(a.classes(), b.classes());
            prop_assert_eq!(a.fluid_fractions(), b.fluid_fractions());
        }
    }
}
