//! The deformable solid surface.
//!
//! A closed polyline of vertices with fixed topology. The structural
//! solver moves the vertices; load points for force transfer sit at
//! segment midpoints and follow the deformation.

use ibis_core::Vec2;

use crate::error::MeshError;
use crate::geom;

/// A discrete load point on the solid surface.
///
/// Derived from the current vertex positions; `normal` points out of
/// the solid, `tangent` follows the segment direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadPoint {
    /// Midpoint of the surface segment.
    pub position: Vec2,
    /// Unit outward normal.
    pub normal: Vec2,
    /// Unit tangent along the segment.
    pub tangent: Vec2,
    /// Segment length.
    pub length: f64,
}

/// Closed solid surface with per-vertex kinematic state.
///
/// Topology (vertex count and ordering) is fixed for the run; only
/// positions and velocities change. `prev_positions` is the old-time
/// geometry the restart guard seeds on the first iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct SolidMesh {
    positions: Vec<Vec2>,
    reference: Vec<Vec2>,
    velocity: Vec<Vec2>,
    prev_positions: Option<Vec<Vec2>>,
}

impl SolidMesh {
    /// Construct from an ordered ring of vertices.
    ///
    /// Vertices may wind either way; normals are oriented outward
    /// regardless.
    pub fn new(positions: Vec<Vec2>) -> Result<Self, MeshError> {
        if positions.len() < 3 {
            return Err(MeshError::DegenerateSurface {
                reason: format!("{} vertices, need at least 3", positions.len()),
            });
        }
        let area = signed_area(&positions);
        if area.abs() < 1e-12 {
            return Err(MeshError::DegenerateSurface {
                reason: "zero enclosed area".to_string(),
            });
        }
        let n = positions.len();
        Ok(Self {
            reference: positions.clone(),
            positions,
            velocity: vec![[0.0, 0.0]; n],
            prev_positions: None,
        })
    }

    /// A regular polygon approximating a circle, a convenient test and
    /// demo shape.
    pub fn circle(center: Vec2, radius: f64, segments: usize) -> Result<Self, MeshError> {
        let mut positions = Vec::with_capacity(segments);
        for i in 0..segments {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / segments as f64;
            positions.push([
                center[0] + radius * angle.cos(),
                center[1] + radius * angle.sin(),
            ]);
        }
        Self::new(positions)
    }

    /// Number of surface vertices (equals the number of segments).
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Current vertex positions.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Undeformed reference positions.
    pub fn reference(&self) -> &[Vec2] {
        &self.reference
    }

    /// Current vertex velocities.
    pub fn velocities(&self) -> &[Vec2] {
        &self.velocity
    }

    /// Old-time vertex positions, `None` until seeded or committed.
    pub fn prev_positions(&self) -> Option<&[Vec2]> {
        self.prev_positions.as_deref()
    }

    /// Whether old-time geometry exists.
    pub fn has_prev(&self) -> bool {
        self.prev_positions.is_some()
    }

    /// Force old-time geometry equal to current (restart-guard seeding).
    pub fn seed_prev(&mut self) {
        self.prev_positions = Some(self.positions.clone());
    }

    /// Rotate geometry time levels at the end of a completed step.
    pub fn commit_prev(&mut self) {
        match &mut self.prev_positions {
            Some(prev) => prev.clone_from(&self.positions),
            None => self.prev_positions = Some(self.positions.clone()),
        }
    }

    /// Apply an incremental displacement from the structural solve.
    ///
    /// Positions move by `displacement`; vertex velocities become
    /// `displacement / dt`. Structural-solver use only.
    pub fn apply_displacement(&mut self, displacement: &[Vec2], dt: f64) {
        assert_eq!(displacement.len(), self.positions.len());
        for ((pos, vel), d) in self
            .positions
            .iter_mut()
            .zip(self.velocity.iter_mut())
            .zip(displacement)
        {
            pos[0] += d[0];
            pos[1] += d[1];
            vel[0] = d[0] / dt;
            vel[1] = d[1] / dt;
        }
    }

    /// Restore checkpointed kinematic state.
    ///
    /// Old-time geometry stays unseeded; the guard re-seeds on resume.
    pub fn restore(&mut self, positions: Vec<Vec2>, velocity: Vec<Vec2>) {
        assert_eq!(positions.len(), self.positions.len());
        assert_eq!(velocity.len(), self.velocity.len());
        self.positions = positions;
        self.velocity = velocity;
        self.prev_positions = None;
    }

    /// Load points at segment midpoints, in segment order.
    pub fn load_points(&self) -> Vec<LoadPoint> {
        let n = self.positions.len();
        let ccw = signed_area(&self.positions) > 0.0;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.positions[i];
            let b = self.positions[(i + 1) % n];
            let ex = b[0] - a[0];
            let ey = b[1] - a[1];
            let length = (ex * ex + ey * ey).sqrt();
            let (tx, ty) = if length > 0.0 {
                (ex / length, ey / length)
            } else {
                (0.0, 0.0)
            };
            // For a counter-clockwise ring the interior is on the left
            // of each segment, so outward is the right-hand normal.
            let normal = if ccw { [ty, -tx] } else { [-ty, tx] };
            out.push(LoadPoint {
                position: [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5],
                normal,
                tangent: [tx, ty],
                length,
            });
        }
        out
    }

    /// Mean velocity of the two vertices bounding load point `i`.
    pub fn load_point_velocity(&self, i: usize) -> Vec2 {
        let n = self.positions.len();
        let a = self.velocity[i];
        let b = self.velocity[(i + 1) % n];
        [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5]
    }

    /// Whether a point lies inside the closed surface (ray casting).
    pub fn contains_point(&self, p: Vec2) -> bool {
        let mut inside = false;
        let n = self.positions.len();
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.positions[i];
            let pj = self.positions[j];
            if (pi[1] > p[1]) != (pj[1] > p[1])
                && p[0] < (pj[0] - pi[0]) * (p[1] - pi[1]) / (pj[1] - pi[1]) + pi[0]
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Whether any surface segment intersects segment `(a, b)`.
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        let n = self.positions.len();
        (0..n).any(|i| {
            geom::segments_intersect(self.positions[i], self.positions[(i + 1) % n], a, b)
        })
    }
}

/// Signed area of a vertex ring (shoelace); positive for
/// counter-clockwise winding.
fn signed_area(positions: &[Vec2]) -> f64 {
    let n = positions.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = positions[i];
        let b = positions[(i + 1) % n];
        area += a[0] * b[1] - b[0] * a[1];
    }
    area * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::prop_assert;

    fn unit_square() -> SolidMesh {
        SolidMesh::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap()
    }

    #[test]
    fn rejects_too_few_vertices() {
        match SolidMesh::new(vec![[0.0, 0.0], [1.0, 0.0]]) {
            Err(MeshError::DegenerateSurface { .. }) => {}
            other => panic!("expected DegenerateSurface, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_area_ring() {
        let collinear = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(SolidMesh::new(collinear).is_err());
    }

    #[test]
    fn contains_point_inside_and_outside() {
        let solid = unit_square();
        assert!(solid.contains_point([0.5, 0.5]));
        assert!(!solid.contains_point([1.5, 0.5]));
        assert!(!solid.contains_point([-0.1, 0.5]));
    }

    #[test]
    fn normals_point_outward_for_ccw_ring() {
        let solid = unit_square();
        let points = solid.load_points();
        // Bottom edge midpoint: outward is -y.
        assert!((points[0].normal[1] + 1.0).abs() < 1e-12);
        // Right edge midpoint: outward is +x.
        assert!((points[1].normal[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normals_point_outward_for_cw_ring() {
        let solid =
            SolidMesh::new(vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]).unwrap();
        for point in solid.load_points() {
            // Walking a small step along the outward normal must leave
            // the solid.
            let probe = [
                point.position[0] + 1e-3 * point.normal[0],
                point.position[1] + 1e-3 * point.normal[1],
            ];
            assert!(!solid.contains_point(probe));
        }
    }

    #[test]
    fn displacement_updates_positions_and_velocity() {
        let mut solid = unit_square();
        let disp = vec![[0.1, 0.0]; 4];
        solid.apply_displacement(&disp, 0.5);
        assert!((solid.positions()[0][0] - 0.1).abs() < 1e-12);
        assert!((solid.velocities()[0][0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn prev_positions_start_unseeded() {
        let mut solid = unit_square();
        assert!(!solid.has_prev());
        solid.seed_prev();
        assert_eq!(solid.prev_positions().unwrap(), solid.positions());
    }

    proptest::proptest! {
        #[test]
        fn circle_contains_its_center(
            cx in -5.0f64..5.0,
            cy in -5.0f64..5.0,
            radius in 0.1f64..3.0,
            segments in 3usize..48,
        ) {
            let solid = SolidMesh::circle([cx, cy], radius, segments).unwrap();
            prop_assert!(solid.contains_point([cx, cy]));
            prop_assert!(!solid.contains_point([cx + 2.0 * radius, cy]));
        }
    }

    #[test]
    fn circle_load_point_normals_are_radial() {
        let solid = SolidMesh::circle([0.0, 0.0], 1.0, 32).unwrap();
        for point in solid.load_points() {
            let r = (point.position[0] * point.position[0]
                + point.position[1] * point.position[1])
                .sqrt();
            let dot = (point.position[0] / r) * point.normal[0]
                + (point.position[1] / r) * point.normal[1];
            assert!(dot > 0.99, "normal not radial: dot = {dot}");
        }
    }
}
