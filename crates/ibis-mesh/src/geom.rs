//! Small planar geometry helpers shared by classification and masking.

use ibis_core::Vec2;

/// Orientation of the ordered triplet `(p, q, r)`.
///
/// Returns `0` for collinear, `1` for clockwise, `2` for
/// counter-clockwise, with a small tolerance absorbing roundoff.
fn orientation(p: Vec2, q: Vec2, r: Vec2) -> u8 {
    let v = (q[1] - p[1]) * (r[0] - q[0]) - (q[0] - p[0]) * (r[1] - q[1]);
    if v.abs() < 1e-12 {
        0
    } else if v > 0.0 {
        1
    } else {
        2
    }
}

/// Whether collinear point `q` lies on segment `pr`.
fn on_segment(p: Vec2, q: Vec2, r: Vec2) -> bool {
    q[0] <= p[0].max(r[0])
        && q[0] >= p[0].min(r[0])
        && q[1] <= p[1].max(r[1])
        && q[1] >= p[1].min(r[1])
}

/// Whether segments `pq` and `ab` intersect, including touching ends.
pub fn segments_intersect(p: Vec2, q: Vec2, a: Vec2, b: Vec2) -> bool {
    let o1 = orientation(p, q, a);
    let o2 = orientation(p, q, b);
    let o3 = orientation(a, b, p);
    let o4 = orientation(a, b, q);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    // Collinear special cases.
    (o1 == 0 && on_segment(p, a, q))
        || (o2 == 0 && on_segment(p, b, q))
        || (o3 == 0 && on_segment(a, p, b))
        || (o4 == 0 && on_segment(a, q, b))
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}
