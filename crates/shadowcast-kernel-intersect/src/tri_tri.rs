//! Triangle-triangle intersection by interval overlap.

use shadowcast_kernel_math::{scale_of, Point3, Tolerance, Vec3};

use crate::coplanar::{clip_coplanar, longest_chord};
use crate::triangle::{Segment, Triangle};

/// Outcome of intersecting two triangles.
#[derive(Debug, Clone, PartialEq)]
pub enum TriangleIntersection {
    /// The triangles do not touch.
    Empty,
    /// At least one input has zero area; nothing was computed.
    Degenerate,
    /// The triangles cross along a segment (possibly a single point).
    Segment(Segment),
    /// The triangles are coplanar and overlap in this convex polygon.
    Coplanar(Vec<Point3>),
}

impl TriangleIntersection {
    /// Collapse the outcome to a segment.
    ///
    /// Coplanar overlaps become their longest chord, which lies inside both
    /// triangles. `Empty` and `Degenerate` yield `None`.
    pub fn as_segment(&self) -> Option<Segment> {
        match self {
            Self::Segment(s) => Some(*s),
            Self::Coplanar(polygon) => longest_chord(polygon),
            Self::Empty | Self::Degenerate => None,
        }
    }

    /// Whether the triangles touch at all.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Segment(_) | Self::Coplanar(_))
    }
}

/// Intersect two triangles.
///
/// Sign and parallelism tests use `tol.linear` scaled by the largest
/// coordinate magnitude of the pair. The result is symmetric: swapping the
/// arguments reverses the segment's direction and nothing else.
pub fn intersect_triangles(t1: &Triangle, t2: &Triangle, tol: &Tolerance) -> TriangleIntersection {
    if t1.is_degenerate(tol) || t2.is_degenerate(tol) {
        return TriangleIntersection::Degenerate;
    }

    let v1 = t1.vertices();
    let v2 = t2.vertices();
    let eps = tol.scaled(scale_of(v1.iter().chain(v2.iter())));

    let n1 = t1.normal().normalize();
    let n2 = t2.normal().normalize();

    // Distances of t2's vertices to t1's plane, and vice versa.
    let d2 = signed_distances(&n1, &t1.a, &v2, eps);
    if strictly_one_side(&d2) {
        return TriangleIntersection::Empty;
    }
    if d2 == [0.0; 3] {
        return coplanar(t1, t2, eps);
    }

    let d1 = signed_distances(&n2, &t2.a, &v1, eps);
    if strictly_one_side(&d1) {
        return TriangleIntersection::Empty;
    }
    if d1 == [0.0; 3] {
        return coplanar(t1, t2, eps);
    }

    let dir = n1.cross(&n2);
    let dir_len = dir.norm();
    if dir_len <= tol.linear {
        // Parallel planes that still straddle within tolerance.
        return coplanar(t1, t2, eps);
    }

    // Point on both planes: n1·x = h1, n2·x = h2.
    let h1 = n1.dot(&t1.a.coords);
    let h2 = n2.dot(&t2.a.coords);
    let origin = Point3::from((n2.cross(&dir) * h1 + dir.cross(&n1) * h2) / dir.norm_squared());
    let axis = dir / dir_len;

    let (Some((lo1, hi1)), Some((lo2, hi2))) = (
        line_interval(&v1, &d1, &origin, &axis),
        line_interval(&v2, &d2, &origin, &axis),
    ) else {
        return TriangleIntersection::Empty;
    };

    let lo = lo1.max(lo2);
    let hi = hi1.min(hi2);
    if lo > hi + eps {
        return TriangleIntersection::Empty;
    }
    let hi = hi.max(lo);

    TriangleIntersection::Segment(Segment::new(origin + axis * lo, origin + axis * hi))
}

/// Whether two triangles touch.
pub fn triangles_overlap(t1: &Triangle, t2: &Triangle, tol: &Tolerance) -> bool {
    intersect_triangles(t1, t2, tol).is_hit()
}

fn coplanar(t1: &Triangle, t2: &Triangle, eps: f32) -> TriangleIntersection {
    let polygon = clip_coplanar(t1, t2, eps);
    if polygon.is_empty() {
        TriangleIntersection::Empty
    } else {
        TriangleIntersection::Coplanar(polygon)
    }
}

/// Signed distances of `points` to the plane through `on_plane` with unit
/// normal `n`, snapped to exactly zero within `eps`.
fn signed_distances(n: &Vec3, on_plane: &Point3, points: &[Point3; 3], eps: f32) -> [f32; 3] {
    points.map(|p| {
        let d = n.dot(&(p - on_plane));
        if d.abs() <= eps {
            0.0
        } else {
            d
        }
    })
}

fn strictly_one_side(d: &[f32; 3]) -> bool {
    d.iter().all(|&x| x > 0.0) || d.iter().all(|&x| x < 0.0)
}

/// Parameter range along `origin + t * axis` covered by a triangle whose
/// vertices have signed distances `d` to the other triangle's plane.
fn line_interval(
    verts: &[Point3; 3],
    d: &[f32; 3],
    origin: &Point3,
    axis: &Vec3,
) -> Option<(f32, f32)> {
    let mut range: Option<(f32, f32)> = None;
    let mut include = |p: Point3| {
        let t = axis.dot(&(p - origin));
        range = Some(match range {
            Some((lo, hi)) => (lo.min(t), hi.max(t)),
            None => (t, t),
        });
    };

    for i in 0..3 {
        let j = (i + 1) % 3;
        if d[i] == 0.0 {
            include(verts[i]);
        }
        if (d[i] > 0.0 && d[j] < 0.0) || (d[i] < 0.0 && d[j] > 0.0) {
            let s = d[i] / (d[i] - d[j]);
            include(verts[i] + (verts[j] - verts[i]) * s);
        }
    }

    range
}
