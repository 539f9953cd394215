//! Coplanar triangle overlap by convex clipping.

use shadowcast_kernel_math::{Point3, Vec3};

use crate::triangle::{Segment, Triangle};

/// Clip `subject` against the three inward edge half-spaces of `clip`.
///
/// Both triangles must lie in the same plane. Returns the vertices of the
/// convex overlap polygon in order, or an empty `Vec` if they are disjoint.
pub(crate) fn clip_coplanar(subject: &Triangle, clip: &Triangle, eps: f32) -> Vec<Point3> {
    let n = clip.normal();
    let n_len = n.norm();
    if n_len == 0.0 {
        return Vec::new();
    }
    let n = n / n_len;

    let mut polygon: Vec<Point3> = subject.vertices().to_vec();
    let verts = clip.vertices();
    for i in 0..3 {
        if polygon.is_empty() {
            break;
        }
        let u = verts[i];
        let v = verts[(i + 1) % 3];
        let inward = n.cross(&(v - u));
        let inward_len = inward.norm();
        if inward_len == 0.0 {
            continue;
        }
        polygon = clip_half_space(&polygon, &u, &(inward / inward_len), eps);
    }

    dedup_ring(polygon, eps)
}

/// One Sutherland-Hodgman pass: keep the part of `polygon` on the side of
/// the plane through `origin` that `inward` points to.
fn clip_half_space(polygon: &[Point3], origin: &Point3, inward: &Vec3, eps: f32) -> Vec<Point3> {
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let cur = polygon[i];
        let next = polygon[(i + 1) % n];
        let dc = inward.dot(&(cur - origin));
        let dn = inward.dot(&(next - origin));
        let cur_in = dc >= -eps;
        let next_in = dn >= -eps;

        if cur_in {
            out.push(cur);
        }
        if cur_in != next_in {
            let s = dc / (dc - dn);
            out.push(cur + (next - cur) * s);
        }
    }
    out
}

/// Drop consecutive (and wrap-around) points closer than `eps`.
fn dedup_ring(mut points: Vec<Point3>, eps: f32) -> Vec<Point3> {
    points.dedup_by(|a, b| (*a - *b).norm() <= eps);
    while points.len() > 1 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (last - first).norm() <= eps {
            points.pop();
        } else {
            break;
        }
    }
    points
}

/// The two polygon vertices farthest apart. Ties keep the first pair found.
pub(crate) fn longest_chord(polygon: &[Point3]) -> Option<Segment> {
    match polygon {
        [] => None,
        [p] => Some(Segment::new(*p, *p)),
        _ => {
            let mut best = Segment::new(polygon[0], polygon[1]);
            let mut best_len = best.length();
            for i in 0..polygon.len() {
                for j in (i + 1)..polygon.len() {
                    let len = (polygon[j] - polygon[i]).norm();
                    if len > best_len {
                        best = Segment::new(polygon[i], polygon[j]);
                        best_len = len;
                    }
                }
            }
            Some(best)
        }
    }
}
