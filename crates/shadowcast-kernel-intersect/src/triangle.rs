//! Triangle and segment primitives.

use shadowcast_kernel_math::{Point3, Tolerance, Vec3};

/// A triangle in world space, counter-clockwise around its front face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub a: Point3,
    /// Second vertex.
    pub b: Point3,
    /// Third vertex.
    pub c: Point3,
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// The vertices in winding order.
    pub fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }

    /// Unnormalized outward normal `(b - a) × (c - a)`.
    ///
    /// Its length is twice the triangle's area.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// Length of the longest edge.
    pub fn longest_edge(&self) -> f32 {
        let ab = (self.b - self.a).norm();
        let bc = (self.c - self.b).norm();
        let ca = (self.a - self.c).norm();
        ab.max(bc).max(ca)
    }

    /// Arithmetic mean of the three vertices.
    pub fn centroid(&self) -> Point3 {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// Whether the vertices are coincident or collinear.
    ///
    /// Compares the normal's length against the longest edge squared, so the
    /// test is independent of the triangle's size.
    pub fn is_degenerate(&self, tol: &Tolerance) -> bool {
        let longest = self.longest_edge();
        if longest.is_nan() || longest <= 0.0 {
            return true;
        }
        self.normal().norm() <= tol.linear * longest * longest
    }

    /// Whether `p`, assumed to lie in this triangle's plane, is inside or on
    /// its boundary within `eps`.
    pub fn contains_point(&self, p: &Point3, eps: f32) -> bool {
        let n = self.normal();
        let n_len = n.norm();
        if n_len == 0.0 {
            return false;
        }
        let n = n / n_len;
        let verts = self.vertices();
        (0..3).all(|i| {
            let u = verts[i];
            let v = verts[(i + 1) % 3];
            let edge = v - u;
            let edge_len = edge.norm();
            if edge_len == 0.0 {
                return true;
            }
            // Signed in-plane distance from the edge line, positive inside.
            edge.cross(&(p - u)).dot(&n) / edge_len >= -eps
        })
    }
}

/// A line segment between two world-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point.
    pub start: Point3,
    /// End point.
    pub end: Point3,
}

impl Segment {
    /// Create a segment.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Distance between the endpoints.
    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }

    /// The same segment with endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// Point halfway between the endpoints.
    pub fn midpoint(&self) -> Point3 {
        Point3::from((self.start.coords + self.end.coords) * 0.5)
    }
}
