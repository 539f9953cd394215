//! Fixed-layout structs shared with the host.
//!
//! Every struct is `#[repr(C)]`, made only of 4-byte fields, and has no
//! padding, so the host can mirror it field for field.

use bytemuck::{Pod, Zeroable};
use shadowcast_kernel_intersect::{Segment, Triangle};
use shadowcast_kernel_math::{Point3, Vec3};
use shadowcast_kernel_silhouette::{EdgeKind, SilhouetteEdge};

/// A 3D point or vector.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FfiVec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl FfiVec3 {
    /// Create a vector.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// All components NaN.
    pub const fn nan() -> Self {
        Self::new(f32::NAN, f32::NAN, f32::NAN)
    }

    /// Whether any component is NaN.
    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl From<Point3> for FfiVec3 {
    fn from(p: Point3) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<FfiVec3> for Point3 {
    fn from(v: FfiVec3) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<FfiVec3> for Vec3 {
    fn from(v: FfiVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// A triangle, counter-clockwise around its front face.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FfiTriangle {
    /// First vertex.
    pub a: FfiVec3,
    /// Second vertex.
    pub b: FfiVec3,
    /// Third vertex.
    pub c: FfiVec3,
}

impl From<FfiTriangle> for Triangle {
    fn from(t: FfiTriangle) -> Self {
        Triangle::new(t.a.into(), t.b.into(), t.c.into())
    }
}

/// A line segment.
///
/// "No intersection" is encoded as both endpoints NaN.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FfiLine {
    /// Start point.
    pub start: FfiVec3,
    /// End point.
    pub end: FfiVec3,
}

impl FfiLine {
    /// The "no intersection" sentinel.
    pub const fn nan() -> Self {
        Self {
            start: FfiVec3::nan(),
            end: FfiVec3::nan(),
        }
    }

    /// Whether this is the "no intersection" sentinel.
    pub fn is_nan(&self) -> bool {
        self.start.is_nan() || self.end.is_nan()
    }
}

impl From<Segment> for FfiLine {
    fn from(s: Segment) -> Self {
        Self {
            start: s.start.into(),
            end: s.end.into(),
        }
    }
}

/// One silhouette edge.
///
/// `kind` is 0 for a boundary edge, 1 for a lit/unlit contour and 2 for a
/// non-manifold edge. `tri1` is `u32::MAX` on boundary edges.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FfiEdge {
    /// World position of `v0`.
    pub start: FfiVec3,
    /// World position of `v1`.
    pub end: FfiVec3,
    /// Start vertex index.
    pub v0: u32,
    /// End vertex index.
    pub v1: u32,
    /// First adjacent triangle.
    pub tri0: u32,
    /// Second adjacent triangle, or `u32::MAX`.
    pub tri1: u32,
    /// Edge classification.
    pub kind: u32,
}

impl From<&SilhouetteEdge> for FfiEdge {
    fn from(e: &SilhouetteEdge) -> Self {
        Self {
            start: e.start.into(),
            end: e.end.into(),
            v0: e.v0,
            v1: e.v1,
            tri0: e.triangles[0],
            tri1: e.triangles[1],
            kind: match e.kind {
                EdgeKind::Boundary => 0,
                EdgeKind::Contour => 1,
                EdgeKind::NonManifold => 2,
            },
        }
    }
}
