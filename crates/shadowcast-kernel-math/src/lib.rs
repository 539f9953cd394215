#![warn(missing_docs)]

//! Math types for the shadowcast geometry kernel.
//!
//! Thin wrappers around nalgebra in single precision, matching the 32-bit
//! floats hosts hand across the native boundary: points, vectors, affine
//! transforms, and tolerance constants.

use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f32>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f32>;

/// A 4x4 affine transformation matrix mapping local space to world space.
///
/// Hosts pass matrices as 16 floats in **row-major** order
/// (`m[row * 4 + col]`), translation in elements 3, 7 and 11.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f32>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Build a transform from 16 row-major floats.
    pub fn from_row_major(m: &[f32; 16]) -> Self {
        Self {
            matrix: Matrix4::from_row_slice(m),
        }
    }

    /// The 16 row-major floats of this transform.
    pub fn to_row_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.matrix[(row, col)];
            }
        }
        out
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f32, dy: f32, dz: f32) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Compose: `self * other`, i.e. apply `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point. The bottom row is ignored (affine).
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Whether the linear part mirrors space (negative determinant), which
    /// turns counter-clockwise triangles clockwise.
    pub fn flips_winding(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
///
/// `linear` is relative: queries multiply it by their own scale
/// (see [`scale_of`]) so the same constant works for millimetre props and
/// kilometre terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Relative linear tolerance for sign and parallelism tests.
    pub linear: f32,
}

impl Tolerance {
    /// Default kernel tolerance (1e-6 relative).
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Effective absolute epsilon for a query of the given scale.
    pub fn scaled(&self, scale: f32) -> f32 {
        self.linear * scale.max(1.0)
    }

    /// Whether two points coincide within the tolerance scaled to their own
    /// magnitude.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() <= self.scaled(scale_of([a, b]))
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scale of a point set: the largest absolute coordinate, never below 1.
pub fn scale_of<'a>(points: impl IntoIterator<Item = &'a Point3>) -> f32 {
    points
        .into_iter()
        .flat_map(|p| p.coords.iter().copied())
        .fold(1.0f32, |acc, c| acc.max(c.abs()))
}
