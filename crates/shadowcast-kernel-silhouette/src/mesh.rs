//! Borrowed indexed meshes and a few generated test shapes.

use std::collections::HashMap;

use shadowcast_kernel_math::Point3;

use crate::error::{Result, SilhouetteError};

/// An indexed triangle mesh in local space, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct MeshRef<'a> {
    /// Vertex positions.
    pub vertices: &'a [Point3],
    /// Flat triangle list: three indices per triangle.
    pub indices: &'a [u32],
}

impl<'a> MeshRef<'a> {
    /// Wrap vertex and index slices.
    pub fn new(vertices: &'a [Point3], indices: &'a [u32]) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check the index buffer against the vertex buffer.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(SilhouetteError::IndexCountNotMultipleOfThree {
                count: self.indices.len(),
            });
        }
        let vertex_count = self.vertices.len();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, &i)| i as usize >= vertex_count)
        {
            return Err(SilhouetteError::IndexOutOfRange {
                index,
                position,
                vertex_count,
            });
        }
        Ok(())
    }
}

/// An owned indexed mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Flat triangle list.
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    /// Borrow as a [`MeshRef`].
    pub fn view(&self) -> MeshRef<'_> {
        MeshRef::new(&self.vertices, &self.indices)
    }

    /// Axis-aligned cube centered at the origin with 8 shared vertices and
    /// 12 outward-facing counter-clockwise triangles.
    ///
    /// Triangle order: -Z, +Z, -Y, +Y, -X, +X (two per face).
    pub fn cube(half: f32) -> Self {
        let h = half;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1,  0, 3, 2, // -Z
            4, 5, 6,  4, 6, 7, // +Z
            0, 1, 5,  0, 5, 4, // -Y
            3, 7, 6,  3, 6, 2, // +Y
            0, 4, 7,  0, 7, 3, // -X
            1, 2, 6,  1, 6, 5, // +X
        ];
        Self { vertices, indices }
    }

    /// Duplicate vertices so that every group of `triangles_per_face`
    /// consecutive triangles has its own copies, the way exporters split
    /// vertices along hard edges.
    pub fn split_by_face(&self, triangles_per_face: usize) -> Self {
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(self.indices.len());
        for face in self.indices.chunks(triangles_per_face.max(1) * 3) {
            let mut local: HashMap<u32, u32> = HashMap::new();
            for &i in face {
                let next = vertices.len() as u32;
                let mapped = *local.entry(i).or_insert(next);
                if mapped == next {
                    vertices.push(self.vertices[i as usize]);
                }
                indices.push(mapped);
            }
        }
        Self { vertices, indices }
    }

    /// Open heightfield over `[0, n] x [0, n]` with `2 * n * n` triangles,
    /// bumped by `z = amplitude * sin(x) * cos(y)`.
    pub fn bumpy_grid(n: u32, amplitude: f32) -> Self {
        let side = n + 1;
        let mut vertices = Vec::with_capacity((side * side) as usize);
        for y in 0..side {
            for x in 0..side {
                let (fx, fy) = (x as f32, y as f32);
                vertices.push(Point3::new(fx, fy, amplitude * fx.sin() * fy.cos()));
            }
        }
        let mut indices = Vec::with_capacity((n * n * 6) as usize);
        for y in 0..n {
            for x in 0..n {
                let i = y * side + x;
                indices.extend_from_slice(&[i, i + 1, i + side + 1, i, i + side + 1, i + side]);
            }
        }
        Self { vertices, indices }
    }
}
