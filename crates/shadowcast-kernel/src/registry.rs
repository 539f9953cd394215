//! Owned set of shadow casters.

use slotmap::{new_key_type, SlotMap};

use shadowcast_kernel_intersect::{intersect_triangles, Triangle, TriangleIntersection};
use shadowcast_kernel_math::{Point3, Tolerance, Transform};
use shadowcast_kernel_silhouette::{extract_silhouette, Light, MeshRef, Silhouette, SilhouetteOptions};

use crate::error::{KernelError, Result};

new_key_type! {
    /// Stable handle to a caster in a [`CasterRegistry`].
    pub struct CasterId;
}

/// A mesh that casts shadows, with its local-to-world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Caster {
    /// Local-space vertex positions.
    pub vertices: Vec<Point3>,
    /// Flat triangle list.
    pub indices: Vec<u32>,
    /// Local-to-world transform.
    pub transform: Transform,
}

impl Caster {
    /// Create a caster.
    pub fn new(vertices: Vec<Point3>, indices: Vec<u32>, transform: Transform) -> Self {
        Self {
            vertices,
            indices,
            transform,
        }
    }

    /// Borrow the local-space mesh.
    pub fn mesh(&self) -> MeshRef<'_> {
        MeshRef::new(&self.vertices, &self.indices)
    }

    /// Triangle `index` in world space, or `None` past the end.
    pub fn world_triangle(&self, index: usize) -> Option<Triangle> {
        let tri = self.indices.get(index * 3..index * 3 + 3)?;
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| {
            self.vertices
                .get(i as usize)
                .map(|p| self.transform.apply_point(p))
        });
        Some(Triangle::new(a?, b?, c?))
    }
}

/// The casters a host queries against, keyed by [`CasterId`].
///
/// The host builds this once (for instance when a scene loads) and calls
/// [`clear`](Self::clear) when its set of casters changes. Iteration follows
/// insertion order.
#[derive(Debug, Default)]
pub struct CasterRegistry {
    casters: SlotMap<CasterId, Caster>,
    order: Vec<CasterId>,
}

impl CasterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a caster after validating its mesh.
    pub fn insert(&mut self, caster: Caster) -> Result<CasterId> {
        caster.mesh().validate()?;
        let triangles = caster.mesh().triangle_count();
        let id = self.casters.insert(caster);
        self.order.push(id);
        tracing::debug!(?id, triangles, "caster registered");
        Ok(id)
    }

    /// Remove a caster, returning it.
    pub fn remove(&mut self, id: CasterId) -> Option<Caster> {
        let caster = self.casters.remove(id)?;
        self.order.retain(|&k| k != id);
        Some(caster)
    }

    /// Move a caster.
    pub fn set_transform(&mut self, id: CasterId, transform: Transform) -> Result<()> {
        let caster = self
            .casters
            .get_mut(id)
            .ok_or(KernelError::UnknownCaster(id))?;
        caster.transform = transform;
        Ok(())
    }

    /// Look up a caster.
    pub fn get(&self, id: CasterId) -> Option<&Caster> {
        self.casters.get(id)
    }

    /// Number of casters.
    pub fn len(&self) -> usize {
        self.casters.len()
    }

    /// Whether the registry holds no casters.
    pub fn is_empty(&self) -> bool {
        self.casters.is_empty()
    }

    /// Drop every caster. Ids issued before remain invalid afterwards.
    pub fn clear(&mut self) {
        self.casters.clear();
        self.order.clear();
    }

    /// Casters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CasterId, &Caster)> + '_ {
        self.order.iter().filter_map(|&id| self.casters.get(id).map(|c| (id, c)))
    }

    /// Silhouette of every caster, in insertion order.
    pub fn silhouettes(
        &self,
        light: &Light,
        options: &SilhouetteOptions,
    ) -> Result<Vec<(CasterId, Silhouette)>> {
        self.iter()
            .map(|(id, caster)| {
                let silhouette =
                    extract_silhouette(&caster.mesh(), &caster.transform, light, options)?;
                Ok((id, silhouette))
            })
            .collect()
    }

    /// Intersect the first triangle of caster `a` with the first triangle of
    /// caster `b`, both in world space.
    pub fn intersect_first_triangles(
        &self,
        a: CasterId,
        b: CasterId,
        tol: &Tolerance,
    ) -> Result<TriangleIntersection> {
        let ta = self.first_triangle(a)?;
        let tb = self.first_triangle(b)?;
        Ok(intersect_triangles(&ta, &tb, tol))
    }

    fn first_triangle(&self, id: CasterId) -> Result<Triangle> {
        let caster = self.casters.get(id).ok_or(KernelError::UnknownCaster(id))?;
        caster.world_triangle(0).ok_or(KernelError::EmptyMesh(id))
    }
}
