#![warn(missing_docs)]

//! Shadow-casting geometry kernel facade for shadowcast.
//!
//! Provides the [`CasterRegistry`], an owned set of shadow-casting meshes
//! placed in the world, and re-exports the kernel crates it is built on.
//!
//! # Example
//!
//! ```
//! use shadowcast_kernel::{Caster, CasterRegistry, Light, SilhouetteOptions};
//! use shadowcast_kernel::{IndexedMesh, Point3, Transform};
//!
//! let mut registry = CasterRegistry::new();
//! let cube = IndexedMesh::cube(0.5);
//! let id = registry
//!     .insert(Caster::new(cube.vertices, cube.indices, Transform::identity()))
//!     .unwrap();
//!
//! let light = Light::point(Point3::new(0.0, 0.0, 10.0));
//! let results = registry.silhouettes(&light, &SilhouetteOptions::default()).unwrap();
//! assert_eq!(results[0].0, id);
//! assert_eq!(results[0].1.len(), 4);
//! ```

pub use shadowcast_kernel_buffer;
pub use shadowcast_kernel_intersect;
pub use shadowcast_kernel_math;
pub use shadowcast_kernel_silhouette;

pub use shadowcast_kernel_intersect::{intersect_triangles, Segment, Triangle, TriangleIntersection};
pub use shadowcast_kernel_math::{Point3, Tolerance, Transform, Vec3};
pub use shadowcast_kernel_silhouette::{
    extract_silhouette, EdgeKind, IndexedMesh, Light, MeshRef, Silhouette, SilhouetteEdge,
    SilhouetteOptions,
};

mod error;
mod registry;

pub use error::{KernelError, Result};
pub use registry::{Caster, CasterId, CasterRegistry};
