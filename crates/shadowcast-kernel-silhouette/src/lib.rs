#![warn(missing_docs)]

//! Light-relative silhouette edges for the shadowcast kernel.
//!
//! The extractor runs in three passes over an indexed triangle mesh:
//! 1. **Adjacency**: map every undirected edge to the triangles using it,
//!    optionally welding vertices that share a position
//! 2. **Facing**: classify each triangle as lit-facing or not
//! 3. **Selection**: keep boundary edges, non-manifold edges, and edges whose
//!    two triangles disagree on facing
//!
//! Triangles are counter-clockwise around their outward normal. No state is
//! kept between calls.

mod adjacency;
pub mod error;
mod extract;
mod light;
pub mod mesh;

pub use adjacency::{build_edge_map, weld_ids, EdgeEntry};
pub use error::{Result, SilhouetteError};
pub use extract::{
    classify_faces, extract_silhouette, EdgeKind, Silhouette, SilhouetteEdge, SilhouetteOptions,
    NO_TRIANGLE,
};
pub use light::Light;
pub use mesh::{IndexedMesh, MeshRef};
