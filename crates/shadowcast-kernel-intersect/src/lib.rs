#![warn(missing_docs)]

//! Triangle-triangle intersection for the shadowcast kernel.
//!
//! Given two triangles in world space, computes the segment along which they
//! cross:
//! 1. Reject degenerate (zero-area) inputs
//! 2. Classify each triangle's vertices against the other's plane
//! 3. Coplanar pairs are clipped against each other in the shared plane
//! 4. Otherwise intersect both triangles with the plane-plane line and
//!    overlap the two parameter intervals

mod coplanar;
mod tri_tri;
mod triangle;

pub use tri_tri::{intersect_triangles, triangles_overlap, TriangleIntersection};
pub use triangle::{Segment, Triangle};
