//! Edge-to-triangle adjacency.

use std::collections::HashMap;

use shadowcast_kernel_math::Point3;

use crate::extract::NO_TRIANGLE;
use crate::mesh::MeshRef;

/// One undirected edge and the triangles that use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEntry {
    /// Vertex index of the first endpoint, as it appeared in the first triangle
    /// that used this edge.
    pub v0: u32,
    /// Vertex index of the second endpoint.
    pub v1: u32,
    /// First two adjacent triangles; unused slots hold [`NO_TRIANGLE`].
    pub triangles: [u32; 2],
    /// Total number of triangles using the edge, including any beyond two.
    pub count: u32,
}

impl EdgeEntry {
    fn new(v0: u32, v1: u32, triangle: u32) -> Self {
        Self {
            v0,
            v1,
            triangles: [triangle, NO_TRIANGLE],
            count: 1,
        }
    }

    fn add(&mut self, triangle: u32) {
        if self.count == 1 {
            self.triangles[1] = triangle;
        }
        self.count += 1;
    }
}

/// Canonical id per vertex.
///
/// With `weld` set, vertices whose local positions are bitwise equal share
/// the id of the first such vertex (`-0.0` and `0.0` are treated as equal).
/// Otherwise every vertex is its own id.
pub fn weld_ids(vertices: &[Point3], weld: bool) -> Vec<u32> {
    if !weld {
        return (0..vertices.len() as u32).collect();
    }
    let mut first_seen: HashMap<[u32; 3], u32> = HashMap::with_capacity(vertices.len());
    vertices
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let key = [p.x, p.y, p.z].map(|c| (c + 0.0).to_bits());
            *first_seen.entry(key).or_insert(i as u32)
        })
        .collect()
}

/// Build the undirected edge map of a validated mesh.
///
/// Edges are keyed by the welded ids of their endpoints and listed in the
/// order they are first encountered. Triangles with two corners on the same
/// welded vertex have no area and contribute no edges.
pub fn build_edge_map(mesh: &MeshRef<'_>, ids: &[u32]) -> Vec<EdgeEntry> {
    let mut lookup: HashMap<(u32, u32), usize> = HashMap::with_capacity(mesh.indices.len());
    let mut edges: Vec<EdgeEntry> = Vec::with_capacity(mesh.indices.len() / 2);

    for (t, tri) in mesh.indices.chunks_exact(3).enumerate() {
        let t = t as u32;
        let [i0, i1, i2] = [tri[0], tri[1], tri[2]].map(|i| ids[i as usize]);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }
        for k in 0..3 {
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            let (ia, ib) = (ids[a as usize], ids[b as usize]);
            let key = if ia < ib { (ia, ib) } else { (ib, ia) };
            match lookup.get(&key) {
                Some(&slot) => edges[slot].add(t),
                None => {
                    lookup.insert(key, edges.len());
                    edges.push(EdgeEntry::new(a, b, t));
                }
            }
        }
    }

    edges
}
