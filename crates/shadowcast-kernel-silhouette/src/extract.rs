//! Silhouette extraction.

use serde::{Deserialize, Serialize};
use shadowcast_kernel_math::{Point3, Tolerance, Transform};

use crate::adjacency::{build_edge_map, weld_ids};
use crate::error::Result;
use crate::light::Light;
use crate::mesh::MeshRef;

/// Placeholder for a missing adjacent triangle.
pub const NO_TRIANGLE: u32 = u32::MAX;

/// Tuning for [`extract_silhouette`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilhouetteOptions {
    /// Treat vertices at bitwise-equal local positions as one vertex, so
    /// meshes split along hard edges still produce shared edges.
    pub weld_vertices: bool,
    /// Lit-facing threshold: a triangle faces the light when the cosine
    /// between its normal and the light vector exceeds `tolerance.linear`.
    pub tolerance: Tolerance,
}

impl Default for SilhouetteOptions {
    fn default() -> Self {
        Self {
            weld_vertices: true,
            tolerance: Tolerance::DEFAULT,
        }
    }
}

/// Why an edge is on the silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum EdgeKind {
    /// The edge borders a single triangle.
    Boundary = 0,
    /// The edge separates a lit-facing and an unlit-facing triangle.
    Contour = 1,
    /// The edge is shared by more than two triangles.
    NonManifold = 2,
}

/// One silhouette edge in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilhouetteEdge {
    /// World position of `v0`.
    pub start: Point3,
    /// World position of `v1`.
    pub end: Point3,
    /// Vertex index of the start point.
    pub v0: u32,
    /// Vertex index of the end point.
    pub v1: u32,
    /// Adjacent triangles; the second is [`NO_TRIANGLE`] on boundaries.
    pub triangles: [u32; 2],
    /// Classification.
    pub kind: EdgeKind,
}

/// Result of a silhouette query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Silhouette {
    /// Silhouette edges, ordered by the first triangle that introduced each
    /// edge and then by the edge's position within that triangle.
    pub edges: Vec<SilhouetteEdge>,
    /// Number of edges shared by more than two triangles.
    pub non_manifold_edges: usize,
    /// Number of triangles in the input mesh.
    pub triangle_count: usize,
}

impl Silhouette {
    /// Whether the mesh had edges shared by more than two triangles.
    pub fn has_non_manifold(&self) -> bool {
        self.non_manifold_edges > 0
    }

    /// Number of silhouette edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edge is on the silhouette.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Lit-facing flag for each triangle of a world-space mesh.
///
/// The outward normal follows counter-clockwise winding, reversed when
/// `flip_winding` is set. For point lights the light vector is taken from the
/// triangle's centroid. Degenerate triangles and zero-length light vectors
/// are never lit-facing.
pub fn classify_faces(
    world: &[Point3],
    indices: &[u32],
    light: &Light,
    flip_winding: bool,
    tol: &Tolerance,
) -> Vec<bool> {
    indices
        .chunks_exact(3)
        .map(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| world[i as usize]);
            let mut normal = (b - a).cross(&(c - a));
            if flip_winding {
                normal = -normal;
            }
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            let to_light = light.toward(&centroid);
            match (normal.try_normalize(0.0), to_light.try_normalize(0.0)) {
                (Some(n), Some(l)) => n.dot(&l) > tol.linear,
                _ => false,
            }
        })
        .collect()
}

/// Compute the silhouette of `mesh`, placed in the world by `transform`, as
/// seen from `light`.
///
/// Boundary and non-manifold edges are always reported; a shared edge is
/// reported when its two triangles disagree on facing the light. An empty
/// mesh yields an empty silhouette.
pub fn extract_silhouette(
    mesh: &MeshRef<'_>,
    transform: &Transform,
    light: &Light,
    options: &SilhouetteOptions,
) -> Result<Silhouette> {
    mesh.validate()?;

    let world: Vec<Point3> = mesh.vertices.iter().map(|p| transform.apply_point(p)).collect();
    let facing = classify_faces(
        &world,
        mesh.indices,
        light,
        transform.flips_winding(),
        &options.tolerance,
    );
    let ids = weld_ids(mesh.vertices, options.weld_vertices);
    let edge_map = build_edge_map(mesh, &ids);

    let mut silhouette = Silhouette {
        edges: Vec::new(),
        non_manifold_edges: 0,
        triangle_count: mesh.triangle_count(),
    };

    for entry in &edge_map {
        let kind = match entry.count {
            1 => EdgeKind::Boundary,
            2 => {
                let [t0, t1] = entry.triangles;
                if facing[t0 as usize] == facing[t1 as usize] {
                    continue;
                }
                EdgeKind::Contour
            }
            count => {
                tracing::warn!(
                    v0 = entry.v0,
                    v1 = entry.v1,
                    triangles = count,
                    "non-manifold edge reported as silhouette"
                );
                silhouette.non_manifold_edges += 1;
                EdgeKind::NonManifold
            }
        };
        silhouette.edges.push(SilhouetteEdge {
            start: world[entry.v0 as usize],
            end: world[entry.v1 as usize],
            v0: entry.v0,
            v1: entry.v1,
            triangles: entry.triangles,
            kind,
        });
    }

    tracing::debug!(
        triangles = silhouette.triangle_count,
        edges = edge_map.len(),
        silhouette = silhouette.edges.len(),
        non_manifold = silhouette.non_manifold_edges,
        "silhouette extracted"
    );

    Ok(silhouette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SilhouetteError;
    use crate::mesh::IndexedMesh;
    use shadowcast_kernel_math::Vec3;

    fn cube_silhouette(light: Light) -> Silhouette {
        let cube = IndexedMesh::cube(0.5);
        extract_silhouette(
            &cube.view(),
            &Transform::identity(),
            &light,
            &SilhouetteOptions::default(),
        )
        .unwrap()
    }

    fn pairs(s: &Silhouette) -> Vec<(u32, u32)> {
        s.edges.iter().map(|e| (e.v0, e.v1)).collect()
    }

    #[test]
    fn test_cube_lit_from_above_point() {
        let s = cube_silhouette(Light::point(Point3::new(0.0, 0.0, 10.0)));
        assert_eq!(pairs(&s), vec![(4, 5), (5, 6), (6, 7), (7, 4)]);
        assert!(s.edges.iter().all(|e| e.kind == EdgeKind::Contour));
        assert!(!s.has_non_manifold());
        assert_eq!(s.triangle_count, 12);
    }

    #[test]
    fn test_cube_lit_from_above_directional() {
        let s = cube_silhouette(Light::directional(Vec3::new(0.0, 0.0, -1.0)));
        assert_eq!(pairs(&s), vec![(4, 5), (5, 6), (6, 7), (7, 4)]);
    }

    #[test]
    fn test_cube_lit_from_corner() {
        let s = cube_silhouette(Light::directional(Vec3::new(-1.0, -1.0, -1.0)));
        assert_eq!(s.len(), 6);
        // Every contour edge joins one lit and one unlit face.
        for e in &s.edges {
            assert_ne!(e.triangles[1], NO_TRIANGLE);
        }
    }

    #[test]
    fn test_contour_separates_lit_from_unlit() {
        let cube = IndexedMesh::cube(0.5);
        let light = Light::directional(Vec3::new(0.3, -1.0, -0.2));
        let s = cube_silhouette(light);
        let facing = classify_faces(
            &cube.vertices,
            &cube.indices,
            &light,
            false,
            &Tolerance::DEFAULT,
        );
        assert!(!s.is_empty());
        for e in &s.edges {
            let [t0, t1] = e.triangles;
            assert_ne!(facing[t0 as usize], facing[t1 as usize]);
        }
    }

    #[test]
    fn test_split_cube_welds_by_default() {
        let split = IndexedMesh::cube(0.5).split_by_face(2);
        let light = Light::point(Point3::new(0.0, 0.0, 10.0));
        let welded = extract_silhouette(
            &split.view(),
            &Transform::identity(),
            &light,
            &SilhouetteOptions::default(),
        )
        .unwrap();
        assert_eq!(welded.len(), 4);

        let options = SilhouetteOptions {
            weld_vertices: false,
            ..Default::default()
        };
        let raw = extract_silhouette(&split.view(), &Transform::identity(), &light, &options)
            .unwrap();
        assert_eq!(raw.len(), 24);
        assert!(raw.edges.iter().all(|e| e.kind == EdgeKind::Boundary));
    }

    #[test]
    fn test_single_triangle_is_all_boundary() {
        let verts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = MeshRef::new(&verts, &[0, 1, 2]);
        let s = extract_silhouette(
            &mesh,
            &Transform::identity(),
            &Light::point(Point3::new(0.0, 0.0, -5.0)),
            &SilhouetteOptions::default(),
        )
        .unwrap();
        assert_eq!(s.len(), 3);
        assert!(s.edges.iter().all(|e| e.kind == EdgeKind::Boundary));
        assert!(s.edges.iter().all(|e| e.triangles == [0, NO_TRIANGLE]));
    }

    #[test]
    fn test_endpoints_match_transformed_vertices() {
        let cube = IndexedMesh::cube(0.5);
        let transform = Transform::translation(3.0, -2.0, 7.0).then(&Transform::rotation_z(0.4));
        let s = extract_silhouette(
            &cube.view(),
            &transform,
            &Light::point(Point3::new(3.0, -2.0, 20.0)),
            &SilhouetteOptions::default(),
        )
        .unwrap();
        assert_eq!(s.len(), 4);
        for e in &s.edges {
            assert_eq!(e.start, transform.apply_point(&cube.vertices[e.v0 as usize]));
            assert_eq!(e.end, transform.apply_point(&cube.vertices[e.v1 as usize]));
        }
    }

    #[test]
    fn test_mirrored_transform_keeps_facing() {
        let cube = IndexedMesh::cube(0.5);
        let light = Light::point(Point3::new(0.0, 0.0, 10.0));
        let s = extract_silhouette(
            &cube.view(),
            &Transform::scale(-1.0, 1.0, 1.0),
            &light,
            &SilhouetteOptions::default(),
        )
        .unwrap();
        assert_eq!(pairs(&s), vec![(4, 5), (5, 6), (6, 7), (7, 4)]);
    }

    #[test]
    fn test_non_manifold_edge_is_reported() {
        let verts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let indices = [0, 1, 2, 1, 0, 3, 0, 1, 4];
        let s = extract_silhouette(
            &MeshRef::new(&verts, &indices),
            &Transform::identity(),
            &Light::directional(Vec3::new(0.0, 0.0, -1.0)),
            &SilhouetteOptions::default(),
        )
        .unwrap();
        assert!(s.has_non_manifold());
        assert_eq!(s.non_manifold_edges, 1);
        assert_eq!(s.edges[0].kind, EdgeKind::NonManifold);
    }

    #[test]
    fn test_zero_area_triangle_leaves_quad_unchanged() {
        let verts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let indices = [0, 1, 2, 0, 2, 3, 0, 2, 2];
        let s = extract_silhouette(
            &MeshRef::new(&verts, &indices),
            &Transform::identity(),
            &Light::point(Point3::new(0.5, 0.5, 10.0)),
            &SilhouetteOptions::default(),
        )
        .unwrap();
        assert_eq!(pairs(&s), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert!(s.edges.iter().all(|e| e.kind == EdgeKind::Boundary));
        assert!(!s.has_non_manifold());
        assert_eq!(s.triangle_count, 3);
    }

    #[test]
    fn test_empty_mesh() {
        let s = extract_silhouette(
            &MeshRef::new(&[], &[]),
            &Transform::identity(),
            &Light::point(Point3::origin()),
            &SilhouetteOptions::default(),
        )
        .unwrap();
        assert!(s.is_empty());
        assert_eq!(s.triangle_count, 0);
    }

    #[test]
    fn test_invalid_indices_rejected() {
        let verts = [Point3::origin(); 3];
        let err = extract_silhouette(
            &MeshRef::new(&verts, &[0, 1, 9]),
            &Transform::identity(),
            &Light::point(Point3::origin()),
            &SilhouetteOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SilhouetteError::IndexOutOfRange { index: 9, .. }));
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: SilhouetteOptions = serde_json::from_str(r#"{"weld_vertices":false}"#).unwrap();
        assert!(!options.weld_vertices);
        assert_eq!(options.tolerance, Tolerance::DEFAULT);
    }
}
