//! JSON inputs for the `intersect` and `silhouette` commands.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shadowcast_kernel::{
    Caster, CasterRegistry, Light, Point3, Silhouette, SilhouetteOptions, Tolerance, Transform,
    Triangle, TriangleIntersection,
};

/// Two triangles, each as three `[x, y, z]` points.
#[derive(Debug, Clone, Deserialize)]
pub struct TrianglePair {
    pub a: [Point3; 3],
    pub b: [Point3; 3],
}

impl TrianglePair {
    pub fn triangles(&self) -> (Triangle, Triangle) {
        let [a0, a1, a2] = self.a;
        let [b0, b1, b2] = self.b;
        (Triangle::new(a0, a1, a2), Triangle::new(b0, b1, b2))
    }
}

/// One mesh in a silhouette scene.
#[derive(Debug, Clone, Deserialize)]
pub struct CasterInput {
    #[serde(default)]
    pub name: Option<String>,
    pub vertices: Vec<Point3>,
    pub indices: Vec<u32>,
    /// Row-major local-to-world matrix; identity when absent.
    #[serde(default)]
    pub transform: Option<[f32; 16]>,
}

/// A light and the casters it shines on.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub light: Light,
    pub casters: Vec<CasterInput>,
    /// Per-scene overrides of the options derived from the config file.
    #[serde(default)]
    pub options: SceneOptions,
}

/// Option overrides; fields left out keep the configured value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneOptions {
    pub weld_vertices: Option<bool>,
    pub tolerance: Option<Tolerance>,
}

impl SceneOptions {
    pub fn over(&self, base: &SilhouetteOptions) -> SilhouetteOptions {
        SilhouetteOptions {
            weld_vertices: self.weld_vertices.unwrap_or(base.weld_vertices),
            tolerance: self.tolerance.unwrap_or(base.tolerance),
        }
    }
}

/// Silhouette of one named caster.
#[derive(Debug, Clone, Serialize)]
pub struct CasterReport {
    pub name: String,
    #[serde(flatten)]
    pub silhouette: Silhouette,
}

impl Scene {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid scene JSON")
    }

    /// Silhouettes of every caster, in file order.
    pub fn silhouettes(&self, defaults: &SilhouetteOptions) -> Result<Vec<CasterReport>> {
        let options = self.options.over(defaults);
        let mut registry = CasterRegistry::new();
        let mut names = Vec::with_capacity(self.casters.len());
        for (i, input) in self.casters.iter().enumerate() {
            let name = input.name.clone().unwrap_or_else(|| format!("caster {i}"));
            let transform = input
                .transform
                .as_ref()
                .map(Transform::from_row_major)
                .unwrap_or_default();
            let caster = Caster::new(input.vertices.clone(), input.indices.clone(), transform);
            registry
                .insert(caster)
                .with_context(|| format!("{name} is not a valid mesh"))?;
            names.push(name);
        }

        let results = registry.silhouettes(&self.light, &options)?;
        Ok(results
            .into_iter()
            .zip(names)
            .map(|((_, silhouette), name)| CasterReport { name, silhouette })
            .collect())
    }
}

/// Human-readable summary of a triangle intersection.
pub fn describe_intersection(pair: &TrianglePair, tol: &Tolerance) -> String {
    let (a, b) = pair.triangles();
    let result = shadowcast_kernel::intersect_triangles(&a, &b, tol);
    let fmt = |p: &Point3| format!("({}, {}, {})", p.x, p.y, p.z);
    match &result {
        TriangleIntersection::Empty => "no intersection".to_string(),
        TriangleIntersection::Degenerate => "degenerate triangle".to_string(),
        TriangleIntersection::Segment(s) if tol.points_equal(&s.start, &s.end) => {
            format!("touch at {}", fmt(&s.start))
        }
        TriangleIntersection::Segment(s) => {
            format!("segment {} -> {}", fmt(&s.start), fmt(&s.end))
        }
        TriangleIntersection::Coplanar(polygon) => match result.as_segment() {
            Some(s) => format!(
                "coplanar overlap ({} vertices), longest chord {} -> {}",
                polygon.len(),
                fmt(&s.start),
                fmt(&s.end)
            ),
            None => "coplanar, no overlap".to_string(),
        },
    }
}
