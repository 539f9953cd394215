//! Light sources.

use serde::{Deserialize, Serialize};
use shadowcast_kernel_math::{Point3, Vec3};

/// A light in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    /// Positional light at a world-space point.
    Point {
        /// Light position.
        position: Point3,
    },
    /// Directional light; `direction` is the way the light travels.
    Directional {
        /// Travel direction (need not be normalized).
        direction: Vec3,
    },
}

impl Light {
    /// Positional light at `position`.
    pub fn point(position: Point3) -> Self {
        Self::Point { position }
    }

    /// Directional light travelling along `direction`.
    pub fn directional(direction: Vec3) -> Self {
        Self::Directional { direction }
    }

    /// Vector from `from` toward the light.
    pub fn toward(&self, from: &Point3) -> Vec3 {
        match self {
            Self::Point { position } => position - from,
            Self::Directional { direction } => -direction,
        }
    }
}
