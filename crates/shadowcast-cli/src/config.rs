//! `shadowcast.toml` configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shadowcast_kernel::{SilhouetteOptions, Tolerance};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kernel: KernelConfig,
    pub deploy: Option<DeployConfig>,
}

/// Kernel tuning shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Relative linear tolerance.
    pub tolerance: f32,
    /// Weld vertices at equal positions before building adjacency.
    pub weld_vertices: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::DEFAULT.linear,
            weld_vertices: true,
        }
    }
}

impl KernelConfig {
    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            linear: self.tolerance,
        }
    }

    pub fn silhouette_options(&self) -> SilhouetteOptions {
        SilhouetteOptions {
            weld_vertices: self.weld_vertices,
            tolerance: self.tolerance(),
        }
    }
}

/// Where `deploy` copies the built library and writes the host binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// The built dynamic library, e.g. `target/release/shadowcast.dll`.
    pub library: PathBuf,
    /// Host plugin directory receiving timestamped copies.
    pub plugin_dir: PathBuf,
    /// C# source file exposing the versioned library name.
    pub binding_file: PathBuf,
    /// Namespace of the generated `Version` class.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Preprocessor symbol guarding the versioned name. When set, builds
    /// without the symbol load the unversioned library instead.
    #[serde(default)]
    pub editor_define: Option<String>,
}

fn default_namespace() -> String {
    "Shadowcast.Native".to_string()
}

impl Config {
    /// Load `path`, or defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        let tolerance = config.kernel.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            anyhow::bail!("kernel.tolerance must be positive, got {}", tolerance);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.kernel.tolerance(), Tolerance::DEFAULT);
        assert!(config.kernel.silhouette_options().weld_vertices);
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [kernel]
            tolerance = 1e-5
            weld_vertices = false

            [deploy]
            library = "target/release/shadowcast.dll"
            plugin_dir = "../Assets/Native"
            binding_file = "../Assets/Logic/NativeVersion.cs"
            namespace = "Game.Native"
            editor_define = "UNITY_EDITOR"
            "#,
        )
        .unwrap();
        assert_eq!(config.kernel.tolerance, 1e-5);
        assert!(!config.kernel.silhouette_options().weld_vertices);
        let deploy = config.deploy.unwrap();
        assert_eq!(deploy.plugin_dir, PathBuf::from("../Assets/Native"));
        assert_eq!(deploy.namespace, "Game.Native");
        assert_eq!(deploy.editor_define.as_deref(), Some("UNITY_EDITOR"));
    }

    #[test]
    fn test_deploy_namespace_default() {
        let config = Config::parse(
            r#"
            [deploy]
            library = "a.dll"
            plugin_dir = "p"
            binding_file = "b.cs"
            "#,
        )
        .unwrap();
        let deploy = config.deploy.unwrap();
        assert_eq!(deploy.namespace, "Shadowcast.Native");
        assert!(deploy.editor_define.is_none());
    }

    #[test]
    fn test_rejects_bad_tolerance() {
        assert!(Config::parse("[kernel]\ntolerance = -1.0").is_err());
        assert!(Config::parse("[kernel]\ntolerance = 0.0").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = Path::new("definitely/not/here/shadowcast.toml");
        assert_eq!(Config::load_or_default(path).unwrap(), Config::default());
    }

    #[test]
    fn test_demo_config() {
        let config = Config::parse(include_str!("../../../demos/shadowcast.toml")).unwrap();
        assert_eq!(config.kernel.tolerance(), Tolerance::DEFAULT);
        assert!(config.deploy.is_some());
    }
}
