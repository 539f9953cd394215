//! Copy the built library into a host project.
//!
//! A running host editor keeps its loaded copy of the library locked, so each
//! deploy lands under a fresh `<stem>_<unix seconds>` name and a generated
//! C# file tells the host which name to import.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::DeployConfig;

/// What a deploy did.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployReport {
    /// Library name without extension, as written to the binding file.
    pub versioned_name: String,
    /// Path of the new copy.
    pub copied_to: PathBuf,
    /// Number of earlier copies removed.
    pub removed: usize,
}

/// Seconds since the Unix epoch.
pub fn now_timestamp() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?
        .as_secs())
}

/// Deploy `config.library` into `config.plugin_dir` stamped with `timestamp`.
///
/// With `clear`, earlier stamped copies (and their `.meta` siblings) are
/// removed first.
pub fn deploy(config: &DeployConfig, clear: bool, timestamp: u64) -> Result<DeployReport> {
    let stem = config
        .library
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("library path {} has no file name", config.library.display()))?;
    let extension = config.library.extension().and_then(|e| e.to_str());

    fs::create_dir_all(&config.plugin_dir)
        .with_context(|| format!("failed to create {}", config.plugin_dir.display()))?;

    let removed = if clear {
        clear_previous(&config.plugin_dir, stem)?
    } else {
        0
    };

    let versioned_name = format!("{stem}_{timestamp}");
    let file_name = match extension {
        Some(ext) => format!("{versioned_name}.{ext}"),
        None => versioned_name.clone(),
    };
    let copied_to = config.plugin_dir.join(file_name);
    fs::copy(&config.library, &copied_to).with_context(|| {
        format!(
            "failed to copy {} to {}",
            config.library.display(),
            copied_to.display()
        )
    })?;
    tracing::info!(to = %copied_to.display(), "library copied");

    if let Some(parent) = config.binding_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let binding = binding_source(
        &config.namespace,
        &versioned_name,
        stem,
        config.editor_define.as_deref(),
    );
    fs::write(&config.binding_file, binding)
        .with_context(|| format!("failed to write {}", config.binding_file.display()))?;
    tracing::info!(path = %config.binding_file.display(), "binding file written");

    Ok(DeployReport {
        versioned_name,
        copied_to,
        removed,
    })
}

/// Remove files named `<stem>_*` from `dir`.
fn clear_previous(dir: &Path, stem: &str) -> Result<usize> {
    let prefix = format!("{stem}_");
    let mut removed = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(&prefix) && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())
                .with_context(|| format!("failed to remove {}", entry.path().display()))?;
            tracing::debug!(file = name, "removed previous copy");
            removed += 1;
        }
    }
    Ok(removed)
}

/// C# source exposing the library name to import.
pub fn binding_source(
    namespace: &str,
    versioned_name: &str,
    plain_name: &str,
    editor_define: Option<&str>,
) -> String {
    let constant = |name: &str| format!("        public const string version = \"{name}\";\n");
    let body = match editor_define {
        Some(symbol) => format!(
            "        #if {symbol}\n{}        #else\n{}        #endif\n",
            constant(versioned_name),
            constant(plain_name)
        ),
        None => constant(versioned_name),
    };
    format!(
        "// Generated by `shadowcast deploy`. Do not edit.\n\
         namespace {namespace}\n{{\n    public static class Version\n    {{\n{body}    }}\n}}\n"
    )
}
