//! Run configuration.
//!
//! Settings come from an optional JSON file merged with command-line flags.
//! Flags win over the file; the file wins over built-in defaults. Relative
//! directories in the file are resolved against the file's own directory.
use crate::cli::DirArgs;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "mdoc";
pub const DEFAULT_MARKER: &str = "_renamed";

/// On-disk config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub frames_dir: Option<PathBuf>,
    pub mdoc_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub renamed_marker: Option<String>,
    pub overwrite: Option<bool>,
    pub strict: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub frames_dir: Option<PathBuf>,
    pub mdoc_dir: PathBuf,
    pub extension: String,
    pub renamed_marker: String,
    pub overwrite: bool,
    pub strict: bool,
    pub dry_run: bool,
}

/// Boolean switches given on the command line. `false` defers to the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Switches {
    pub overwrite: bool,
    pub strict: bool,
    pub dry_run: bool,
}

/// Load a config file, resolving relative directories against its parent.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: FileConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.frames_dir = config.frames_dir.map(|dir| base.join(dir));
    config.mdoc_dir = config.mdoc_dir.map(|dir| base.join(dir));
    Ok(config)
}

/// Merge flags over the optional config file and validate the result.
pub fn resolve(dirs: &DirArgs, switches: Switches) -> Result<RunConfig> {
    let file = match &dirs.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let mdoc_dir = dirs
        .mdocs
        .clone()
        .or(file.mdoc_dir)
        .ok_or_else(|| anyhow!("mdoc directory is required (--mdocs or mdoc_dir in config)"))?;
    let extension = dirs
        .extension
        .clone()
        .or(file.extension)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let config = RunConfig {
        frames_dir: dirs.frames.clone().or(file.frames_dir),
        mdoc_dir,
        extension: extension.trim_start_matches('.').to_string(),
        renamed_marker: dirs
            .marker
            .clone()
            .or(file.renamed_marker)
            .unwrap_or_else(|| DEFAULT_MARKER.to_string()),
        overwrite: switches.overwrite || file.overwrite.unwrap_or(false),
        strict: switches.strict || file.strict.unwrap_or(false),
        dry_run: switches.dry_run,
    };
    validate_config(&config)?;
    Ok(config)
}

/// Validate resolved settings.
pub fn validate_config(config: &RunConfig) -> Result<()> {
    if config.extension.is_empty() {
        return Err(anyhow!("extension must be non-empty"));
    }
    if config.renamed_marker.is_empty() {
        return Err(anyhow!("renamed_marker must be non-empty"));
    }
    if config
        .renamed_marker
        .chars()
        .any(|ch| ch == '/' || ch == '\\' || ch == '.')
    {
        return Err(anyhow!(
            "renamed_marker must not contain path separators or dots (got {:?})",
            config.renamed_marker
        ));
    }
    Ok(())
}

impl RunConfig {
    /// The frames directory, required by any run that resolves prefixes.
    pub fn require_frames_dir(&self) -> Result<&Path> {
        self.frames_dir.as_deref().ok_or_else(|| {
            anyhow!("frames directory is required (--frames or frames_dir in config)")
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
