//! Batch orchestration over a directory of mdoc files.
//!
//! A run is three sequential passes: build the frame index once, rewrite
//! every document, then verify every rewritten pair. Documents are
//! independent; a failure is recorded against its own path and the batch
//! moves on.
use crate::config::RunConfig;
use crate::error::ReconcileError;
use crate::frames::FrameIndex;
use crate::mdoc::{is_renamed, renamed_path};
use crate::report::{
    BatchReport, DocumentOutcome, DocumentReport, ErrorReport, RunMode, Verification,
    REPORT_SCHEMA_VERSION,
};
use crate::rewrite::{self, RewriteOptions, Substitution};
use crate::verify;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Input documents split by whether they already carry the rename marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub to_process: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// List files in `dir` (non-recursive) with the given extension, sorted.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ReconcileError> {
    let entries =
        fs::read_dir(dir).map_err(|err| ReconcileError::io("read mdoc directory", dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ReconcileError::io("read mdoc directory", dir, err))?;
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);
        if matches_ext && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn partition(paths: Vec<PathBuf>, marker: &str) -> Partition {
    let (skipped, to_process): (Vec<PathBuf>, Vec<PathBuf>) = paths
        .into_iter()
        .partition(|path| is_renamed(path, marker));
    Partition {
        to_process,
        skipped,
    }
}

/// Rewrite every document, then verify every rewrite.
pub fn run_rename(config: &RunConfig) -> Result<BatchReport> {
    let frames_dir = config.require_frames_dir()?;
    let frames = FrameIndex::build(frames_dir).context("build frame index")?;
    let paths = discover(&config.mdoc_dir, &config.extension).context("discover mdoc files")?;
    let Partition {
        to_process,
        skipped,
    } = partition(paths, &config.renamed_marker);
    tracing::info!(
        frames = frames.len(),
        documents = to_process.len(),
        skipped = skipped.len(),
        "starting rename"
    );

    let mut documents: Vec<DocumentReport> = skipped
        .into_iter()
        .map(|path| {
            tracing::warn!(path = %path.display(), "already renamed, skipping");
            DocumentReport {
                path,
                rewritten: None,
                outcome: DocumentOutcome::Skipped,
            }
        })
        .collect();

    let options = RewriteOptions {
        marker: &config.renamed_marker,
        overwrite: config.overwrite,
    };
    let mut written: Vec<(PathBuf, PathBuf, Vec<Substitution>)> = Vec::new();
    for path in to_process {
        let rewritten = renamed_path(&path, &config.renamed_marker);
        if config.dry_run {
            let outcome = match rewrite::plan(&path, &frames, &config.renamed_marker) {
                Ok(_) if !config.overwrite && rewritten.exists() => rewrite_failed(
                    &path,
                    &ReconcileError::OutputExists {
                        path: rewritten.clone(),
                    },
                ),
                Ok(outcome) => DocumentOutcome::Planned {
                    substitutions: outcome.substitutions,
                },
                Err(err) => rewrite_failed(&path, &err),
            };
            documents.push(DocumentReport {
                path,
                rewritten: Some(rewritten),
                outcome,
            });
            continue;
        }
        match rewrite::rewrite(&path, &frames, options) {
            Ok((new_path, outcome)) => {
                tracing::info!(path = %new_path.display(), "renamed subframes and saved");
                written.push((path, new_path, outcome.substitutions));
            }
            Err(err) => {
                let outcome = rewrite_failed(&path, &err);
                documents.push(DocumentReport {
                    path,
                    rewritten: Some(rewritten),
                    outcome,
                });
            }
        }
    }

    let strict_frames = config.strict.then_some(&frames);
    for (path, new_path, substitutions) in written {
        let verification = check_pair(&path, &new_path, strict_frames);
        documents.push(DocumentReport {
            path,
            rewritten: Some(new_path),
            outcome: DocumentOutcome::Rewritten {
                substitutions,
                verification,
            },
        });
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(BatchReport {
        schema_version: REPORT_SCHEMA_VERSION,
        mode: if config.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Rename
        },
        config: config.clone(),
        frame_count: Some(frames.len()),
        documents,
    })
}

/// Verify `name.mdoc` / `name<marker>.mdoc` pairs left by an earlier run.
pub fn run_verify(config: &RunConfig) -> Result<BatchReport> {
    let frames = if config.strict {
        let frames_dir = config.require_frames_dir()?;
        Some(FrameIndex::build(frames_dir).context("build frame index")?)
    } else {
        None
    };
    let paths = discover(&config.mdoc_dir, &config.extension).context("discover mdoc files")?;
    let Partition { to_process, .. } = partition(paths, &config.renamed_marker);

    let mut documents = Vec::new();
    for path in to_process {
        let rewritten = renamed_path(&path, &config.renamed_marker);
        let outcome = if rewritten.is_file() {
            DocumentOutcome::Checked {
                verification: check_pair(&path, &rewritten, frames.as_ref()),
            }
        } else {
            tracing::error!(path = %path.display(), "no rewritten file to verify");
            DocumentOutcome::MissingRewrite
        };
        documents.push(DocumentReport {
            path,
            rewritten: Some(rewritten),
            outcome,
        });
    }
    Ok(BatchReport {
        schema_version: REPORT_SCHEMA_VERSION,
        mode: RunMode::Verify,
        config: config.clone(),
        frame_count: frames.as_ref().map(FrameIndex::len),
        documents,
    })
}

fn rewrite_failed(path: &Path, err: &ReconcileError) -> DocumentOutcome {
    tracing::error!(path = %path.display(), "{err}");
    DocumentOutcome::RewriteFailed {
        error: ErrorReport::from(err),
    }
}

fn check_pair(original: &Path, rewritten: &Path, frames: Option<&FrameIndex>) -> Verification {
    let result = verify::verify(original, rewritten, frames)
        .and_then(|result| result.into_result(original, rewritten));
    match &result {
        Ok(compared_lines) => {
            tracing::debug!(path = %original.display(), compared_lines, "verified");
        }
        Err(err) => tracing::error!("{err}"),
    }
    Verification::from_result(result)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
