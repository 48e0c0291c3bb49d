//! Rewrite `SubFramePath` lines against a frame index.
//!
//! Only the final path segment of each declaration changes. Every other byte
//! of the document, line terminators included, is copied through.
use crate::error::{AmbiguousFrameMatch, ReconcileError};
use crate::frames::FrameIndex;
use crate::mdoc::{is_renamed, renamed_path, MdocDocument, SubframeDeclaration};
use crate::staging::publish_bytes;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One replaced subframe name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// 1-based line number.
    pub line: usize,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub document: MdocDocument,
    pub substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone, Copy)]
pub struct RewriteOptions<'a> {
    pub marker: &'a str,
    pub overwrite: bool,
}

/// Rewrite line `line_no` (1-based). Returns `None` for lines that are not
/// declarations.
pub fn rewrite_line(
    line_no: usize,
    line: &[u8],
    frames: &FrameIndex,
) -> Option<Result<(Vec<u8>, Substitution), AmbiguousFrameMatch>> {
    let decl = SubframeDeclaration::parse(line)?;
    let resolved = match frames.resolve(&decl.frame_prefix()) {
        Ok(name) => name,
        Err(err) => return Some(Err(err)),
    };
    let substitution = Substitution {
        line: line_no,
        from: decl.raw_subframe_name().into_owned(),
        to: resolved.to_string(),
    };
    Some(Ok((decl.with_name(resolved), substitution)))
}

/// Produce the rewritten document at `new_path` without touching disk.
pub fn rewrite_document(
    document: &MdocDocument,
    new_path: PathBuf,
    frames: &FrameIndex,
) -> Result<RewriteOutcome, ReconcileError> {
    let mut contents = Vec::new();
    let mut substitutions = Vec::new();
    for (idx, line) in document.lines().iter().enumerate() {
        match rewrite_line(idx + 1, line, frames) {
            None => contents.extend_from_slice(line),
            Some(Ok((new_line, substitution))) => {
                contents.extend_from_slice(&new_line);
                if substitution.from != substitution.to {
                    substitutions.push(substitution);
                }
            }
            Some(Err(source)) => {
                return Err(ReconcileError::AmbiguousFrameMatch {
                    path: document.path().to_path_buf(),
                    line: idx + 1,
                    source,
                });
            }
        }
    }
    Ok(RewriteOutcome {
        document: MdocDocument::parse(new_path, contents),
        substitutions,
    })
}

/// Read `original` and compute its rewrite, refusing files that already
/// carry the rename marker.
pub fn plan(
    original: &Path,
    frames: &FrameIndex,
    marker: &str,
) -> Result<RewriteOutcome, ReconcileError> {
    if is_renamed(original, marker) {
        return Err(ReconcileError::AlreadyRenamed {
            path: original.to_path_buf(),
        });
    }
    let document = MdocDocument::read(original)?;
    rewrite_document(&document, renamed_path(original, marker), frames)
}

/// Rewrite `original` and write the result next to it.
pub fn rewrite(
    original: &Path,
    frames: &FrameIndex,
    options: RewriteOptions<'_>,
) -> Result<(PathBuf, RewriteOutcome), ReconcileError> {
    let outcome = plan(original, frames, options.marker)?;
    let new_path = outcome.document.path().to_path_buf();
    publish_bytes(&new_path, &outcome.document.contents(), options.overwrite)?;
    tracing::debug!(
        path = %new_path.display(),
        substitutions = outcome.substitutions.len(),
        "wrote rewritten mdoc"
    );
    Ok((new_path, outcome))
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
