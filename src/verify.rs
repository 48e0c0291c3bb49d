//! Acceptance check between an original mdoc and its rewrite.
//!
//! Lines are compared position by position. Any differing line must be a
//! `SubFramePath` declaration on both sides; anything else means the rewrite
//! touched content it should not have. Strict mode additionally re-derives the
//! expected declaration through the frame index.
use crate::error::ReconcileError;
use crate::frames::FrameIndex;
use crate::mdoc::{mentions_subframe, MdocDocument};
use crate::rewrite::rewrite_line;
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// A differing line that is not a `SubFramePath` line on both sides.
    LineDiffers {
        line: usize,
        original: String,
        rewritten: String,
    },
    LineCountDiffers {
        original: usize,
        rewritten: usize,
    },
    /// Strict mode: the rewritten declaration is not what the frame index
    /// resolves to. `expected` is `None` when the prefix no longer resolves.
    UnexpectedSubstitution {
        line: usize,
        expected: Option<String>,
        found: String,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineDiffers {
                line,
                original,
                rewritten,
            } => write!(
                f,
                "line {line}: {:?} became {:?}",
                original.trim_end(),
                rewritten.trim_end()
            ),
            Self::LineCountDiffers {
                original,
                rewritten,
            } => write!(f, "line count {original} became {rewritten}"),
            Self::UnexpectedSubstitution {
                line,
                expected: Some(expected),
                found,
            } => write!(
                f,
                "line {line}: expected {:?}, found {:?}",
                expected.trim_end(),
                found.trim_end()
            ),
            Self::UnexpectedSubstitution {
                line,
                expected: None,
                found,
            } => write!(
                f,
                "line {line}: frame no longer resolves for {:?}",
                found.trim_end()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationResult {
    Consistent { compared_lines: usize },
    Inconsistent { mismatches: Vec<Mismatch> },
}

impl ReconciliationResult {
    pub fn into_result(self, original: &Path, rewritten: &Path) -> Result<usize, ReconcileError> {
        match self {
            Self::Consistent { compared_lines } => Ok(compared_lines),
            Self::Inconsistent { mismatches } => Err(ReconcileError::VerificationMismatch {
                original: original.to_path_buf(),
                rewritten: rewritten.to_path_buf(),
                mismatches,
            }),
        }
    }
}

/// Compare two documents. Pass `frames` to also check each substitution.
pub fn compare(
    original: &MdocDocument,
    rewritten: &MdocDocument,
    frames: Option<&FrameIndex>,
) -> ReconciliationResult {
    let before = original.lines();
    let after = rewritten.lines();
    let mut mismatches = Vec::new();
    if before.len() != after.len() {
        mismatches.push(Mismatch::LineCountDiffers {
            original: before.len(),
            rewritten: after.len(),
        });
    }
    for (idx, (line_before, line_after)) in before.iter().zip(after).enumerate() {
        if line_before == line_after {
            continue;
        }
        let line = idx + 1;
        if !mentions_subframe(line_before) || !mentions_subframe(line_after) {
            mismatches.push(Mismatch::LineDiffers {
                line,
                original: lossy(line_before),
                rewritten: lossy(line_after),
            });
            continue;
        }
        let Some(frames) = frames else {
            continue;
        };
        let expected = match rewrite_line(line, line_before, frames) {
            Some(Ok((expected, _))) => Some(expected),
            Some(Err(_)) => None,
            None => Some(line_before.clone()),
        };
        if expected.as_ref() != Some(line_after) {
            mismatches.push(Mismatch::UnexpectedSubstitution {
                line,
                expected: expected.as_deref().map(lossy),
                found: lossy(line_after),
            });
        }
    }
    if mismatches.is_empty() {
        ReconciliationResult::Consistent {
            compared_lines: before.len(),
        }
    } else {
        ReconciliationResult::Inconsistent { mismatches }
    }
}

fn lossy(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}

/// Read both files and compare them.
pub fn verify(
    original: &Path,
    rewritten: &Path,
    frames: Option<&FrameIndex>,
) -> Result<ReconciliationResult, ReconcileError> {
    let before = MdocDocument::read(original)?;
    let after = MdocDocument::read(rewritten)?;
    Ok(compare(&before, &after, frames))
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
