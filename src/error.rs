//! Typed errors for frame resolution, rewriting, and verification.
//!
//! Command functions convert these into `anyhow::Error`; the batch workflow
//! keeps them typed so each document's failure can be reported on its own.
use crate::verify::Mismatch;
use std::path::PathBuf;

/// No frame, or more than one frame, starts with the requested prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "expected 1 frame matching prefix '{prefix}', but found {}: {candidates:?}",
    candidates.len()
)]
pub struct AmbiguousFrameMatch {
    /// Prefix that was looked up.
    pub prefix: String,
    /// Every listed filename starting with `prefix` (empty or more than one).
    pub candidates: Vec<String>,
}

/// Errors raised while reconciling a single mdoc document.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("{}: line {line}: {source}", path.display())]
    AmbiguousFrameMatch {
        path: PathBuf,
        line: usize,
        #[source]
        source: AmbiguousFrameMatch,
    },

    #[error("already renamed, skipping {}", path.display())]
    AlreadyRenamed { path: PathBuf },

    #[error(
        "unexpected difference between {} and {}: {}",
        original.display(),
        rewritten.display(),
        render_mismatches(mismatches)
    )]
    VerificationMismatch {
        original: PathBuf,
        rewritten: PathBuf,
        mismatches: Vec<Mismatch>,
    },

    #[error("refusing to overwrite existing output {}", path.display())]
    OutputExists { path: PathBuf },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReconcileError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable kind used in JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AmbiguousFrameMatch { .. } => "ambiguous_frame_match",
            Self::AlreadyRenamed { .. } => "already_renamed",
            Self::VerificationMismatch { .. } => "verification_mismatch",
            Self::OutputExists { .. } => "output_exists",
            Self::Io { .. } => "io",
        }
    }
}

fn render_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(|mismatch| mismatch.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
