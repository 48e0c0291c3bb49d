//! Per-document batch report, rendered as text or JSON.
use crate::config::RunConfig;
use crate::error::ReconcileError;
use crate::rewrite::Substitution;
use crate::verify::Mismatch;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
}

impl From<&ReconcileError> for ErrorReport {
    fn from(err: &ReconcileError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    Consistent { compared_lines: usize },
    Inconsistent { mismatches: Vec<Mismatch> },
    Failed { error: ErrorReport },
}

impl Verification {
    /// Map the outcome of [`crate::verify::ReconciliationResult::into_result`].
    pub fn from_result(result: Result<usize, ReconcileError>) -> Self {
        match result {
            Ok(compared_lines) => Self::Consistent { compared_lines },
            Err(ReconcileError::VerificationMismatch { mismatches, .. }) => {
                Self::Inconsistent { mismatches }
            }
            Err(err) => Self::Failed {
                error: ErrorReport::from(&err),
            },
        }
    }

    pub fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Input already carries the rename marker.
    Skipped,
    RewriteFailed {
        error: ErrorReport,
    },
    /// Dry run: substitutions that would be written.
    Planned {
        substitutions: Vec<Substitution>,
    },
    Rewritten {
        substitutions: Vec<Substitution>,
        verification: Verification,
    },
    /// Verification of a pair written by an earlier run.
    Checked {
        verification: Verification,
    },
    MissingRewrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<PathBuf>,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

impl DocumentReport {
    pub fn is_failure(&self) -> bool {
        match &self.outcome {
            DocumentOutcome::Skipped | DocumentOutcome::Planned { .. } => false,
            DocumentOutcome::RewriteFailed { .. } | DocumentOutcome::MissingRewrite => true,
            DocumentOutcome::Rewritten { verification, .. }
            | DocumentOutcome::Checked { verification } => !verification.is_consistent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Rename,
    DryRun,
    Verify,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub schema_version: u32,
    pub mode: RunMode,
    pub config: RunConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<usize>,
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn failure_count(&self) -> usize {
        self.documents.iter().filter(|doc| doc.is_failure()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Human-readable summary, one block per document.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for doc in &self.documents {
            let path = doc.path.display();
            let rewritten = doc
                .rewritten
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            match &doc.outcome {
                DocumentOutcome::Skipped => {
                    let _ = writeln!(out, "Warning! You already renamed this file: {path}");
                }
                DocumentOutcome::RewriteFailed { error } => {
                    let _ = writeln!(out, "FAILED {path}: {}", error.message);
                }
                DocumentOutcome::Planned { substitutions } => {
                    let _ = writeln!(
                        out,
                        "Would rename {} SubFrames and save: {rewritten}",
                        substitutions.len()
                    );
                    for sub in substitutions {
                        let _ = writeln!(out, "  line {}: {} -> {}", sub.line, sub.from, sub.to);
                    }
                }
                DocumentOutcome::Rewritten {
                    substitutions,
                    verification,
                } => {
                    let _ = writeln!(
                        out,
                        "Renamed {} SubFrames and saved: {rewritten}",
                        substitutions.len()
                    );
                    render_verification(&mut out, &doc.path, verification);
                }
                DocumentOutcome::Checked { verification } => {
                    render_verification(&mut out, &doc.path, verification);
                }
                DocumentOutcome::MissingRewrite => {
                    let _ = writeln!(out, "FAILED {path}: no rewritten file {rewritten}");
                }
            }
        }
        let failures = self.failure_count();
        if failures == 0 {
            out.push_str(match self.mode {
                RunMode::Rename => "Renaming complete.\n",
                RunMode::DryRun => "Dry run complete, nothing written.\n",
                RunMode::Verify => "Verification complete.\n",
            });
        } else {
            let _ = writeln!(
                out,
                "{failures} of {} documents failed.",
                self.documents.len()
            );
        }
        out
    }
}

fn render_verification(out: &mut String, path: &std::path::Path, verification: &Verification) {
    let path = path.display();
    match verification {
        Verification::Consistent { compared_lines } => {
            let _ = writeln!(out, "Verified {path} ({compared_lines} lines)");
        }
        Verification::Inconsistent { mismatches } => {
            let _ = writeln!(out, "FAILED verification of {path}:");
            for mismatch in mismatches {
                let _ = writeln!(out, "  {mismatch}");
            }
        }
        Verification::Failed { error } => {
            let _ = writeln!(out, "FAILED verification of {path}: {}", error.message);
        }
    }
}
