//! Line-preserving mdoc documents and `SubFramePath` declarations.
//!
//! Lines keep their exact terminators so that joining them reproduces the
//! source bytes. Only lines starting with [`SUBFRAME_MARKER`] carry meaning
//! here; everything else is opaque.
use crate::error::ReconcileError;
use std::borrow::Cow;
use std::ffi::OsString;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const SUBFRAME_MARKER: &str = "SubFramePath = ";

/// Separator used inside `SubFramePath` values (Windows acquisition paths).
const PATH_SEPARATOR: u8 = b'\\';

/// Start of the tilt-angle annotation in a subframe name.
const ANNOTATION_START: u8 = b'[';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdocDocument {
    path: PathBuf,
    lines: Vec<Vec<u8>>,
}

impl MdocDocument {
    pub fn read(path: &Path) -> Result<Self, ReconcileError> {
        let bytes = std::fs::read(path).map_err(|err| ReconcileError::io("read mdoc", path, err))?;
        Ok(Self::parse(path, bytes))
    }

    /// Split `contents` into lines, each keeping its `\n` or `\r\n` terminator.
    /// Bytes are kept as-is; nothing requires the file to be UTF-8.
    pub fn parse(path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) -> Self {
        Self {
            path: path.into(),
            lines: contents
                .as_ref()
                .split_inclusive(|byte| *byte == b'\n')
                .map(<[u8]>::to_vec)
                .collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    pub fn contents(&self) -> Vec<u8> {
        self.lines.concat()
    }
}

/// Whether `line` mentions the `SubFramePath = ` marker anywhere.
pub fn mentions_subframe(line: &[u8]) -> bool {
    let marker = SUBFRAME_MARKER.as_bytes();
    line.windows(marker.len()).any(|window| window == marker)
}

/// A parsed `SubFramePath = <path>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubframeDeclaration<'a> {
    line: &'a [u8],
    name: Range<usize>,
}

impl<'a> SubframeDeclaration<'a> {
    /// Parse `line` if it starts with the `SubFramePath = ` marker.
    pub fn parse(line: &'a [u8]) -> Option<Self> {
        let value = line.strip_prefix(SUBFRAME_MARKER.as_bytes())?;
        let value_start = SUBFRAME_MARKER.len();
        let value_end = value_start + value.trim_ascii_end().len();
        let trimmed = &line[value_start..value_end];
        let name_start = match trimmed.iter().rposition(|byte| *byte == PATH_SEPARATOR) {
            Some(idx) => value_start + idx + 1,
            None => value_end - trimmed.trim_ascii_start().len(),
        };
        Some(Self {
            line,
            name: name_start..value_end,
        })
    }

    /// Final `\`-delimited segment of the declared path.
    pub fn raw_subframe_name(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(&self.line[self.name.clone()])
    }

    /// Portion of the subframe name before the tilt-angle annotation.
    pub fn frame_prefix(&self) -> Cow<'a, str> {
        let name = &self.line[self.name.clone()];
        let end = name
            .iter()
            .position(|byte| *byte == ANNOTATION_START)
            .unwrap_or(name.len());
        String::from_utf8_lossy(&name[..end])
    }

    /// The full line with only the subframe name replaced.
    pub fn with_name(&self, frame_name: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.line.len() + frame_name.len());
        out.extend_from_slice(&self.line[..self.name.start]);
        out.extend_from_slice(frame_name.as_bytes());
        out.extend_from_slice(&self.line[self.name.end..]);
        out
    }
}

/// Whether the file stem already ends with the rename `marker`.
pub fn is_renamed(path: &Path, marker: &str) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(marker))
}

/// `dir/name.mdoc` becomes `dir/name<marker>.mdoc`. Non UTF-8 stems are kept
/// byte for byte.
pub fn renamed_path(path: &Path, marker: &str) -> PathBuf {
    let mut file_name = path.file_stem().map(OsString::from).unwrap_or_default();
    file_name.push(marker);
    if let Some(ext) = path.extension() {
        file_name.push(".");
        file_name.push(ext);
    }
    path.with_file_name(file_name)
}
