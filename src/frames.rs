//! Frame directory snapshot and prefix lookup.
//!
//! The index keeps the raw listing and answers prefix queries with a linear
//! scan. It never groups names up front, so overlapping prefixes surface as
//! an [`AmbiguousFrameMatch`] at lookup time.
use crate::error::{AmbiguousFrameMatch, ReconcileError};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct FrameIndex {
    names: Vec<String>,
}

impl FrameIndex {
    /// List every entry directly inside `frame_dir`, whatever its type.
    /// Non UTF-8 names are kept in lossy form so they still take part in
    /// prefix matching.
    pub fn build(frame_dir: &Path) -> Result<Self, ReconcileError> {
        let entries = fs::read_dir(frame_dir)
            .map_err(|err| ReconcileError::io("read frame directory", frame_dir, err))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|err| ReconcileError::io("read frame directory", frame_dir, err))?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    let name = raw.to_string_lossy().into_owned();
                    tracing::warn!(name = %name, "frame filename is not valid UTF-8");
                    names.push(name);
                }
            }
        }
        let index = Self::from_names(names);
        if index.is_empty() {
            tracing::warn!(dir = %frame_dir.display(), "frame directory is empty");
        }
        tracing::debug!(dir = %frame_dir.display(), frames = index.len(), "frame index built");
        Ok(index)
    }

    /// Build an index from an in-memory listing.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        Self { names }
    }

    /// Return the single filename starting with `prefix`.
    pub fn resolve(&self, prefix: &str) -> Result<&str, AmbiguousFrameMatch> {
        let matches: Vec<&str> = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|name| name.starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [only] => Ok(*only),
            _ => Err(AmbiguousFrameMatch {
                prefix: prefix.to_string(),
                candidates: matches.iter().map(|name| name.to_string()).collect(),
            }),
        }
    }

    /// Every listed name, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FrameIndex;

    #[test]
    fn resolves_unique_prefix() {
        let index = FrameIndex::from_names([
            "Position_37_001[0.00]_fractions.mrc",
            "Position_37_002[3.00]_fractions.mrc",
            "Position_38_001[0.00]_fractions.mrc",
        ]);
        assert_eq!(
            index.resolve("Position_37_002").expect("resolve"),
            "Position_37_002[3.00]_fractions.mrc"
        );
        assert_eq!(
            index.resolve("Position_38_001").expect("resolve"),
            "Position_38_001[0.00]_fractions.mrc"
        );
    }

    #[test]
    fn shared_prefix_is_ambiguous() {
        let index = FrameIndex::from_names([
            "Position_37_001[0.00]_fractions.mrc",
            "Position_37_001[0.00]_fractions.tif",
        ]);
        let err = index.resolve("Position_37_001").expect_err("ambiguous");
        assert_eq!(err.prefix, "Position_37_001");
        assert_eq!(
            err.candidates,
            vec![
                "Position_37_001[0.00]_fractions.mrc".to_string(),
                "Position_37_001[0.00]_fractions.tif".to_string(),
            ]
        );
    }

    #[test]
    fn missing_prefix_reports_empty_candidates() {
        let index = FrameIndex::from_names(["Position_37_001[0.00]_fractions.mrc"]);
        let err = index.resolve("Position_99_001").expect_err("missing");
        assert!(err.candidates.is_empty());
        assert!(err.to_string().contains("found 0"));
    }

    #[test]
    fn overlapping_prefixes_are_left_to_the_caller() {
        // Position_37_01 is a prefix of both names; a longer prefix is unique.
        let index =
            FrameIndex::from_names(["Position_37_010[0.00].mrc", "Position_37_011[3.00].mrc"]);
        assert!(index.resolve("Position_37_01").is_err());
        assert_eq!(
            index.resolve("Position_37_011").expect("resolve"),
            "Position_37_011[3.00].mrc"
        );
    }

    #[test]
    fn build_lists_directories_too() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Position_37_001[0.00]_fractions.mrc"), b"")
            .expect("write");
        std::fs::create_dir(dir.path().join("Position_37_001_old")).expect("mkdir");
        let index = FrameIndex::build(dir.path()).expect("build");
        assert_eq!(
            index.names(),
            ["Position_37_001[0.00]_fractions.mrc", "Position_37_001_old"]
        );
        let err = index.resolve("Position_37_001").expect_err("ambiguous");
        assert_eq!(err.candidates.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn build_keeps_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("TS_01_001[0.00].mrc"), b"").expect("write");
        let raw = OsStr::from_bytes(b"TS_01_001[0.00]\xff.tif");
        if std::fs::write(dir.path().join(raw), b"").is_err() {
            // Some filesystems reject non UTF-8 names outright.
            return;
        }
        let index = FrameIndex::build(dir.path()).expect("build");
        assert_eq!(index.len(), 2);
        assert!(index.resolve("TS_01_001").is_err());
    }

    #[test]
    fn build_reports_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("frames");
        let err = FrameIndex::build(&missing).expect_err("missing dir");
        assert!(err.to_string().contains("frames"));
    }
}
