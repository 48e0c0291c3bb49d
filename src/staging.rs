//! All-or-nothing output writes.
//!
//! Contents are written to a temporary file next to the destination and renamed
//! into place, so a failed write never leaves a partial output behind.
use crate::error::ReconcileError;
use std::io::Write;
use std::path::Path;

/// Write `contents` to `dest`. Fails with `OutputExists` when `dest` exists and
/// `overwrite` is false.
pub fn publish_bytes(
    dest: &Path,
    contents: &[u8],
    overwrite: bool,
) -> Result<(), ReconcileError> {
    if !overwrite && dest.exists() {
        return Err(ReconcileError::OutputExists {
            path: dest.to_path_buf(),
        });
    }
    let parent = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .map_err(|err| ReconcileError::io("stage", dest, err))?;
    staged
        .write_all(contents)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|err| ReconcileError::io("write", dest, err))?;
    if overwrite {
        staged
            .persist(dest)
            .map_err(|err| ReconcileError::io("publish", dest, err.error))?;
    } else {
        staged.persist_noclobber(dest).map_err(|err| {
            if err.error.kind() == std::io::ErrorKind::AlreadyExists {
                ReconcileError::OutputExists {
                    path: dest.to_path_buf(),
                }
            } else {
                ReconcileError::io("publish", dest, err.error)
            }
        })?;
    }
    Ok(())
}
