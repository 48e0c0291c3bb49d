use super::{load_config, resolve, Switches, DEFAULT_EXTENSION, DEFAULT_MARKER};
use crate::cli::DirArgs;
use std::path::PathBuf;

fn write_file(path: &std::path::Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents.as_bytes()).expect("write file");
}

#[test]
fn flags_alone_use_defaults() {
    let dirs = DirArgs {
        frames: Some(PathBuf::from("frames")),
        mdocs: Some(PathBuf::from("rawdata")),
        ..DirArgs::default()
    };
    let config = resolve(&dirs, Switches::default()).expect("resolve");
    assert_eq!(config.frames_dir, Some(PathBuf::from("frames")));
    assert_eq!(config.mdoc_dir, PathBuf::from("rawdata"));
    assert_eq!(config.extension, DEFAULT_EXTENSION);
    assert_eq!(config.renamed_marker, DEFAULT_MARKER);
    assert!(!config.overwrite && !config.strict && !config.dry_run);
}

#[test]
fn missing_mdoc_dir_is_an_error() {
    let err = resolve(&DirArgs::default(), Switches::default()).expect_err("no mdocs");
    assert!(err.to_string().contains("mdoc directory is required"));
}

#[test]
fn file_values_resolve_relative_to_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session/config.json");
    write_file(
        &path,
        r#"{"frames_dir": "frames", "mdoc_dir": "rawdata", "extension": ".mdoc", "strict": true}"#,
    );
    let config = load_config(&path).expect("load");
    assert_eq!(config.frames_dir, Some(dir.path().join("session/frames")));

    let dirs = DirArgs {
        config: Some(path),
        marker: Some("_fixed".to_string()),
        ..DirArgs::default()
    };
    let resolved = resolve(&dirs, Switches::default()).expect("resolve");
    assert_eq!(resolved.mdoc_dir, dir.path().join("session/rawdata"));
    assert_eq!(resolved.extension, "mdoc");
    assert_eq!(resolved.renamed_marker, "_fixed");
    assert!(resolved.strict);
}

#[test]
fn flags_override_file_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    write_file(&path, r#"{"frames_dir": "frames", "mdoc_dir": "rawdata"}"#);
    let dirs = DirArgs {
        config: Some(path),
        frames: Some(PathBuf::from("/data/frames")),
        ..DirArgs::default()
    };
    let resolved = resolve(&dirs, Switches::default()).expect("resolve");
    assert_eq!(resolved.frames_dir, Some(PathBuf::from("/data/frames")));
    assert_eq!(resolved.mdoc_dir, dir.path().join("rawdata"));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    write_file(&path, r#"{"frame_dir": "frames"}"#);
    let err = load_config(&path).expect_err("unknown key");
    assert!(format!("{err:#}").contains("frame_dir"));
}

#[test]
fn marker_with_separator_is_rejected() {
    let dirs = DirArgs {
        mdocs: Some(PathBuf::from("rawdata")),
        marker: Some("/renamed".to_string()),
        ..DirArgs::default()
    };
    let err = resolve(&dirs, Switches::default()).expect_err("bad marker");
    assert!(err.to_string().contains("renamed_marker"));
}

#[test]
fn rename_requires_frames_dir() {
    let dirs = DirArgs {
        mdocs: Some(PathBuf::from("rawdata")),
        ..DirArgs::default()
    };
    let config = resolve(&dirs, Switches::default()).expect("resolve");
    assert!(config.require_frames_dir().is_err());
}
