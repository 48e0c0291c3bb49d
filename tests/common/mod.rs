//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A session directory with `frames/` and `rawdata/` subdirectories.
pub struct Session {
    dir: TempDir,
}

impl Session {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("frames")).expect("create frames dir");
        std::fs::create_dir_all(dir.path().join("rawdata")).expect("create rawdata dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn frames(&self) -> PathBuf {
        self.root().join("frames")
    }

    pub fn rawdata(&self) -> PathBuf {
        self.root().join("rawdata")
    }

    pub fn frame(self, name: &str) -> Self {
        std::fs::write(self.frames().join(name), b"").expect("write frame");
        self
    }

    pub fn mdoc(self, name: &str, text: &str) -> Self {
        std::fs::write(self.rawdata().join(name), text).expect("write mdoc");
        self
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.rawdata().join(name)).expect("read mdoc")
    }

    pub fn exists(&self, name: &str) -> bool {
        self.rawdata().join(name).exists()
    }

    /// Run the binary with `args`, appending `--frames` / `--mdocs` when asked.
    pub fn run(&self, args: &[&str], with_dirs: bool) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_mdoc-subframes"));
        command.args(args).env("RUST_LOG", "warn");
        if with_dirs {
            command
                .arg("--frames")
                .arg(self.frames())
                .arg("--mdocs")
                .arg(self.rawdata());
        }
        command.output().expect("run mdoc-subframes")
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
