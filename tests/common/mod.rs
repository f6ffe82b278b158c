use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temp directory holding a scripted stand-in for getent.
pub struct FakeGetent {
    temp_dir: TempDir,
}

impl FakeGetent {
    /// Script that prints `stdout` and exits with `exit_code`.
    pub fn new(stdout: &str, exit_code: i32) -> Result<Self> {
        let body = [
            "dir=$(dirname \"$0\")".to_string(),
            "printf '%s\\n' \"$@\" > \"$dir/args.txt\"".to_string(),
            "cat \"$dir/stdout.txt\"".to_string(),
            format!("exit {exit_code}"),
        ]
        .join("\n");
        Self::with_body(stdout, &body)
    }

    /// Script that kills itself instead of exiting.
    pub fn killed_by_signal() -> Result<Self> {
        Self::with_body("", "kill -9 $$\n")
    }

    fn with_body(stdout: &str, body: &str) -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        fs::write(temp_dir.path().join("stdout.txt"), stdout)?;

        let script = temp_dir.path().join("getent");
        fs::write(&script, format!("#!/bin/sh\n{body}"))?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

        Ok(Self { temp_dir })
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn program(&self) -> PathBuf {
        self.dir().join("getent")
    }

    /// Arguments the script received, or `None` if it never ran.
    pub fn recorded_args(&self) -> Option<Vec<String>> {
        let content = fs::read_to_string(self.dir().join("args.txt")).ok()?;
        Some(content.lines().map(str::to_string).collect())
    }
}
