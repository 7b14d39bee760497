#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";

/// Scratch data directory for one test
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_file(&self, rel_path: &str) -> std::io::Result<String> {
        fs::read_to_string(self.dir.path().join(rel_path))
    }

    /// Command with no login, pointed at this data directory
    pub fn cmd(&self) -> Command {
        let mut cmd = taskmgr_cmd();
        cmd.env("TASKMGR_DIR", self.path());
        cmd
    }

    /// Command logged in as `user`
    pub fn cmd_as(&self, user: &str, password: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("TASKMGR_USER", user)
            .env("TASKMGR_PASSWORD", password);
        cmd
    }

    pub fn admin(&self) -> Command {
        self.cmd_as(ADMIN, ADMIN_PASSWORD)
    }
}

pub fn taskmgr_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskmgr").expect("binary");
    cmd.env_remove("TASKMGR_DIR")
        .env_remove("TASKMGR_USER")
        .env_remove("TASKMGR_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

pub fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("valid json on stdout")
}
