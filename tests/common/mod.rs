#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const HEADER: &str = "customer_id,customer_name,customer_address,customer_contact,customer_username,customer_password,account_id,account_type,account_balance";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Writes a CSV with the standard nine-column header followed by `rows`.
    pub fn write_import(&self, name: &str, rows: &[&str]) -> PathBuf {
        let mut contents = String::from(HEADER);
        contents.push('\n');
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        self.write(name, &contents)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("output")
    }

    pub fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.output_dir().join(name)).expect("read output file")
    }
}
