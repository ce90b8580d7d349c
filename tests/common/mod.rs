#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const LEADS_HEADER: &str =
    "Lead Name,Phone Number,Calls Attempted,Calls Connected,WA Sent,WA Received";

/// Four leads matching the worked example: one call-only connection, one
/// WhatsApp-only connection, one WhatsApp attempt only, one untouched lead.
pub const LEADS_CSV: &str = "\
Lead Name,Phone Number,Calls Attempted,Calls Connected,WA Sent,WA Received
Asha,555-1,1,1,1,0
Bilal,555-1,1,0,1,1
Chen,555-2,0,0,1,0
Dana,555-3,0,0,0,0
";

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
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes raw `bytes` into a file under the workspace and returns the path.
    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(bytes).expect("write temp file bytes");
        path
    }
}

/// Pulls the count for `label` out of rendered table output.
pub fn table_count(output: &str, label: &str) -> Option<usize> {
    output.lines().find_map(|line| {
        let trimmed = line.trim_start();
        let rest = trimmed.strip_prefix(label)?;
        let count = rest.trim();
        if count.chars().all(|c| c.is_ascii_digit()) && !count.is_empty() {
            count.parse().ok()
        } else {
            None
        }
    })
}
