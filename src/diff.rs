use std::process::Command;

use tracing::{debug, error};

use crate::contract::{DiffError, DiffSource};

/// Retrieves diff text from git: either the staged changes or a diff against
/// a base reference.
pub struct GitDiffSource {
    base: String,
    staged: bool,
}

impl GitDiffSource {
    pub fn new(base: impl Into<String>, staged: bool) -> Self {
        Self {
            base: base.into(),
            staged,
        }
    }
}

impl DiffSource for GitDiffSource {
    fn diff(&self) -> Result<String, DiffError> {
        let mut cmd = Command::new("git");
        if self.staged {
            cmd.args(["diff", "--cached"]);
        } else {
            cmd.arg("diff").arg(&self.base);
        }
        debug!(base = %self.base, staged = self.staged, "Invoking git diff");

        let output = cmd.output().map_err(|e| {
            error!(error = ?e, "Failed to launch git process");
            format!("Failed to get git diff: {e}")
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                status = ?output.status,
                stderr = %stderr,
                "Git diff exited with non-zero code"
            );
            return Err(format!("Failed to get git diff: {}", stderr.trim()).into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
