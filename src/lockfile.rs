//! Dependency lock file regeneration after a version change.

use crate::error::{ReleaseError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Regenerates the dependency lock artifact so it reflects the new version
pub trait LockRegenerator {
    /// Human readable description for reports, e.g. the command line
    fn describe(&self) -> String;

    /// Run the regeneration in `root`
    ///
    /// # Returns
    /// * `Ok(Some(path))` - The lock file that should be committed
    /// * `Ok(None)` - Regeneration is disabled or produced no lock file
    /// * `Err` - If the regeneration could not run or failed
    fn regenerate(&self, root: &Path) -> Result<Option<PathBuf>>;
}

/// Runs an external command, by default `cargo update --workspace`
pub struct CommandRegenerator {
    command: Vec<String>,
    lock_path: PathBuf,
}

impl CommandRegenerator {
    /// # Arguments
    /// * `command` - Program and arguments; empty disables regeneration
    /// * `lock_path` - Lock file produced by the command, relative to the root
    pub fn new(command: Vec<String>, lock_path: impl Into<PathBuf>) -> Self {
        CommandRegenerator {
            command,
            lock_path: lock_path.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.command.is_empty()
    }
}

impl LockRegenerator for CommandRegenerator {
    fn describe(&self) -> String {
        if self.is_enabled() {
            self.command.join(" ")
        } else {
            "disabled".to_string()
        }
    }

    fn regenerate(&self, root: &Path) -> Result<Option<PathBuf>> {
        let Some((program, args)) = self.command.split_first() else {
            return Ok(None);
        };

        debug!(command = %self.describe(), root = %root.display(), "regenerating lock file");

        let output = Command::new(program)
            .args(args)
            .current_dir(root)
            .output()
            .map_err(|e| ReleaseError::lockfile(format!("Failed to run '{}': {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::lockfile(format!(
                "'{}' exited with code {}: {}",
                self.describe(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        let lock = root.join(&self.lock_path);
        Ok(lock.exists().then_some(lock))
    }
}
