//! The canonical version file: one trimmed line, sole source of truth.

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::store::TextStore;
use std::path::Path;
use tracing::debug;

/// Reads and writes the canonical version file through a [TextStore]
pub struct VersionStore<S: TextStore> {
    store: S,
}

impl<S: TextStore> VersionStore<S> {
    pub fn new(store: S) -> Self {
        VersionStore { store }
    }

    pub fn path(&self) -> &Path {
        self.store.location()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read, trim and parse the current version
    ///
    /// # Returns
    /// * `Ok(Version)` - The canonical version
    /// * `Err(NotFound)` - If the file does not exist
    /// * `Err(InvalidFormat)` - If the content is not a version
    pub fn get(&self) -> Result<Version> {
        let content = self
            .store
            .read()?
            .ok_or_else(|| ReleaseError::NotFound(self.path().to_path_buf()))?;
        Version::parse(content.trim())
    }

    /// Replace the file with the textual form of `version` and a newline
    pub fn set(&self, version: &Version) -> Result<()> {
        let content = format!("{}\n", version);
        self.store
            .write_verified(&content, &|written| written == content)?;
        debug!(path = %self.path().display(), %version, "wrote version file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryStore;

    #[test]
    fn test_get_non_utf8_file_is_invalid_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        std::fs::write(&path, b"\xff0.0.6\n").unwrap();

        let store = VersionStore::new(crate::store::FileStore::new(&path));
        assert_eq!(store.get().unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_get_trims_whitespace() {
        let store = VersionStore::new(MemoryStore::new("VERSION", "  0.0.6 \n\n"));
        assert_eq!(store.get().unwrap(), Version::new(0, 0, 6));
    }

    #[test]
    fn test_get_missing_file() {
        let store = VersionStore::new(MemoryStore::missing("VERSION"));
        assert_eq!(store.get().unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_get_garbage() {
        let store = VersionStore::new(MemoryStore::new("VERSION", "latest\n"));
        assert_eq!(store.get().unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_set_writes_single_line() {
        let store = VersionStore::new(MemoryStore::new("VERSION", "0.0.6\n"));
        store
            .set(&Version::new(0, 1, 0).with_prerelease("rc.1"))
            .unwrap();
        assert_eq!(store.store().content().as_deref(), Some("0.1.0-rc.1\n"));
        assert_eq!(store.get().unwrap().to_string(), "0.1.0-rc.1");
    }

    #[test]
    fn test_set_verification_failure() {
        let store = VersionStore::new(MemoryStore::new("VERSION", "0.0.6\n").corrupt_writes());
        let err = store.set(&Version::new(0, 0, 7)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteVerificationFailed);
        assert_eq!(store.get().unwrap(), Version::new(0, 0, 6));
    }
}
