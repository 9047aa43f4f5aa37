use crate::error::{ReleaseError, Result};
use crate::store::TextStore;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// In-memory store with the same contract as [super::FileStore]
///
/// Used by unit tests and the orchestrator tests so no filesystem is needed.
#[derive(Debug)]
pub struct MemoryStore {
    location: PathBuf,
    content: RefCell<Option<String>>,
    corrupt_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    /// Create a store holding `content` at a nominal location
    pub fn new(location: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        MemoryStore {
            location: location.into(),
            content: RefCell::new(Some(content.into())),
            corrupt_writes: Cell::new(false),
            writes: Cell::new(0),
        }
    }

    /// Create a store with nothing at its location
    pub fn missing(location: impl Into<PathBuf>) -> Self {
        MemoryStore {
            location: location.into(),
            content: RefCell::new(None),
            corrupt_writes: Cell::new(false),
            writes: Cell::new(0),
        }
    }

    /// Make every following write read back damaged content
    pub fn corrupt_writes(self) -> Self {
        self.corrupt_writes.set(true);
        self
    }

    /// Current content, if any
    pub fn content(&self) -> Option<String> {
        self.content.borrow().clone()
    }

    /// Number of writes that were promoted
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl TextStore for MemoryStore {
    fn location(&self) -> &Path {
        &self.location
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(self.content.borrow().clone())
    }

    fn write_verified(&self, content: &str, verify: &dyn Fn(&str) -> bool) -> Result<()> {
        let staged = if self.corrupt_writes.get() {
            // simulate a short write
            let keep = content.chars().count() / 2;
            content.chars().take(keep).collect()
        } else {
            content.to_string()
        };

        if !verify(&staged) {
            return Err(ReleaseError::WriteVerificationFailed(self.location.clone()));
        }

        *self.content.borrow_mut() = Some(staged);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new("VERSION", "0.0.6\n");
        store.write_verified("0.0.7\n", &|s| s == "0.0.7\n").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("0.0.7\n"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_memory_store_missing() {
        let store = MemoryStore::missing("VERSION");
        assert_eq!(store.read().unwrap(), None);
        assert_eq!(store.location(), Path::new("VERSION"));
    }

    #[test]
    fn test_memory_store_corrupt_write_is_rejected() {
        let store = MemoryStore::new("VERSION", "0.0.6\n").corrupt_writes();
        let err = store
            .write_verified("0.0.7\n", &|s| s == "0.0.7\n")
            .unwrap_err();
        assert!(matches!(err, ReleaseError::WriteVerificationFailed(_)));
        assert_eq!(store.content().as_deref(), Some("0.0.6\n"));
        assert_eq!(store.write_count(), 0);
    }
}
