//! Text storage abstraction for the version-bearing files
//!
//! The version file and the manifests are modelled as stores that own their
//! location. Two implementations exist:
//!
//! - [file::FileStore]: the real file, written through a staged temp file
//! - [memory::MemoryStore]: an in-memory stand-in for tests
//!
//! Readers of a store never observe partial content: a write either replaces
//! the whole text after it has been verified, or leaves the old text intact.

pub mod file;
pub mod memory;

pub use file::{FileStore, StagedFile};
pub use memory::MemoryStore;

use crate::error::Result;
use std::path::Path;

/// Read/write contract shared by every version-bearing file
pub trait TextStore {
    /// Where the text lives; used in messages and for staging commits
    fn location(&self) -> &Path;

    /// Read the whole text
    ///
    /// # Returns
    /// * `Ok(Some(text))` - The current content
    /// * `Ok(None)` - If nothing exists at the location
    /// * `Err` - If the content exists but cannot be read
    fn read(&self) -> Result<Option<String>>;

    /// Replace the whole text atomically
    ///
    /// The content is staged first and read back; `verify` receives the text
    /// as read back and must return `true` for the write to be promoted.
    ///
    /// # Returns
    /// * `Ok(())` - The new content is in place
    /// * `Err(WriteVerificationFailed)` - Verification rejected the staged text;
    ///   the old content is untouched
    /// * `Err` - Any I/O failure; the old content is untouched
    fn write_verified(&self, content: &str, verify: &dyn Fn(&str) -> bool) -> Result<()>;
}
