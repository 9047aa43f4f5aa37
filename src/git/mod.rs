//! Git operations abstraction layer
//!
//! The release pipeline talks to version control only through the
//! [Repository] trait, so each operation is an opaque call that either
//! succeeds or fails. Implementations:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: a recording mock for tests
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_release::Result<()> {
//! if repo.pending_changes()?.is_empty() {
//!     repo.create_tag("v1.0.0", "Release v1.0.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{MockCall, MockRepository};
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::PathBuf;

/// Version control operations needed by a release
///
/// All methods return [crate::error::Result<T>]; implementations map their
/// underlying errors (like `git2::Error`) to [crate::error::ReleaseError].
pub trait Repository {
    /// List paths with staged or unstaged changes, untracked files included
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Changed paths relative to the work tree; empty when clean
    /// * `Err` - If the status cannot be read
    fn pending_changes(&self) -> Result<Vec<String>>;

    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(String)` - Short branch name, e.g. "main"
    /// * `Err` - If HEAD is detached or unborn
    fn current_branch(&self) -> Result<String>;

    /// Stage exactly `paths` and create one commit on HEAD
    ///
    /// # Arguments
    /// * `paths` - Files to stage; absolute or relative to the work tree
    /// * `message` - Commit message
    ///
    /// # Returns
    /// * `Ok(String)` - Id of the new commit
    /// * `Err` - If staging or committing fails
    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<String>;

    /// Create an annotated tag on HEAD
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the tag already exists or Git error occurs
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push a local branch to the same name on `remote`
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Push a tag to `remote`
    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;
}
