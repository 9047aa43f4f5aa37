use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::path::PathBuf;

/// A mutating call received by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Commit { paths: Vec<PathBuf>, message: String },
    Tag { name: String, message: String },
    PushBranch { remote: String, branch: String },
    PushTag { remote: String, tag: String },
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    pending: Vec<String>,
    branch: String,
    fail_on: Option<&'static str>,
    calls: RefCell<Vec<MockCall>>,
}

impl MockRepository {
    /// Create a clean mock repository on `main`
    pub fn new() -> Self {
        MockRepository {
            pending: Vec::new(),
            branch: "main".to_string(),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Report these paths as pending changes
    pub fn with_pending_changes(mut self, paths: &[&str]) -> Self {
        self.pending = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Set the checked-out branch
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Make one operation fail: "commit", "tag", "push_branch" or "push_tag"
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Mutating calls received so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &str, call: MockCall) -> Result<()> {
        if self.fail_on == Some(operation) {
            return Err(ReleaseError::remote(format!("mock {} failure", operation)));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn pending_changes(&self) -> Result<Vec<String>> {
        Ok(self.pending.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<String> {
        self.record(
            "commit",
            MockCall::Commit {
                paths: paths.to_vec(),
                message: message.to_string(),
            },
        )?;
        Ok(format!("{:040x}", self.calls.borrow().len()))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(
            "tag",
            MockCall::Tag {
                name: name.to_string(),
                message: message.to_string(),
            },
        )
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(
            "push_branch",
            MockCall::PushBranch {
                remote: remote.to_string(),
                branch: branch.to_string(),
            },
        )
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.record(
            "push_tag",
            MockCall::PushTag {
                remote: remote.to_string(),
                tag: tag.to_string(),
            },
        )
    }
}
