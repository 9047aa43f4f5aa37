use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Stage;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version format: '{input}' ({reason})")]
    InvalidFormat { input: String, reason: String },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Section [{section}] not found in {}", path.display())]
    SectionNotFound { section: String, path: PathBuf },

    #[error("No '{field}' assignment inside [{section}] in {}", path.display())]
    VersionLineNotFound {
        field: String,
        section: String,
        path: PathBuf,
    },

    #[error("Write verification failed for {}: content read back does not match", .0.display())]
    WriteVerificationFailed(PathBuf),

    #[error("Working tree has {} pending change(s): {}", .0.len(), .0.join(", "))]
    DirtyWorkingTree(Vec<String>),

    #[error("Version mismatch ({pair}): {left} != {right}")]
    Mismatch {
        pair: String,
        left: String,
        right: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Lock file regeneration failed: {0}")]
    Lockfile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<ReleaseError>,
    },
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Stable name of an error kind, independent of the stage it surfaced in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidFormat,
    NotFound,
    SectionNotFound,
    VersionLineNotFound,
    WriteVerificationFailed,
    DirtyWorkingTree,
    Mismatch,
    Config,
    Vcs,
    DependencySync,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidFormat => "InvalidFormat",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::SectionNotFound => "SectionNotFound",
            ErrorKind::VersionLineNotFound => "VersionLineNotFound",
            ErrorKind::WriteVerificationFailed => "WriteVerificationFailed",
            ErrorKind::DirtyWorkingTree => "DirtyWorkingTree",
            ErrorKind::Mismatch => "Mismatch",
            ErrorKind::Config => "Config",
            ErrorKind::Vcs => "Vcs",
            ErrorKind::DependencySync => "DependencySyncFailed",
            ErrorKind::Io => "Io",
        };
        f.write_str(name)
    }
}

impl ReleaseError {
    /// Create an invalid format error for the given input
    pub fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::InvalidFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create a lock file error with context
    pub fn lockfile(msg: impl Into<String>) -> Self {
        ReleaseError::Lockfile(msg.into())
    }

    /// Attribute this error to a pipeline stage. Already attributed errors keep their stage.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            ReleaseError::Stage { .. } => self,
            other => ReleaseError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ReleaseError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The kind of the underlying failure, looking through stage attribution
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReleaseError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            ReleaseError::NotFound(_) => ErrorKind::NotFound,
            ReleaseError::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            ReleaseError::VersionLineNotFound { .. } => ErrorKind::VersionLineNotFound,
            ReleaseError::WriteVerificationFailed(_) => ErrorKind::WriteVerificationFailed,
            ReleaseError::DirtyWorkingTree(_) => ErrorKind::DirtyWorkingTree,
            ReleaseError::Mismatch { .. } => ErrorKind::Mismatch,
            ReleaseError::Config(_) => ErrorKind::Config,
            ReleaseError::Git(_) | ReleaseError::Remote(_) => ErrorKind::Vcs,
            ReleaseError::Lockfile(_) => ErrorKind::DependencySync,
            ReleaseError::Io(_) => ErrorKind::Io,
            ReleaseError::Stage { source, .. } => source.kind(),
        }
    }
}

/// Attach a stage to the error side of a `Result`
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T>;
}

impl<T> StageContext<T> for Result<T> {
    fn stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| e.in_stage(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("missing manifest path");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing manifest path"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_invalid_format_mentions_input() {
        let err = ReleaseError::invalid_format("abc", "expected MAJOR.MINOR.PATCH");
        let msg = err.to_string();
        assert!(msg.contains("'abc'"));
        assert!(msg.contains("MAJOR.MINOR.PATCH"));
    }

    #[test]
    fn test_dirty_tree_lists_files() {
        let err = ReleaseError::DirtyWorkingTree(vec!["src/lib.rs".into(), "README.md".into()]);
        let msg = err.to_string();
        assert!(msg.contains("2 pending change(s)"));
        assert!(msg.contains("src/lib.rs, README.md"));
    }

    #[test]
    fn test_stage_attribution_keeps_kind() {
        let err = ReleaseError::WriteVerificationFailed(PathBuf::from("VERSION"))
            .in_stage(Stage::BumpVersion);

        assert_eq!(err.stage(), Some(Stage::BumpVersion));
        assert_eq!(err.kind(), ErrorKind::WriteVerificationFailed);
        assert!(err.to_string().starts_with("BumpVersion failed:"));
    }

    #[test]
    fn test_stage_attribution_is_not_overwritten() {
        let err = ReleaseError::remote("rejected")
            .in_stage(Stage::PushRemote)
            .in_stage(Stage::CreateTag);
        assert_eq!(err.stage(), Some(Stage::PushRemote));
    }

    #[test]
    fn test_stage_context_on_result() {
        let result: Result<()> = Err(ReleaseError::DirtyWorkingTree(vec!["a".into()]));
        let err = result.stage(Stage::CheckCleanWorkingTree).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::CheckCleanWorkingTree));
        assert_eq!(err.kind(), ErrorKind::DirtyWorkingTree);
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(ErrorKind::InvalidFormat.to_string(), "InvalidFormat");
        assert_eq!(
            ErrorKind::DependencySync.to_string(),
            "DependencySyncFailed"
        );
    }
}
