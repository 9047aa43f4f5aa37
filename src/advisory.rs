use std::fmt;
use std::path::PathBuf;

/// Non-fatal findings raised while checking or releasing.
/// These are reported to the user but never change the exit code.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// An explicit version orders below the current one
    Downgrade { from: String, to: String },
    /// The lock file could not be regenerated
    DependencySyncFailed { reason: String },
    /// A delegating manifest hard-codes a version instead of inheriting it
    DuplicatedVersion { path: PathBuf, value: String },
    /// A delegating manifest could not be read or parsed
    UnreadableManifest { path: PathBuf, reason: String },
}

impl Advisory {
    /// Stable name of the advisory kind
    pub fn kind(&self) -> &'static str {
        match self {
            Advisory::Downgrade { .. } => "DowngradeWarning",
            Advisory::DependencySyncFailed { .. } => "DependencySyncFailed",
            Advisory::DuplicatedVersion { .. } => "DuplicatedVersion",
            Advisory::UnreadableManifest { .. } => "UnreadableManifest",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Downgrade { from, to } => {
                write!(f, "New version {} is lower than current version {}", to, from)
            }
            Advisory::DependencySyncFailed { reason } => {
                write!(f, "Lock file was not regenerated: {}", reason)
            }
            Advisory::DuplicatedVersion { path, value } => write!(
                f,
                "{} sets its own version '{}' instead of inheriting the shared one",
                path.display(),
                value
            ),
            Advisory::UnreadableManifest { path, reason } => {
                write!(f, "Cannot inspect {}: {}", path.display(), reason)
            }
        }
    }
}
