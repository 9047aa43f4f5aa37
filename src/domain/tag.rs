use crate::domain::Version;
use crate::error::{ReleaseError, Result};

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Represents a release tag, e.g. `v1.2.3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Tag name for a version: the prefix followed by the version text
    pub fn for_version(prefix: &str, version: &Version) -> Self {
        Tag::new(format!("{}{}", prefix, version))
    }

    /// Annotation message stored on the tag object
    pub fn message(&self) -> String {
        format!("Release {}", self.name)
    }
}

/// Turn an externally supplied release identifier into a version.
///
/// Accepts a bare version (`0.0.5`), a tag (`v0.0.5`) or a full ref
/// (`refs/tags/v0.0.5`) as handed out by CI systems.
pub fn parse_release_ref(input: &str, prefix: &str) -> Result<Version> {
    let trimmed = input.trim();
    let without_ref = trimmed.strip_prefix(TAG_REF_PREFIX).unwrap_or(trimmed);
    let version_part = if prefix.is_empty() {
        without_ref
    } else {
        without_ref.strip_prefix(prefix).unwrap_or(without_ref)
    };

    Version::parse(version_part).map_err(|_| {
        ReleaseError::invalid_format(input, "expected a version, tag or refs/tags/ reference")
    })
}
