use crate::domain::Version;
use crate::error::{ReleaseError, Result};

const VERSION_PLACEHOLDER: &str = "{version}";

/// Commit message template for release commits (e.g. `chore(release): v{version}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTemplate {
    pub template: String,
}

impl CommitTemplate {
    /// Create a template, rejecting ones without a `{version}` placeholder
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(VERSION_PLACEHOLDER) {
            return Err(ReleaseError::config(format!(
                "Commit message template '{}' must contain {{version}}",
                template
            )));
        }
        Ok(CommitTemplate { template })
    }

    /// Render the message for a version
    pub fn render(&self, version: &Version) -> String {
        self.template
            .replace(VERSION_PLACEHOLDER, &version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let template = CommitTemplate::new("chore(release): v{version}").unwrap();
        assert_eq!(
            template.render(&Version::new(0, 1, 0)),
            "chore(release): v0.1.0"
        );
    }

    #[test]
    fn test_render_prerelease() {
        let template = CommitTemplate::new("Release {version}").unwrap();
        let version = Version::new(2, 0, 0).with_prerelease("rc.1");
        assert_eq!(template.render(&version), "Release 2.0.0-rc.1");
    }

    #[test]
    fn test_template_requires_placeholder() {
        let err = CommitTemplate::new("chore: release").unwrap_err();
        assert!(err.to_string().contains("{version}"));
    }
}
