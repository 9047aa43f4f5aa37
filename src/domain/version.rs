use crate::advisory::Advisory;
use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Equality is textual (prerelease included); ordering through [`compare`]
/// looks at the numeric core only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

impl Version {
    /// Create a new release version (no prerelease)
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Attach a prerelease tag, e.g. `beta.1`
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Parse `MAJOR.MINOR.PATCH[-PRERELEASE]`
    ///
    /// The three numeric components must be plain decimal integers without
    /// leading zeros or sign. The prerelease, if present, must be non-empty and
    /// drawn from `[A-Za-z0-9.-]`.
    pub fn parse(text: &str) -> Result<Self> {
        let (core, prerelease) = match text.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (text, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::invalid_format(
                text,
                "expected MAJOR.MINOR.PATCH",
            ));
        }

        let major = parse_component(text, "major", parts[0])?;
        let minor = parse_component(text, "minor", parts[1])?;
        let patch = parse_component(text, "patch", parts[2])?;

        let prerelease = match prerelease {
            None => None,
            Some(pre) if is_valid_prerelease(pre) => Some(pre.to_string()),
            Some(pre) => {
                return Err(ReleaseError::invalid_format(
                    text,
                    format!("invalid prerelease '{}'", pre),
                ))
            }
        };

        Ok(Version {
            major,
            minor,
            patch,
            prerelease,
        })
    }

    /// Whether this version carries a prerelease tag
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Bump version according to bump kind
    pub fn bump(&self, kind: &BumpKind) -> Result<Bump> {
        let overflow =
            || ReleaseError::invalid_format(self.to_string(), "version component overflow");

        let next = match kind {
            BumpKind::Major => Version::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            BumpKind::Minor => Version::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            BumpKind::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
            BumpKind::Explicit(text) => Version::parse(text)?,
        };

        Ok(Bump {
            from: self.clone(),
            to: next,
        })
    }
}

fn parse_component(text: &str, name: &str, part: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReleaseError::invalid_format(
            text,
            format!(
                "{} component '{}' is not a non-negative integer",
                name, part
            ),
        ));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(ReleaseError::invalid_format(
            text,
            format!("{} component '{}' has a leading zero", name, part),
        ));
    }
    part.parse::<u64>().map_err(|_| {
        ReleaseError::invalid_format(text, format!("{} component '{}' is too large", name, part))
    })
}

fn is_valid_prerelease(pre: &str) -> bool {
    !pre.is_empty()
        && pre
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Compare two versions by major, then minor, then patch.
///
/// The prerelease tag takes no part in the ordering: `1.2.3-rc.1` and `1.2.3`
/// compare `Equal`. Release tooling relies on this, so keep it.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch).cmp(&(b.major, b.minor, b.patch))
}

/// Requested version change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    /// Set an exact version, which may be lower than the current one
    Explicit(String),
}

impl FromStr for BumpKind {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            other => {
                // Validate early so bad input never reaches a writer
                Version::parse(other)?;
                Ok(BumpKind::Explicit(other.to_string()))
            }
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpKind::Major => write!(f, "major"),
            BumpKind::Minor => write!(f, "minor"),
            BumpKind::Patch => write!(f, "patch"),
            BumpKind::Explicit(v) => write!(f, "{}", v),
        }
    }
}

/// Outcome of a version bump decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bump {
    pub from: Version,
    pub to: Version,
}

impl Bump {
    /// True when the new version orders below the current one
    pub fn is_downgrade(&self) -> bool {
        compare(&self.to, &self.from) == Ordering::Less
    }

    /// The non-fatal warning the caller must surface, if any
    pub fn advisory(&self) -> Option<Advisory> {
        self.is_downgrade().then(|| Advisory::Downgrade {
            from: self.from.to_string(),
            to: self.to.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let version = v("1.2.3");
        assert_eq!(version, Version::new(1, 2, 3));
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_version_parse_prerelease() {
        let version = v("1.2.3-beta.1");
        assert_eq!(version, Version::new(1, 2, 3).with_prerelease("beta.1"));
    }

    #[test]
    fn test_version_parse_prerelease_with_hyphens() {
        let version = v("0.1.0-rc-2.build-7");
        assert_eq!(version.prerelease.as_deref(), Some("rc-2.build-7"));
    }

    #[test]
    fn test_version_parse_invalid() {
        for bad in [
            "", "abc", "1.2", "1.2.3.4", "v1.2.3", "1.2.x", "-1.2.3", "1.2.3-", "1.2.3-beta_1",
            "1.2.3-ß", "01.2.3", " 1.2.3", "1..3",
        ] {
            let err = Version::parse(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat, "input {:?}", bad);
        }
    }

    #[test]
    fn test_version_format_roundtrip() {
        for text in [
            "0.0.0",
            "0.0.6",
            "1.2.3",
            "10.20.30",
            "1.0.0-alpha",
            "2.0.0-rc.1",
            "3.1.4-x-y.z",
        ] {
            assert_eq!(v(text).to_string(), text);
        }
    }

    #[test]
    fn test_compare_numeric_order() {
        assert_eq!(compare(&v("1.2.3"), &v("1.2.4")), Ordering::Less);
        assert_eq!(compare(&v("1.10.0"), &v("1.9.9")), Ordering::Greater);
        assert_eq!(compare(&v("2.0.0"), &v("1.99.99")), Ordering::Greater);
        assert_eq!(compare(&v("1.2.3"), &v("1.2.3")), Ordering::Equal);
    }

    #[test]
    fn test_compare_ignores_prerelease() {
        assert_eq!(compare(&v("1.2.3-alpha"), &v("1.2.3")), Ordering::Equal);
        assert_eq!(
            compare(&v("1.2.3-alpha"), &v("1.2.3-beta")),
            Ordering::Equal
        );
        // equality still sees the prerelease
        assert_ne!(v("1.2.3-alpha"), v("1.2.3"));
    }

    #[test]
    fn test_version_bump_patch_drops_prerelease() {
        let bump = v("1.2.3-beta").bump(&BumpKind::Patch).unwrap();
        assert_eq!(bump.to.to_string(), "1.2.4");
        assert!(bump.advisory().is_none());
    }

    #[test]
    fn test_version_bump_minor() {
        let bump = v("1.2.3").bump(&BumpKind::Minor).unwrap();
        assert_eq!(bump.to.to_string(), "1.3.0");
    }

    #[test]
    fn test_version_bump_major() {
        let bump = v("1.2.3-rc.1").bump(&BumpKind::Major).unwrap();
        assert_eq!(bump.to.to_string(), "2.0.0");
    }

    #[test]
    fn test_explicit_downgrade_warns_but_succeeds() {
        let bump = v("1.2.3")
            .bump(&BumpKind::Explicit("1.0.0".to_string()))
            .unwrap();
        assert_eq!(bump.to.to_string(), "1.0.0");
        assert!(bump.is_downgrade());
        assert_eq!(
            bump.advisory(),
            Some(Advisory::Downgrade {
                from: "1.2.3".to_string(),
                to: "1.0.0".to_string(),
            })
        );
    }

    #[test]
    fn test_explicit_same_core_is_not_downgrade() {
        let bump = v("1.2.3")
            .bump(&BumpKind::Explicit("1.2.3-rc.1".to_string()))
            .unwrap();
        assert!(!bump.is_downgrade());
    }

    #[test]
    fn test_explicit_malformed_fails() {
        let err = v("1.2.3")
            .bump(&BumpKind::Explicit("abc".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_bump_overflow_is_an_error() {
        let err = Version::new(1, 2, u64::MAX).bump(&BumpKind::Patch).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_bump_kind_from_str() {
        assert_eq!("patch".parse::<BumpKind>().unwrap(), BumpKind::Patch);
        assert_eq!("minor".parse::<BumpKind>().unwrap(), BumpKind::Minor);
        assert_eq!("major".parse::<BumpKind>().unwrap(), BumpKind::Major);
        assert_eq!(
            "2.0.0-rc.1".parse::<BumpKind>().unwrap(),
            BumpKind::Explicit("2.0.0-rc.1".to_string())
        );
        assert!("Patch".parse::<BumpKind>().is_err());
        assert!("abc".parse::<BumpKind>().is_err());
    }
}
