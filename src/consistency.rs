//! Cross-file version consistency.
//!
//! Pure comparison of already-read values; reading the files is the caller's job.

use crate::advisory::Advisory;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};

pub const CANONICAL_VS_MANIFEST: &str = "canonical/manifest";
pub const CANONICAL_VS_RELEASE: &str = "canonical/expected-release";

/// Outcome of one pairwise comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub pair: String,
    pub left: String,
    pub right: String,
    pub passed: bool,
}

impl Comparison {
    fn new(pair: &str, left: &Version, right: &Version) -> Self {
        Comparison {
            pair: pair.to_string(),
            left: left.to_string(),
            right: right.to_string(),
            passed: left == right,
        }
    }
}

/// Per-pair results plus advisories
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub comparisons: Vec<Comparison>,
    pub advisories: Vec<Advisory>,
}

impl Report {
    /// True iff every comparison passed; advisories never fail a report
    pub fn passed(&self) -> bool {
        self.comparisons.iter().all(|c| c.passed)
    }

    /// Comparisons that failed
    pub fn mismatches(&self) -> impl Iterator<Item = &Comparison> {
        self.comparisons.iter().filter(|c| !c.passed)
    }

    /// Turn the first failed comparison into a `Mismatch` error
    pub fn ensure_consistent(&self) -> Result<()> {
        match self.mismatches().next() {
            None => Ok(()),
            Some(c) => Err(ReleaseError::Mismatch {
                pair: c.pair.clone(),
                left: c.left.clone(),
                right: c.right.clone(),
            }),
        }
    }
}

/// Compare the canonical version against the manifest and, when given, the
/// expected release version.
///
/// Versions are equal only if their full text is equal, prerelease included.
pub fn check(
    canonical: &Version,
    manifest: &Version,
    expected_release: Option<&Version>,
    advisories: Vec<Advisory>,
) -> Report {
    let mut comparisons = vec![Comparison::new(CANONICAL_VS_MANIFEST, canonical, manifest)];

    if let Some(expected) = expected_release {
        comparisons.push(Comparison::new(CANONICAL_VS_RELEASE, canonical, expected));
    }

    Report {
        comparisons,
        advisories,
    }
}
