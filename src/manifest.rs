//! Version fields embedded in structured manifests.
//!
//! [ManifestPatcher] edits the field textually so comments, ordering and
//! formatting of the rest of the file survive byte for byte.
//! [DelegatingManifest] only reads, to flag manifests that copy the version
//! instead of inheriting it.

use crate::advisory::Advisory;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::store::TextStore;
use regex::Regex;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

/// Rewrites one quoted version assignment inside one `[section]`
pub struct ManifestPatcher<S: TextStore> {
    store: S,
}

impl<S: TextStore> ManifestPatcher<S> {
    pub fn new(store: S) -> Self {
        ManifestPatcher { store }
    }

    pub fn path(&self) -> &Path {
        self.store.location()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_content(&self) -> Result<String> {
        self.store
            .read()?
            .ok_or_else(|| ReleaseError::NotFound(self.path().to_path_buf()))
    }

    /// Read the version assigned to `field` inside `[section]`
    pub fn get(&self, section: &str, field: &str) -> Result<Version> {
        let content = self.read_content()?;
        let span = locate_field(&content, section, field, self.path())?;
        Version::parse(&content[span])
    }

    /// Replace the quoted value of `field` inside `[section]` with `version`
    ///
    /// Only the characters between the quotes change; every other byte of the
    /// manifest is copied verbatim.
    ///
    /// # Returns
    /// * `Ok(())` - The manifest now carries `version`
    /// * `Err(SectionNotFound)` - If `[section]` never appears
    /// * `Err(VersionLineNotFound)` - If `[section]` has no quoted `field` assignment
    /// * `Err(WriteVerificationFailed)` - If the staged file does not carry the new value
    pub fn set(&self, version: &Version, section: &str, field: &str) -> Result<()> {
        let content = self.read_content()?;
        let span = locate_field(&content, section, field, self.path())?;
        let new_value = version.to_string();

        let mut updated = String::with_capacity(content.len() + new_value.len());
        updated.push_str(&content[..span.start]);
        updated.push_str(&new_value);
        updated.push_str(&content[span.end..]);

        let path = self.path();
        self.store.write_verified(&updated, &|written| {
            written == updated
                && locate_field(written, section, field, path)
                    .map(|found| written[found] == new_value)
                    .unwrap_or(false)
        })?;

        debug!(path = %path.display(), section, field, %version, "patched manifest");
        Ok(())
    }
}

/// Byte range of the quoted value of the first `field = "..."` line in `[section]`.
///
/// The section starts at its header and ends at the next header of any kind.
/// Lines continuing a multi-line array or string are neither headers nor fields.
fn locate_field(content: &str, section: &str, field: &str, path: &Path) -> Result<Range<usize>> {
    let header_re = Regex::new(r"^\s*\[\s*([^\[\]]+?)\s*\]")
        .map_err(|e| ReleaseError::config(format!("Invalid header pattern: {}", e)))?;
    let field_re = Regex::new(&format!(r#"^\s*{}\s*=\s*"([^"]*)""#, regex::escape(field)))
        .map_err(|e| ReleaseError::config(format!("Invalid field name '{}': {}", field, e)))?;

    let mut offset = 0;
    let mut section_seen = false;
    let mut in_section = false;
    let mut values = ValueScanner::default();

    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        if values.is_open() {
            values.feed(body);
        } else if body.trim_start().starts_with('[') {
            // [[array]] headers end the section too but never match it
            in_section = header_re
                .captures(body)
                .and_then(|caps| caps.get(1))
                .map(|name| name.as_str() == section)
                .unwrap_or(false);
            section_seen |= in_section;
        } else {
            if in_section {
                if let Some(value) = field_re.captures(body).and_then(|caps| caps.get(1)) {
                    return Ok(offset + value.start()..offset + value.end());
                }
            }
            values.feed(body);
        }

        offset += line.len();
    }

    if section_seen {
        Err(ReleaseError::VersionLineNotFound {
            field: field.to_string(),
            section: section.to_string(),
            path: path.to_path_buf(),
        })
    } else {
        Err(ReleaseError::SectionNotFound {
            section: section.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Tracks values that span lines: open `[` brackets and triple-quoted strings
#[derive(Debug, Default)]
struct ValueScanner {
    depth: usize,
    open_string: Option<&'static str>,
}

impl ValueScanner {
    fn is_open(&self) -> bool {
        self.depth > 0 || self.open_string.is_some()
    }

    fn feed(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if let Some(delim) = self.open_string {
                match line[i..].find(delim) {
                    Some(end) => {
                        i += end + delim.len();
                        self.open_string = None;
                        continue;
                    }
                    None => return,
                }
            }

            match bytes[i] {
                b'#' => return,
                b'[' => self.depth += 1,
                b']' => self.depth = self.depth.saturating_sub(1),
                quote @ (b'"' | b'\'') => {
                    let triple = if quote == b'"' { "\"\"\"" } else { "'''" };
                    if line[i..].starts_with(triple) {
                        self.open_string = Some(triple);
                        i += triple.len();
                        continue;
                    }
                    // single-line string: brackets inside it do not count
                    i += 1;
                    while i < bytes.len() && bytes[i] != quote {
                        if quote == b'"' && bytes[i] == b'\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }
}

/// How a dependent manifest refers to the shared version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delegation {
    /// `version.workspace = true`
    Inherits,
    /// A hard-coded value
    Duplicates(String),
    /// No version field at all
    Absent,
}

/// Read-only view of a manifest expected to inherit the shared version
pub struct DelegatingManifest<S: TextStore> {
    store: S,
    section: String,
    field: String,
}

impl<S: TextStore> DelegatingManifest<S> {
    pub fn new(store: S, section: impl Into<String>, field: impl Into<String>) -> Self {
        DelegatingManifest {
            store,
            section: section.into(),
            field: field.into(),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.location()
    }

    /// Determine how the manifest declares its version
    pub fn inspect(&self) -> Result<Delegation> {
        let content = self
            .store
            .read()?
            .ok_or_else(|| ReleaseError::NotFound(self.path().to_path_buf()))?;
        let document = content.parse::<toml::Table>().map_err(|e| {
            ReleaseError::config(format!("{}: {}", self.path().display(), e.message()))
        })?;

        let mut table = &document;
        for key in self.section.split('.') {
            match table.get(key) {
                Some(toml::Value::Table(inner)) => table = inner,
                _ => return Ok(Delegation::Absent),
            }
        }

        let delegation = match table.get(&self.field) {
            None => Delegation::Absent,
            Some(toml::Value::Table(inner))
                if inner.get("workspace") == Some(&toml::Value::Boolean(true)) =>
            {
                Delegation::Inherits
            }
            Some(toml::Value::String(value)) => Delegation::Duplicates(value.clone()),
            Some(other) => Delegation::Duplicates(other.to_string()),
        };
        Ok(delegation)
    }

    /// Advisory for this manifest, if its state warrants one
    pub fn advisory(&self) -> Option<Advisory> {
        match self.inspect() {
            Ok(Delegation::Inherits) | Ok(Delegation::Absent) => None,
            Ok(Delegation::Duplicates(value)) => Some(Advisory::DuplicatedVersion {
                path: self.path().to_path_buf(),
                value,
            }),
            Err(e) => Some(Advisory::UnreadableManifest {
                path: self.path().to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}
