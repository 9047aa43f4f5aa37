//! The set of version-bearing files of one repository.

use crate::advisory::Advisory;
use crate::config::FilesConfig;
use crate::consistency::{self, Report};
use crate::domain::{Bump, BumpKind, Version};
use crate::error::Result;
use crate::manifest::{DelegatingManifest, ManifestPatcher};
use crate::store::{FileStore, TextStore};
use crate::version_file::VersionStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Canonical version file, manifest field and delegating manifests, each
/// backed by its own store
pub struct Project<S: TextStore> {
    root: PathBuf,
    canonical: VersionStore<S>,
    manifest: ManifestPatcher<S>,
    section: String,
    field: String,
    delegating: Vec<DelegatingManifest<S>>,
}

impl Project<FileStore> {
    /// Open the files named by `files` under `root`
    pub fn open(root: &Path, files: &FilesConfig) -> Self {
        let mut project = Project::new(
            root,
            FileStore::new(root.join(&files.version_file)),
            FileStore::new(root.join(&files.manifest)),
            &files.manifest_section,
            &files.version_field,
        );
        for path in &files.delegating_manifests {
            project = project.with_delegating(
                FileStore::new(root.join(path)),
                &files.delegating_section,
            );
        }
        project
    }
}

impl<S: TextStore> Project<S> {
    pub fn new(
        root: impl Into<PathBuf>,
        canonical: S,
        manifest: S,
        section: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Project {
            root: root.into(),
            canonical: VersionStore::new(canonical),
            manifest: ManifestPatcher::new(manifest),
            section: section.into(),
            field: field.into(),
            delegating: Vec::new(),
        }
    }

    /// Add a manifest expected to inherit the version through `section`
    pub fn with_delegating(mut self, store: S, section: impl Into<String>) -> Self {
        let field = self.field.clone();
        self.delegating
            .push(DelegatingManifest::new(store, section, field));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn canonical(&self) -> &VersionStore<S> {
        &self.canonical
    }

    pub fn manifest(&self) -> &ManifestPatcher<S> {
        &self.manifest
    }

    /// Section and field holding the manifest version, e.g. `[workspace.package] version`
    pub fn manifest_field(&self) -> (&str, &str) {
        (&self.section, &self.field)
    }

    /// The files a version change touches, canonical first
    pub fn version_paths(&self) -> Vec<PathBuf> {
        vec![
            self.canonical.path().to_path_buf(),
            self.manifest.path().to_path_buf(),
        ]
    }

    /// Current canonical version
    pub fn current_version(&self) -> Result<Version> {
        self.canonical.get()
    }

    /// Version recorded in the manifest
    pub fn manifest_version(&self) -> Result<Version> {
        self.manifest.get(&self.section, &self.field)
    }

    /// Advisories from every delegating manifest
    pub fn delegation_advisories(&self) -> Vec<Advisory> {
        self.delegating
            .iter()
            .filter_map(|manifest| manifest.advisory())
            .inspect(|advisory| warn!(%advisory, "delegating manifest"))
            .collect()
    }

    /// Read both files and compare them, plus the expected release if given
    pub fn check(&self, expected_release: Option<&Version>) -> Result<Report> {
        let canonical = self.current_version()?;
        let manifest = self.manifest_version()?;
        Ok(consistency::check(
            &canonical,
            &manifest,
            expected_release,
            self.delegation_advisories(),
        ))
    }

    /// Decide the next version without touching anything
    pub fn plan_bump(&self, kind: &BumpKind) -> Result<Bump> {
        let current = self.current_version()?;
        let bump = current.bump(kind)?;
        debug!(from = %bump.from, to = %bump.to, %kind, "planned bump");
        Ok(bump)
    }

    /// Write `version` to the canonical file, then to the manifest.
    ///
    /// The manifest field is located before anything is written so a missing
    /// section or field fails without touching either file.
    pub fn apply(&self, version: &Version) -> Result<Vec<PathBuf>> {
        self.manifest_version()?;

        self.canonical.set(version)?;
        self.manifest.set(version, &self.section, &self.field)?;

        Ok(self.version_paths())
    }
}
