//! Release workflow orchestration
//!
//! Runs the release stages strictly in order:
//! 1. CheckCleanWorkingTree
//! 2. BumpVersion (then re-check both files for consistency)
//! 3. SyncDependencyArtifacts (best effort)
//! 4. CommitChanges
//! 5. CreateTag
//! 6. PushRemote (only when requested, never in dry-run)
//!
//! The first fatal error stops the pipeline. Completed stages are not rolled
//! back; the partial report says how far the release got.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::advisory::Advisory;
use crate::config::ReleaseConfig;
use crate::domain::{Bump, BumpKind, Stage, Tag};
use crate::error::{ReleaseError, Result, StageContext};
use crate::git::Repository;
use crate::lockfile::LockRegenerator;
use crate::project::Project;
use crate::store::TextStore;

/// Arguments for the release workflow
///
/// Mirrors the CLI arguments in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    pub kind: BumpKind,

    /// Push the branch and tag once created
    pub push: bool,

    /// Decide everything, change nothing
    pub dry_run: bool,
}

/// What happened to a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Done,
    /// Dry run: describes what would have been done
    Planned,
    Skipped,
    /// Finished with an advisory instead of its result
    Warned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub stage: Stage,
    pub status: StageStatus,
    pub summary: String,
}

/// Result of a release run, complete or partial
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseReport {
    pub dry_run: bool,
    pub bump: Option<Bump>,
    pub stages: Vec<StageRecord>,
    pub advisories: Vec<Advisory>,
    /// Files that are (or would be) committed
    pub files: Vec<PathBuf>,
    pub commit_message: Option<String>,
    pub commit_id: Option<String>,
    pub tag: Option<String>,
    pub pushed: bool,
}

impl ReleaseReport {
    fn new(dry_run: bool) -> Self {
        ReleaseReport {
            dry_run,
            ..Default::default()
        }
    }

    fn record(&mut self, stage: Stage, status: StageStatus, summary: impl Into<String>) {
        let summary = summary.into();
        info!(%stage, ?status, %summary, "release stage");
        self.stages.push(StageRecord {
            stage,
            status,
            summary,
        });
    }

    /// Stages that left something behind in the repository
    pub fn completed_mutations(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|r| r.status == StageStatus::Done)
            .map(|r| r.stage)
            .filter(|stage| *stage != Stage::CheckCleanWorkingTree)
            .collect()
    }
}

/// A failed release, with the report of everything done before the failure
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ReleaseFailure {
    pub error: ReleaseError,
    pub report: Box<ReleaseReport>,
}

/// Outcome of a bump, shared by the `bump` command and the BumpVersion stage
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    pub bump: Bump,
    pub dry_run: bool,
    pub files: Vec<PathBuf>,
    pub advisories: Vec<Advisory>,
}

/// Decide the next version and, unless `dry_run`, write it to both files.
///
/// After writing, both files are read back through the consistency check; a
/// mismatch is a fatal `Mismatch` error.
pub fn apply_bump<S: TextStore>(
    project: &Project<S>,
    kind: &BumpKind,
    dry_run: bool,
) -> Result<BumpOutcome> {
    let bump = project.plan_bump(kind)?;

    let mut advisories = Vec::new();
    if let Some(advisory) = bump.advisory() {
        warn!(%advisory, "downgrade");
        advisories.push(advisory);
    }

    if dry_run {
        // same read the real write starts with, so a broken manifest fails here too
        project.manifest_version()?;
        advisories.extend(project.delegation_advisories());
    } else {
        project.apply(&bump.to)?;
        let report = project.check(None)?;
        report.ensure_consistent()?;
        advisories.extend(report.advisories);
    }

    Ok(BumpOutcome {
        bump,
        dry_run,
        files: project.version_paths(),
        advisories,
    })
}

/// Path for messages: relative to the repository root when possible
pub fn display_path<'p>(root: &Path, path: &'p Path) -> std::borrow::Cow<'p, str> {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy()
}

/// Drives a release over injected files, repository and lock regenerator
pub struct ReleaseOrchestrator<'a, S: TextStore, R: Repository, L: LockRegenerator> {
    project: &'a Project<S>,
    repo: &'a R,
    lock: &'a L,
    settings: &'a ReleaseConfig,
}

impl<'a, S: TextStore, R: Repository, L: LockRegenerator> ReleaseOrchestrator<'a, S, R, L> {
    pub fn new(
        project: &'a Project<S>,
        repo: &'a R,
        lock: &'a L,
        settings: &'a ReleaseConfig,
    ) -> Self {
        ReleaseOrchestrator {
            project,
            repo,
            lock,
            settings,
        }
    }

    /// Run the whole pipeline
    ///
    /// # Returns
    /// * `Ok(ReleaseReport)` - Every non-advisory stage succeeded (or was planned)
    /// * `Err(ReleaseFailure)` - The error, attributed to its stage, and the partial report
    pub fn run(
        &self,
        options: &ReleaseOptions,
    ) -> std::result::Result<ReleaseReport, ReleaseFailure> {
        let mut report = ReleaseReport::new(options.dry_run);
        match self.run_stages(options, &mut report) {
            Ok(()) => Ok(report),
            Err(error) => Err(ReleaseFailure {
                error,
                report: Box::new(report),
            }),
        }
    }

    fn run_stages(&self, options: &ReleaseOptions, report: &mut ReleaseReport) -> Result<()> {
        let template = self.settings.commit_template()?;

        self.check_clean_working_tree(report)
            .stage(Stage::CheckCleanWorkingTree)?;

        let bump = self
            .bump_version(options, report)
            .stage(Stage::BumpVersion)?;

        self.sync_dependency_artifacts(options, report);

        let message = template.render(&bump.to);
        self.commit_changes(options, &message, report)
            .stage(Stage::CommitChanges)?;

        let tag = Tag::for_version(&self.settings.tag_prefix, &bump.to);
        self.create_tag(options, &tag, report)
            .stage(Stage::CreateTag)?;

        self.push_remote(options, &tag, report)
            .stage(Stage::PushRemote)?;

        Ok(())
    }

    fn check_clean_working_tree(&self, report: &mut ReleaseReport) -> Result<()> {
        let pending = self.repo.pending_changes()?;
        if !pending.is_empty() {
            return Err(ReleaseError::DirtyWorkingTree(pending));
        }
        report.record(
            Stage::CheckCleanWorkingTree,
            StageStatus::Done,
            "working tree is clean",
        );
        Ok(())
    }

    fn bump_version(&self, options: &ReleaseOptions, report: &mut ReleaseReport) -> Result<Bump> {
        let outcome = apply_bump(self.project, &options.kind, options.dry_run)?;
        let bump = outcome.bump.clone();

        let files = outcome
            .files
            .iter()
            .map(|p| display_path(self.project.root(), p).into_owned())
            .collect::<Vec<_>>()
            .join(", ");

        if options.dry_run {
            report.record(
                Stage::BumpVersion,
                StageStatus::Planned,
                format!("would write {} -> {} to {}", bump.from, bump.to, files),
            );
        } else {
            report.record(
                Stage::BumpVersion,
                StageStatus::Done,
                format!("wrote {} -> {} to {}", bump.from, bump.to, files),
            );
        }

        report.bump = Some(bump.clone());
        report.files = outcome.files;
        report.advisories.extend(outcome.advisories);
        Ok(bump)
    }

    fn sync_dependency_artifacts(&self, options: &ReleaseOptions, report: &mut ReleaseReport) {
        let command = self.lock.describe();

        if options.dry_run {
            report.record(
                Stage::SyncDependencyArtifacts,
                StageStatus::Planned,
                format!("would regenerate lock file ({})", command),
            );
            return;
        }

        match self.lock.regenerate(self.project.root()) {
            Ok(Some(lock)) => {
                let summary = format!(
                    "regenerated {} ({})",
                    display_path(self.project.root(), &lock),
                    command
                );
                if !report.files.contains(&lock) {
                    report.files.push(lock);
                }
                report.record(Stage::SyncDependencyArtifacts, StageStatus::Done, summary);
            }
            Ok(None) => {
                report.record(
                    Stage::SyncDependencyArtifacts,
                    StageStatus::Skipped,
                    format!("no lock file to stage ({})", command),
                );
            }
            Err(e) => {
                let advisory = Advisory::DependencySyncFailed {
                    reason: e.to_string(),
                };
                warn!(%advisory, "lock file");
                report.record(
                    Stage::SyncDependencyArtifacts,
                    StageStatus::Warned,
                    advisory.to_string(),
                );
                report.advisories.push(advisory);
            }
        }
    }

    fn commit_changes(
        &self,
        options: &ReleaseOptions,
        message: &str,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        report.commit_message = Some(message.to_string());
        let count = report.files.len();

        if options.dry_run {
            report.record(
                Stage::CommitChanges,
                StageStatus::Planned,
                format!("would commit {} file(s) with message '{}'", count, message),
            );
            return Ok(());
        }

        let id = self.repo.commit_paths(&report.files, message)?;
        let short = &id[..id.len().min(7)];
        report.record(
            Stage::CommitChanges,
            StageStatus::Done,
            format!("committed {} file(s) as {}: {}", count, short, message),
        );
        report.commit_id = Some(id);
        Ok(())
    }

    fn create_tag(
        &self,
        options: &ReleaseOptions,
        tag: &Tag,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        report.tag = Some(tag.name.clone());

        if options.dry_run {
            report.record(
                Stage::CreateTag,
                StageStatus::Planned,
                format!("would create tag {}", tag.name),
            );
            return Ok(());
        }

        self.repo.create_tag(&tag.name, &tag.message())?;
        report.record(
            Stage::CreateTag,
            StageStatus::Done,
            format!("created tag {}", tag.name),
        );
        Ok(())
    }

    fn push_remote(
        &self,
        options: &ReleaseOptions,
        tag: &Tag,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        let remote = &self.settings.remote;

        if !options.push {
            report.record(
                Stage::PushRemote,
                StageStatus::Skipped,
                "push not requested",
            );
            return Ok(());
        }
        if options.dry_run {
            report.record(
                Stage::PushRemote,
                StageStatus::Skipped,
                format!("dry run: {} is not pushed to {}", tag.name, remote),
            );
            return Ok(());
        }

        let branch = self.repo.current_branch()?;
        self.repo.push_branch(remote, &branch)?;
        self.repo.push_tag(remote, &tag.name)?;
        report.pushed = true;
        report.record(
            Stage::PushRemote,
            StageStatus::Done,
            format!("pushed {} and {} to {}", branch, tag.name, remote),
        );
        Ok(())
    }
}
