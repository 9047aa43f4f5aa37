//! Subcommand handlers: resolve the repository, wire real collaborators and print.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::orchestration::{apply_bump, BumpOutcome, ReleaseOptions, ReleaseOrchestrator};
use crate::config::{load_config, Config};
use crate::domain::{parse_release_ref, BumpKind, Stage, Tag};
use crate::error::{ReleaseError, Result, StageContext};
use crate::git::Git2Repository;
use crate::lockfile::CommandRegenerator;
use crate::project::Project;
use crate::store::FileStore;
use crate::ui;

/// Repository root plus its loaded configuration
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Resolve the root and load the configuration for it.
    ///
    /// The root is `root` when given, otherwise the work tree of the git
    /// repository containing the current directory, otherwise the current
    /// directory itself.
    pub fn resolve(root: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => discover_root(&env::current_dir()?),
        };
        if !root.is_dir() {
            return Err(ReleaseError::NotFound(root));
        }
        debug!(root = %root.display(), "resolved repository root");

        let config = load_config(config_path, &root)?;
        Ok(Workspace { root, config })
    }

    pub fn project(&self) -> Project<FileStore> {
        Project::open(&self.root, &self.config.files)
    }

    pub fn lock_regenerator(&self) -> CommandRegenerator {
        CommandRegenerator::new(
            self.config.lockfile.command.clone(),
            &self.config.lockfile.path,
        )
    }
}

fn discover_root(start: &Path) -> PathBuf {
    git2::Repository::discover(start)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf))
        .unwrap_or_else(|| start.to_path_buf())
}

/// `check`: compare the version files, and the expected release if given.
///
/// # Returns
/// * `Ok(true)` - Every comparison passed
/// * `Ok(false)` - At least one mismatch; the report was printed
pub fn run_check(workspace: &Workspace, expected: Option<&str>) -> Result<bool> {
    let expected = expected
        .map(|input| parse_release_ref(input, &workspace.config.release.tag_prefix))
        .transpose()?;

    let report = workspace.project().check(expected.as_ref())?;
    ui::display_check_report(&report);

    if report.passed() {
        ui::display_success("Versions are consistent");
    } else {
        for mismatch in report.mismatches() {
            ui::display_error(&format!(
                "Mismatch ({}): {} != {}",
                mismatch.pair, mismatch.left, mismatch.right
            ));
        }
    }
    Ok(report.passed())
}

/// `bump`: write the next version to both files, or only report it
pub fn run_bump(workspace: &Workspace, target: &str, dry_run: bool) -> Result<BumpOutcome> {
    let kind: BumpKind = target.parse()?;
    let outcome = apply_bump(&workspace.project(), &kind, dry_run)?;
    ui::display_bump(&workspace.root, &outcome);
    if !dry_run {
        ui::display_success(&format!("Version is now {}", outcome.bump.to));
    }
    Ok(outcome)
}

/// `release`: run the whole pipeline against the real repository.
///
/// # Returns
/// * `Ok(true)` - Released, or planned in dry-run
/// * `Ok(false)` - Cancelled at the confirmation prompt; nothing changed
/// * `Err` - A fatal stage error, after the partial report was printed
pub fn run_release(
    workspace: &Workspace,
    target: &str,
    push: bool,
    dry_run: bool,
    yes: bool,
) -> Result<bool> {
    let kind: BumpKind = target.parse().stage(Stage::BumpVersion)?;
    let project = workspace.project();
    let settings = &workspace.config.release;

    if !dry_run && !yes {
        let bump = project.plan_bump(&kind).stage(Stage::BumpVersion)?;
        let tag = Tag::for_version(&settings.tag_prefix, &bump.to);
        ui::display_status(&format!("{} -> {}", bump.from, bump.to));
        let confirmed = ui::confirm_release(&bump.to.to_string(), &tag.name)
            .map_err(|e| ReleaseError::config(format!("Cannot read confirmation: {}", e)))?;
        if !confirmed {
            println!("Release cancelled by user.");
            return Ok(false);
        }
    }

    let repo = Git2Repository::open(&workspace.root).stage(Stage::CheckCleanWorkingTree)?;
    let lock = workspace.lock_regenerator();
    let options = ReleaseOptions {
        kind,
        push,
        dry_run,
    };

    match ReleaseOrchestrator::new(&project, &repo, &lock, settings).run(&options) {
        Ok(report) => {
            ui::display_release_report(&workspace.root, &report);
            if !dry_run {
                if let Some(tag) = &report.tag {
                    ui::display_success(&format!("Released {}", tag));
                    if !report.pushed {
                        ui::display_manual_push_instruction(tag, &settings.remote);
                    }
                }
            }
            Ok(true)
        }
        Err(failure) => {
            ui::display_release_report(&workspace.root, &failure.report);
            ui::display_resume_hint(&failure.report, failure.error.stage(), &settings.remote);
            Err(failure.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(version: &str, manifest_version: &str) -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("VERSION"), format!("{}\n", version)).unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            format!("[workspace.package]\nversion = \"{}\"\n", manifest_version),
        )
        .unwrap();
        let ws = Workspace::resolve(Some(dir.path()), None).unwrap();
        (dir, ws)
    }

    #[test]
    fn test_check_passes_with_matching_files() {
        let (_dir, ws) = workspace("0.0.6", "0.0.6");
        assert!(run_check(&ws, None).unwrap());
    }

    #[test]
    fn test_check_against_stale_release_tag() {
        let (_dir, ws) = workspace("0.0.6", "0.0.6");
        assert!(!run_check(&ws, Some("refs/tags/v0.0.5")).unwrap());
        assert!(run_check(&ws, Some("v0.0.6")).unwrap());
    }

    #[test]
    fn test_check_rejects_malformed_expected() {
        let (_dir, ws) = workspace("0.0.6", "0.0.6");
        let err = run_check(&ws, Some("latest")).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidFormat { .. }));
    }

    #[test]
    fn test_bump_writes_both_files() {
        let (dir, ws) = workspace("1.2.3", "1.2.3");
        let outcome = run_bump(&ws, "minor", false).unwrap();
        assert_eq!(outcome.bump.to.to_string(), "1.3.0");
        assert_eq!(
            fs::read_to_string(dir.path().join("VERSION")).unwrap(),
            "1.3.0\n"
        );
        assert!(fs::read_to_string(dir.path().join("Cargo.toml"))
            .unwrap()
            .contains("version = \"1.3.0\""));
    }

    #[test]
    fn test_bump_dry_run_leaves_files() {
        let (dir, ws) = workspace("1.2.3", "1.2.3");
        run_bump(&ws, "major", true).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("VERSION")).unwrap(),
            "1.2.3\n"
        );
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let err = Workspace::resolve(Some(Path::new("/definitely/not/here")), None).unwrap_err();
        assert!(matches!(err, ReleaseError::NotFound(_)));
    }
}
