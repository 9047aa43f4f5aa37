use crate::domain::CommitTemplate;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Contains the locations of the version-bearing files, release naming, and
/// the lock file regeneration command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub lockfile: LockfileConfig,
}

fn default_version_file() -> PathBuf {
    PathBuf::from("VERSION")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("Cargo.toml")
}

fn default_manifest_section() -> String {
    "workspace.package".to_string()
}

fn default_version_field() -> String {
    "version".to_string()
}

fn default_delegating_section() -> String {
    "package".to_string()
}

/// Where the version lives, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_manifest_section")]
    pub manifest_section: String,

    #[serde(default = "default_version_field")]
    pub version_field: String,

    /// Manifests expected to inherit the version instead of copying it.
    ///
    /// Empty by default: workspace members are not discovered, so `check`
    /// inspects only the manifests listed here, e.g.
    /// `delegating_manifests = ["cli/Cargo.toml", "core/Cargo.toml"]`.
    /// Each is read under `delegating_section` and reported when it
    /// hard-codes a version instead of `version.workspace = true`.
    #[serde(default)]
    pub delegating_manifests: Vec<PathBuf>,

    #[serde(default = "default_delegating_section")]
    pub delegating_section: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            version_file: default_version_file(),
            manifest: default_manifest(),
            manifest_section: default_manifest_section(),
            version_field: default_version_field(),
            delegating_manifests: Vec::new(),
            delegating_section: default_delegating_section(),
        }
    }
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_commit_message() -> String {
    "chore(release): v{version}".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Naming of release commits and tags, and where they are pushed.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_prefix: default_tag_prefix(),
            commit_message: default_commit_message(),
            remote: default_remote(),
        }
    }
}

impl ReleaseConfig {
    pub fn commit_template(&self) -> Result<CommitTemplate> {
        CommitTemplate::new(self.commit_message.clone())
    }
}

fn default_lock_command() -> Vec<String> {
    vec![
        "cargo".to_string(),
        "update".to_string(),
        "--workspace".to_string(),
    ]
}

fn default_lock_path() -> PathBuf {
    PathBuf::from("Cargo.lock")
}

/// Lock file regeneration. An empty command disables the stage.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LockfileConfig {
    #[serde(default = "default_lock_command")]
    pub command: Vec<String>,

    #[serde(default = "default_lock_path")]
    pub path: PathBuf,
}

impl Default for LockfileConfig {
    fn default() -> Self {
        LockfileConfig {
            command: default_lock_command(),
            path: default_lock_path(),
        }
    }
}

impl Config {
    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.files.version_file.as_os_str().is_empty() {
            return Err(ReleaseError::config("files.version_file must not be empty"));
        }
        if self.files.manifest.as_os_str().is_empty() {
            return Err(ReleaseError::config("files.manifest must not be empty"));
        }
        if self.files.manifest_section.trim().is_empty() {
            return Err(ReleaseError::config("files.manifest_section must not be empty"));
        }
        if self.files.version_field.trim().is_empty() {
            return Err(ReleaseError::config("files.version_field must not be empty"));
        }
        self.release.commit_template()?;
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the repository root
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `root` - Repository root searched for `gitrelease.toml`
///
/// # Returns
/// * `Ok(Config)` - Loaded and validated configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, root: &Path) -> Result<Config> {
    let candidate = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if root.join(CONFIG_FILE_NAME).exists() {
        Some(root.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
            .filter(|path| path.exists())
    };

    let config = match candidate {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str::<Config>(&text).map_err(|e| {
                ReleaseError::config(format!("Cannot parse {}: {}", path.display(), e))
            })?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}
