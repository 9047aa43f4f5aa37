use crate::error::{ReleaseError, Result};
use git2::{Repository as Git2Repo, Status, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the work tree
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| ReleaseError::config("Repository has no working directory"))
    }

    /// Express `path` relative to the work tree, as the index expects
    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let workdir = self.workdir()?;
        if let Ok(relative) = path.strip_prefix(workdir) {
            return Ok(relative.to_path_buf());
        }

        // symlinked temp dirs and the like: compare resolved paths
        let resolved = path.canonicalize()?;
        let resolved_workdir = workdir.canonicalize()?;
        resolved
            .strip_prefix(&resolved_workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ReleaseError::config(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }
}

/// Credentials and push status callbacks shared by every remote operation.
///
/// Tries SSH keys from ~/.ssh/, then the SSH agent, then default credentials.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();

    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });

    // A rejected ref is reported here, not as an error from push()
    callbacks.push_update_reference(|refname, status| match status {
        Some(message) => Err(git2::Error::from_str(&format!(
            "Remote rejected {}: {}",
            refname, message
        ))),
        None => Ok(()),
    });

    callbacks
}

impl Git2Repository {
    fn push_refspec(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ReleaseError::remote(format!("No remote named '{}' found", remote_name)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        debug!(remote = remote_name, refspec, "pushing");
        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ReleaseError::remote(format!("Network error during push: {}", e))
                } else {
                    ReleaseError::remote(format!("Failed to push {}: {}", refspec, e))
                }
            })
    }
}

impl super::Repository for Git2Repository {
    fn pending_changes(&self) -> Result<Vec<String>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .filter(|entry| {
                let status = entry.status();
                !status.is_empty() && !status.contains(Status::IGNORED)
            })
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(ReleaseError::remote("HEAD is detached; check out a branch first"));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::remote("Branch name is not valid UTF-8"))
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<String> {
        let workdir = self.workdir()?.to_path_buf();
        let mut index = self.repo.index()?;

        for path in paths {
            let relative = self.relative_to_workdir(path)?;
            if workdir.join(&relative).exists() {
                index.add_path(&relative)?;
            } else {
                index.remove_path(&relative)?;
            }
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(oid.to_string())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;

        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.push_refspec(remote, &format!("refs/heads/{0}:refs/heads/{0}", branch))
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.push_refspec(remote, &format!("refs/tags/{0}:refs/tags/{0}", tag))
    }
}
