use crate::error::{ReleaseError, Result};
use crate::store::TextStore;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A version-bearing file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl TextStore for FileStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(ReleaseError::invalid_format(
                self.path.display().to_string(),
                "content is not valid UTF-8",
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn write_verified(&self, content: &str, verify: &dyn Fn(&str) -> bool) -> Result<()> {
        let mut staged = StagedFile::create(&self.path)?;
        staged.write_all(content.as_bytes())?;

        let written = staged.read_back()?;
        if !verify(&written) {
            // dropping `staged` removes the temp file
            return Err(ReleaseError::WriteVerificationFailed(self.path.clone()));
        }

        staged.commit()
    }
}

/// Temp file staged next to its target.
///
/// The temp file lives in the target's directory so the final rename stays on
/// one filesystem. Dropping a `StagedFile` without calling [`StagedFile::commit`]
/// deletes the temp file and leaves the target untouched, on every exit path.
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Create an empty temp file beside `target`
    pub fn create(target: &Path) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "staged".to_string());

        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(".tmp")
            .tempfile_in(dir)?;

        // keep the target's mode; temp files are created owner-only
        if let Ok(metadata) = fs::metadata(target) {
            fs::set_permissions(temp.path(), metadata.permissions())?;
        }

        debug!(temp = %temp.path().display(), target = %target.display(), "staged temp file");

        Ok(StagedFile {
            temp,
            target: target.to_path_buf(),
        })
    }

    /// Path of the temp file
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write and flush the full content to disk
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.temp.write_all(bytes)?;
        self.temp.flush()?;
        self.temp.as_file().sync_all()?;
        Ok(())
    }

    /// Re-read the temp file from disk
    pub fn read_back(&self) -> Result<String> {
        Ok(fs::read_to_string(self.temp.path())?)
    }

    /// Promote the temp file over the target with a rename
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| ReleaseError::Io(e.error))?;
        debug!(target = %target.display(), "promoted staged file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stray_temp_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .collect()
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("VERSION"));
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_write_verified_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, "0.0.6\n").unwrap();

        let store = FileStore::new(&path);
        store.write_verified("0.1.0\n", &|s| s == "0.1.0\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "0.1.0\n");
        assert!(stray_temp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_read_non_utf8_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, [0x30, 0x2e, 0xff, 0xfe, 0x0a]).unwrap();

        let err = FileStore::new(&path).read().unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidFormat { .. }));
    }

    #[test]
    fn test_rejected_verification_keeps_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, "0.0.6\n").unwrap();

        let store = FileStore::new(&path);
        let err = store.write_verified("0.1.0\n", &|_| false).unwrap_err();

        assert!(matches!(err, ReleaseError::WriteVerificationFailed(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "0.0.6\n");
        assert!(stray_temp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_interrupted_write_leaves_target_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, "0.0.6\n").unwrap();

        {
            let mut staged = StagedFile::create(&path).unwrap();
            staged.write_all(b"9.9.9\n").unwrap();
            assert!(staged.path().exists());
            // interrupted before commit: the guard goes out of scope here
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "0.0.6\n");
        assert!(stray_temp_files(dir.path()).is_empty());

        // a retry goes through normally
        FileStore::new(&path)
            .write_verified("0.0.7\n", &|s| s == "0.0.7\n")
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0.0.7\n");
    }

    #[test]
    fn test_staged_file_creates_missing_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");

        let mut staged = StagedFile::create(&path).unwrap();
        staged.write_all(b"1.0.0\n").unwrap();
        assert_eq!(staged.read_back().unwrap(), "1.0.0\n");
        staged.commit().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1.0.0\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_target_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileStore::new(&path)
            .write_verified("[workspace]\n", &|_| true)
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
