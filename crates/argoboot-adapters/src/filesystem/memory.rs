//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use argoboot_core::{
    application::{ApplicationError, ports::Filesystem},
    error::BootstrapResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same state, so a test can keep one handle and give
/// another to a service.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Files directly or indirectly under `dir`, sorted.
    pub fn files_under(&self, dir: &Path) -> Vec<PathBuf> {
        self.list_files()
            .into_iter()
            .filter(|p| p.starts_with(dir))
            .collect()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn read_guard(&self) -> BootstrapResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write_guard(&self) -> BootstrapResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

impl MemoryFilesystemInner {
    fn insert_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn remove_tree(&mut self, path: &Path, keep_root: bool) {
        self.directories
            .retain(|d| !d.starts_with(path) || (keep_root && d == path));
        self.files.retain(|p, _| !p.starts_with(path));
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        self.write_guard()?.insert_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> BootstrapResult<()> {
        let mut inner = self.write_guard()?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> BootstrapResult<String> {
        self.read_guard()?.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "File does not exist".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        let mut inner = self.write_guard()?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Directory does not exist".into(),
            }
            .into());
        }
        inner.remove_tree(path, false);
        Ok(())
    }

    fn clear_dir(&self, path: &Path) -> BootstrapResult<()> {
        let mut inner = self.write_guard()?;
        inner.remove_tree(path, true);
        inner.insert_dirs(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_needs_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.yml"), "x").is_err());

        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.yml"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/a/b.yml")).as_deref(), Some("x"));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let handle = fs.clone();
        fs.create_dir_all(Path::new("/repo")).unwrap();
        fs.write_file(Path::new("/repo/f"), "x").unwrap();

        assert_eq!(handle.list_files(), [PathBuf::from("/repo/f")]);
    }

    #[test]
    fn clear_dir_keeps_root_only() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/data/parent_repo/argocd")).unwrap();
        fs.write_file(Path::new("/data/parent_repo/argocd/x.yml"), "x")
            .unwrap();

        fs.clear_dir(Path::new("/data")).unwrap();

        assert!(fs.is_dir(Path::new("/data")));
        assert!(!fs.exists(Path::new("/data/parent_repo")));
        assert!(fs.list_files().is_empty());
    }

    #[test]
    fn remove_missing_directory_fails() {
        let fs = MemoryFilesystem::new();
        assert!(fs.remove_dir_all(Path::new("/nope")).is_err());
    }
}
