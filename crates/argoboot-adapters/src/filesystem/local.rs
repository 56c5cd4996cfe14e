//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use argoboot_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{BootstrapError, BootstrapResult},
};
use tracing::debug;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> BootstrapResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))?;
        debug!(path = %path.display(), bytes = content.len(), "File written");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> BootstrapResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn clear_dir(&self, path: &Path) -> BootstrapResult<()> {
        if !path.exists() {
            return self.create_dir_all(path);
        }

        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            let entry_path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| map_io_error(&entry_path, e, "get metadata"))?;

            if file_type.is_dir() {
                self.remove_dir_all(&entry_path)?;
            } else {
                std::fs::remove_file(&entry_path)
                    .map_err(|e| map_io_error(&entry_path, e, "remove file"))?;
            }
        }
        debug!(path = %path.display(), "Directory cleared");
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> BootstrapError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
