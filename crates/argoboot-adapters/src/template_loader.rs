//! Filesystem-based template loader.
//!
//! Reads every file under an override directory and keys it by its path
//! relative to that directory, using `/` separators, so that
//! `<dir>/deploy/Chart.yaml` overrides the built-in `deploy/Chart.yaml`.
//!
//! # Directory layout expected
//!
//! ```text
//! my-templates/
//! ├── application.yml        ← replaces the built-in Application template
//! └── deploy/
//!     └── mapping.yml        ← replaces the built-in Mapping template
//! ```
//!
//! Hidden files and directories (`.git`, editor swap files) are skipped.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use argoboot_core::{application::ApplicationError, error::BootstrapResult};

/// Loads template overrides from a directory tree.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateLoader {
    root: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every template under the root, by relative name.
    ///
    /// A root that cannot be walked, or a file that is not valid UTF-8, is an
    /// error: a half-applied override set would render surprising manifests.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_all(&self) -> BootstrapResult<BTreeMap<String, String>> {
        let mut templates = BTreeMap::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                reason: format!("Failed to read template directory: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = self.template_name(entry.path())?;
            let content = std::fs::read_to_string(entry.path()).map_err(|e| {
                ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: format!("Failed to read template: {e}"),
                }
            })?;

            debug!(template = %name, "Template override found");
            templates.insert(name, content);
        }

        Ok(templates)
    }

    fn template_name(&self, path: &Path) -> BootstrapResult<String> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Template is outside the template directory".into(),
            })?;

        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
