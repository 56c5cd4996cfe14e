//! In-crate fakes for the filesystem and renderer ports.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
    },
    domain::Bindings,
    error::BootstrapResult,
};

#[derive(Default)]
pub struct FakeFilesystem {
    dirs: Mutex<BTreeSet<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl FakeFilesystem {
    pub fn with_dirs<const N: usize>(dirs: [&str; N]) -> Self {
        let fs = Self::default();
        for d in dirs {
            fs.create_dir_all(Path::new(d)).unwrap();
        }
        fs
    }

    pub fn seed(&self, path: &str, content: &str) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).unwrap();
        }
        self.files.lock().unwrap().insert(path, content.into());
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn read(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.dirs.lock().unwrap().contains(Path::new(path))
    }
}

fn not_found(path: &Path, what: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("{what} not found"),
    }
}

impl Filesystem for FakeFilesystem {
    fn create_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> BootstrapResult<()> {
        let parent = path.parent().unwrap_or(Path::new("/"));
        if !self.dirs.lock().unwrap().contains(parent) {
            return Err(not_found(parent, "parent directory").into());
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.into());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> BootstrapResult<String> {
        self.read(path).ok_or_else(|| not_found(path, "file").into())
    }

    fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path) || self.files.lock().unwrap().contains_key(path)
    }

    fn remove_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        self.dirs.lock().unwrap().retain(|d| !d.starts_with(path));
        self.files.lock().unwrap().retain(|f, _| !f.starts_with(path));
        Ok(())
    }

    fn clear_dir(&self, path: &Path) -> BootstrapResult<()> {
        self.remove_dir_all(path)?;
        self.create_dir_all(path)
    }
}

/// Renders templates as `<name>\n<bindings as JSON>`.
#[derive(Default)]
pub struct FakeRenderer {
    fail_on: Option<String>,
}

impl FakeRenderer {
    pub fn failing_on(template: &str) -> Self {
        Self {
            fail_on: Some(template.into()),
        }
    }

    fn check(&self, name: &str) -> BootstrapResult<()> {
        match &self.fail_on {
            Some(t) if t == name => Err(ApplicationError::RenderingFailed {
                template: name.into(),
                reason: "missing binding 'app.repo_url'".into(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

impl TemplateRenderer for FakeRenderer {
    fn render(&self, name: &str, bindings: &Bindings) -> BootstrapResult<String> {
        self.check(name)?;
        let json = serde_json::to_string(bindings).unwrap();
        Ok(format!("{name}\n{json}"))
    }

    fn source(&self, name: &str) -> BootstrapResult<String> {
        self.check(name)?;
        Ok(format!("source of {name}"))
    }
}

/// Lets a test keep a handle on the filesystem it hands to a service.
impl Filesystem for Arc<FakeFilesystem> {
    fn create_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        self.as_ref().create_dir_all(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> BootstrapResult<()> {
        self.as_ref().write_file(path, content)
    }

    fn read_to_string(&self, path: &Path) -> BootstrapResult<String> {
        self.as_ref().read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.as_ref().exists(path)
    }

    fn remove_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        self.as_ref().remove_dir_all(path)
    }

    fn clear_dir(&self, path: &Path) -> BootstrapResult<()> {
        self.as_ref().clear_dir(path)
    }
}
