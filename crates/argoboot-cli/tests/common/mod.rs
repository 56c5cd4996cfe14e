//! Shared fixtures for the CLI tests.

use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

pub const SPEC: &str = r#"
argocd:
  project:
    name: shop
    description: Storefront services
  parent_app:
    name: shop
    repo_url: https://github.com/acme/shop-argocd.git
  child_apps:
    destination_cluster: in-cluster
    app:
      - name: api
        namespace: payments
        repo_url: https://github.com/acme/api.git
      - name: web
        namespace: frontend
        repo_url: https://github.com/acme/web.git
"#;

/// Variables that would otherwise leak credentials or settings from the
/// developer's shell into a test.
const SCRUBBED: &[&str] = &[
    "GIT_REPO_URL",
    "GIT_USERNAME",
    "GIT_TOKEN",
    "ARGOCD_USERNAME",
    "ARGOCD_PASSWORD",
    "TARGET_ENVIRONMENT",
    "ARGOBOOT_TEMPLATES_DIR",
    "ARGOBOOT__ENVIRONMENTS",
    "RUST_LOG",
];

/// A scratch directory holding an empty config file.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("argo-bootstrap.toml"), "").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).unwrap();
    }

    /// `argo-bootstrap -c <sandbox config>` run inside the sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = bin();
        cmd.current_dir(self.path())
            .arg("--config")
            .arg(self.path().join("argo-bootstrap.toml"))
            .env("ARGOBOOT__PATHS__DATA_DIR", self.path().join("staging"));
        for var in SCRUBBED {
            cmd.env_remove(var);
        }
        cmd
    }
}

/// The binary with colours off and nothing else configured.
pub fn bin() -> Command {
    let mut cmd = Command::cargo_bin("argo-bootstrap").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}
