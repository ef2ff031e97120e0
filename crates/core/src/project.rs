//! Project directory layout.
//!
//! All paths are derived from a single [`Project`] value so tests and
//! multiple projects can coexist; nothing in the crate reads the project
//! root from a process-wide constant.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the project root directory.
pub const PROJECT_DIR_ENV: &str = "SPECLINGO_DIR";
/// Default project root, relative to the working directory.
pub const DEFAULT_PROJECT_DIR: &str = ".speclingo";
/// Fixed name the source spec is copied to under its language directory.
pub const SPEC_FILENAME: &str = "api.yaml";
/// Name of the per-language spec tree inside the project root.
pub const I18N_DIR: &str = "i18n";
/// Locale configuration consumed by the external translation CLI.
pub const CONFIG_FILENAME: &str = "i18n.json";
/// Spec index generated at serve time.
pub const INDEX_FILENAME: &str = "index.json";
/// Staging directory for the viewer's static assets.
pub const SITE_DIR: &str = "site";
/// URL prefix (and on-disk subdirectory) the static assets are served under.
pub const STATIC_ROOT: &str = "trans-spec";
/// Environment file materialized when a translation API key is present.
pub const ENV_FILENAME: &str = ".env.local";

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the project root from `SPECLINGO_DIR`, falling back to
    /// `.speclingo` in the working directory.
    pub fn from_env() -> Self {
        let root = std::env::var_os(PROJECT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_DIR));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn i18n_dir(&self) -> PathBuf {
        self.root.join(I18N_DIR)
    }

    pub fn language_dir(&self, language: &str) -> PathBuf {
        self.i18n_dir().join(language)
    }

    pub fn spec_path(&self, language: &str) -> PathBuf {
        self.language_dir(language).join(SPEC_FILENAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILENAME)
    }

    pub fn site_dir(&self) -> PathBuf {
        self.root.join(SITE_DIR)
    }

    /// Directory the static HTTP surface is served from (`site/trans-spec`).
    pub fn assets_dir(&self) -> PathBuf {
        self.site_dir().join(STATIC_ROOT)
    }

    pub fn index_path(&self) -> PathBuf {
        self.assets_dir().join(INDEX_FILENAME)
    }

    pub fn env_file_path(&self) -> PathBuf {
        self.root.join(ENV_FILENAME)
    }

    /// A project counts as set up once its spec tree exists.
    pub fn is_set_up(&self) -> bool {
        self.i18n_dir().is_dir()
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|err| Error::io(format!("Failed to create directory {}", path.display()), err))
}
