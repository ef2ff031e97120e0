//! Serve-time staging of the viewer's static assets.
//!
//! Copies the generated spec tree into `site/trans-spec`, regenerates the
//! spec index, and materializes the translation API key when one is present
//! in the environment. Runs on every `serve` invocation; the staged copy is
//! replaced wholesale.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::dotenv::EnvFile;
use crate::error::{Error, Result};
use crate::index::{SpecIndex, build_index, write_index};
use crate::project::{CONFIG_FILENAME, ENV_FILENAME, I18N_DIR, Project, ensure_dir};

/// Environment variable whose value is forwarded into the project's
/// `.env.local` at serve time.
pub const API_KEY_ENV: &str = "LINGODOTDEV_API_KEY";

/// Stage the static asset tree and return the freshly built spec index.
pub fn stage_site(project: &Project) -> Result<SpecIndex> {
    let api_key = std::env::var(API_KEY_ENV).ok();
    stage_site_with(project, api_key.as_deref())
}

pub fn stage_site_with(project: &Project, api_key: Option<&str>) -> Result<SpecIndex> {
    if !project.is_set_up() {
        return Err(Error::ProjectNotSetUp {
            root: project.root().to_path_buf(),
        });
    }

    let assets = project.assets_dir();
    if assets.exists() {
        fs::remove_dir_all(&assets)
            .map_err(|err| Error::io(format!("Failed to clear {}", assets.display()), err))?;
    }
    ensure_dir(&assets)?;

    copy_tree(&project.i18n_dir(), &assets.join(I18N_DIR))?;

    // The locale configuration is part of the served surface; a missing one
    // is tolerated because the viewer falls back to a safe default.
    let config_src = project.config_path();
    if config_src.is_file() {
        fs::copy(&config_src, assets.join(CONFIG_FILENAME)).map_err(|err| {
            Error::io(format!("Failed to copy {}", config_src.display()), err)
        })?;
    }

    let index = build_index(&assets.join(I18N_DIR))?;
    write_index(&index, &project.index_path())?;

    if let Some(key) = api_key.filter(|key| !key.is_empty()) {
        let mut env_file = EnvFile::read(&project.env_file_path())?;
        env_file.set(API_KEY_ENV, key);
        env_file.write()?;
        debug!("Translation API key materialized into {ENV_FILENAME}");
    }

    debug!(assets = %assets.display(), "Static assets staged");
    Ok(index)
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|err| {
            Error::io(
                format!("Failed to walk {}", src.display()),
                std::io::Error::other(err),
            )
        })?;
        let rel = entry.path().strip_prefix(src).map_err(|err| {
            Error::io(
                format!("Failed to relativize {}", entry.path().display()),
                std::io::Error::other(err),
            )
        })?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(entry.path(), &target).map_err(|err| {
                Error::io(format!("Failed to copy {}", entry.path().display()), err)
            })?;
        }
    }
    Ok(())
}
