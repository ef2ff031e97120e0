//! Copies the user's OpenAPI spec into the project tree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::project::{Project, SPEC_FILENAME, ensure_dir};

/// Place a verbatim copy of `spec_path` at `i18n/<source_language>/api.yaml`.
///
/// Fails with [`Error::SpecNotFound`] before touching the filesystem when the
/// source file does not exist. Re-running overwrites the destination copy.
pub fn copy_spec(project: &Project, spec_path: &Path, source_language: &str) -> Result<PathBuf> {
    if !spec_path.is_file() {
        return Err(Error::SpecNotFound {
            path: spec_path.to_path_buf(),
        });
    }

    let dest_dir = project.language_dir(source_language);
    ensure_dir(&dest_dir)?;

    let dest = dest_dir.join(SPEC_FILENAME);
    fs::copy(spec_path, &dest).map_err(|err| {
        Error::io(
            format!(
                "Failed to copy {} to {}",
                spec_path.display(),
                dest.display()
            ),
            err,
        )
    })?;
    debug!(spec = %spec_path.display(), dest = %dest.display(), "Spec copied into project");

    Ok(dest)
}
