//! Spec index: which spec files exist for which language.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Language code to alphabetically sorted spec filenames.
pub type SpecIndex = BTreeMap<String, Vec<String>>;

const YAML_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Scan `i18n_dir` (one subdirectory per language) and list every YAML spec
/// per language. Filenames are sorted so the first entry is the default.
pub fn build_index(i18n_dir: &Path) -> Result<SpecIndex> {
    let mut index = SpecIndex::new();

    let entries = fs::read_dir(i18n_dir)
        .map_err(|err| Error::io(format!("Failed to read {}", i18n_dir.display()), err))?;
    for entry in entries {
        let entry = entry
            .map_err(|err| Error::io(format!("Failed to read {}", i18n_dir.display()), err))?;
        let language_dir = entry.path();
        if !language_dir.is_dir() {
            continue;
        }
        let Some(language) = language_dir.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let mut files = Vec::new();
        let specs = fs::read_dir(&language_dir)
            .map_err(|err| Error::io(format!("Failed to read {}", language_dir.display()), err))?;
        for spec in specs {
            let spec = spec.map_err(|err| {
                Error::io(format!("Failed to read {}", language_dir.display()), err)
            })?;
            let path = spec.path();
            if !path.is_file() {
                continue;
            }
            let is_yaml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext));
            if !is_yaml {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                files.push(name.to_string());
            }
        }
        files.sort();
        index.insert(language.to_string(), files);
    }

    debug!(languages = index.len(), "Spec index built");
    Ok(index)
}

/// Persist the index as pretty-printed JSON.
pub fn write_index(index: &SpecIndex, path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(index)
        .map_err(|err| Error::io("Failed to encode index.json", std::io::Error::other(err)))?;
    fs::write(path, contents)
        .map_err(|err| Error::io(format!("Failed to write {}", path.display()), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_deterministic_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let i18n = dir.path().join("i18n");
        fs::create_dir_all(i18n.join("en")).unwrap();
        fs::create_dir_all(i18n.join("es")).unwrap();
        fs::write(i18n.join("en/b.yaml"), "b: 1").unwrap();
        fs::write(i18n.join("en/a.yaml"), "a: 1").unwrap();
        fs::write(i18n.join("es/c.yml"), "c: 1").unwrap();

        let index = build_index(&i18n).unwrap();
        assert_eq!(index["en"], ["a.yaml", "b.yaml"]);
        assert_eq!(index["es"], ["c.yml"]);
        assert_eq!(index.keys().collect::<Vec<_>>(), ["en", "es"]);
    }

    #[test]
    fn non_yaml_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let i18n = dir.path().join("i18n");
        fs::create_dir_all(i18n.join("en")).unwrap();
        fs::write(i18n.join("en/api.yaml"), "a: 1").unwrap();
        fs::write(i18n.join("en/notes.txt"), "skip me").unwrap();
        fs::write(i18n.join("stray.yaml"), "not a language dir").unwrap();

        let index = build_index(&i18n).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index["en"], ["api.yaml"]);
    }

    #[test]
    fn written_index_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let i18n = dir.path().join("i18n");
        fs::create_dir_all(i18n.join("en")).unwrap();
        fs::write(i18n.join("en/api.yaml"), "a: 1").unwrap();

        let index = build_index(&i18n).unwrap();
        let out = dir.path().join("index.json");
        write_index(&index, &out).unwrap();

        let parsed: SpecIndex =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed, index);
    }
}
