//! Locale configuration (`i18n.json`) consumed by the external translator.

use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::project::{Project, ensure_dir};

pub const CONFIG_SCHEMA_URL: &str = "https://lingo.dev/schema/i18n.json";
pub const CONFIG_VERSION: &str = "1.12";
/// Glob handed to the external tool; `[locale]` is expanded by it, not us.
const YAML_INCLUDE_GLOB: &str = "i18n/[locale]/*.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub locale: LocaleSpec,
    pub buckets: Buckets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleSpec {
    pub source: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buckets {
    pub yaml: Bucket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub include: Vec<String>,
}

impl LocaleConfig {
    pub fn new(source: &str, targets: Vec<String>) -> Self {
        Self {
            schema: CONFIG_SCHEMA_URL.to_string(),
            version: CONFIG_VERSION.to_string(),
            locale: LocaleSpec {
                source: source.to_string(),
                targets,
            },
            buckets: Buckets {
                yaml: Bucket {
                    include: vec![YAML_INCLUDE_GLOB.to_string()],
                },
            },
        }
    }
}

/// Split a raw language list on any run of commas and/or whitespace.
///
/// Token order follows the input; duplicates are kept as given.
pub fn parse_targets(raw: &str) -> Result<Vec<String>> {
    let targets: Vec<String> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect();

    if targets.is_empty() {
        return Err(Error::NoTargetLanguages);
    }
    Ok(targets)
}

/// Parse the raw target list and persist `i18n.json`, overwriting any
/// previous configuration. Nothing is written when parsing fails.
pub fn generate_config(project: &Project, source: &str, raw_targets: &str) -> Result<Vec<String>> {
    let targets = parse_targets(raw_targets)?;
    write_config(project, source, &targets)?;
    Ok(targets)
}

pub fn write_config(project: &Project, source: &str, targets: &[String]) -> Result<LocaleConfig> {
    let config = LocaleConfig::new(source, targets.to_vec());
    ensure_dir(project.root())?;

    let contents = serde_json::to_string_pretty(&config)
        .map_err(|err| Error::io("Failed to encode i18n.json", std::io::Error::other(err)))?;
    let path = project.config_path();
    fs::write(&path, contents)
        .map_err(|err| Error::io(format!("Failed to write {}", path.display()), err))?;
    debug!(path = %path.display(), targets = ?config.locale.targets, "Locale configuration written");

    Ok(config)
}
