//! Ordered dotenv file that preserves comments and unrelated keys.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::project::ensure_dir;

#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    lines: Vec<Line>,
}

#[derive(Debug, Clone)]
enum Line {
    /// Comments, blank lines, and anything else we do not manage.
    Verbatim(String),
    Variable { key: String, value: String },
}

impl EnvFile {
    /// Read an env file; a missing file yields an empty one bound to `path`.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                lines: Vec::new(),
            });
        }

        let contents = fs::read_to_string(path)
            .map_err(|err| Error::io(format!("Failed to read {}", path.display()), err))?;
        let lines = contents.lines().map(parse_line).collect();
        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn vars(&self) -> HashMap<String, String> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Variable { key, value } => Some((key.clone(), unquote(value).to_string())),
                Line::Verbatim(_) => None,
            })
            .collect()
    }

    /// Update `key` in place, or append it at the end of the file.
    pub fn set(&mut self, key: &str, value: &str) {
        for line in &mut self.lines {
            if let Line::Variable {
                key: existing,
                value: existing_value,
            } = line
            {
                if existing == key {
                    *existing_value = value.to_string();
                    return;
                }
            }
        }
        self.lines.push(Line::Variable {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
        }

        let mut contents = self
            .lines
            .iter()
            .map(|line| match line {
                Line::Verbatim(raw) => raw.clone(),
                Line::Variable { key, value } => format!("{key}={value}"),
            })
            .collect::<Vec<_>>()
            .join("\n");
        contents.push('\n');

        fs::write(&self.path, contents)
            .map_err(|err| Error::io(format!("Failed to write {}", self.path.display()), err))
    }
}

fn parse_line(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Verbatim(line.to_string());
    }
    let Some((key, value)) = trimmed.split_once('=') else {
        return Line::Verbatim(line.to_string());
    };
    let key = key.trim();
    if key.is_empty() || !is_valid_key(key) {
        return Line::Verbatim(line.to_string());
    }
    Line::Variable {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn is_valid_key(key: &str) -> bool {
    key.chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}
