//! Environment config file parsing.
//!
//! The config file is a list of sections. A section header names one or more
//! variables; every template line below it is appended to each of them.
//!
//! ```text
//! # comment
//! [PATH MANPATH]
//! ~/.local/share
//!
//! [.prefix]
//! /opt/tools
//!
//! [PATH]
//! ${.prefix}/bin
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::consts::HOME_VAR;

/// Errors that can occur while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("line {line}: the environment name '{text}' is invalid")]
  InvalidHeader { line: usize, text: String },

  #[error("line {line}: '~' is used, but $HOME is not set")]
  HomeUnset { line: usize },

  #[error("line {line}: '{text}' appears before any section header")]
  OrphanLine { line: usize, text: String },
}

/// Parsed config: variable name → raw template lines, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
  vars: IndexMap<String, Vec<String>>,
}

impl Config {
  /// Read and parse a config file.
  ///
  /// `home` is the home directory used to validate `~` lines; `None` means unknown.
  pub fn load(path: &Path, home: Option<&str>) -> Result<Self, ConfigError> {
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded config");
    Self::parse(&source, home)
  }

  /// Parse config text.
  ///
  /// # Errors
  ///
  /// - [`ConfigError::InvalidHeader`] if a header contains no valid names
  /// - [`ConfigError::HomeUnset`] if a line starts with `~` and `home` is `None`
  /// - [`ConfigError::OrphanLine`] if a template line precedes every header
  pub fn parse(source: &str, home: Option<&str>) -> Result<Self, ConfigError> {
    let mut vars: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut current: Vec<String> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
      let line_no = index + 1;
      let line = raw.trim_matches(|c| matches!(c, '\r' | '\n' | '\t' | ' '));

      if line.is_empty() || line.starts_with('#') {
        continue;
      }

      if let Some(inner) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        let names = header_names(inner);
        if names.is_empty() {
          return Err(ConfigError::InvalidHeader {
            line: line_no,
            text: line.to_string(),
          });
        }
        for name in &names {
          vars.entry(name.clone()).or_default();
        }
        current = names;
        continue;
      }

      if current.is_empty() {
        return Err(ConfigError::OrphanLine {
          line: line_no,
          text: line.to_string(),
        });
      }

      let template = match line.strip_prefix('~') {
        Some(rest) => {
          if home.is_none() {
            return Err(ConfigError::HomeUnset { line: line_no });
          }
          format!("${}{}", HOME_VAR, rest)
        }
        None => line.to_string(),
      };

      for name in &current {
        if let Some(lines) = vars.get_mut(name) {
          lines.push(template.clone());
        }
      }
    }

    Ok(Self { vars })
  }

  /// Template lines declared for `name`.
  pub fn lines(&self, name: &str) -> Option<&[String]> {
    self.vars.get(name).map(Vec::as_slice)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.vars.contains_key(name)
  }

  /// Declared variable names, in order of first mention.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.vars.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.vars.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vars.is_empty()
  }
}

/// Extract variable names from a header body.
///
/// Names are `.?[A-Za-z_][A-Za-z0-9_]*`; anything between names is ignored,
/// so spaces and commas both work as separators.
fn header_names(inner: &str) -> Vec<String> {
  let bytes = inner.as_bytes();
  let is_start = |b: u8| b.is_ascii_alphabetic() || b == b'_';
  let is_cont = |b: u8| b.is_ascii_alphanumeric() || b == b'_';

  let mut names = Vec::new();
  let mut i = 0;
  while i < bytes.len() {
    let start = i;
    let mut j = i;
    if bytes[j] == b'.' && j + 1 < bytes.len() && is_start(bytes[j + 1]) {
      j += 1;
    }
    if !is_start(bytes[j]) {
      i += 1;
      continue;
    }
    j += 1;
    while j < bytes.len() && is_cont(bytes[j]) {
      j += 1;
    }
    names.push(inner[start..j].to_string());
    i = j;
  }
  names
}
