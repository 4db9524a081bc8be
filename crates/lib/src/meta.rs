//! Meta state storage.
//!
//! The meta file records what the previous reload injected so the next reload
//! can strip it back out of the live environment.
//!
//! # Format
//!
//! ```json
//! {
//!   "conf": { "PATH": ["/opt/bin", "/home/user/bin"] },
//!   "create": ["TOOLS_HOME"]
//! }
//! ```

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::VarLists;

/// Errors that can occur while reading or writing the meta file.
#[derive(Debug, Error)]
pub enum MetaError {
  #[error("failed to read meta file: {0}")]
  Read(#[source] io::Error),

  #[error("failed to parse meta file: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize meta state: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write meta file: {0}")]
  Write(#[source] io::Error),
}

/// What a reload injected into the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaState {
  /// Variable name → values injected by config expansion, in order.
  #[serde(default)]
  pub conf: VarLists,

  /// Variables that did not exist before the reload that injected them.
  #[serde(default)]
  pub create: Vec<String>,
}

impl MetaState {
  /// Whether `name` was created by the recorded reload.
  pub fn created(&self, name: &str) -> bool {
    self.create.iter().any(|created| created == name)
  }

  pub fn is_empty(&self) -> bool {
    self.conf.is_empty() && self.create.is_empty()
  }
}

/// Reads and writes the meta file at a fixed path.
#[derive(Debug, Clone)]
pub struct MetaStore {
  path: PathBuf,
}

impl MetaStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn temp_path(&self) -> PathBuf {
    let mut path = OsString::from(self.path.as_os_str());
    path.push(".tmp");
    PathBuf::from(path)
  }

  /// Load the recorded state.
  ///
  /// Returns `Ok(None)` if no reload has been recorded yet.
  pub fn load(&self) -> Result<Option<MetaState>, MetaError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "no meta file, starting from empty state");
        return Ok(None);
      }
      Err(e) => return Err(MetaError::Read(e)),
    };

    let state: MetaState = serde_json::from_str(&content).map_err(MetaError::Parse)?;
    Ok(Some(state))
  }

  /// Save the state.
  ///
  /// Uses atomic write (write to temp, then rename) to prevent corruption.
  pub fn save(&self, state: &MetaState) -> Result<(), MetaError> {
    let temp_path = self.temp_path();
    let content = serde_json::to_string(state).map_err(MetaError::Serialize)?;
    fs::write(&temp_path, &content).map_err(MetaError::Write)?;
    fs::rename(&temp_path, &self.path).map_err(MetaError::Write)?;
    debug!(path = %self.path.display(), "saved meta state");
    Ok(())
  }
}
