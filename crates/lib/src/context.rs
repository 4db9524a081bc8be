//! Per-run context.
//!
//! Everything a reload needs from the outside world is captured once into a
//! [`RunContext`] and passed down explicitly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::consts::{HOME_VAR, META_SUFFIX};
use crate::types::Environment;

/// Immutable inputs for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
  config_path: PathBuf,
  output_path: PathBuf,
  meta_path: PathBuf,
  env: Environment,
  home: Option<String>,
}

impl RunContext {
  /// Build a context from an explicit environment snapshot.
  pub fn new(config_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, env: Environment) -> Self {
    let config_path = config_path.into();
    let output_path = output_path.into();
    let meta_path = meta_path_for(&output_path);
    let home = env.get(HOME_VAR).filter(|home| !home.is_empty()).cloned();
    Self {
      config_path,
      output_path,
      meta_path,
      env,
      home,
    }
  }

  /// Build a context from the current process environment.
  ///
  /// Variables whose name or value is not valid UTF-8 are skipped.
  pub fn from_process(config_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
    let env = std::env::vars_os()
      .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
      .collect();
    Self::new(config_path, output_path, env)
  }

  pub fn config_path(&self) -> &Path {
    &self.config_path
  }

  pub fn output_path(&self) -> &Path {
    &self.output_path
  }

  /// Path of the meta file recording the previous run's injections.
  pub fn meta_path(&self) -> &Path {
    &self.meta_path
  }

  /// The live environment captured at run start.
  pub fn env(&self) -> &Environment {
    &self.env
  }

  pub fn home(&self) -> Option<&str> {
    self.home.as_deref()
  }
}

/// Meta file path for an output script: the output path with `.meta` appended.
pub fn meta_path_for(output_path: &Path) -> PathBuf {
  let mut path = OsString::from(output_path.as_os_str());
  path.push(META_SUFFIX);
  PathBuf::from(path)
}
