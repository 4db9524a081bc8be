//! Full reload: config → baseline recovery → resolution → script + meta file.
//!
//! A reload either completes and writes both the script and the meta file, or
//! fails before writing anything the caller could mistake for a valid result.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::context::RunContext;
use crate::meta::{MetaError, MetaState, MetaStore};
use crate::reconcile::{Baseline, recover_baseline};
use crate::render::{ShellScript, render};
use crate::resolve::{ResolveError, resolve};

/// Errors that can abort a reload.
#[derive(Debug, Error)]
pub enum ReloadError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Meta(#[from] MetaError),

  #[error("failed to write output script {path}: {source}")]
  WriteScript {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Options for a reload.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReloadOptions {
  /// Compute everything but write neither the script nor the meta file.
  pub dry_run: bool,
}

/// Outcome of a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadResult {
  pub script: ShellScript,

  /// State recorded for the next reload.
  pub meta: MetaState,

  /// The environment with the previous reload's injections removed.
  pub baseline: Baseline,
}

/// Compute a reload without touching the filesystem beyond reading inputs.
pub fn plan(ctx: &RunContext) -> Result<ReloadResult, ReloadError> {
  let config = Config::load(ctx.config_path(), ctx.home())?;
  debug!(variables = config.len(), "parsed config");

  let previous = MetaStore::new(ctx.meta_path()).load()?.unwrap_or_default();
  let baseline = recover_baseline(ctx.env(), &previous);

  let resolution = resolve(&config, &baseline)?;
  let script = render(&resolution, &baseline, ctx.env());

  let meta = MetaState {
    conf: resolution.desired,
    create: resolution.created.into_iter().collect(),
  };

  Ok(ReloadResult { script, meta, baseline })
}

/// Run a reload, writing the script and then the meta file.
pub fn reload(ctx: &RunContext, options: &ReloadOptions) -> Result<ReloadResult, ReloadError> {
  let result = plan(ctx)?;

  if options.dry_run {
    info!("dry run, nothing written");
    return Ok(result);
  }

  write_script(ctx.output_path(), &result.script)?;
  MetaStore::new(ctx.meta_path()).save(&result.meta)?;

  info!(
    output = %ctx.output_path().display(),
    exports = result.script.export_count(),
    unsets = result.script.unset_count(),
    "reload complete"
  );
  Ok(result)
}

fn write_script(path: &Path, script: &ShellScript) -> Result<(), ReloadError> {
  let write_err = |source: io::Error| ReloadError::WriteScript {
    path: path.to_path_buf(),
    source,
  };

  let mut temp_path = OsString::from(path.as_os_str());
  temp_path.push(".tmp");
  let temp_path = PathBuf::from(temp_path);

  fs::write(&temp_path, script.to_string()).map_err(write_err)?;
  fs::rename(&temp_path, path).map_err(write_err)?;
  Ok(())
}
