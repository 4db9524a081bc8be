//! Implementation of the `sysenv reload` command.
//!
//! Expands the config against the current process environment and writes the
//! script the calling shell sources immediately afterwards.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use sysenv_lib::context::RunContext;
use sysenv_lib::reload::{ReloadOptions, reload};

/// Execute the reload command.
///
/// - Captures the process environment
/// - Strips the previous reload's injections (from the meta file)
/// - Expands the config and writes the script, then the meta file
///
/// With `dry_run`, the script is printed to stdout and nothing is written.
pub fn cmd_reload(config: &Path, output: &Path, dry_run: bool) -> Result<()> {
  let ctx = RunContext::from_process(config, output);
  let options = ReloadOptions { dry_run };

  let result = reload(&ctx, &options).with_context(|| format!("Reload of {} failed", config.display()))?;

  if dry_run {
    print!("{}", result.script);
    return Ok(());
  }

  info!(
    path = %ctx.output_path().display(),
    meta = %ctx.meta_path().display(),
    "script written"
  );
  Ok(())
}
