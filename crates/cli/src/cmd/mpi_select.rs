//! Implementation of the `sysenv mpi-select` command.
//!
//! The mode is reserved; it is accepted so shell wrappers can call it, but it
//! performs no work and writes no files.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::output::print_warning;

pub fn cmd_mpi_select(config: &Path, output: &Path) -> Result<()> {
  debug!(config = %config.display(), output = %output.display(), "mpi-select requested");
  print_warning("mpi-select is not implemented yet; nothing was changed");
  Ok(())
}
