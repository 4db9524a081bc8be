//! Status command implementation.
//!
//! Displays what the last reload injected, read from its meta file.

use std::path::Path;

use anyhow::Result;

use sysenv_lib::context::meta_path_for;
use sysenv_lib::meta::MetaStore;
use sysenv_lib::types::is_internal;

use crate::output::{self, OutputFormat, print_error, print_info, print_json, print_stat, print_success};

pub fn cmd_status(output_path: &Path, format: OutputFormat, verbose: bool) -> Result<()> {
  let store = MetaStore::new(meta_path_for(output_path));

  let meta = match store.load() {
    Ok(Some(meta)) => meta,
    Ok(None) => {
      if format.is_json() {
        print_json(&serde_json::json!({ "meta_path": store.path(), "recorded": false }))?;
      } else {
        print_info("No previous reload recorded. Run 'sysenv reload' to create one.");
      }
      return Ok(());
    }
    Err(e) => {
      print_error(&format!("Error loading meta file {}: {}", store.path().display(), e));
      return Err(e.into());
    }
  };

  if format.is_json() {
    let json_output = serde_json::json!({ "meta_path": store.path(), "recorded": true, "conf": meta.conf, "create": meta.create });
    print_json(&json_output)?;
    return Ok(());
  }

  let exported = meta.conf.keys().filter(|name| !is_internal(name)).count();

  print_success(&format!("Last reload: {}", output_path.display()));
  print_stat("Variables", &meta.conf.len().to_string());
  print_stat("Exported", &exported.to_string());
  print_stat("Created", &meta.create.len().to_string());

  if !meta.conf.is_empty() {
    println!();
    println!("Injected:");
    for (name, values) in &meta.conf {
      let marker = if meta.created(name) {
        output::symbols::ADD
      } else {
        output::symbols::MODIFY
      };
      println!("  {} {} ({} value(s))", marker, name, values.len());
      if verbose {
        for value in values {
          println!("      {} {}", output::symbols::ARROW, value);
        }
      }
    }
  }

  Ok(())
}
