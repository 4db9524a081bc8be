//! Shell script generation.
//!
//! Turns a resolution into POSIX `export`/`unset` statements. Exports come
//! first: the desired state, then restorations of variables that dropped out
//! of the config. Unsets come last.

use std::fmt;

use tracing::debug;

use crate::reconcile::Baseline;
use crate::resolve::Resolution;
use crate::types::{Environment, is_internal, join_list};

/// A single shell statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellLine {
  /// `export NAME="value"`; `value` is unescaped.
  Export { name: String, value: String },

  /// `unset "NAME"`
  Unset { name: String },
}

impl fmt::Display for ShellLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShellLine::Export { name, value } => write!(f, "export {}=\"{}\"", name, escape_double_quoted(value)),
      ShellLine::Unset { name } => write!(f, "unset \"{}\"", name),
    }
  }
}

/// A rendered, sourceable shell script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellScript {
  lines: Vec<ShellLine>,
}

impl ShellScript {
  pub fn lines(&self) -> &[ShellLine] {
    &self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Number of `export` statements.
  pub fn export_count(&self) -> usize {
    self
      .lines
      .iter()
      .filter(|line| matches!(line, ShellLine::Export { .. }))
      .count()
  }

  /// Number of `unset` statements.
  pub fn unset_count(&self) -> usize {
    self.lines.len() - self.export_count()
  }

  /// Look up the exported value of `name`, if any.
  pub fn exported(&self, name: &str) -> Option<&str> {
    self.lines.iter().find_map(|line| match line {
      ShellLine::Export { name: n, value } if n == name => Some(value.as_str()),
      _ => None,
    })
  }
}

impl fmt::Display for ShellScript {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for line in &self.lines {
      writeln!(f, "{}", line)?;
    }
    Ok(())
  }
}

/// Escape a value for embedding between double quotes in POSIX shell.
pub fn escape_double_quoted(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"").replace('$', "\\$")
}

/// The value exported for a variable: its desired values colon-joined, with
/// the baseline value (if the variable exists there) as the final segment.
pub fn exported_value(desired: &[String], baseline: Option<&str>) -> String {
  match baseline {
    Some(existing) => {
      let mut segments: Vec<&str> = desired.iter().map(String::as_str).collect();
      segments.push(existing);
      join_list(&segments)
    }
    None => join_list(desired),
  }
}

/// Render the script for `resolution`.
///
/// `live` is the environment as captured before baseline recovery; a variable
/// no longer in the config is restored only if its baseline differs from it.
pub fn render(resolution: &Resolution, baseline: &Baseline, live: &Environment) -> ShellScript {
  let mut lines = Vec::new();
  let mut unset = resolution.unset.clone();

  for (name, values) in &resolution.desired {
    if is_internal(name) {
      continue;
    }
    unset.retain(|pending| pending != name);

    let value = exported_value(values, baseline.env.get(name).map(String::as_str));
    lines.push(ShellLine::Export {
      name: name.clone(),
      value,
    });
  }

  for (name, value) in &baseline.env {
    if resolution.desired.contains_key(name) || unset.contains(name) {
      continue;
    }
    if live.get(name) == Some(value) {
      continue;
    }
    debug!(name, "restoring variable dropped from config");
    lines.push(ShellLine::Export {
      name: name.clone(),
      value: value.clone(),
    });
  }

  lines.extend(unset.into_iter().map(|name| ShellLine::Unset { name }));

  ShellScript { lines }
}
