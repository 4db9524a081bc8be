//! Dependency-ordered expansion of config variables.
//!
//! Each config variable is expanded after every variable its templates
//! reference, using a depth-first walk. A variable requested while it is
//! still on the walk's stack is a dependency cycle.
//!
//! Two maps come out of a resolution:
//!
//! - the *expand-as* map: every value a variable stands for when referenced,
//!   i.e. its config values followed by its inherited baseline values
//! - the *desired* map: only the values produced by config expansion, which
//!   become the injected state

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::reconcile::Baseline;
use crate::template::{Template, TemplateError};
use crate::types::{Environment, VarLists, split_list};

/// Errors that can occur during resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("recursive environment variable dependency in '{name}'")]
  Cycle { name: String },

  #[error(transparent)]
  Template(#[from] TemplateError),
}

/// Walk state of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitState {
  #[default]
  Unvisited,
  InProgress,
  Done,
}

/// Output of a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
  /// Variable → every value it expands to when referenced.
  pub expand_as: HashMap<String, Vec<String>>,

  /// Config variable → values produced by config expansion, in the order the
  /// variables were first expanded.
  pub desired: VarLists,

  /// Config variables absent from the baseline environment.
  pub created: BTreeSet<String>,

  /// Variables scheduled for `unset` by baseline recovery, passed through.
  pub unset: Vec<String>,
}

/// Expand every variable declared in `config` against `baseline`.
///
/// # Errors
///
/// Returns [`ResolveError::Cycle`] on a dependency cycle and
/// [`ResolveError::Template`] on a malformed template line.
pub fn resolve(config: &Config, baseline: &Baseline) -> Result<Resolution, ResolveError> {
  let mut resolver = Resolver::new(config, &baseline.env);
  for name in config.names() {
    resolver.visit(name)?;
  }

  Ok(Resolution {
    expand_as: resolver.expand_as,
    desired: resolver.desired,
    created: resolver.created,
    unset: baseline.unset.clone(),
  })
}

struct Resolver<'a> {
  config: &'a Config,
  env: &'a Environment,
  status: HashMap<String, VisitState>,
  expand_as: HashMap<String, Vec<String>>,
  desired: VarLists,
  created: BTreeSet<String>,
}

impl<'a> Resolver<'a> {
  fn new(config: &'a Config, env: &'a Environment) -> Self {
    Self {
      config,
      env,
      status: HashMap::new(),
      expand_as: HashMap::new(),
      desired: VarLists::new(),
      created: BTreeSet::new(),
    }
  }

  fn state(&self, name: &str) -> VisitState {
    self.status.get(name).copied().unwrap_or_default()
  }

  fn visit(&mut self, name: &str) -> Result<(), ResolveError> {
    match self.state(name) {
      VisitState::Done => return Ok(()),
      VisitState::InProgress => return Err(ResolveError::Cycle { name: name.to_string() }),
      VisitState::Unvisited => {}
    }
    self.status.insert(name.to_string(), VisitState::InProgress);

    let config = self.config;
    let mut values = Vec::new();

    if let Some(lines) = config.lines(name) {
      if !self.env.contains_key(name) {
        debug!(name, "variable will be created");
        self.created.insert(name.to_string());
      }
      // Reserve the slot so output order follows the start of expansion.
      self.desired.insert(name.to_string(), Vec::new());

      for line in lines {
        let template = Template::parse(line)?;
        for dependency in template.references() {
          self.visit(dependency)?;
        }
        values.extend(template.expand(&self.expand_as)?);
      }
      self.desired.insert(name.to_string(), values.clone());
    }

    if let Some(existing) = self.env.get(name) {
      values.extend(split_list(existing));
    }

    if values.is_empty() {
      values.push(String::new());
    }

    self.expand_as.insert(name.to_string(), values);
    self.status.insert(name.to_string(), VisitState::Done);
    Ok(())
  }
}
