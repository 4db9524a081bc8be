//! Baseline recovery.
//!
//! The live environment still contains whatever the previous reload injected.
//! Recovery strips those values back out, giving the environment as it would
//! be without this tool. Variables the previous reload created, and that are
//! empty once stripped, are dropped and scheduled for `unset`.

use tracing::debug;

use crate::consts::LIST_SEPARATOR;
use crate::meta::MetaState;
use crate::types::Environment;

/// The live environment with prior injections removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
  pub env: Environment,

  /// Variables that must be unset, in the order they were recorded.
  pub unset: Vec<String>,
}

/// Remove one injected value from a colon-list value.
///
/// Tried in order: exact match, leading `value:`, trailing `:value`, and
/// finally every interior `:value:` collapsed to `:`.
pub fn strip_injected(current: &str, injected: &str) -> String {
  if current == injected {
    return String::new();
  }

  if let Some(rest) = current
    .strip_prefix(injected)
    .and_then(|rest| rest.strip_prefix(LIST_SEPARATOR))
  {
    return rest.to_string();
  }

  if let Some(rest) = current
    .strip_suffix(injected)
    .and_then(|rest| rest.strip_suffix(LIST_SEPARATOR))
  {
    return rest.to_string();
  }

  let interior = format!("{LIST_SEPARATOR}{injected}{LIST_SEPARATOR}");
  current.replace(&interior, &LIST_SEPARATOR.to_string())
}

/// Recover the baseline environment from `live` using the previous run's record.
pub fn recover_baseline(live: &Environment, previous: &MetaState) -> Baseline {
  let mut env = live.clone();
  let mut unset = Vec::new();

  for (name, injected) in &previous.conf {
    let Some(current) = env.get_mut(name) else {
      continue;
    };

    for value in injected {
      let stripped = strip_injected(current, value);
      if stripped != *current {
        debug!(name, value, "stripped injected value");
      }
      *current = stripped;
    }

    if current.is_empty() && previous.created(name) {
      debug!(name, "created variable is now empty, scheduling unset");
      env.remove(name);
      unset.push(name.clone());
    }
  }

  Baseline { env, unset }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::render::exported_value;
  use crate::types::VarLists;
  use proptest::prelude::*;

  fn env(pairs: &[(&str, &str)]) -> Environment {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  fn meta(conf: &[(&str, &[&str])], create: &[&str]) -> MetaState {
    let conf: VarLists = conf
      .iter()
      .map(|(name, values)| (name.to_string(), values.iter().map(|v| v.to_string()).collect()))
      .collect();
    MetaState {
      conf,
      create: create.iter().map(|c| c.to_string()).collect(),
    }
  }

  #[test]
  fn strip_exact_match() {
    assert_eq!(strip_injected("/opt/bin", "/opt/bin"), "");
  }

  #[test]
  fn strip_prefix() {
    assert_eq!(strip_injected("/opt/bin:/usr/bin", "/opt/bin"), "/usr/bin");
  }

  #[test]
  fn strip_suffix() {
    assert_eq!(strip_injected("/usr/bin:/opt/bin", "/opt/bin"), "/usr/bin");
  }

  #[test]
  fn strip_interior_collapses_colons() {
    assert_eq!(strip_injected("/a:/opt/bin:/b:/opt/bin:/c", "/opt/bin"), "/a:/b:/c");
  }

  #[test]
  fn strip_prefers_prefix_over_interior() {
    assert_eq!(strip_injected("/x:/y:/x:/z", "/x"), "/y:/x:/z");
  }

  #[test]
  fn strip_absent_value_is_noop() {
    assert_eq!(strip_injected("/usr/bin:/bin", "/opt/bin"), "/usr/bin:/bin");
    assert_eq!(strip_injected("/opt/binary", "/opt/bin"), "/opt/binary");
  }

  #[test]
  fn recover_without_meta_is_identity() {
    let live = env(&[("PATH", "/usr/bin"), ("HOME", "/home/u")]);
    let baseline = recover_baseline(&live, &MetaState::default());
    assert_eq!(baseline.env, live);
    assert!(baseline.unset.is_empty());
  }

  #[test]
  fn recover_strips_values_in_recorded_order() {
    let live = env(&[("PATH", "/opt/bin:/home/u/bin:/usr/bin")]);
    let previous = meta(&[("PATH", &["/opt/bin", "/home/u/bin"])], &[]);
    let baseline = recover_baseline(&live, &previous);
    assert_eq!(baseline.env["PATH"], "/usr/bin");
  }

  #[test]
  fn recover_skips_variables_missing_from_live() {
    let live = env(&[("PATH", "/usr/bin")]);
    let previous = meta(&[("GONE", &["/x"])], &["GONE"]);
    let baseline = recover_baseline(&live, &previous);
    assert!(!baseline.env.contains_key("GONE"));
    assert!(baseline.unset.is_empty());
  }

  #[test]
  fn recover_unsets_emptied_created_variable() {
    let live = env(&[("TOOLS", "/opt/tools:/opt/more")]);
    let previous = meta(&[("TOOLS", &["/opt/tools", "/opt/more"])], &["TOOLS"]);
    let baseline = recover_baseline(&live, &previous);
    assert!(!baseline.env.contains_key("TOOLS"));
    assert_eq!(baseline.unset, vec!["TOOLS"]);
  }

  #[test]
  fn recover_keeps_emptied_preexisting_variable() {
    let live = env(&[("MANPATH", "/opt/man")]);
    let previous = meta(&[("MANPATH", &["/opt/man"])], &[]);
    let baseline = recover_baseline(&live, &previous);
    assert_eq!(baseline.env["MANPATH"], "");
    assert!(baseline.unset.is_empty());
  }

  #[test]
  fn recover_keeps_manual_additions_to_created_variable() {
    let live = env(&[("TOOLS", "/opt/tools:/manual")]);
    let previous = meta(&[("TOOLS", &["/opt/tools"])], &["TOOLS"]);
    let baseline = recover_baseline(&live, &previous);
    assert_eq!(baseline.env["TOOLS"], "/manual");
    assert!(baseline.unset.is_empty());
  }

  proptest! {
    #[test]
    fn inject_then_recover_round_trips(
      base in "[a-z/]{0,12}(:[a-z/]{1,12}){0,3}",
      injected in prop::collection::vec("[A-Z/]{1,8}", 1..4),
    ) {
      let exported = exported_value(&injected, Some(&base));
      let live = env(&[("VAR", exported.as_str())]);
      let previous = MetaState {
        conf: VarLists::from([("VAR".to_string(), injected.clone())]),
        create: Vec::new(),
      };
      let baseline = recover_baseline(&live, &previous);
      prop_assert_eq!(&baseline.env["VAR"], &base);
    }

    #[test]
    fn created_variable_round_trips_to_unset(
      injected in prop::collection::vec("[a-z/]{1,8}", 1..4),
    ) {
      let exported = exported_value(&injected, None);
      let live = env(&[("VAR", exported.as_str())]);
      let previous = MetaState {
        conf: VarLists::from([("VAR".to_string(), injected.clone())]),
        create: vec!["VAR".to_string()],
      };
      let baseline = recover_baseline(&live, &previous);
      prop_assert!(!baseline.env.contains_key("VAR"));
      prop_assert_eq!(baseline.unset, vec!["VAR".to_string()]);
    }
  }
}
