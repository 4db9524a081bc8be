//! Core value types shared across the reload pipeline.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::consts::{INTERNAL_PREFIX, LIST_SEPARATOR};

/// A snapshot of environment variables (name → value).
///
/// Ordered by name so every pass over it is deterministic.
pub type Environment = BTreeMap<String, String>;

/// Variable name → ordered list of values, in insertion order.
pub type VarLists = IndexMap<String, Vec<String>>;

/// Split a colon-list value into its non-empty segments.
pub fn split_list(value: &str) -> Vec<String> {
  value
    .split(LIST_SEPARATOR)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

/// Join values into a colon-list value.
pub fn join_list<S: AsRef<str>>(values: &[S]) -> String {
  let mut out = String::new();
  for (i, value) in values.iter().enumerate() {
    if i > 0 {
      out.push(LIST_SEPARATOR);
    }
    out.push_str(value.as_ref());
  }
  out
}

/// Whether a variable is internal (prefixed with `.`) and must not be exported.
pub fn is_internal(name: &str) -> bool {
  name.starts_with(INTERNAL_PREFIX)
}
