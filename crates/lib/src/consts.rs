//! Shared constants.

/// Suffix appended to the output script path to locate the meta file.
pub const META_SUFFIX: &str = ".meta";

/// Variable that a leading `~` in a template line expands to.
pub const HOME_VAR: &str = "HOME";

/// Separator for list-valued variables such as `PATH`.
pub const LIST_SEPARATOR: char = ':';

/// Prefix marking a variable as internal: computed but never exported.
pub const INTERNAL_PREFIX: char = '.';
