//! Escaping integration tests.

use super::common::{TestEnv, env};

#[test]
fn special_characters_survive_sourcing() {
  if cfg!(windows) {
    return;
  }

  let test_env = TestEnv::with_config("[MSG]\nprice $$5 \"quoted\" back\\slash\n");
  let live = env(&[]);

  test_env.reload(&live);
  assert_eq!(
    test_env.script(),
    "export MSG=\"price \\$5 \\\"quoted\\\" back\\\\slash\"\n"
  );

  let sourced = test_env.source(&live, &["MSG"]);
  assert_eq!(sourced["MSG"], "price $5 \"quoted\" back\\slash");
}

#[test]
fn inherited_value_with_dollar_is_not_expanded() {
  if cfg!(windows) {
    return;
  }

  let test_env = TestEnv::with_config("[LIST]\n/opt/a\n");
  let live = env(&[("LIST", "$HOME/raw"), ("HOME", "/home/u")]);

  test_env.reload(&live);
  let sourced = test_env.source(&live, &["LIST"]);
  assert_eq!(sourced["LIST"], "/opt/a:$HOME/raw");
}
