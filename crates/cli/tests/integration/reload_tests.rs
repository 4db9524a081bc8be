//! Reload round-trip tests through a real shell.

use super::common::{TestEnv, env};

const CONFIG: &str = "
# tools
[.root]
/opt/tools

[PATH]
${.root}/bin
~/bin

[TOOLS_HOME]
${.root}
";

#[test]
fn second_reload_reproduces_first() {
  if cfg!(windows) {
    return;
  }

  let test_env = TestEnv::with_config(CONFIG);
  let live = env(&[("PATH", "/usr/bin:/bin"), ("HOME", "/home/u")]);

  test_env.reload(&live);
  let first_script = test_env.script();
  let sourced = test_env.source(&live, &["PATH", "TOOLS_HOME"]);
  assert_eq!(sourced["PATH"], "/opt/tools/bin:/home/u/bin:/usr/bin:/bin");
  assert_eq!(sourced["TOOLS_HOME"], "/opt/tools");

  test_env.reload(&sourced);
  assert_eq!(test_env.script(), first_script);
  assert_eq!(test_env.source(&sourced, &["PATH", "TOOLS_HOME"]), sourced);
}

#[test]
fn removed_variables_are_cleaned_up() {
  if cfg!(windows) {
    return;
  }

  let test_env = TestEnv::with_config(CONFIG);
  let live = env(&[("PATH", "/usr/bin"), ("HOME", "/home/u")]);

  test_env.reload(&live);
  let sourced = test_env.source(&live, &["PATH", "TOOLS_HOME"]);

  test_env.write_config("[PATH]\n/usr/local/bin\n");
  test_env.reload(&sourced);

  let script = test_env.script();
  assert!(script.contains("export PATH=\"/usr/local/bin:/usr/bin\"\n"));
  assert!(script.ends_with("unset \"TOOLS_HOME\"\n"));

  let meta = test_env.meta();
  assert!(meta["conf"].get("TOOLS_HOME").is_none());
  assert_eq!(meta["create"], serde_json::json!([]));

  let after = test_env.source(&sourced, &["PATH", "TOOLS_HOME"]);
  assert_eq!(after["PATH"], "/usr/local/bin:/usr/bin");
  assert!(!after.contains_key("TOOLS_HOME"));
}

#[test]
fn dropped_variable_is_restored() {
  if cfg!(windows) {
    return;
  }

  let test_env = TestEnv::with_config("[MANPATH]\n/opt/man\n");
  let live = env(&[("MANPATH", "/usr/share/man")]);

  test_env.reload(&live);
  let sourced = test_env.source(&live, &["MANPATH"]);
  assert_eq!(sourced["MANPATH"], "/opt/man:/usr/share/man");

  test_env.write_config("# nothing configured\n");
  test_env.reload(&sourced);

  assert_eq!(test_env.script(), "export MANPATH=\"/usr/share/man\"\n");
  assert_eq!(test_env.source(&sourced, &["MANPATH"])["MANPATH"], "/usr/share/man");
}
