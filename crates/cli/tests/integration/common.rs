//! Shared test helpers for CLI integration tests.

use std::collections::BTreeMap;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Marker printed by the probe script for an unset variable.
const UNSET_MARKER: &str = "\u{1}";

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the config, the
/// generated script and its meta file.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
  pub output_path: PathBuf,
}

impl TestEnv {
  /// Create with the given config content.
  pub fn with_config(content: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("env.conf");
    let output_path = temp.path().join("env.sh");
    std::fs::write(&config_path, content).unwrap();
    Self {
      temp,
      config_path,
      output_path,
    }
  }

  /// Replace the config content.
  pub fn write_config(&self, content: &str) {
    std::fs::write(&self.config_path, content).unwrap();
  }

  pub fn meta_path(&self) -> PathBuf {
    let mut path = self.output_path.clone().into_os_string();
    path.push(".meta");
    PathBuf::from(path)
  }

  pub fn script(&self) -> String {
    std::fs::read_to_string(&self.output_path).unwrap()
  }

  pub fn meta(&self) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(self.meta_path()).unwrap()).unwrap()
  }

  /// A `sysenv` command running with exactly the given environment.
  pub fn sysenv_cmd(&self, env: &BTreeMap<String, String>) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("sysenv");
    cmd.env_clear().envs(env);
    cmd
  }

  /// Run `sysenv reload` under `env` and assert success.
  pub fn reload(&self, env: &BTreeMap<String, String>) {
    self
      .sysenv_cmd(env)
      .arg("reload")
      .arg(&self.config_path)
      .arg(&self.output_path)
      .assert()
      .success();
  }

  /// Source the generated script with `/bin/sh` under `env` and report the
  /// resulting values of `names` (absent if unset).
  pub fn source(&self, env: &BTreeMap<String, String>, names: &[&str]) -> BTreeMap<String, String> {
    let mut probe = format!(". '{}'\n", self.output_path.display());
    for name in names {
      probe.push_str(&format!(
        "if [ -n \"${{{name}+x}}\" ]; then printf '%s\\0' \"${name}\"; else printf '{UNSET_MARKER}\\0'; fi\n"
      ));
    }

    let output = std::process::Command::new("/bin/sh")
      .arg("-c")
      .arg(&probe)
      .env_clear()
      .envs(env)
      .output()
      .unwrap();
    assert!(output.status.success(), "sourcing failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut sourced = env.clone();
    for (name, value) in names.iter().zip(stdout.split('\0')) {
      if value == UNSET_MARKER {
        sourced.remove(*name);
      } else {
        sourced.insert(name.to_string(), value.to_string());
      }
    }
    sourced
  }
}

/// Build an environment map from pairs.
pub fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
  pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
