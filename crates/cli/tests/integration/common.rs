//! Shared test helpers for CLI integration tests.

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Settings that replace msbuild, LuaJIT and git with `/bin/sh` one-liners.
pub const SHELL_TOOLCHAIN: &str = r#"
[native]
program = "/bin/sh"
args = ["-c", "exit 0"]

[scripts]
compiler = "/bin/sh"
compiler_args = ["-c", '{ echo "-- compiled"; cat "$0"; } > "$1"', "{input}", "{output}"]

[revision]
program = "/bin/sh"
args = ["-c", "echo abc123"]
"#;

/// Isolated project checkout.
///
/// Each test gets its own temporary directory laid out like the game
/// repository, with a settings file pointing the toolchain at `/bin/sh`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self::empty();
    env.write_file("luapack.toml", SHELL_TOOLCHAIN);

    env.write_file("src/scripts/core/boot.lua", "return 1");
    env.write_file("src/scripts/data/boonbane/cards.lua", "return {}");
    for configuration in ["Editor", "PackagedDebug", "PackagedRelease"] {
      env.write_file(&format!("build/windows/x64/{configuration}/deepcopy.exe"), configuration);
    }
    for subdir in ["debug", "release"] {
      env.write_file(&format!("lib/{subdir}/steam_api64.dll"), subdir);
    }
    env.write_file("asset/audio/theme.ogg", "ogg");
    env.write_file("asset/steam/steam_appid.txt", "480");
    env
  }

  /// Create an empty test environment.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap()
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.temp.path().join(relative_path).exists()
  }

  /// Get a pre-configured Command for the luapack binary, pointed at this project.
  pub fn luapack_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("luapack");
    cmd.env_remove("RUST_LOG");
    cmd.env("LUAPACK_PROJECT", self.temp.path());
    cmd
  }
}
