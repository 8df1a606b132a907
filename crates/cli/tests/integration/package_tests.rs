use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn editor_build_skips_packaging() {
  let env = TestEnv::new();

  env
    .luapack_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Built Editor (no packaging)"));

  assert!(!env.exists("build/steam"));
}

#[test]
fn release_build_packages_to_distribution_folder() {
  let env = TestEnv::new();

  env
    .luapack_cmd()
    .arg("--release")
    .assert()
    .success()
    .stdout(predicate::str::contains("Finished building for PackagedRelease"));

  assert_eq!(env.read_file("build/steam/deepcopy.exe"), "PackagedRelease");
  assert!(env.read_file("build/steam/scripts/core/boot.lua").starts_with("-- compiled"));
  assert!(!env.exists("build/steam/scripts/data/boonbane"));
  assert!(env.exists("build/steam/asset/audio/theme.ogg"));
  assert_eq!(env.read_file("build/steam/steam_api64.dll"), "release");
  assert_eq!(env.read_file("build/steam/steam_appid.txt"), "480");
}

#[test]
fn debug_release_keeps_lua_source() {
  let env = TestEnv::new();

  env.luapack_cmd().arg("--debug_release").assert().success();

  assert_eq!(env.read_file("build/steam/scripts/core/boot.lua"), "return 1");
  assert_eq!(env.read_file("build/steam/steam_api64.dll"), "debug");
}

#[test]
fn standalone_reports_override() {
  let env = TestEnv::new();

  env
    .luapack_cmd()
    .args(["--release", "--standalone"])
    .assert()
    .success()
    .stdout(predicate::str::contains("deepcopy_"))
    .stdout(predicate::str::contains("(--standalone)"));

  assert!(!env.exists("build/steam"));
}

#[test]
fn json_output_is_valid() {
  let env = TestEnv::new();

  let output = env
    .luapack_cmd()
    .args(["--release", "-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(value["outcome"], "packaged");
  assert_eq!(value["variant"], "PackagedRelease");
  assert_eq!(value["scripts_excluded"], 1);
}

#[test]
fn failing_native_build_exits_non_zero() {
  let env = TestEnv::new();
  env.write_file(
    "luapack.toml",
    &super::common::SHELL_TOOLCHAIN.replace("exit 0", "exit 7"),
  );

  env
    .luapack_cmd()
    .arg("--release")
    .assert()
    .failure()
    .stderr(predicate::str::contains("native build failed"));

  assert!(!env.exists("build/steam"));
}
