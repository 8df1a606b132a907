use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn stamp_writes_header_then_skips() {
  let env = TestEnv::new();

  env
    .luapack_cmd()
    .arg("--stamp")
    .assert()
    .success()
    .stdout(predicate::str::contains("Updated build info with revision abc123"));

  assert_eq!(env.read_file("src/build_info.hpp"), "const char* GIT_HASH = \"abc123\";\n");

  env
    .luapack_cmd()
    .arg("--stamp")
    .assert()
    .success()
    .stdout(predicate::str::contains("skipping generation"));
}

#[test]
fn stamp_without_vcs_records_unknown() {
  let env = TestEnv::new();
  env.write_file(
    "luapack.toml",
    &super::common::SHELL_TOOLCHAIN.replace("echo abc123", "exit 128"),
  );

  env.luapack_cmd().arg("--stamp").assert().success();

  assert_eq!(env.read_file("src/build_info.hpp"), "const char* GIT_HASH = \"Unknown\";\n");
}

#[test]
fn stamp_json_reports_status() {
  let env = TestEnv::new();

  env
    .luapack_cmd()
    .args(["--stamp", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"status\": \"regenerated\""))
    .stdout(predicate::str::contains("\"revision\": \"abc123\""));
}
