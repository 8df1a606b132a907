use std::fs;

use luapack_lib::package::{Outcome, PackageError, run};
use luapack_lib::variant::{BuildVariant, DestinationKind, VariantRequest};

use super::common::{EXECUTABLE, Project, tree, write_file};

fn packaged(outcome: Outcome) -> luapack_lib::package::PackageReport {
  match outcome {
    Outcome::Packaged(report) => report,
    other => panic!("expected a packaged run, got {other:?}"),
  }
}

#[test]
fn editor_stops_after_native_build() {
  let project = Project::new();
  let config = project.resolve_variant(BuildVariant::Editor);

  let outcome = run(&config).unwrap();

  assert!(matches!(outcome, Outcome::BuiltOnly { variant: BuildVariant::Editor }));
  assert!(!config.bytecode_root.exists(), "no scripts are staged for the editor");
  assert!(!project.root().join("build").join("steam").exists());
}

#[test]
fn release_packages_compiled_scripts() {
  let project = Project::new();
  let config = project.resolve_variant(BuildVariant::PackagedRelease);

  let report = packaged(run(&config).unwrap());
  let dest = project.root().join("build").join("steam");

  assert_eq!(report.destination, dest);
  assert_eq!(report.destination_kind, DestinationKind::DistributionPlatform);
  assert_eq!(
    tree(&dest),
    vec![
      "asset/audio/theme.ogg",
      "asset/fonts/mono.ttf",
      "asset/images/atlas/main.png",
      "asset/shaders/solid.glsl",
      "asset/steam/steam_appid.txt",
      EXECUTABLE,
      "scripts/core/boot.lua",
      "scripts/core/y.lua",
      "scripts/data/x.lua",
      "steam_api64.dll",
      "steam_appid.txt",
    ]
  );

  let y = fs::read_to_string(dest.join("scripts").join("core").join("y.lua")).unwrap();
  assert!(y.starts_with("-- compiled"));
  assert_eq!(fs::read_to_string(dest.join(EXECUTABLE)).unwrap(), "PackagedRelease");
  assert_eq!(fs::read_to_string(dest.join("steam_api64.dll")).unwrap(), "release");
  assert_eq!(report.scripts_staged, 4);
  assert_eq!(report.scripts_excluded, 1);
}

#[test]
fn debug_release_packages_source_scripts() {
  let project = Project::new();
  let config = project.resolve_variant(BuildVariant::PackagedDebug);

  packaged(run(&config).unwrap());
  let dest = project.root().join("build").join("steam");

  let y = fs::read_to_string(dest.join("scripts").join("core").join("y.lua")).unwrap();
  assert_eq!(y, "return 'y'");
  assert!(dest.join("scripts").join("README.md").exists());
  assert!(!dest.join("scripts").join("data").join("boonbane").exists());
  assert_eq!(fs::read_to_string(dest.join("steam_api64.dll")).unwrap(), "debug");
}

#[test]
fn rerun_clears_stale_destination_entries() {
  let project = Project::new();
  let config = project.resolve_variant(BuildVariant::PackagedRelease);
  let dest = project.root().join("build").join("steam");

  packaged(run(&config).unwrap());
  let first = tree(&dest);

  write_file(&dest.join("stale.txt"), "old");
  write_file(&dest.join("old_build").join("deepcopy.pdb"), "old");
  #[cfg(unix)]
  std::os::unix::fs::symlink(project.root().join("asset"), dest.join("asset_link")).unwrap();

  let report = packaged(run(&config).unwrap());

  assert_eq!(tree(&dest), first);
  assert!(!dest.join("asset_link").exists());
  assert!(report.cleared >= 3);
  assert!(project.root().join("asset").join("audio").join("theme.ogg").exists());
}

#[test]
fn standalone_packages_into_timestamped_folder() {
  let project = Project::new();
  let config = project.resolve(VariantRequest::new(BuildVariant::PackagedRelease).standalone(true));

  let report = packaged(run(&config).unwrap());

  assert_eq!(report.destination, project.root().join("deepcopy_20250102_030405"));
  assert_eq!(report.destination_kind, DestinationKind::NewFolder);
  assert!(report.overridden);
  assert!(report.destination.join(EXECUTABLE).exists());
  assert!(!project.root().join("build").join("steam").exists());
}

#[test]
fn editor_standalone_packages_source_scripts() {
  let project = Project::new();
  let config = project.resolve(VariantRequest::new(BuildVariant::Editor).standalone(true));

  let report = packaged(run(&config).unwrap());
  let dest = project.root().join("deepcopy_20250102_030405");

  assert_eq!(report.variant, BuildVariant::Editor);
  assert_eq!(report.destination, dest);
  assert_eq!(report.destination_kind, DestinationKind::NewFolder);
  assert!(report.overridden);

  let y = fs::read_to_string(dest.join("scripts").join("core").join("y.lua")).unwrap();
  assert_eq!(y, "return 'y'");
  assert!(dest.join("scripts").join("README.md").exists());
  assert!(!dest.join("scripts").join("data").join("boonbane").exists());
  assert_eq!(fs::read_to_string(dest.join(EXECUTABLE)).unwrap(), "Editor");
  assert_eq!(fs::read_to_string(dest.join("steam_api64.dll")).unwrap(), "debug");
  assert!(!project.root().join("build").join("steam").exists());
}

#[test]
fn package_crt_bundles_runtime_libraries() {
  let project = Project::new();
  let config = project.resolve(VariantRequest::new(BuildVariant::PackagedRelease).package_runtime(true));

  let report = packaged(run(&config).unwrap());
  let dest = report.destination;

  for name in ["vcruntime140.dll", "vcruntime140_1.dll", "msvcp140.dll"] {
    assert!(dest.join(name).exists(), "{name} should be bundled");
  }
}

#[test]
fn runtime_libraries_are_not_bundled_by_default() {
  let project = Project::new();
  let config = project.resolve_variant(BuildVariant::PackagedRelease);

  let report = packaged(run(&config).unwrap());

  assert!(!report.destination.join("vcruntime140.dll").exists());
}

#[test]
fn failed_native_build_stops_before_staging() {
  let mut project = Project::new();
  project.fail_native_build();
  let config = project.resolve_variant(BuildVariant::PackagedRelease);

  let err = run(&config).unwrap_err();

  assert!(matches!(err, PackageError::NativeBuild(_)));
  assert!(!config.bytecode_root.exists());
}

#[test]
fn compiler_failure_leaves_destination_untouched() {
  let mut project = Project::new();
  project.fail_compiler();
  let config = project.resolve_variant(BuildVariant::PackagedRelease);
  let dest = project.root().join("build").join("steam");
  write_file(&dest.join("previous.txt"), "from last run");

  let err = run(&config).unwrap_err();

  assert!(matches!(err, PackageError::Scripts(_)));
  assert!(dest.join("previous.txt").exists());
}

#[test]
fn missing_executable_is_fatal() {
  let project = Project::new();
  let config = project.resolve_variant(BuildVariant::PackagedRelease);
  fs::remove_file(&config.executable_path).unwrap();

  let err = run(&config).unwrap_err();

  assert!(matches!(err, PackageError::Fs(_)));
}
