use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use super::{BuildVariant, DestinationKind, ScriptMode};
use crate::config::Settings;
use crate::process::{ToolCommand, expand_args, path_vars};
use crate::scripts::ExclusionRule;

/// Timestamp format for standalone folder names; sorts chronologically.
const STANDALONE_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRequest {
  pub variant: BuildVariant,
  /// Force a fresh timestamped folder regardless of variant.
  pub standalone: bool,
  /// Bundle the C runtime libraries next to the executable.
  pub package_runtime: bool,
  /// Captured once so resolution stays a pure function.
  pub requested_at: NaiveDateTime,
}

impl VariantRequest {
  pub fn new(variant: BuildVariant) -> Self {
    Self {
      variant,
      standalone: false,
      package_runtime: false,
      requested_at: Local::now().naive_local(),
    }
  }

  pub fn standalone(mut self, standalone: bool) -> Self {
    self.standalone = standalone;
    self
  }

  pub fn package_runtime(mut self, package_runtime: bool) -> Self {
    self.package_runtime = package_runtime;
    self
  }

  pub fn at(mut self, requested_at: NaiveDateTime) -> Self {
    self.requested_at = requested_at;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
  pub kind: DestinationKind,
  /// `None` only for [`DestinationKind::DevelopmentEnvironment`].
  pub folder: Option<PathBuf>,
  /// True when `--standalone` replaced the variant's default.
  pub overridden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoots {
  pub root: PathBuf,
  pub atlas: PathBuf,
  pub audio: PathBuf,
  pub fonts: PathBuf,
  pub shaders: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub native_build: ToolCommand,
  pub compiler: PathBuf,
  pub compiler_args: Vec<String>,
  pub compiler_dir: PathBuf,
}

impl Toolchain {
  /// The compiler invocation for one script.
  pub fn compile_command(&self, input: &Path, output: &Path) -> ToolCommand {
    let vars = path_vars(&[("input", input), ("output", output)]);
    ToolCommand::new(&self.compiler)
      .args(expand_args(&self.compiler_args, &vars))
      .cwd(&self.compiler_dir)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRules {
  pub mode: ScriptMode,
  pub extension: String,
  pub compiled_extension: String,
  /// Staged paths mirror the source tree relative to this directory.
  pub mirror_base: PathBuf,
  pub strip_segment: String,
  pub exclusions: Vec<ExclusionRule>,
}

/// Every path, command and flag of one run. Built once by [`resolve`] and
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
  pub variant: BuildVariant,
  pub project_root: PathBuf,
  pub source_root: PathBuf,
  pub script_root: PathBuf,
  pub library_root: PathBuf,
  pub build_root: PathBuf,
  pub assets: AssetRoots,
  pub build_file: PathBuf,
  pub bytecode_root: PathBuf,
  pub executable_name: String,
  pub executable_path: PathBuf,
  pub destination: Destination,
  pub bundle_runtime: bool,
  pub toolchain: Toolchain,
  pub scripts: ScriptRules,
  /// Copied to the destination root on every packaged run.
  pub platform_files: Vec<PathBuf>,
  /// Copied to the destination root only when `bundle_runtime` is set.
  pub runtime_files: Vec<PathBuf>,
}

/// Resolve a request against the project layout.
///
/// Pure: paths are computed, never checked for existence.
pub fn resolve(project_root: &Path, settings: &Settings, request: &VariantRequest) -> ResolvedConfig {
  let layout = &settings.layout;
  let variant = request.variant;

  let source_root = project_root.join(&layout.source_dir);
  let script_root = source_root.join(&layout.script_dir);
  let library_root = project_root.join(&layout.lib_dir).join(variant.lib_subdir());
  let build_root = project_root.join(&layout.build_dir);
  let bytecode_root = build_root.join(&layout.bytecode_dir);

  let asset_root = project_root.join(&layout.asset_dir);
  let assets = AssetRoots {
    atlas: asset_root.join(&layout.atlas_dir),
    audio: asset_root.join(&layout.audio_dir),
    fonts: asset_root.join(&layout.font_dir),
    shaders: asset_root.join(&layout.shader_dir),
    root: asset_root,
  };

  let build_file = build_root.join(&settings.native.build_file);
  let executable_name = settings.native.executable.clone();
  let executable_path = build_root
    .join(&layout.platform_dir)
    .join(variant.configuration())
    .join(&executable_name);

  let destination = if request.standalone {
    let stamp = request.requested_at.format(STANDALONE_TIMESTAMP);
    Destination {
      kind: DestinationKind::NewFolder,
      folder: Some(project_root.join(format!("{}_{}", layout.standalone_prefix, stamp))),
      overridden: true,
    }
  } else {
    let kind = variant.default_destination();
    let folder = match kind {
      DestinationKind::DistributionPlatform => Some(project_root.join(&layout.distribution_dir)),
      DestinationKind::NewFolder | DestinationKind::DevelopmentEnvironment => None,
    };
    Destination {
      kind,
      folder,
      overridden: false,
    }
  };

  let native_vars: BTreeMap<&str, &OsStr> = [
    ("build_file", build_file.as_os_str()),
    ("configuration", OsStr::new(variant.configuration())),
  ]
  .into_iter()
  .collect();
  let native_build = ToolCommand::new(&settings.native.program)
    .args(expand_args(&settings.native.args, &native_vars))
    .cwd(project_root);

  let compiler_dir = match &settings.scripts.compiler_dir {
    Some(dir) => project_root.join(dir),
    None => build_root.clone(),
  };
  let toolchain = Toolchain {
    native_build,
    compiler: compiler_dir.join(&settings.scripts.compiler),
    compiler_args: settings.scripts.compiler_args.clone(),
    compiler_dir,
  };

  let scripts = ScriptRules {
    mode: variant.script_mode(),
    extension: settings.scripts.extension.clone(),
    compiled_extension: settings.scripts.compiled_extension.clone(),
    mirror_base: project_root.to_path_buf(),
    strip_segment: settings.scripts.strip_segment.clone(),
    exclusions: settings.scripts.exclude.iter().map(ExclusionRule::new).collect(),
  };

  let distribution = &settings.distribution;
  let platform_files = vec![
    library_root.join(&distribution.platform_library),
    assets.root.join(&distribution.platform_identity),
  ];
  let runtime_files = distribution
    .runtime_libraries
    .iter()
    .map(|lib| library_root.join(lib))
    .collect();

  ResolvedConfig {
    variant,
    project_root: project_root.to_path_buf(),
    source_root,
    script_root,
    library_root,
    build_root,
    assets,
    build_file,
    bytecode_root,
    executable_name,
    executable_path,
    destination,
    bundle_runtime: request.package_runtime,
    toolchain,
    scripts,
    platform_files,
    runtime_files,
  }
}
