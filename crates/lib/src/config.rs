//! Project settings.
//!
//! Every directory and tool name the packager uses has a default matching the
//! game's repository layout. A project can override any of them with an
//! optional `luapack.toml` at its root:
//!
//! ```toml
//! [native]
//! executable = "mygame.exe"
//!
//! [scripts]
//! exclude = ["scripts/data/boonbane", "scripts/dev"]
//! ```
//!
//! A missing settings file is not an error. A malformed one is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{PROJECT_ENV, SETTINGS_FILENAME};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read settings {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("invalid settings {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("project root {} is not accessible: {source}", path.display())]
  ProjectRoot { path: PathBuf, source: io::Error },
}

/// Contents of `luapack.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
  pub layout: LayoutSettings,
  pub native: NativeSettings,
  pub scripts: ScriptSettings,
  pub distribution: DistributionSettings,
  pub build_info: BuildInfoSettings,
  pub revision: RevisionSettings,
  pub cloc: ClocSettings,
}

/// Directory layout, relative to the project root unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSettings {
  pub source_dir: PathBuf,
  /// Relative to `source_dir`.
  pub script_dir: PathBuf,
  /// Parent of the `debug`/`release` library folders.
  pub lib_dir: PathBuf,
  pub build_dir: PathBuf,
  /// Relative to `build_dir`.
  pub bytecode_dir: PathBuf,
  /// Relative to `build_dir`; executables land in `<platform_dir>/<configuration>`.
  pub platform_dir: PathBuf,
  pub asset_dir: PathBuf,
  /// The four named asset folders, relative to `asset_dir`.
  pub atlas_dir: PathBuf,
  pub audio_dir: PathBuf,
  pub font_dir: PathBuf,
  pub shader_dir: PathBuf,
  /// Destination for packaged variants.
  pub distribution_dir: PathBuf,
  /// Standalone folders are named `<prefix>_<YYYYmmdd_HHMMSS>`.
  pub standalone_prefix: String,
}

impl Default for LayoutSettings {
  fn default() -> Self {
    Self {
      source_dir: "src".into(),
      script_dir: "scripts".into(),
      lib_dir: "lib".into(),
      build_dir: PathBuf::from("build").join("windows"),
      bytecode_dir: "bytecode".into(),
      platform_dir: "x64".into(),
      asset_dir: "asset".into(),
      atlas_dir: PathBuf::from("images").join("atlas"),
      audio_dir: "audio".into(),
      font_dir: "fonts".into(),
      shader_dir: "shaders".into(),
      distribution_dir: PathBuf::from("build").join("steam"),
      standalone_prefix: "deepcopy".to_string(),
    }
  }
}

/// Native toolchain invocation.
///
/// `args` may reference `{build_file}` and `{configuration}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NativeSettings {
  pub program: String,
  pub args: Vec<String>,
  /// Relative to the build directory.
  pub build_file: PathBuf,
  pub executable: String,
}

impl Default for NativeSettings {
  fn default() -> Self {
    Self {
      program: "msbuild".to_string(),
      args: strings(&["{build_file}", "/p:Configuration={configuration}"]),
      build_file: "DeepCopy.sln".into(),
      executable: "deepcopy.exe".to_string(),
    }
  }
}

/// Lua compilation rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptSettings {
  /// Bytecode compiler, resolved against `compiler_dir`.
  ///
  /// This must be the exact LuaJIT build linked into the game. Bytecode from a
  /// different commit loads as garbage, and nothing here can detect that.
  pub compiler: PathBuf,
  /// Working directory for the compiler (it needs its `jit/` modules beside
  /// it). Defaults to the build directory.
  pub compiler_dir: Option<PathBuf>,
  /// May reference `{input}` and `{output}`.
  pub compiler_args: Vec<String>,
  pub extension: String,
  pub compiled_extension: String,
  /// Path segment dropped when mirroring the source tree into the staging root.
  pub strip_segment: String,
  /// Paths under the staging root removed after every script pass.
  pub exclude: Vec<PathBuf>,
}

impl Default for ScriptSettings {
  fn default() -> Self {
    Self {
      compiler: "luajit-2.1.0-beta3".into(),
      compiler_dir: None,
      compiler_args: strings(&["-b", "{input}", "{output}"]),
      extension: "lua".to_string(),
      compiled_extension: "lua".to_string(),
      strip_segment: "src".to_string(),
      exclude: vec![PathBuf::from("scripts").join("data").join("boonbane")],
    }
  }
}

/// Files shipped beside the executable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistributionSettings {
  /// Shared library copied from the variant's library folder.
  pub platform_library: PathBuf,
  /// Identity file copied from the asset folder.
  pub platform_identity: PathBuf,
  /// C runtime libraries copied from the library folder with `--package-crt`.
  pub runtime_libraries: Vec<PathBuf>,
}

impl Default for DistributionSettings {
  fn default() -> Self {
    Self {
      platform_library: "steam_api64.dll".into(),
      platform_identity: PathBuf::from("steam").join("steam_appid.txt"),
      runtime_libraries: vec![
        "vcruntime140.dll".into(),
        "vcruntime140_1.dll".into(),
        "msvcp140.dll".into(),
      ],
    }
  }
}

/// The generated header holding the source revision.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildInfoSettings {
  pub path: PathBuf,
  pub declaration_type: String,
  pub symbol: String,
}

impl Default for BuildInfoSettings {
  fn default() -> Self {
    Self {
      path: PathBuf::from("src").join("build_info.hpp"),
      declaration_type: "const char*".to_string(),
      symbol: "GIT_HASH".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevisionSettings {
  pub program: String,
  pub args: Vec<String>,
}

impl Default for RevisionSettings {
  fn default() -> Self {
    Self {
      program: "git".to_string(),
      args: strings(&["rev-parse", "--short", "HEAD"]),
    }
  }
}

/// Line-count report. Patterns use `/` on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClocSettings {
  pub program: String,
  pub targets: Vec<PathBuf>,
  pub exclude_dirs: Vec<String>,
  pub exclude_files: Vec<String>,
}

impl Default for ClocSettings {
  fn default() -> Self {
    Self {
      program: "cloc".to_string(),
      targets: vec!["src".into(), "scripts".into()],
      exclude_dirs: strings(&[
        "src/imgui",
        "scripts/engine/data",
        "scripts/engine/libs",
        "scripts/user/data",
      ]),
      exclude_files: strings(&["scripts/engine/core/cimgui.lua", "scripts/engine/data/cimgui.lua"]),
    }
  }
}

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

impl Settings {
  /// Load `luapack.toml` from the project root, falling back to defaults when
  /// the file does not exist.
  pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
    let path = project_root.join(SETTINGS_FILENAME);

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Self::default());
      }
      Err(source) => return Err(ConfigError::Read { path, source }),
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
  }
}

/// Determine the project root.
///
/// Priority order:
/// 1. Explicit path (`--project`)
/// 2. `LUAPACK_PROJECT` environment variable
/// 3. The current directory
///
/// The result is canonicalized so every derived path is absolute.
pub fn project_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
  let candidate = match explicit {
    Some(path) => path.to_path_buf(),
    None => match std::env::var_os(PROJECT_ENV) {
      Some(value) if !value.is_empty() => PathBuf::from(value),
      _ => PathBuf::from("."),
    },
  };

  dunce::canonicalize(&candidate).map_err(|source| ConfigError::ProjectRoot { path: candidate, source })
}
