//! Build variants and packaging destinations.
//!
//! A run is described by two enumerations: the [`BuildVariant`] the user asked
//! for and the [`DestinationKind`] it packages into. The destination follows
//! from the variant unless `--standalone` overrides it. Both are folded into a
//! single immutable [`ResolvedConfig`] by [`resolve`].

mod resolve;

use std::fmt;

use serde::Serialize;

pub use resolve::{AssetRoots, Destination, ResolvedConfig, ScriptRules, Toolchain, VariantRequest, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BuildVariant {
  /// Development build run from the IDE. Only the native build happens.
  #[default]
  Editor,
  /// Packaged like a release, but scripts stay as source and hotloading and
  /// debug info are kept, so packaged-only bugs can be chased.
  PackagedDebug,
  PackagedRelease,
}

impl BuildVariant {
  /// Build configuration name passed to the native toolchain.
  pub fn configuration(self) -> &'static str {
    match self {
      BuildVariant::Editor => "Editor",
      BuildVariant::PackagedDebug => "PackagedDebug",
      BuildVariant::PackagedRelease => "PackagedRelease",
    }
  }

  /// Subdirectory of the library folder holding this variant's prebuilt libs.
  pub fn lib_subdir(self) -> &'static str {
    match self {
      BuildVariant::Editor | BuildVariant::PackagedDebug => "debug",
      BuildVariant::PackagedRelease => "release",
    }
  }

  pub fn script_mode(self) -> ScriptMode {
    match self {
      BuildVariant::PackagedRelease => ScriptMode::Compile,
      BuildVariant::Editor | BuildVariant::PackagedDebug => ScriptMode::Verbatim,
    }
  }

  pub fn default_destination(self) -> DestinationKind {
    match self {
      BuildVariant::Editor => DestinationKind::DevelopmentEnvironment,
      BuildVariant::PackagedDebug | BuildVariant::PackagedRelease => DestinationKind::DistributionPlatform,
    }
  }
}

impl fmt::Display for BuildVariant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.configuration())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DestinationKind {
  /// A fresh timestamped folder under the project root.
  NewFolder,
  /// The folder the distribution platform uploads from.
  DistributionPlatform,
  /// No packaging; the IDE runs the build in place.
  DevelopmentEnvironment,
}

impl fmt::Display for DestinationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      DestinationKind::NewFolder => "new folder",
      DestinationKind::DistributionPlatform => "distribution platform",
      DestinationKind::DevelopmentEnvironment => "development environment",
    };
    f.write_str(s)
  }
}

/// How the script tree reaches the staging root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScriptMode {
  /// Every eligible file goes through the bytecode compiler.
  Compile,
  /// The tree is copied as source.
  Verbatim,
}
