//! Implementation of the default packaging run.
//!
//! Resolves the requested variant once, then hands the resulting configuration
//! to the library pipeline and prints a summary.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use luapack_lib::config::Settings;
use luapack_lib::package::{self, Outcome};
use luapack_lib::variant::{VariantRequest, resolve};

use crate::output::{self, OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

pub fn cmd_package(root: &Path, settings: &Settings, request: &VariantRequest, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let config = resolve(root, settings, request);
  debug!(config = ?config, "resolved configuration");

  if !output.is_json() {
    let target = match &config.destination.folder {
      Some(folder) => folder.display().to_string(),
      None => config.destination.kind.to_string(),
    };
    print_info(&format!(
      "Building {} {} {}",
      config.variant,
      output::symbols::ARROW,
      target
    ));
  }

  let outcome = package::run(&config).with_context(|| format!("Failed to build {}", config.variant))?;

  if output.is_json() {
    return print_json(&outcome);
  }

  println!();
  match outcome {
    Outcome::BuiltOnly { variant } => {
      print_success(&format!("Built {} (no packaging)", variant));
    }
    Outcome::Packaged(report) => {
      print_success(&format!("Finished building for {}", report.variant));
      print_stat("Destination", &report.destination.display().to_string());
      if report.overridden {
        print_stat("Kind", &format!("{} (--standalone)", report.destination_kind));
      } else {
        print_stat("Kind", &report.destination_kind.to_string());
      }
      print_stat(
        "Scripts",
        &format!("{} staged, {} excluded", report.scripts_staged, report.scripts_excluded),
      );
      print_stat("Assets", &report.assets_copied.to_string());
      print_stat("Files", &report.files.len().to_string());
    }
  }
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
