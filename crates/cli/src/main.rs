mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use luapack_lib::config::{Settings, project_root};
use luapack_lib::variant::{BuildVariant, VariantRequest};

use crate::output::{OutputFormat, print_error};

/// luapack - build and package the game for a given variant
#[derive(Parser)]
#[command(name = "luapack")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("variant").args(["release", "debug_release", "editor"])))]
struct Cli {
  /// Package a release build with compiled Lua bytecode
  #[arg(long)]
  release: bool,

  /// Package a debug build that keeps Lua source and hotloading
  #[arg(long = "debug_release")]
  debug_release: bool,

  /// Build for the editor only, without packaging (default)
  #[arg(long)]
  editor: bool,

  /// Package into a fresh timestamped folder instead of the variant's default
  #[arg(long)]
  standalone: bool,

  /// Bundle the C runtime libraries next to the executable
  #[arg(long = "package-crt")]
  package_crt: bool,

  /// Print a source line count and exit
  #[arg(long, conflicts_with = "stamp")]
  cloc: bool,

  /// Update the generated build-info header from the current revision and exit
  #[arg(long)]
  stamp: bool,

  /// Project root (default: $LUAPACK_PROJECT, then the current directory)
  #[arg(long, value_name = "DIR")]
  project: Option<PathBuf>,

  /// Output format for the run summary
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn variant(&self) -> BuildVariant {
    if self.release {
      BuildVariant::PackagedRelease
    } else if self.debug_release {
      BuildVariant::PackagedDebug
    } else {
      BuildVariant::Editor
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("luapack={default_level},luapack_lib={default_level}")));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  let root = project_root(cli.project.as_deref()).context("Failed to locate project root")?;
  let settings = Settings::load(&root).context("Failed to load settings")?;

  if cli.cloc {
    return cmd::cmd_cloc(&root, &settings);
  }

  if cli.stamp {
    return cmd::cmd_stamp(&root, &settings, cli.output);
  }

  let request = VariantRequest::new(cli.variant())
    .standalone(cli.standalone)
    .package_runtime(cli.package_crt);

  cmd::cmd_package(&root, &settings, &request, cli.output)
}
