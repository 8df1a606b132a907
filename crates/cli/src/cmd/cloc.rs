use std::path::Path;

use anyhow::{Context, Result};

use luapack_lib::cloc::report;
use luapack_lib::config::Settings;

pub fn cmd_cloc(root: &Path, settings: &Settings) -> Result<()> {
  report(root, &settings.cloc).context("Line count failed")
}
