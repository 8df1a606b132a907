//! luapack-lib: build-variant orchestration for a native game with a Lua layer.
//!
//! The crate is organised around one immutable [`variant::ResolvedConfig`]:
//! - `config`: optional `luapack.toml` settings and project root discovery
//! - `variant`: maps a requested build variant to every path and command of a run
//! - `scripts`: compiles (or copies) the Lua tree into the staging root
//! - `package`: native build, staging, and assembly of the destination folder
//! - `stamp`: keeps the generated build-info header in sync with the revision
//! - `cloc`: line-count report over the project sources

pub mod cloc;
pub mod config;
pub mod consts;
pub mod package;
pub mod process;
pub mod scripts;
pub mod stamp;
pub mod util;
pub mod variant;
