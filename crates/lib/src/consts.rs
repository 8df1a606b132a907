/// Application name, used for log targets and the settings file name.
pub const APP_NAME: &str = "luapack";

/// Settings file looked up at the project root.
pub const SETTINGS_FILENAME: &str = "luapack.toml";

/// Environment variable naming the project root when `--project` is absent.
pub const PROJECT_ENV: &str = "LUAPACK_PROJECT";

/// Revision token recorded when the revision command is unavailable or fails.
pub const UNKNOWN_REVISION: &str = "Unknown";

/// Transient directory under the staging root that receives compiler output
/// before it is moved into place.
pub const COMPILE_WORK_DIR: &str = ".luapack-work";

/// Subdirectory of the destination folder that receives the asset tree.
pub const ASSET_DEST_DIR: &str = "asset";
