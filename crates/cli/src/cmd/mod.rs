mod cloc;
mod package;
mod stamp;

pub use cloc::cmd_cloc;
pub use package::cmd_package;
pub use stamp::cmd_stamp;
