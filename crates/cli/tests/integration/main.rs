mod common;

#[cfg(unix)]
mod package_tests;
#[cfg(unix)]
mod stamp_tests;
