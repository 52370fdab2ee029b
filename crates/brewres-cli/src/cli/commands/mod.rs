//! CLI command handlers, one file per mode.

mod package;
mod process;
mod requirements;

pub use package::run_package;
pub use requirements::run_requirements;
