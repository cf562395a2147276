//! Host platform (linux for example) utility functions

use std::env;
use std::path::PathBuf;

use uname;

/// Name of the environment variable pointing at the software root.
///
/// The root contains the `params` directory and is where session directories
/// are created.
pub const SW_ROOT_ENV_VAR: &str = "AUTO_DRIVER_ROOT";

/// Retrieve uname information.
pub fn get_uname() -> std::io::Result<uname::Info> {
    uname::uname()
}

/// Get the software root directory from the `AUTO_DRIVER_ROOT` environment
/// variable.
pub fn get_auto_driver_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
