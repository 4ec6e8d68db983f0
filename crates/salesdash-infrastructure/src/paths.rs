//! Path management for salesdash configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/salesdash/         # Config directory (platform default)
//! └── config.toml              # Backend URL, timeouts, polling, chat policy
//! ```

use std::path::PathBuf;

use salesdash_core::{DashError, Result};

const APP_DIR: &str = "salesdash";
const CONFIG_FILE: &str = "config.toml";

pub struct SalesdashPaths;

impl SalesdashPaths {
    /// Returns the salesdash configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/salesdash/`)
    /// - `Err(DashError::Config)`: Could not determine the platform config directory
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DashError::config("Cannot find config directory"))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
