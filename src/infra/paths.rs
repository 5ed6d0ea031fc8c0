// src/infra/paths.rs - Config path resolution
//
// DISHHUB_HOME overrides everything. Otherwise config lives in ~/.dishhub/.

use std::path::PathBuf;

/// Returns the DISHHUB_HOME override, if set.
fn dishhub_home() -> Option<PathBuf> {
    std::env::var_os("DISHHUB_HOME").map(PathBuf::from)
}

/// Home directory, if the platform can tell us one.
pub fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf())
}

/// Configuration directory: $DISHHUB_HOME/ or ~/.dishhub/
pub fn config_dir() -> PathBuf {
    if let Some(home) = dishhub_home() {
        return home;
    }
    dirs_home()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dishhub")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
