use std::{env, path::PathBuf};

/// Returns the user's home directory.
///
/// Reads `HOME`; falls back to the current directory when it is unset.
pub fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the user's config directory following XDG Base Directory Specification
///
/// Checks `XDG_CONFIG_HOME`; if unset, defaults to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Location of the configuration file.
///
/// `SQLREST_CONFIG` wins when set, otherwise `$XDG_CONFIG_HOME/sqlrest/config.toml`.
pub fn config_path() -> PathBuf {
    match env::var("SQLREST_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("sqlrest").join("config.toml"),
    }
}
