pub mod file;

use std::path::{Path, PathBuf};

pub use file::{Config, ConfigStorage, LoggingConfig, RenderConfig, TomlConfigStorage};

/// Default config file location.
///
/// XDG Base Directory Specification:
/// - Config: $XDG_CONFIG_HOME/termpix/termpix.toml (default: ~/.config/termpix/termpix.toml)
///
/// Returns `None` when neither `XDG_CONFIG_HOME` nor a home directory is known.
pub fn default_config_path(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    let config_dir = match xdg_config_home {
        Some(xdg) if !xdg.as_os_str().is_empty() => xdg.join("termpix"),
        _ => home?.join(".config/termpix"),
    };
    Some(config_dir.join("termpix.toml"))
}

/// Expand a leading `~` to `home`.
///
/// Only `~` on its own or followed by `/` is expanded; `~user` forms and
/// paths without a known home directory are returned unchanged.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
