//! Path utilities for the Zellij sandbox.
//!
//! In the sandbox `/host` points at the cwd of the last focused terminal (or
//! wherever Zellij was started), which is usually the user's home directory.

use std::path::{Path, PathBuf};

/// File name of the span export inside the data directory.
pub const SPANS_FILE: &str = "country-browser-spans.jsonl";

const HOST_ROOT: &str = "/host";

/// Returns `/host/.local/share/zellij/country-browser`.
///
/// # Examples
///
/// ```
/// use country_browser::infrastructure::get_data_dir;
///
/// assert_eq!(
///     get_data_dir().to_str(),
///     Some("/host/.local/share/zellij/country-browser")
/// );
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(Path::new(HOST_ROOT))
}

/// The data directory below an arbitrary host root.
#[must_use]
pub fn resolve_data_dir(host_root: &Path) -> PathBuf {
    host_root
        .join(".local")
        .join("share")
        .join("zellij")
        .join("country-browser")
}

/// Maps `~` paths onto the sandbox's `/host` mount.
///
/// # Examples
///
/// ```
/// use country_browser::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/nord.toml"), "/host/themes/nord.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// assert_eq!(expand_tilde("~user/theme.toml"), "~user/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        format!("{HOST_ROOT}/{rest}")
    } else if path == "~" {
        HOST_ROOT.to_string()
    } else {
        path.to_string()
    }
}
