use std::path::{Path, PathBuf};

pub const LASTSYNC_HOME_DIR: &str = ".lastsync";

/// `~/.lastsync`, or a relative `.lastsync` when no home directory exists.
pub fn lastsync_home() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(LASTSYNC_HOME_DIR),
        None => PathBuf::from(LASTSYNC_HOME_DIR),
    }
}

pub fn expand_tilde_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }

    if path_str == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }

    path.to_path_buf()
}

/// Masks all but the first few characters of a secret for display.
pub fn redact_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(3).collect();
    if secret.chars().count() <= 3 {
        return "***".to_string();
    }
    format!("{visible}***")
}
