use anyhow::{Context, Result};
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "getent-query";

/// Get the config directory, without creating it
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join(APP_DIR_NAME))
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn data_base_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .context("Unable to determine user data directory")
}

/// Get the data directory, creating it when missing
pub fn data_dir() -> Result<PathBuf> {
    let data_dir = data_base_dir()?.join(APP_DIR_NAME);

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory at {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Directory holding the getent command log
pub fn logs_dir() -> Result<PathBuf> {
    let logs_dir = data_dir()?.join("logs");
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("creating logs directory at {}", logs_dir.display()))?;
    Ok(logs_dir)
}

/// Logs directory path for read-only access; nothing is created
pub fn logs_dir_path() -> Result<PathBuf> {
    Ok(data_base_dir()?.join(APP_DIR_NAME).join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_dir_path_is_absolute() {
        let path = logs_dir_path().unwrap();
        assert!(path.is_absolute(), "{}", path.display());
        assert!(path.ends_with("getent-query/logs"));
        assert!(!path.to_string_lossy().contains('~'));
    }
}
