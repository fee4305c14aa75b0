use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log file used by every command except `times <file>`.
    pub default_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_file: PathBuf::from("times.txt"),
        }
    }
}

/// `~/.tasktimes/config.json`, if there is a home directory.
pub fn config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".tasktimes");
    path.push("config.json");
    Some(path)
}

pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Reads the config at `path`; a missing file means defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Can't read config: {}", path.display()))?;
    let config = serde_json::from_str(&data)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_default() -> Result<()> {
        let dir = tempdir()?;
        let config = load_config_from(&dir.path().join("config.json"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_config() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_file": "/tmp/work.txt" }"#)?;

        let config = load_config_from(&path)?;
        assert_eq!(config.default_file, PathBuf::from("/tmp/work.txt"));
        Ok(())
    }

    #[test]
    fn test_empty_object_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "{}")?;

        assert_eq!(load_config_from(&path)?, Config::default());
        Ok(())
    }

    #[test]
    fn test_malformed_config_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "default_file = times.txt")?;

        assert!(load_config_from(&path).is_err());
        Ok(())
    }
}
