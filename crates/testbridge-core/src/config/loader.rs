//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path
        .extension()
        .is_some_and(|e| e == "yaml" || e == "yml")
    {
        "YAML"
    } else {
        "TOML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find a configuration file in the directory or its parents.
///
/// The first name from [`config_file_names`] found while walking towards the
/// filesystem root wins.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults
pub fn load_config_or_default(dir: &Path) -> (Config, Option<PathBuf>) {
    match load_config_from_dir(dir) {
        Ok((config, path)) => (config, Some(path)),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "no usable config found, using defaults");
            (Config::default(), None)
        }
    }
}

/// Write a configuration file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = if path
        .extension()
        .is_some_and(|e| e == "yaml" || e == "yml")
    {
        serde_yaml::to_string(config).map_err(ConfigError::YamlError)?
    } else {
        toml::to_string_pretty(config).map_err(ConfigError::TomlSerialize)?
    };

    std::fs::write(path, content).map_err(ConfigError::Io)?;
    info!(path = %path.display(), "config written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("testbridge.toml");
        std::fs::write(&config_path, "[engine]\nname = \"NUnit\"").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_walks_up() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".testbridge.yaml");
        std::fs::write(&config_path, "engine:\n  name: NUnit\n").unwrap();
        let nested = temp.path().join("bin").join("Debug");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_prefers_toml_over_yaml() {
        let temp = TempDir::new().unwrap();
        let toml_path = temp.path().join("testbridge.toml");
        std::fs::write(&toml_path, "").unwrap();
        std::fs::write(temp.path().join("testbridge.yaml"), "").unwrap();

        assert_eq!(find_config(temp.path()).unwrap(), toml_path);
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("testbridge.toml");
        std::fs::write(
            &config_path,
            "[engine]\nmin_version = \"2.6.0.0\"\nmax_version = \"2.6.65536.65536\"\nfirst_stable_version = \"2.6.0.12051\"\n\n[discovery]\nruntime_version = \"v2.0.50727\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.engine.min_version.to_string(), "2.6.0.0");
        assert_eq!(config.discovery.runtime_version, "v2.0.50727");
        assert_eq!(config.engine.required_files.len(), 3);
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("testbridge.yaml");
        std::fs::write(
            &config_path,
            "categories:\n  include: [Fast]\n  exclude: [Slow, Database]\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.categories.include, vec!["Fast"]);
        assert_eq!(config.categories.exclude.len(), 2);
    }

    #[test]
    fn test_load_rejects_invalid_policy() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("testbridge.toml");
        std::fs::write(
            &config_path,
            "[engine]\nmin_version = \"3.0.0.0\"\nmax_version = \"2.0.0.0\"\n",
        )
        .unwrap();

        assert!(load_config(&config_path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("testbridge.toml");
        let mut config = Config::default();
        config.categories.exclude = vec!["Integration".to_string()];

        save_config(&config, &config_path).unwrap();
        let loaded = load_config(&config_path).unwrap();
        assert_eq!(loaded.categories.exclude, vec!["Integration"]);
    }
}
