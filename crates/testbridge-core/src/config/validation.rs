//! Configuration validation

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::version::RuntimeVersion;

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_policy(config)?;
    validate_layout(config)?;
    validate_discovery(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_policy(config: &Config) -> Result<()> {
    let engine = &config.engine;

    if engine.name.trim().is_empty() {
        return Err(invalid("engine.name", "name cannot be empty"));
    }

    if engine.min_version > engine.max_version {
        return Err(invalid(
            "engine.min_version",
            &format!(
                "{} is greater than max_version {}",
                engine.min_version, engine.max_version
            ),
        ));
    }

    if engine.first_stable_version < engine.min_version
        || engine.first_stable_version > engine.max_version
    {
        return Err(invalid(
            "engine.first_stable_version",
            &format!(
                "must lie between {} and {}",
                engine.min_version, engine.max_version
            ),
        ));
    }

    Ok(())
}

fn validate_layout(config: &Config) -> Result<()> {
    let engine = &config.engine;

    if engine.required_files.is_empty() {
        return Err(invalid(
            "engine.required_files",
            "at least one required file is needed to verify an install",
        ));
    }

    if engine.runtime_variants.is_empty() {
        return Err(invalid(
            "engine.runtime_variants",
            "at least one runtime variant is required",
        ));
    }

    for (i, variant) in engine.runtime_variants.iter().enumerate() {
        if RuntimeVersion::parse(&variant.runtime_version).is_err() {
            return Err(invalid(
                &format!("engine.runtime_variants[{}].runtime_version", i),
                &format!("'{}' is not a runtime tag like v2.0.50727", variant.runtime_version),
            ));
        }
        if variant.dir.trim().is_empty() {
            return Err(invalid(
                &format!("engine.runtime_variants[{}].dir", i),
                "dir cannot be empty",
            ));
        }
    }

    for (i, pattern) in engine.stack_trace_filters.iter().enumerate() {
        if let Err(e) = Regex::new(pattern) {
            return Err(invalid(
                &format!("engine.stack_trace_filters[{}]", i),
                &e.to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_discovery(config: &Config) -> Result<()> {
    if RuntimeVersion::parse(&config.discovery.runtime_version).is_err() {
        return Err(invalid(
            "discovery.runtime_version",
            &format!(
                "'{}' is not a runtime tag like v4.0.30319",
                config.discovery.runtime_version
            ),
        ));
    }

    if config.discovery.engine_config_name.trim().is_empty() {
        return Err(invalid(
            "discovery.engine_config_name",
            "file name cannot be empty",
        ));
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> crate::error::BridgeError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::EngineVersion;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_first_stable_outside_bounds() {
        let mut config = Config::default();
        config.engine.first_stable_version = EngineVersion::new(2, 4, 8, 0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_runtime_tag() {
        let mut config = Config::default();
        config.discovery.runtime_version = "net40".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_required_files() {
        let mut config = Config::default();
        config.engine.required_files.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_stack_filter() {
        let mut config = Config::default();
        config.engine.stack_trace_filters.push("at (unclosed".to_string());
        assert!(validate_config(&config).is_err());
    }
}
