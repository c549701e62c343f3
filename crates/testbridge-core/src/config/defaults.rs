//! Default configuration values

use super::types::Config;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "testbridge.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "testbridge.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".testbridge.toml",
        ".testbridge.yaml",
    ]
}

/// Generate default configuration TOML
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# testbridge configuration

[engine]
name = "NUnit"
min_version = "2.5.0.0"
max_version = "2.5.65536.65536"
first_stable_version = "2.5.0.9122"
required_files = ["nunit.core.interfaces.dll", "nunit.core.dll", "nunit.util.dll"]
version_file = "VERSION"

[[engine.runtime_variants]]
runtime_version = "v1.1.4322"
dir = "net-1.1"

[[engine.runtime_variants]]
runtime_version = "v2.0.50727"
dir = "net-2.0"

[discovery]
runtime_version = "v4.0.30319"
engine_config_name = "testbridge-engines.toml"
developer_overrides = true

[categories]
include = []
exclude = []
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.engine.name, "NUnit");
        assert_eq!(config.engine.runtime_variants.len(), 2);
    }

    #[test]
    fn test_generated_default_roundtrips() {
        let text = default_config_toml();
        let config: Config = toml::from_str(&text).unwrap();
        assert_eq!(config.discovery.runtime_version, "v4.0.30319");
    }
}
