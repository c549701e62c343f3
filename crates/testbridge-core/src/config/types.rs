//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::version::EngineVersion;

/// Main configuration for testbridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine product and selection policy
    pub engine: EngineConfig,

    /// Where engine candidates are discovered
    pub discovery: DiscoveryConfig,

    /// Process-wide category defaults
    pub categories: CategoryConfig,
}

/// Engine product configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Product name used in runner labels and warnings (e.g. "NUnit")
    pub name: String,

    /// Where users download the engine
    pub download_url: String,

    /// Where users download the host integration that bundles an engine
    pub host_download_url: String,

    /// Contact shown when no engine fits the runtime at all
    pub support_contact: String,

    /// Lowest engine version this bridge drives
    pub min_version: EngineVersion,

    /// Highest engine version this bridge drives
    pub max_version: EngineVersion,

    /// First non-prerelease version; anything older triggers a warning
    pub first_stable_version: EngineVersion,

    /// Files that must exist under `<candidate>/lib`
    pub required_files: Vec<String>,

    /// Product version stamp read from `<candidate>/lib` when not configured
    pub version_file: String,

    /// Runtime generations an install directory may carry
    pub runtime_variants: Vec<RuntimeVariant>,

    /// Regexes matching engine-internal stack frames to strip
    pub stack_trace_filters: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "NUnit".to_string(),
            download_url: "http://nunit.com/index.php?p=download".to_string(),
            host_download_url: "http://www.testdriven.net/download.aspx".to_string(),
            support_contact: "support@testdriven.net".to_string(),
            min_version: EngineVersion::new(2, 5, 0, 0),
            max_version: EngineVersion::new(2, 5, 65536, 65536),
            first_stable_version: EngineVersion::new(2, 5, 0, 9122),
            required_files: vec![
                "nunit.core.interfaces.dll".to_string(),
                "nunit.core.dll".to_string(),
                "nunit.util.dll".to_string(),
            ],
            version_file: "VERSION".to_string(),
            runtime_variants: vec![
                RuntimeVariant::new("v1.1.4322", "net-1.1"),
                RuntimeVariant::new("v2.0.50727", "net-2.0"),
            ],
            stack_trace_filters: vec![
                r"^\s*at NUnit\.Core\.".to_string(),
                r"^\s*at NUnit\.Framework\.Assert\.".to_string(),
                r"^\s*at System\.Reflection\.".to_string(),
            ],
        }
    }
}

/// One runtime generation inside an install's `bin` directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeVariant {
    /// Runtime tag, e.g. `v2.0.50727`
    pub runtime_version: String,

    /// Directory under `bin`, e.g. `net-2.0`
    pub dir: String,
}

impl RuntimeVariant {
    pub fn new(runtime_version: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            runtime_version: runtime_version.into(),
            dir: dir.into(),
        }
    }
}

/// Discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Runtime tag of the calling process
    pub runtime_version: String,

    /// File name of developer and bundled engine config files
    pub engine_config_name: String,

    /// Root of the installed-product record store
    pub installs_dir: Option<PathBuf>,

    /// Directory holding the bundled engine config (defaults to the executable's)
    pub bundled_dir: Option<PathBuf>,

    /// Whether to walk up from the target for developer overrides
    pub developer_overrides: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            runtime_version: "v4.0.30319".to_string(),
            engine_config_name: "testbridge-engines.toml".to_string(),
            installs_dir: None,
            bundled_dir: None,
            developer_overrides: true,
        }
    }
}

impl DiscoveryConfig {
    /// Installed-product store root, falling back to `~/.testbridge/installs`
    pub fn installs_dir_or_default(&self) -> Option<PathBuf> {
        self.installs_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join(".testbridge").join("installs")))
    }

    /// Bundled engine directory, falling back to the running executable's directory
    pub fn bundled_dir_or_default(&self) -> Option<PathBuf> {
        self.bundled_dir.clone().or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        })
    }
}

/// Category defaults applied when the host sets none
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Only run tests carrying one of these categories
    pub include: Vec<String>,

    /// Never run tests carrying one of these categories
    pub exclude: Vec<String>,
}
