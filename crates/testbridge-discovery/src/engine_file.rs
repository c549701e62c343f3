//! Engine config files used by the developer and default tiers
//!
//! ```toml
//! [[engine]]
//! runtime_version = "v2.0.50727"
//! base_dir = "net-2.0"
//! product_version = "2.5.5.0"   # optional, read from lib/VERSION otherwise
//! ```

use std::path::Path;

use serde::Deserialize;
use testbridge_core::{EngineVersion, RuntimeVersion};
use tracing::{debug, warn};

use crate::candidate::EngineCandidate;
use crate::layout::EngineLayout;

/// Parsed engine config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfigFile {
    #[serde(default, rename = "engine")]
    pub engines: Vec<EngineEntry>,
}

/// One `[[engine]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct EngineEntry {
    pub runtime_version: String,
    pub base_dir: String,
    #[serde(default)]
    pub product_version: Option<String>,
}

impl EngineConfigFile {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read a file; unreadable or malformed files yield no entries
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "engine config not readable");
                return Self::default();
            }
        };

        match Self::parse(&content) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed engine config");
                Self::default()
            }
        }
    }

    /// Turn entries into candidates usable on `host`
    ///
    /// `base_dir` values are relative to `dir`. Entries for newer runtimes,
    /// incomplete installs and entries without a readable version are dropped.
    pub fn candidates(
        &self,
        dir: &Path,
        host: &RuntimeVersion,
        layout: &EngineLayout,
    ) -> Vec<EngineCandidate> {
        self.engines
            .iter()
            .filter_map(|entry| entry.to_candidate(dir, host, layout))
            .collect()
    }
}

impl EngineEntry {
    fn to_candidate(
        &self,
        dir: &Path,
        host: &RuntimeVersion,
        layout: &EngineLayout,
    ) -> Option<EngineCandidate> {
        let runtime = match RuntimeVersion::parse(&self.runtime_version) {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(runtime = %self.runtime_version, error = %e, "skipping engine entry");
                return None;
            }
        };

        if !runtime.runs_on(host) {
            debug!(runtime = %runtime, host = %host, "engine entry targets a newer runtime");
            return None;
        }

        let base_dir = dir.join(&self.base_dir);
        if !layout.is_installed(&base_dir) {
            return None;
        }

        let version = match &self.product_version {
            Some(raw) => EngineVersion::parse(raw).ok(),
            None => layout.read_version(&base_dir),
        };

        let Some(version) = version else {
            warn!(base_dir = %base_dir.display(), "engine entry has no usable product version");
            return None;
        };

        Some(EngineCandidate::new(version, runtime, base_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::install_engine;
    use tempfile::TempDir;

    const TWO_RUNTIMES: &str = r#"
[[engine]]
runtime_version = "v1.1.4322"
base_dir = "net-1.1"

[[engine]]
runtime_version = "v2.0.50727"
base_dir = "net-2.0"
product_version = "2.5.7.0"
"#;

    #[test]
    fn test_parse_entries() {
        let file = EngineConfigFile::parse(TWO_RUNTIMES).unwrap();
        assert_eq!(file.engines.len(), 2);
        assert_eq!(file.engines[0].runtime_version, "v1.1.4322");
        assert_eq!(file.engines[0].base_dir, "net-1.1");
        assert_eq!(file.engines[1].product_version.as_deref(), Some("2.5.7.0"));
    }

    #[test]
    fn test_candidates_for_host() {
        let temp = TempDir::new().unwrap();
        let layout = EngineLayout::default();
        install_engine(&layout, &temp.path().join("net-1.1"), Some("2.5.7.0"));
        install_engine(&layout, &temp.path().join("net-2.0"), None);

        let file = EngineConfigFile::parse(TWO_RUNTIMES).unwrap();

        let host20 = RuntimeVersion::parse("v2.0.50727").unwrap();
        let found = file.candidates(temp.path(), &host20, &layout);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].location(), temp.path().join("net-2.0"));

        let host11 = RuntimeVersion::parse("v1.1.4322").unwrap();
        let found = file.candidates(temp.path(), &host11, &layout);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].runtime_version().tag(), "v1.1.4322");

        let host10 = RuntimeVersion::parse("v1.0.3705").unwrap();
        assert!(file.candidates(temp.path(), &host10, &layout).is_empty());
    }

    #[test]
    fn test_incomplete_install_skipped() {
        let temp = TempDir::new().unwrap();
        let layout = EngineLayout::default();
        std::fs::create_dir_all(temp.path().join("net-2.0").join("lib")).unwrap();

        let file = EngineConfigFile::parse(TWO_RUNTIMES).unwrap();
        let host = RuntimeVersion::parse("v4.0.30319").unwrap();
        assert!(file.candidates(temp.path(), &host, &layout).is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("testbridge-engines.toml");
        std::fs::write(&path, "[[engine]]\nbase_dir = 12").unwrap();

        assert!(EngineConfigFile::load(&path).engines.is_empty());
        assert!(EngineConfigFile::load(&temp.path().join("absent.toml"))
            .engines
            .is_empty());
    }
}
