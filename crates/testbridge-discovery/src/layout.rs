//! On-disk layout of an engine install

use std::path::{Path, PathBuf};

use testbridge_core::config::{EngineConfig, RuntimeVariant};
use testbridge_core::{EngineVersion, RuntimeVersion};
use tracing::debug;

/// What a usable engine directory must contain
#[derive(Debug, Clone)]
pub struct EngineLayout {
    required_files: Vec<String>,
    version_file: String,
    runtime_variants: Vec<(RuntimeVersion, String)>,
}

impl EngineLayout {
    pub fn new(
        required_files: Vec<String>,
        version_file: impl Into<String>,
        runtime_variants: &[RuntimeVariant],
    ) -> Self {
        let runtime_variants = runtime_variants
            .iter()
            .filter_map(|v| {
                RuntimeVersion::parse(&v.runtime_version)
                    .ok()
                    .map(|rt| (rt, v.dir.clone()))
            })
            .collect();

        Self {
            required_files,
            version_file: version_file.into(),
            runtime_variants,
        }
    }

    pub fn from_config(engine: &EngineConfig) -> Self {
        Self::new(
            engine.required_files.clone(),
            engine.version_file.clone(),
            &engine.runtime_variants,
        )
    }

    /// Runtime generations an install's `bin` directory may carry
    pub fn runtime_variants(&self) -> &[(RuntimeVersion, String)] {
        &self.runtime_variants
    }

    pub fn required_files(&self) -> &[String] {
        &self.required_files
    }

    /// Every required support file exists under `<base_dir>/lib`
    pub fn is_installed(&self, base_dir: &Path) -> bool {
        let lib_dir = base_dir.join("lib");
        let missing = self
            .required_files
            .iter()
            .find(|name| !lib_dir.join(name).is_file());

        if let Some(name) = missing {
            debug!(base_dir = %base_dir.display(), missing = %name, "engine install incomplete");
            return false;
        }
        true
    }

    /// Read the product version stamp from `<base_dir>/lib`
    pub fn read_version(&self, base_dir: &Path) -> Option<EngineVersion> {
        let stamp = self.version_path(base_dir);
        let content = std::fs::read_to_string(&stamp).ok()?;
        match EngineVersion::parse(content.trim()) {
            Ok(version) => Some(version),
            Err(e) => {
                debug!(path = %stamp.display(), error = %e, "unreadable version stamp");
                None
            }
        }
    }

    pub fn version_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join("lib").join(&self.version_file)
    }
}

impl Default for EngineLayout {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
