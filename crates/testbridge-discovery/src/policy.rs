//! Selection bounds and the warnings shown when selection falls back

use testbridge_core::config::EngineConfig;
use testbridge_core::{EngineVersion, RuntimeVersion};

/// Version bounds a candidate must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub min_version: EngineVersion,
    pub max_version: EngineVersion,
    /// Candidates below this are pre-release builds
    pub first_stable_version: EngineVersion,
}

impl SelectionPolicy {
    pub fn new(
        min_version: EngineVersion,
        max_version: EngineVersion,
        first_stable_version: EngineVersion,
    ) -> Self {
        Self {
            min_version,
            max_version,
            first_stable_version,
        }
    }

    pub fn from_config(engine: &EngineConfig) -> Self {
        Self::new(
            engine.min_version,
            engine.max_version,
            engine.first_stable_version,
        )
    }

    pub fn in_bounds(&self, version: EngineVersion) -> bool {
        version >= self.min_version && version <= self.max_version
    }

    pub fn is_prerelease(&self, version: EngineVersion) -> bool {
        version < self.first_stable_version
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Remediation texts handed to the warning sink
#[derive(Debug, Clone)]
pub struct WarningMessages {
    product: String,
    download_url: String,
    host_download_url: String,
    support_contact: String,
}

impl WarningMessages {
    pub fn from_config(engine: &EngineConfig) -> Self {
        Self {
            product: engine.name.clone(),
            download_url: engine.download_url.clone(),
            host_download_url: engine.host_download_url.clone(),
            support_contact: engine.support_contact.clone(),
        }
    }

    /// Installed engine is a pre-release build
    pub fn install_stable(&self, first_stable: EngineVersion) -> String {
        format!(
            "Please install {} {} RTM or greater:\n    {}\n",
            self.product, first_stable, self.download_url
        )
    }

    /// Installed engine is older than the target was built against
    pub fn upgrade_installed(&self, target: EngineVersion) -> String {
        format!(
            "Please install {} {} or greater:\n    {}\n",
            self.product, target, self.download_url
        )
    }

    /// Nothing usable for the caller's runtime
    pub fn no_runner(&self, runtime: &RuntimeVersion) -> String {
        format!(
            "Couldn't find {} test runner for runtime {}.\n\
             Please install the latest version of the test runner integration:\n\
             {}\n\n\
             or let {} know you're seeing this message.\n",
            self.product, runtime, self.host_download_url, self.support_contact
        )
    }

    /// Bundled engine is older than the target was built against
    pub fn bundled_outdated(&self, target: EngineVersion) -> String {
        format!(
            "The packaged version of {product} is older than {target}.\n\
             Please install the latest version of the test runner integration:\n\
             {host}\n\n\
             or install {product} {target} or later:\n\
             {download}\n",
            product = self.product,
            target = target,
            host = self.host_download_url,
            download = self.download_url
        )
    }
}

impl Default for WarningMessages {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let policy = SelectionPolicy::default();
        assert!(policy.in_bounds(EngineVersion::new(2, 5, 0, 0)));
        assert!(policy.in_bounds(EngineVersion::new(2, 5, 10, 11092)));
        assert!(!policy.in_bounds(EngineVersion::new(2, 4, 8, 0)));
        assert!(!policy.in_bounds(EngineVersion::new(2, 6, 0, 0)));

        assert!(policy.is_prerelease(EngineVersion::new(2, 5, 0, 9015)));
        assert!(!policy.is_prerelease(EngineVersion::new(2, 5, 0, 9122)));
    }

    #[test]
    fn test_messages_name_remediation() {
        let messages = WarningMessages::default();
        let target = EngineVersion::new(2, 5, 5, 0);

        assert!(messages.upgrade_installed(target).contains("2.5.5.0"));
        assert!(messages.install_stable(EngineVersion::new(2, 5, 0, 9122)).contains("2.5.0.9122"));

        let outdated = messages.bundled_outdated(target);
        assert!(outdated.contains("2.5.5.0"));
        assert!(outdated.contains("www.testdriven.net/download"));
        assert!(outdated.contains("nunit.com"));

        let runtime = RuntimeVersion::parse("v1.1.4322").unwrap();
        let none = messages.no_runner(&runtime);
        assert!(none.contains("v1.1.4322"));
        assert!(none.contains("support@testdriven.net"));
    }
}
