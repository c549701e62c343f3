//! Validate command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use testbridge_core::config::{find_config, load_config_from_dir};
use testbridge_core::{BridgeError, ConfigError};
use testbridge_discovery::VersionCatalog;

use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Validate the configuration
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Only validate the configuration file, skip engine discovery
    #[arg(long)]
    pub config_only: bool,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Problems found while validating a directory
#[derive(Debug, Default)]
struct Findings {
    config_path: Option<PathBuf>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(
            config_only = self.config_only,
            strict = self.strict,
            "executing validate command"
        );
        let cwd = std::env::current_dir()?;

        let Findings {
            config_path,
            mut errors,
            mut warnings,
        } = self.check(&cwd);

        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text if !cli.quiet => {
                println!("{}", style("Validation Results").bold());
                println!();

                if let Some(path) = config_path {
                    println!("Config: {}", style(path.display()).cyan());
                    println!();
                }

                if !errors.is_empty() {
                    println!("{}", style("Errors:").red().bold());
                    for error in &errors {
                        println!("  {} {}", style("✗").red(), error);
                    }
                    println!();
                }

                if !warnings.is_empty() {
                    println!("{}", style("Warnings:").yellow().bold());
                    for warning in &warnings {
                        println!("  {} {}", style("!").yellow(), warning);
                    }
                    println!();
                }

                if passed {
                    println!("{}", style("✓ Validation passed").green().bold());
                } else {
                    println!(
                        "{} with {} error(s)",
                        style("✗ Validation failed").red().bold(),
                        errors.len()
                    );
                }
            }
            OutputFormat::Text => {}
        }

        Ok(if passed {
            exit_codes::SUCCESS
        } else {
            exit_codes::VALIDATION_ERROR
        })
    }

    fn check(&self, dir: &Path) -> Findings {
        let mut findings = Findings::default();

        let config = match load_config_from_dir(dir) {
            Ok((config, path)) => {
                findings.config_path = Some(path);
                Some(config)
            }
            Err(BridgeError::Config(ConfigError::NotFound(_))) => {
                findings
                    .warnings
                    .push("Configuration: no config file found (defaults apply)".to_string());
                None
            }
            Err(e) => {
                findings.config_path = find_config(dir);
                findings.errors.push(format!("Configuration: {}", e));
                None
            }
        };

        if !self.config_only && findings.errors.is_empty() {
            let cfg = config.unwrap_or_default();
            match VersionCatalog::from_config(&cfg, Some(dir.to_path_buf())) {
                Ok(catalog) if catalog.is_empty() => {
                    findings
                        .warnings
                        .push(format!("No {} engine found in any catalog tier", cfg.engine.name));
                }
                Ok(_) => {}
                Err(e) => findings.errors.push(format!("Engine discovery: {}", e)),
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_only() -> ValidateCommand {
        ValidateCommand {
            config_only: true,
            strict: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("testbridge.toml"),
            "[engine]\nname = \"NUnit\"\n",
        )
        .unwrap();

        let findings = config_only().check(temp.path());
        assert!(findings.errors.is_empty(), "{:?}", findings.errors);
        assert_eq!(
            findings.config_path,
            Some(temp.path().join("testbridge.toml"))
        );
    }

    #[test]
    fn test_inverted_version_range_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("testbridge.toml"),
            "[engine]\nmin_version = \"2.6.0.0\"\nmax_version = \"2.5.0.0\"\n",
        )
        .unwrap();

        let findings = config_only().check(temp.path());
        assert_eq!(findings.errors.len(), 1);
        assert!(findings.errors[0].starts_with("Configuration:"));
        assert!(findings.warnings.is_empty());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("testbridge.toml"), "[engine\nname = 1\n").unwrap();

        let findings = ValidateCommand {
            config_only: false,
            strict: false,
        }
        .check(temp.path());
        assert_eq!(findings.errors.len(), 1);
        assert!(findings.errors[0].contains("TOML"));
        assert_eq!(
            findings.config_path,
            Some(temp.path().join("testbridge.toml"))
        );
    }
}
