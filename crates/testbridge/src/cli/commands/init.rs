//! Init command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use testbridge_core::config::{
    Config, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML,
};

use crate::cli::{output, Cli};
use crate::exit_codes;

/// Write a default configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write YAML instead of TOML
    #[arg(long)]
    pub yaml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(force = self.force, yaml = self.yaml, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.yaml {
            DEFAULT_CONFIG_YAML
        } else {
            DEFAULT_CONFIG_TOML
        };
        let config_path = self.output.clone().unwrap_or_else(|| cwd.join(default_name));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = if self.yaml {
            let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
            serde_yaml::to_string(&config)?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };
        std::fs::write(&config_path, content)?;

        if !cli.quiet {
            output::success(&format!(
                "Created {}",
                output::path_style().apply_to(config_path.display())
            ));
            output::info("Run `testbridge engines` to see which engines are available");
        }

        Ok(exit_codes::SUCCESS)
    }
}
