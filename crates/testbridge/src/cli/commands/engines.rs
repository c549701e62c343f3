//! Engines command

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use testbridge_discovery::{Tier, VersionCatalog};

use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// List the engines each catalog tier provides
#[derive(Debug, Args)]
pub struct EnginesCommand {
    /// Look for developer overrides from this target's directory
    #[arg(long)]
    pub from: Option<PathBuf>,
}

impl EnginesCommand {
    /// Execute the engines command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(from = ?self.from, "executing engines command");
        let cwd = std::env::current_dir()?;
        let config = cli.config(&cwd);

        let target = self.from.clone().or(Some(cwd));
        let catalog = VersionCatalog::from_config(&config, target)?;

        match cli.format {
            OutputFormat::Json => {
                let value = json!({
                    "host_runtime": catalog.host_runtime(),
                    "developer": catalog.tier(Tier::Developer),
                    "installed": catalog.tier(Tier::Installed),
                    "default": catalog.tier(Tier::Default),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                if cli.quiet {
                    return Ok(exit_codes::SUCCESS);
                }
                println!("{}", output::header("Engine catalog"));
                println!("{}", output::key_value("Host runtime", catalog.host_runtime().tag()));
                println!();

                for tier in Tier::all() {
                    let candidates = catalog.tier(tier);
                    println!("{} ({})", style(tier).bold(), candidates.len());
                    for candidate in candidates {
                        println!(
                            "  {} {} {}",
                            output::version_style().apply_to(candidate.product_version()),
                            style(candidate.runtime_version()).dim(),
                            output::path_style().apply_to(candidate.location().display())
                        );
                    }
                }

                if catalog.is_empty() {
                    println!();
                    output::warning(&format!(
                        "No {} engine found. Install one or add an [[engine]] entry to {}",
                        config.engine.name, config.discovery.engine_config_name
                    ));
                }
            }
        }

        Ok(exit_codes::SUCCESS)
    }
}
