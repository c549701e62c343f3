//! Resolve command

use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use tracing::info;

use testbridge_core::RuntimeVersion;
use testbridge_discovery::{RecordingSink, VersionCatalog, VersionSelector};
use testbridge_runner::engine::ManifestInspector;
use testbridge_runner::{AssemblyInspector, EngineGeneration};

use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// Show which engine a test assembly would run on
#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Assembly manifest to resolve an engine for
    pub assembly: PathBuf,
}

impl ResolveCommand {
    /// Execute the resolve command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(assembly = %self.assembly.display(), "executing resolve command");
        let cwd = std::env::current_dir()?;
        let config = cli.config(&cwd);

        let assembly = ManifestInspector.inspect(&self.assembly)?;
        let Some(framework) = assembly.framework else {
            if cli.format == OutputFormat::Json {
                println!("{}", json!({ "assembly": assembly.name, "framework": null, "engine": null }));
            } else if !cli.quiet {
                output::warning(&format!("{} references no test framework", assembly.name));
            }
            return Ok(exit_codes::NO_TESTS);
        };

        let runtime = RuntimeVersion::parse(&config.discovery.runtime_version)?;
        let catalog = VersionCatalog::from_config(&config, Some(self.assembly.clone()))?;
        let mut sink = RecordingSink::new();
        let resolved = VersionSelector::from_config(&config.engine).resolve_with_tier(
            &catalog,
            framework.version,
            &runtime,
            &mut sink,
        );

        match cli.format {
            OutputFormat::Json => {
                let engine = resolved.as_ref().map(|(tier, candidate)| {
                    json!({
                        "tier": tier,
                        "candidate": candidate,
                        "generation": EngineGeneration::from_version(candidate.product_version()),
                    })
                });
                let value = json!({
                    "assembly": assembly.name,
                    "framework": framework,
                    "engine": engine,
                    "warnings": sink.messages(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                for message in sink.messages() {
                    output::warning(message);
                }
                if !cli.quiet {
                    println!("{}", output::key_value("Assembly", &assembly.name));
                    println!(
                        "{}",
                        output::key_value(
                            "Framework",
                            &format!("{} {}", framework.name, framework.version)
                        )
                    );
                    match &resolved {
                        Some((tier, candidate)) => {
                            println!("{}", output::key_value("Tier", tier.as_str()));
                            println!("{}", output::key_value("Engine", &candidate.to_string()));
                            println!(
                                "{}",
                                output::key_value(
                                    "Generation",
                                    EngineGeneration::from_version(candidate.product_version())
                                        .as_str()
                                )
                            );
                        }
                        None => output::error("No compatible engine found"),
                    }
                }
            }
        }

        Ok(if resolved.is_some() {
            exit_codes::SUCCESS
        } else {
            exit_codes::NO_TESTS
        })
    }
}
