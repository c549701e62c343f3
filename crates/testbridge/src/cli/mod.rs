//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::Path;

use clap::{Parser, Subcommand};
use testbridge_core::config::{load_config_or_default, Config};

use commands::{
    CompletionsCommand, EnginesCommand, InitCommand, ResolveCommand, RunCommand, ValidateCommand,
};

/// testbridge - run test assemblies through a version-selected engine
#[derive(Debug, Parser)]
#[command(name = "testbridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the engines each catalog tier provides
    Engines(EnginesCommand),

    /// Show which engine a test assembly would run on
    Resolve(ResolveCommand),

    /// Run tests in an assembly
    Run(RunCommand),

    /// Write a default configuration file
    Init(InitCommand),

    /// Validate the configuration
    Validate(ValidateCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command, returning the process exit code
    pub fn execute(self) -> anyhow::Result<i32> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Engines(ref cmd) => cmd.execute(&self),
            Commands::Resolve(ref cmd) => cmd.execute(&self),
            Commands::Run(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }

    /// Configuration for the working directory, defaults when none is found
    pub fn config(&self, cwd: &Path) -> Config {
        let (config, path) = load_config_or_default(cwd);
        if self.verbose && !self.quiet {
            match path {
                Some(path) => output::info(&format!("Using config {}", path.display())),
                None => output::info("No config file found, using defaults"),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::parse_from([
            "testbridge",
            "run",
            "Example.Tests.json",
            "--namespace",
            "Example.Math",
            "--exclude",
            "Slow,Db",
        ]);
        let Commands::Run(cmd) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(cmd.namespace.as_deref(), Some("Example.Math"));
        assert_eq!(cmd.exclude, vec!["Slow", "Db"]);
    }

    #[test]
    fn test_run_targets_conflict() {
        let result = Cli::try_parse_from([
            "testbridge",
            "run",
            "Example.Tests.json",
            "--namespace",
            "Example",
            "--type",
            "Example.MathTests",
        ]);
        assert!(result.is_err());
    }
}
