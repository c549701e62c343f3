//! Shell completions

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{output, Cli};
use crate::exit_codes;

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(shell = %self.shell, "executing completions command");
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();

        match self.output {
            Some(ref path) => {
                let mut file = std::fs::File::create(path)?;
                generate(self.shell, &mut cmd, name, &mut file);
                if !cli.quiet {
                    output::success(&format!("Completions written to {}", path.display()));
                }
            }
            None => generate(self.shell, &mut cmd, name, &mut std::io::stdout()),
        }

        Ok(exit_codes::SUCCESS)
    }
}
