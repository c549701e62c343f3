//! CLI commands

mod completions;
mod engines;
mod init;
mod resolve;
mod run;
mod validate;

pub use completions::CompletionsCommand;
pub use engines::EnginesCommand;
pub use init::InitCommand;
pub use resolve::ResolveCommand;
pub use run::RunCommand;
pub use validate::ValidateCommand;
