//! Run command

use std::path::PathBuf;

use clap::{ArgGroup, Args, ValueEnum};
use console::style;
use tracing::info;

use testbridge_runner::request::set_ambient;
use testbridge_runner::{
    CategoryFilters, CollectingListener, MemberRef, ReportFormat, ReportGenerator, RunCoordinator,
    RunReport, RunRequest, RunnerError, Severity, TestListener, TestOutcome, TestState,
};

use crate::cli::{output, Cli, OutputFormat};

/// Run tests in an assembly
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("target")
        .multiple(false)
        .args(["type_name", "method", "namespace", "test"])
))]
pub struct RunCommand {
    /// Assembly manifest to run
    pub assembly: PathBuf,

    /// Run one fixture type (abstract types run every concrete subclass)
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: Option<String>,

    /// Run one method, as `Namespace.Type.Method`
    #[arg(long)]
    pub method: Option<String>,

    /// Run every test in a namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Run tests by full name
    #[arg(long, value_name = "NAME")]
    pub test: Vec<String>,

    /// Only run tests in these categories
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Skip tests in these categories
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Report format (defaults to json with --format json, pretty otherwise)
    #[arg(long, value_enum)]
    pub reporter: Option<Reporter>,

    /// Write the report to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Reporter {
    Pretty,
    Json,
    Junit,
}

impl From<Reporter> for ReportFormat {
    fn from(reporter: Reporter) -> Self {
        match reporter {
            Reporter::Pretty => ReportFormat::Pretty,
            Reporter::Json => ReportFormat::Json,
            Reporter::Junit => ReportFormat::Junit,
        }
    }
}

/// Streams progress to the terminal while collecting for the report
struct ConsoleListener {
    collected: CollectingListener,
    echo: bool,
}

impl TestListener for ConsoleListener {
    fn test_finished(&mut self, outcome: TestOutcome) {
        if self.echo {
            let icon = match outcome.state {
                TestState::Passed => style("✓").green(),
                TestState::Failed => style("✗").red(),
                TestState::Ignored => style("○").yellow(),
            };
            println!("  {} {}", icon, outcome.name);
        }
        self.collected.test_finished(outcome);
    }

    fn write_line(&mut self, text: &str, severity: Severity) {
        match severity {
            Severity::Warning | Severity::Error => output::warning(text),
            Severity::Output | Severity::Info if self.echo => println!("{}", style(text).dim()),
            _ => {}
        }
        self.collected.write_line(text, severity);
    }
}

impl RunCommand {
    /// Build the request from the target options
    fn request(&self) -> anyhow::Result<RunRequest> {
        let request = if let Some(ref name) = self.type_name {
            RunRequest::member(&self.assembly, MemberRef::Type(name.clone()))
        } else if let Some(ref method) = self.method {
            let member = MemberRef::parse_method(method).ok_or_else(|| {
                RunnerError::InvalidRequest(format!(
                    "'{}' is not of the form Namespace.Type.Method",
                    method
                ))
            })?;
            RunRequest::member(&self.assembly, member)
        } else if let Some(ref namespace) = self.namespace {
            RunRequest::namespace(&self.assembly, namespace.clone())
        } else if !self.test.is_empty() {
            RunRequest::full_names(&self.assembly, self.test.iter().cloned())
        } else {
            RunRequest::whole_assembly(&self.assembly)
        };

        Ok(request.with_categories(CategoryFilters::new(
            self.include.iter().cloned(),
            self.exclude.iter().cloned(),
        )))
    }

    fn format(&self, cli: &Cli) -> ReportFormat {
        match (self.reporter, cli.format) {
            (Some(reporter), _) => reporter.into(),
            (None, OutputFormat::Json) => ReportFormat::Json,
            (None, OutputFormat::Text) => ReportFormat::Pretty,
        }
    }

    /// Execute the run command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(assembly = %self.assembly.display(), "executing run command");
        let cwd = std::env::current_dir()?;
        let config = cli.config(&cwd);

        // Config categories apply only when none are given on the command line.
        set_ambient(CategoryFilters::from_config(&config.categories));
        let request = self.request()?.with_ambient_categories();

        let coordinator = RunCoordinator::from_config(&config)?;
        let format = self.format(cli);
        let mut listener = ConsoleListener {
            collected: CollectingListener::new(),
            echo: cli.verbose && !cli.quiet && format == ReportFormat::Pretty,
        };

        let state = coordinator.run(&request, &mut listener)?;

        let name = self
            .assembly
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.assembly.display().to_string());
        let report = RunReport::from_listener(name, state, &listener.collected);

        match self.output {
            Some(ref path) => {
                ReportGenerator::write_to_file(&report, format, path)?;
                if !cli.quiet {
                    output::success(&format!(
                        "{}: {} passed, {} failed, {} ignored. Report written to {}",
                        state,
                        report.passed,
                        report.failed,
                        report.ignored,
                        output::path_style().apply_to(path.display())
                    ));
                }
            }
            None if !cli.quiet || format != ReportFormat::Pretty => {
                print!("{}", ReportGenerator::generate(&report, format));
            }
            None => {}
        }

        Ok(state.exit_code())
    }
}
