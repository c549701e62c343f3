//! Translation of engine events into host outcomes

use regex::Regex;
use tracing::{debug, warn};

use crate::coordinator::RunState;
use crate::events::{EngineEvent, FailureSite, NativeResult, NativeStatus, NativeSuiteResult};
use crate::listener::{Severity, TestListener, TestOutcome, TestState};
use crate::metadata::EngineGeneration;

/// Strips engine-internal frames from stack traces
#[derive(Debug, Clone, Default)]
pub struct StackTraceFilter {
    patterns: Vec<Regex>,
}

impl StackTraceFilter {
    /// Compile `patterns` into a filter
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Remove matching lines; a trace with nothing left becomes `None`
    pub fn filter(&self, trace: Option<&str>) -> Option<String> {
        let trace = trace?;
        if self.patterns.is_empty() {
            return Some(trace.to_string());
        }

        let kept: Vec<&str> = trace
            .lines()
            .filter(|line| !self.patterns.iter().any(|p| p.is_match(line)))
            .collect();

        if kept.iter().all(|line| line.trim().is_empty()) {
            None
        } else {
            Some(kept.join("\n"))
        }
    }
}

/// Drop one trailing newline (`\n` or `\r\n`)
fn trim_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// Host-facing message cleanup
///
/// One trailing newline is removed and a message starting with a space is
/// moved onto its own line.
pub fn normalize_message(message: Option<&str>) -> Option<String> {
    let message = trim_newline(message?);
    if message.starts_with(' ') {
        Some(format!("\n{}", message))
    } else {
        Some(message.to_string())
    }
}

/// Feeds engine events to a host listener, one flat outcome per test
pub struct ResultAdapter<'l> {
    listener: &'l mut dyn TestListener,
    total_tests: usize,
    runner: String,
    generation: EngineGeneration,
    stack_filter: StackTraceFilter,
    reported: usize,
    failed: usize,
    fixture_failed: bool,
}

impl<'l> ResultAdapter<'l> {
    /// Adapter reporting to `listener` with `total_tests` expected outcomes
    pub fn new(
        listener: &'l mut dyn TestListener,
        total_tests: usize,
        runner: impl Into<String>,
        generation: EngineGeneration,
    ) -> Self {
        Self {
            listener,
            total_tests,
            runner: runner.into(),
            generation,
            stack_filter: StackTraceFilter::default(),
            reported: 0,
            failed: 0,
            fixture_failed: false,
        }
    }

    /// Strip engine frames matching `filter` from reported traces
    pub fn with_stack_filter(mut self, filter: StackTraceFilter) -> Self {
        self.stack_filter = filter;
        self
    }

    /// Translate one engine event into listener calls
    pub fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TestStarted { full_name } => {
                debug!(test = %full_name, "test started");
            }
            EngineEvent::TestFinished { result } => self.test_finished(result),
            EngineEvent::SuiteFinished { result } => self.suite_finished(result),
            EngineEvent::UnhandledException { text } => {
                warn!(error = %text, "unhandled exception during run");
                self.listener.write_line(&text, Severity::Warning);
            }
        }
    }

    fn test_finished(&mut self, result: NativeResult) {
        if let Some(output) = result.output.as_deref().filter(|o| !o.is_empty()) {
            self.listener.write_line(trim_newline(output), Severity::Output);
        }

        // Reported with the fixture's stack trace once the suite finishes.
        if result.status == NativeStatus::Failed && result.site == FailureSite::Parent {
            return;
        }

        let stack_trace = self.stack_filter.filter(result.stack_trace.as_deref());
        self.emit(&result, stack_trace);
    }

    fn suite_finished(&mut self, suite: NativeSuiteResult) {
        match suite.site {
            FailureSite::TearDown => {
                self.fixture_failed = true;
                if let Some(message) = &suite.message {
                    self.listener.write_line(message, Severity::Warning);
                }
                if let Some(trace) = &suite.stack_trace {
                    self.listener.write_line(trace, Severity::Warning);
                }
            }
            FailureSite::SetUp => {
                let suite_trace = self.stack_filter.filter(suite.stack_trace.as_deref());
                for child in &suite.children {
                    let stack_trace = suite_trace
                        .clone()
                        .or_else(|| self.stack_filter.filter(child.stack_trace.as_deref()));
                    self.emit(child, stack_trace);
                }
            }
            _ => {}
        }
    }

    fn emit(&mut self, result: &NativeResult, stack_trace: Option<String>) {
        let state = self.state_of(result);
        if state == TestState::Failed {
            self.failed += 1;
        }
        self.reported += 1;

        self.listener.test_finished(TestOutcome {
            name: result.full_name.clone(),
            state,
            message: normalize_message(result.message.as_deref()),
            stack_trace,
            duration: result.duration,
            total_tests: self.total_tests,
            runner: self.runner.clone(),
        });
    }

    fn state_of(&self, result: &NativeResult) -> TestState {
        match result.status {
            NativeStatus::Passed => TestState::Passed,
            NativeStatus::Failed
                if self.generation.labels_invalid_as_failed()
                    && result.label.as_deref() == Some("Invalid") =>
            {
                TestState::Ignored
            }
            NativeStatus::Failed => TestState::Failed,
            NativeStatus::Ignored
            | NativeStatus::Skipped
            | NativeStatus::Inconclusive
            | NativeStatus::NotRunnable
            | NativeStatus::Invalid => TestState::Ignored,
        }
    }

    /// Outcomes reported so far
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Overall state of what has been reported
    pub fn run_state(&self) -> RunState {
        if self.failed > 0 || self.fixture_failed {
            RunState::Failure
        } else if self.reported > 0 {
            RunState::Success
        } else {
            RunState::NoTests
        }
    }
}
