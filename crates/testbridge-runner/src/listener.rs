//! Host listener contract

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Flattened state of one test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Passed,
    Failed,
    Ignored,
}

impl TestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a free-text line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    /// Captured test output
    Output,
    Error,
}

/// One reported test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub name: String,
    pub state: TestState,
    pub message: Option<String>,
    pub stack_trace: Option<String>,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Number of tests in the run; identical on every outcome of a run
    pub total_tests: usize,
    /// e.g. `NUnit 2.5.5`
    pub runner: String,
}

impl TestOutcome {
    /// Fixture part of the name
    pub fn fixture(&self) -> &str {
        crate::metadata::namespace_of(&self.name)
    }

    /// Method part of the name
    pub fn short_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(_, n)| n)
            .unwrap_or(&self.name)
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Receives results as a run progresses
pub trait TestListener {
    fn test_finished(&mut self, outcome: TestOutcome);

    fn write_line(&mut self, text: &str, severity: Severity);
}

/// Listener that keeps everything it receives
#[derive(Debug, Default, Clone)]
pub struct CollectingListener {
    pub outcomes: Vec<TestOutcome>,
    pub lines: Vec<(Severity, String)>,
}

impl CollectingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, state: TestState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    pub fn lines_with(&self, severity: Severity) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

impl TestListener for CollectingListener {
    fn test_finished(&mut self, outcome: TestOutcome) {
        self.outcomes.push(outcome);
    }

    fn write_line(&mut self, text: &str, severity: Severity) {
        self.lines.push((severity, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_name_parts() {
        let outcome = TestOutcome {
            name: "Ex.Core.MathTests.Adds".to_string(),
            state: TestState::Passed,
            message: None,
            stack_trace: None,
            duration: Duration::from_millis(12),
            total_tests: 1,
            runner: "NUnit 2.5.5".to_string(),
        };

        assert_eq!(outcome.fixture(), "Ex.Core.MathTests");
        assert_eq!(outcome.short_name(), "Adds");

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["duration"], 12);
        assert_eq!(json["state"], "passed");
    }
}
