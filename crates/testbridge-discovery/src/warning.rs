//! Warning sink used during version selection

/// Receives human-readable warnings while an engine is being selected
pub trait WarningSink {
    fn warn(&mut self, message: &str);
}

impl<F: FnMut(&str)> WarningSink for F {
    fn warn(&mut self, message: &str) {
        self(message)
    }
}

/// Sink that keeps every warning, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: Vec<String>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in the order they were reported
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Most recent message
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(|s| s.as_str())
    }

    /// Whether nothing was reported
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl WarningSink for RecordingSink {
    fn warn(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
