//! Append-only diagnostic sink.
//!
//! The one side channel in this crate. Only the initial-data-target
//! validator and the specification-expression convenience wrapper write to
//! it; validity results are always computed independently of what lands
//! here. A single sink is meant to be reused across every check performed
//! over a compilation unit, so nothing in this crate ever clears it.
use strum::EnumIs;

/// Severity of an emitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One emitted diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.text)
    }
}

/// Accumulated diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    messages: Vec<Message>,
}

impl Messages {
    pub fn new() -> Self {
        Messages::default()
    }

    /// Append a message with the given severity.
    pub fn say(&mut self, severity: Severity, text: impl Into<String>) {
        self.messages.push(Message {
            severity,
            text: text.into(),
        });
    }

    /// Append an error rendered from any displayable value.
    pub fn error(&mut self, what: impl std::fmt::Display) {
        self.say(Severity::Error, what.to_string());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Messages {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
