/// Immutable text input for the analyzer

use serde::Serialize;
use serde_json::Value;

use crate::core::error::{AnalyzerError, Result};

/// A text string subject to analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextDocument {
    text: String,
}

impl TextDocument {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }

    /// Build a document from loosely-typed input
    ///
    /// Fails with `InvalidArgumentType` unless the value is a JSON string.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Self::new(text.as_str())),
            other => Err(AnalyzerError::wrong_type("text", "str", other)),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// The first `max_chars` characters, followed by `...` when the text is longer
    pub fn preview(&self, max_chars: usize) -> String {
        if self.char_count() <= max_chars {
            return self.text.clone();
        }
        let head: String = self.text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

impl From<&str> for TextDocument {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextDocument {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
