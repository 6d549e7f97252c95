//! Diagnostics with stable `TSN` codes.
//!
//! Every user-visible failure carries a code from the fixed table in
//! [`data`], the owning file, a span, and a one-line message. Codes must not
//! change across compilations of the same source; the table is append-only.

pub mod data;

use crate::span::Span;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// A code/message template pair from the static table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub use super::data::diagnostic_codes::*;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub span: Span,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, span: Span, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            file: file.into(),
            span,
            message_text: message.into(),
        }
    }

    pub fn warning(
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            file: file.into(),
            span,
            message_text: message.into(),
        }
    }

    /// Build a diagnostic from the static table, substituting `{n}` holes.
    pub fn from_code(file: impl Into<String>, span: Span, code: u32, args: &[&str]) -> Self {
        let (category, template) = data::DIAGNOSTIC_MESSAGES
            .iter()
            .find(|m| m.code == code)
            .map_or((DiagnosticCategory::Error, "Unknown diagnostic."), |m| {
                (m.category, m.message)
            });
        Self {
            category,
            code,
            file: file.into(),
            span,
            message_text: format_message(template, args),
        }
    }

    /// True for categories that abort the current unit of work.
    pub fn is_fatal(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Render the stable user-visible code, e.g. `TSN5110`.
    pub fn display_code(&self) -> String {
        format!("TSN{}", self.code)
    }
}

/// Look up the message template for a code.
pub fn get_message_template(code: u32) -> Option<&'static str> {
    data::DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

/// Substitute `{0}`, `{1}`, ... holes in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "tests/diagnostics.rs"]
mod tests;
