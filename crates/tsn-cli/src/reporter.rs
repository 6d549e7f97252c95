//! Human diagnostic rendering.
//!
//! One line per diagnostic: `file:line:col - error TSN5110: message`, with
//! 1-indexed positions. Colors are optional for terminals that want plain
//! text.

use colored::Colorize;
use tsn_common::diagnostics::{Diagnostic, DiagnosticCategory};
use tsn_common::position::{LineMap, Position};

pub fn render(diagnostic: &Diagnostic, line_map: Option<&LineMap>, pretty: bool) -> String {
    let position = line_map
        .map(|map| map.position(diagnostic.span.start))
        .unwrap_or(Position { line: 0, column: 0 });
    let location = format!(
        "{}:{}:{}",
        diagnostic.file,
        position.line + 1,
        position.column + 1
    );
    let severity = match diagnostic.category {
        DiagnosticCategory::Error => "error",
        DiagnosticCategory::Warning => "warning",
        DiagnosticCategory::Message => "message",
    };
    let code = diagnostic.display_code();

    if pretty {
        let severity_colored = match diagnostic.category {
            DiagnosticCategory::Error => severity.red().bold().to_string(),
            DiagnosticCategory::Warning => severity.yellow().bold().to_string(),
            DiagnosticCategory::Message => severity.cyan().to_string(),
        };
        format!(
            "{} - {} {}: {}",
            location.as_str().cyan(),
            severity_colored,
            code.as_str().bold(),
            diagnostic.message_text
        )
    } else {
        format!("{location} - {severity} {code}: {}", diagnostic.message_text)
    }
}
