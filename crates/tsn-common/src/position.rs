//! Position utilities for diagnostics.
//!
//! The IR carries byte offsets; user-visible diagnostics need line/column.
//! The front end ships a line-start table with every module so the core can
//! convert offsets without ever holding the source text.

use serde::{Deserialize, Serialize};

/// A position in a source file (0-indexed line and byte column).
///
/// Reporters render positions 1-indexed; everything internal stays 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed byte column within the line
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Line map for offset -> position conversion.
///
/// Stores the starting byte offset of each line; `line_starts[0]` is always 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text. Used by tests and by front ends
    /// that hand us raw text; production modules ship the table directly.
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        Self { line_starts }
    }

    /// Wrap a line-start table produced by the front end.
    #[must_use]
    pub fn from_line_starts(mut line_starts: Vec<u32>) -> Self {
        if line_starts.first() != Some(&0) {
            line_starts.insert(0, 0);
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a position.
    #[must_use]
    pub fn position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        Position {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: offset.saturating_sub(line_start),
        }
    }

    /// Get the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
#[path = "tests/position.rs"]
mod tests;
