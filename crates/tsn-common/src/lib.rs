//! Common types and utilities for the tsn transpiler.
//!
//! This crate provides foundational types used across all tsn crates:
//! - Source spans (`Span`, `Spanned`)
//! - Line maps and positions for diagnostics (`LineMap`, `Position`)
//! - Diagnostics with stable `TSN` codes (`Diagnostic`, `DiagnosticCategory`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Position/LineMap types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics with the stable TSN code table
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, diagnostic_codes};
