//! Emission results handed to the file emitter collaborator.

use tsn_common::diagnostics::Diagnostic;

/// One emitted file. `required_usings` is sorted, deduplicated, and minimal:
/// namespaces land in the set only at the point a reference to them is
/// emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitResult {
    /// Output path relative to the output root, e.g. `pkg/foo/bar.cs`.
    pub path: String,
    /// The namespace the file's declarations live in.
    pub namespace_name: String,
    /// Complete file text.
    pub text: String,
    pub required_usings: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EmitResult {
    /// True if any diagnostic in this module is fatal.
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }
}
