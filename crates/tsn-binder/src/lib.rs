//! Program context and module ordering for the tsn transpiler.
//!
//! One [`ProgramContext`] exists per compilation. It owns the module map,
//! the flat name-keyed declaration registry, the export map, the nominal
//! environment (reference-vs-value classification), the JSON-AOT registry,
//! the external binding tables, and the diagnostic list. Everything
//! downstream takes the context explicitly; there is no process-wide state.

pub mod bindings;
pub mod context;
pub mod graph;
pub mod nominal;
pub mod registry;

pub use bindings::{ExternalBindings, ResolvedBinding};
pub use context::{ExportEntry, ExportKind, ProgramContext};
pub use graph::{DependencyGraph, module_order};
pub use nominal::{NominalEnv, TypeClassification};
pub use registry::{Declaration, TypeRegistry};
