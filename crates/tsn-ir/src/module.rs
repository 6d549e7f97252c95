//! Module wrapper: one `IrModule` per surface source file.

use crate::stmt::IrStmt;
use serde::{Deserialize, Serialize};
use tsn_common::position::LineMap;

/// A named import from another module or the external runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedName {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl ImportedName {
    /// The name this import is visible under locally.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One import statement.
///
/// For local imports the front end resolves `specifier` to the imported
/// module's path as it appears in the module map; whether an import is local
/// is decided by the binder via module-map membership, not by syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBinding {
    pub specifier: String,
    #[serde(default)]
    pub names: Vec<ImportedName>,
    /// Type-only imports are erased and never create value edges in the
    /// dependency graph.
    #[serde(default)]
    pub type_only: bool,
}

/// A module of the surface program, as shipped by the parser collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrModule {
    /// Path relative to the source root, e.g. `pkg/foo/bar.ts`.
    pub path: String,
    /// Byte offsets of line starts, for offset -> line/column conversion.
    #[serde(default)]
    pub line_starts: Vec<u32>,
    #[serde(default)]
    pub imports: Vec<ImportBinding>,
    #[serde(default)]
    pub statements: Vec<IrStmt>,
}

impl IrModule {
    pub fn new(path: impl Into<String>) -> Self {
        IrModule {
            path: path.into(),
            line_starts: Vec::new(),
            imports: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// Line map for diagnostics against this module.
    pub fn line_map(&self) -> LineMap {
        LineMap::from_line_starts(self.line_starts.clone())
    }

    /// All exported names, including every declarator of an exported
    /// variable statement.
    pub fn exported_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for stmt in &self.statements {
            if !stmt.is_exported() {
                continue;
            }
            match stmt {
                IrStmt::Variable(v) => {
                    names.extend(v.declarations.iter().map(|d| d.name.as_str()));
                }
                other => {
                    if let Some(name) = other.declared_name() {
                        names.push(name);
                    }
                }
            }
        }
        names
    }
}

#[cfg(test)]
#[path = "tests/module.rs"]
mod tests;
