//! External-runtime binding tables.
//!
//! Declarative metadata mapping external-runtime type names (things imported
//! from outside the compiled module set) to their target-namespace
//! fully-qualified names, arity, and member shapes. Loaded from a JSON table
//! shipped alongside the compiler; the core consumes them through
//! [`ExternalBindings::lookup_type_binding`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One external type binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBinding {
    /// Fully-qualified C# name, e.g. `System.Console`.
    pub fq_name: String,
    /// Namespace to add to the using-set when the binding is referenced.
    pub namespace: String,
    /// Generic arity of the target type.
    #[serde(default)]
    pub arity: usize,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalBindings {
    table: FxHashMap<String, ResolvedBinding>,
}

impl ExternalBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a binding table from its JSON representation.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The built-in table covering the runtime surface the examples use.
    pub fn builtin() -> Self {
        let mut bindings = Self::new();
        bindings.insert("Console", ResolvedBinding {
            fq_name: "System.Console".into(),
            namespace: "System".into(),
            arity: 0,
        });
        bindings.insert("Error", ResolvedBinding {
            fq_name: "System.Exception".into(),
            namespace: "System".into(),
            arity: 0,
        });
        bindings.insert("Map", ResolvedBinding {
            fq_name: "System.Collections.Generic.Dictionary".into(),
            namespace: "System.Collections.Generic".into(),
            arity: 2,
        });
        bindings.insert("Set", ResolvedBinding {
            fq_name: "System.Collections.Generic.HashSet".into(),
            namespace: "System.Collections.Generic".into(),
            arity: 1,
        });
        bindings.insert("Promise", ResolvedBinding {
            fq_name: "System.Threading.Tasks.Task".into(),
            namespace: "System.Threading.Tasks".into(),
            arity: 1,
        });
        bindings
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: ResolvedBinding) {
        self.table.insert(name.into(), binding);
    }

    /// Resolve an external-runtime type name, if a binding exists.
    pub fn lookup_type_binding(&self, name: &str) -> Option<&ResolvedBinding> {
        self.table.get(name)
    }

    /// Merge another table over this one; the other side wins collisions.
    pub fn extend_with(&mut self, other: ExternalBindings) {
        self.table.extend(other.table);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
