//! Flat declaration registry.
//!
//! Class and interface declarations can reference each other cyclically, so
//! the registry stores every declaration in one table keyed by its stable
//! name and in-IR references carry the name only. The specialisation engine
//! appends generated declarations here; nothing else mutates the table after
//! binding.

use indexmap::IndexMap;
use tsn_ir::stmt::{ClassDecl, EnumDecl, InterfaceDecl, TypeAliasDecl};

/// A named type-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Alias(TypeAliasDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(c) => &c.name,
            Declaration::Interface(i) => &i.name,
            Declaration::Enum(e) => &e.name,
            Declaration::Alias(a) => &a.name,
        }
    }

    /// Number of declared type parameters.
    pub fn arity(&self) -> usize {
        match self {
            Declaration::Class(c) => c.type_parameters.len(),
            Declaration::Interface(i) => i.type_parameters.len(),
            Declaration::Enum(_) => 0,
            Declaration::Alias(a) => a.type_parameters.len(),
        }
    }

    pub fn is_generic(&self) -> bool {
        self.arity() > 0
    }
}

/// An entry in the registry: the declaration plus its owning module path.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub declaration: Declaration,
    pub module_path: String,
}

/// Name-keyed declaration table. Iteration order is insertion order, which
/// keeps generated output deterministic.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration. Returns false if the name was already taken.
    pub fn insert(&mut self, declaration: Declaration, module_path: impl Into<String>) -> bool {
        let name = declaration.name().to_string();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(
            name,
            RegistryEntry {
                declaration,
                module_path: module_path.into(),
            },
        );
        true
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.entries.get(name).map(|e| &e.declaration)
    }

    pub fn entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The module that owns a declaration.
    pub fn owner_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.module_path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
