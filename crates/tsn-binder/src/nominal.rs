//! Nominal environment: reference-vs-value classification.
//!
//! Classes implementing the reserved struct-marker interface (directly or
//! through their base chain) lower to C# value types; enums and the numeric
//! primitives are value types; everything else is a reference type. The
//! classification drives nullability emission (`T?` as `Nullable<T>` vs a
//! nullable reference).

use crate::registry::{Declaration, TypeRegistry};
use rustc_hash::FxHashMap;
use tsn_ir::types::{IrType, PrimitiveName};

/// Reserved marker interface name in the surface language.
pub const STRUCT_MARKER: &str = "__Struct__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClassification {
    Reference,
    Value,
}

#[derive(Debug, Default, Clone)]
pub struct NominalEnv {
    classes: FxHashMap<String, TypeClassification>,
}

impl NominalEnv {
    /// Classify every registered declaration. Struct-marker propagation walks
    /// the base chain, so a hierarchy either agrees or [`conflicts`] reports
    /// the classes that disagree with their base.
    ///
    /// [`conflicts`]: NominalEnv::conflicts
    pub fn build(registry: &TypeRegistry) -> Self {
        let mut env = NominalEnv::default();
        for (name, entry) in registry.iter() {
            let classification = match &entry.declaration {
                Declaration::Enum(_) => TypeClassification::Value,
                Declaration::Class(_) => {
                    if is_struct_class(name, registry, 0) {
                        TypeClassification::Value
                    } else {
                        TypeClassification::Reference
                    }
                }
                Declaration::Interface(i) => {
                    if i.name == STRUCT_MARKER
                        || i.extends.iter().any(|h| h.name == STRUCT_MARKER)
                    {
                        TypeClassification::Value
                    } else {
                        TypeClassification::Reference
                    }
                }
                Declaration::Alias(_) => TypeClassification::Reference,
            };
            env.classes.insert(name.to_string(), classification);
        }
        env
    }

    pub fn classify_name(&self, name: &str) -> TypeClassification {
        self.classes
            .get(name)
            .copied()
            .unwrap_or(TypeClassification::Reference)
    }

    /// Whether a type emits as a C# value type.
    pub fn is_value_type(&self, ty: &IrType) -> bool {
        match ty {
            IrType::Primitive { name } => matches!(
                name,
                PrimitiveName::Boolean
                    | PrimitiveName::Number
                    | PrimitiveName::Int
                    | PrimitiveName::Long
            ),
            IrType::Reference { name, .. } => {
                self.classify_name(name) == TypeClassification::Value
            }
            IrType::Tuple { .. } => true,
            _ => false,
        }
    }

    /// Classes whose struct classification disagrees with their base class.
    /// Each is a `TSN2513` at the declaration site.
    pub fn conflicts(&self, registry: &TypeRegistry) -> Vec<String> {
        let mut out = Vec::new();
        for (name, entry) in registry.iter() {
            let Declaration::Class(class) = &entry.declaration else {
                continue;
            };
            let Some(base) = &class.extends else {
                continue;
            };
            if !registry.contains(&base.name) {
                continue;
            }
            if self.classify_name(name) != self.classify_name(&base.name) {
                out.push(name.to_string());
            }
        }
        out
    }
}

const MAX_BASE_WALK: usize = 64;

fn is_struct_class(name: &str, registry: &TypeRegistry, depth: usize) -> bool {
    if depth > MAX_BASE_WALK {
        return false;
    }
    let Some(Declaration::Class(class)) = registry.get(name) else {
        return false;
    };
    if class.implements.iter().any(|h| {
        h.name == STRUCT_MARKER
            || matches!(
                registry.get(&h.name),
                Some(Declaration::Interface(i))
                    if i.extends.iter().any(|e| e.name == STRUCT_MARKER)
            )
    }) {
        return true;
    }
    class
        .extends
        .as_ref()
        .is_some_and(|base| is_struct_class(&base.name, registry, depth + 1))
}
