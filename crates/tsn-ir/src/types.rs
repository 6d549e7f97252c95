//! The type family of the IR.
//!
//! Types are structural values: cheap to clone, compared and deduplicated via
//! [`crate::type_key::type_key`] rather than `Eq`/`Hash` (literal types carry
//! `f64` values). Invariants the rest of the pipeline relies on:
//!
//! - a `Union` holds at least two members, none of which is itself a union,
//!   with no duplicates under the structural key;
//! - a `Reference` with type arguments matches the arity of its declaration;
//! - `null` and `undefined` are distinct primitives, and their presence in a
//!   union is what drives emitted nullability.

use crate::expr::IrExpr;
use serde::{Deserialize, Serialize};

/// Names of the leaf types.
///
/// `number` is a 64-bit float; `int` and `long` are the width-carrying
/// integer types. `StructMarker` is the reserved marker interface name that
/// forces value-type lowering for classes implementing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveName {
    Boolean,
    String,
    Number,
    Int,
    Long,
    Null,
    Undefined,
    Void,
    Unknown,
    Any,
    Never,
    #[serde(rename = "struct-marker")]
    StructMarker,
}

impl PrimitiveName {
    /// Surface-language spelling, also used by the structural key.
    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveName::Boolean => "boolean",
            PrimitiveName::String => "string",
            PrimitiveName::Number => "number",
            PrimitiveName::Int => "int",
            PrimitiveName::Long => "long",
            PrimitiveName::Null => "null",
            PrimitiveName::Undefined => "undefined",
            PrimitiveName::Void => "void",
            PrimitiveName::Unknown => "unknown",
            PrimitiveName::Any => "any",
            PrimitiveName::Never => "never",
            PrimitiveName::StructMarker => "struct-marker",
        }
    }

    /// True for `null` and `undefined`.
    pub const fn is_nullish(self) -> bool {
        matches!(self, PrimitiveName::Null | PrimitiveName::Undefined)
    }
}

impl std::fmt::Display for PrimitiveName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an array type came from an annotation or was inferred from a
/// literal. Explicit `number[]` must emit `double[]` even when every element
/// is integer-valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrayOrigin {
    Explicit,
    #[default]
    Inferred,
}

/// A named member of an object type or interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IrType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

/// An index signature, e.g. `{ [key: string]: T }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignature {
    pub key_type: IrType,
    pub value_type: IrType,
}

/// A value parameter of a function type or declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<IrType>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default: Option<IrExpr>,
}

/// A declared type parameter (`<T extends U = V>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameter {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<IrType>,
    #[serde(default)]
    pub default: Option<IrType>,
}

/// The closed type family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IrType {
    #[serde(rename = "primitiveType")]
    Primitive { name: PrimitiveName },

    #[serde(rename = "literalType")]
    Literal { value: crate::expr::LiteralValue },

    #[serde(rename = "arrayType", rename_all = "camelCase")]
    Array {
        element: Box<IrType>,
        #[serde(default)]
        origin: ArrayOrigin,
    },

    #[serde(rename = "referenceType", rename_all = "camelCase")]
    Reference {
        name: String,
        #[serde(default)]
        type_arguments: Vec<IrType>,
        /// Resolved structural shape, filled in by the solver for unions that
        /// need member lookup without chasing the registry again.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        structural_members: Option<Vec<ObjectMember>>,
    },

    #[serde(rename = "functionType", rename_all = "camelCase")]
    Function {
        parameters: Vec<Parameter>,
        return_type: Box<IrType>,
        #[serde(default)]
        type_parameters: Vec<TypeParameter>,
        #[serde(default)]
        is_async: bool,
    },

    #[serde(rename = "objectType", rename_all = "camelCase")]
    Object {
        members: Vec<ObjectMember>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index_signature: Option<Box<IndexSignature>>,
    },

    #[serde(rename = "unionType")]
    Union { types: Vec<IrType> },

    #[serde(rename = "intersectionType")]
    Intersection { types: Vec<IrType> },

    #[serde(rename = "tupleType")]
    Tuple { elements: Vec<IrType> },

    #[serde(rename = "typeParameterRef", rename_all = "camelCase")]
    TypeParameterRef {
        name: String,
        #[serde(default)]
        constraint: Option<Box<IrType>>,
        #[serde(default)]
        default: Option<Box<IrType>>,
    },
}

impl IrType {
    pub const fn primitive(name: PrimitiveName) -> Self {
        IrType::Primitive { name }
    }

    pub const BOOLEAN: IrType = IrType::primitive(PrimitiveName::Boolean);
    pub const STRING: IrType = IrType::primitive(PrimitiveName::String);
    pub const NUMBER: IrType = IrType::primitive(PrimitiveName::Number);
    pub const INT: IrType = IrType::primitive(PrimitiveName::Int);
    pub const LONG: IrType = IrType::primitive(PrimitiveName::Long);
    pub const NULL: IrType = IrType::primitive(PrimitiveName::Null);
    pub const UNDEFINED: IrType = IrType::primitive(PrimitiveName::Undefined);
    pub const VOID: IrType = IrType::primitive(PrimitiveName::Void);
    pub const UNKNOWN: IrType = IrType::primitive(PrimitiveName::Unknown);
    pub const ANY: IrType = IrType::primitive(PrimitiveName::Any);
    pub const NEVER: IrType = IrType::primitive(PrimitiveName::Never);

    /// Reference with no type arguments.
    pub fn reference(name: impl Into<String>) -> Self {
        IrType::Reference {
            name: name.into(),
            type_arguments: Vec::new(),
            structural_members: None,
        }
    }

    /// True if this is exactly `null` or `undefined`.
    pub const fn is_nullish(&self) -> bool {
        matches!(self, IrType::Primitive { name } if name.is_nullish())
    }

    /// True if this is the given primitive.
    pub fn is_primitive(&self, which: PrimitiveName) -> bool {
        matches!(self, IrType::Primitive { name } if *name == which)
    }

    /// True for the integer-width primitives.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            IrType::Primitive {
                name: PrimitiveName::Int | PrimitiveName::Long
            }
        )
    }

    /// Name of the referenced declaration, if this is a reference.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            IrType::Reference { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/types.rs"]
mod tests;
