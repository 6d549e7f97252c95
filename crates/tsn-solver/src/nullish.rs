//! Nullish analysis.
//!
//! "Is this T optional?" and "what is its inner shape?" are separate
//! questions. `nullishness` answers the first without rewriting the type;
//! `strip_nullish` answers the second by removing `null`/`undefined` union
//! members and unwrapping a single survivor.

use crate::unions::union_of;
use tsn_ir::types::IrType;

/// Which nullish members a type's top-level union carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nullishness {
    pub has_null: bool,
    pub has_undefined: bool,
}

impl Nullishness {
    /// True if either nullish member is present.
    pub const fn is_optional(self) -> bool {
        self.has_null || self.has_undefined
    }

    /// True when both are present and a use site would need to tell them
    /// apart; the emitter diagnoses at the first observable difference.
    pub const fn is_ambiguous(self) -> bool {
        self.has_null && self.has_undefined
    }
}

/// Inspect the top level of a (possibly union) type for nullish members.
pub fn nullishness(ty: &IrType) -> Nullishness {
    let mut n = Nullishness::default();
    match ty {
        IrType::Union { types } => {
            for member in types {
                mark(member, &mut n);
            }
        }
        other => mark(other, &mut n),
    }
    n
}

fn mark(ty: &IrType, n: &mut Nullishness) {
    use tsn_ir::types::PrimitiveName;
    if ty.is_primitive(PrimitiveName::Null) {
        n.has_null = true;
    } else if ty.is_primitive(PrimitiveName::Undefined) {
        n.has_undefined = true;
    }
}

/// Remove `null` and `undefined` from a union; unwrap a single survivor.
/// Non-union types pass through unchanged (even `null` itself, which is not
/// a union and therefore has nothing to strip).
pub fn strip_nullish(ty: &IrType) -> IrType {
    match ty {
        IrType::Union { types } => {
            let kept: Vec<IrType> = types.iter().filter(|t| !t.is_nullish()).cloned().collect();
            union_of(kept)
        }
        other => other.clone(),
    }
}
