//! Union flattening and construction.

use rustc_hash::FxHashSet;
use tsn_ir::type_key::type_key;
use tsn_ir::types::IrType;

/// Recursively inline nested unions and deduplicate by structural key.
/// The result preserves first-occurrence order, which keeps emission stable.
pub fn flatten_union(types: &[IrType]) -> Vec<IrType> {
    let mut out = Vec::new();
    let mut seen = FxHashSet::default();
    for ty in types {
        push_flattened(ty, &mut out, &mut seen);
    }
    out
}

fn push_flattened(ty: &IrType, out: &mut Vec<IrType>, seen: &mut FxHashSet<String>) {
    match ty {
        IrType::Union { types } => {
            for inner in types {
                push_flattened(inner, out, seen);
            }
        }
        other => {
            if seen.insert(type_key(other)) {
                out.push(other.clone());
            }
        }
    }
}

/// Build a canonical union: flattened, deduplicated, unwrapped when a single
/// member remains. An empty member list is `never`.
pub fn union_of(types: Vec<IrType>) -> IrType {
    let mut flat = flatten_union(&types);
    match flat.len() {
        0 => IrType::NEVER,
        1 => flat.remove(0),
        _ => IrType::Union { types: flat },
    }
}
