//! Structural keys for types.
//!
//! `type_key` produces a canonical string for a type's structure. It is the
//! single currency for union deduplication, specialisation-cache keys, and
//! specialised declaration names (`Box__int`, `Pair__string__Arr_int`).
//! Stable by construction: the same structure always serialises to the same
//! key, and structurally distinct types get distinct keys.

use crate::expr::LiteralValue;
use crate::types::IrType;

/// Compute the canonical structural key of a type.
pub fn type_key(ty: &IrType) -> String {
    match ty {
        IrType::Primitive { name } => name.as_str().to_string(),

        IrType::Literal { value } => match value {
            LiteralValue::Boolean(b) => format!("Lit_b_{b}"),
            LiteralValue::Number(n) => format!("Lit_n_{}", sanitize_number(*n)),
            LiteralValue::String(s) => format!("Lit_s{}_{}", s.len(), sanitize(s)),
        },

        IrType::Array { element, .. } => format!("Arr_{}", type_key(element)),

        IrType::Reference {
            name,
            type_arguments,
            ..
        } => {
            if type_arguments.is_empty() {
                name.clone()
            } else {
                let args: Vec<String> = type_arguments.iter().map(type_key).collect();
                format!("{}_{}", name, args.join("_"))
            }
        }

        IrType::Function {
            parameters,
            return_type,
            ..
        } => {
            let mut parts: Vec<String> = parameters
                .iter()
                .map(|p| p.ty.as_ref().map_or_else(|| "unknown".to_string(), type_key))
                .collect();
            parts.push(type_key(return_type));
            format!("Fn_{}", parts.join("_"))
        }

        IrType::Object {
            members,
            index_signature,
        } => {
            let mut parts: Vec<String> = members
                .iter()
                .map(|m| {
                    let mut flags = String::new();
                    if m.optional {
                        flags.push('q');
                    }
                    if m.readonly {
                        flags.push('r');
                    }
                    format!("{}{}_{}", m.name, flags, type_key(&m.ty))
                })
                .collect();
            if let Some(sig) = index_signature {
                parts.push(format!(
                    "Idx_{}_{}",
                    type_key(&sig.key_type),
                    type_key(&sig.value_type)
                ));
            }
            format!("Obj{}_{}", members.len(), parts.join("_"))
        }

        // Members sorted so `A | B` and `B | A` share a key.
        IrType::Union { types } => {
            let mut keys: Vec<String> = types.iter().map(type_key).collect();
            keys.sort_unstable();
            format!("Or_{}", keys.join("_"))
        }

        IrType::Intersection { types } => {
            let mut keys: Vec<String> = types.iter().map(type_key).collect();
            keys.sort_unstable();
            format!("And_{}", keys.join("_"))
        }

        IrType::Tuple { elements } => {
            let keys: Vec<String> = elements.iter().map(type_key).collect();
            format!("Tup{}_{}", elements.len(), keys.join("_"))
        }

        IrType::TypeParameterRef { name, .. } => name.clone(),
    }
}

/// Replace characters that cannot appear in identifiers.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Numbers keyed with the dot replaced, minus spelled out.
fn sanitize_number(n: f64) -> String {
    let text = if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    };
    text.replace('-', "m").replace('.', "d")
}

#[cfg(test)]
#[path = "tests/type_key.rs"]
mod tests;
