//! Contextual inference for lambdas and object literals.
//!
//! Inference flows outside-in only. The outermost annotation wins; inferred
//! contextual types never override explicit annotations. For union
//! contextual types the first structurally compatible member is taken, with
//! no backtracking.

use tracing::trace;
use tsn_binder::registry::{Declaration, TypeRegistry};
use tsn_ir::types::{IrType, ObjectMember, Parameter};

/// Assign each lambda parameter a type: its own annotation if present,
/// otherwise the contextual parameter's type, otherwise `unknown`.
///
/// The second result lists parameters that fell through to `unknown`; the
/// caller reports `TSN7006` for any of them later used where a concrete
/// type is required.
pub fn infer_lambda_param_types(
    parameters: &[Parameter],
    contextual: Option<&IrType>,
) -> (Vec<IrType>, Vec<String>) {
    let contextual_params: Option<&[Parameter]> = match contextual {
        Some(IrType::Function { parameters, .. }) => Some(parameters),
        _ => None,
    };

    let mut types = Vec::with_capacity(parameters.len());
    let mut implicit_unknown = Vec::new();

    for (i, param) in parameters.iter().enumerate() {
        if let Some(annotated) = &param.ty {
            // Explicit annotations are never overridden.
            types.push(annotated.clone());
            continue;
        }
        match contextual_params
            .and_then(|ps| ps.get(i))
            .and_then(|p| p.ty.as_ref())
        {
            Some(ctx_ty) => {
                trace!(param = %param.name, "lambda parameter typed from context");
                types.push(ctx_ty.clone());
            }
            None => {
                types.push(IrType::UNKNOWN);
                implicit_unknown.push(param.name.clone());
            }
        }
    }
    (types, implicit_unknown)
}

/// The static type of an object literal under a contextual type.
///
/// A named-reference context types the literal as that reference with its
/// arguments; a union context picks the first compatible member; no context
/// synthesises an anonymous object type from the literal's own members.
pub fn infer_object_literal(
    literal_members: &[ObjectMember],
    contextual: Option<&IrType>,
    registry: &TypeRegistry,
) -> IrType {
    match contextual {
        Some(reference @ IrType::Reference { .. }) => reference.clone(),
        Some(IrType::Union { types }) => types
            .iter()
            .find(|member| is_shape_compatible(literal_members, member, registry))
            .cloned()
            .unwrap_or_else(|| synthesise(literal_members)),
        Some(object @ IrType::Object { .. }) => object.clone(),
        _ => synthesise(literal_members),
    }
}

fn synthesise(members: &[ObjectMember]) -> IrType {
    IrType::Object {
        members: members.to_vec(),
        index_signature: None,
    }
}

/// Shape compatibility for union-member selection: every literal property
/// exists on the candidate, and every required candidate member appears in
/// the literal.
pub fn is_shape_compatible(
    literal_members: &[ObjectMember],
    candidate: &IrType,
    registry: &TypeRegistry,
) -> bool {
    let Some(candidate_members) = shape_members(candidate, registry) else {
        return false;
    };
    let all_known = literal_members
        .iter()
        .all(|lm| candidate_members.iter().any(|cm| cm.name == lm.name));
    let required_present = candidate_members
        .iter()
        .filter(|cm| !cm.optional)
        .all(|cm| literal_members.iter().any(|lm| lm.name == cm.name));
    all_known && required_present
}

/// The member list of an object-shaped type: anonymous object types carry it
/// directly; references consult resolved structural members, then the
/// registry's interface/class shape.
pub fn shape_members(ty: &IrType, registry: &TypeRegistry) -> Option<Vec<ObjectMember>> {
    match ty {
        IrType::Object { members, .. } => Some(members.clone()),
        IrType::Reference {
            name,
            structural_members,
            ..
        } => {
            if let Some(members) = structural_members {
                return Some(members.clone());
            }
            match registry.get(name)? {
                Declaration::Interface(i) => {
                    Some(i.members.iter().cloned().map(Into::into).collect())
                }
                Declaration::Class(c) => Some(
                    c.members
                        .iter()
                        .filter_map(|m| match m {
                            tsn_ir::stmt::ClassMember::Property(p) => Some(ObjectMember {
                                name: p.name.clone(),
                                ty: p.ty.clone(),
                                optional: p.optional,
                                readonly: p.readonly,
                            }),
                            tsn_ir::stmt::ClassMember::Method(_) => None,
                        })
                        .collect(),
                ),
                _ => None,
            }
        }
        _ => None,
    }
}
