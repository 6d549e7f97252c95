//! Alias resolution.
//!
//! `resolve_alias` rewrites a type until no reference to a type alias
//! remains, substituting alias bodies under their type-argument environment.
//! Resolution is a fixed point: resolving an already-resolved type returns
//! it unchanged.

use crate::subst::TypeEnv;
use tracing::trace;
use tsn_binder::registry::{Declaration, TypeRegistry};
use tsn_common::diagnostics::{Diagnostic, diagnostic_codes};
use tsn_common::span::Span;
use tsn_ir::types::{IndexSignature, IrType, Parameter, TypeParameter};

/// Reserved name marking values that escape the static discipline.
pub const DYNAMIC_ANY: &str = "__DYN_ANY__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A type alias expands, directly or transitively, to itself.
    AliasCycle { name: String },
    /// A reference's argument count disagrees with its declaration.
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
}

impl ResolveError {
    /// Render as a diagnostic at the given site.
    pub fn into_diagnostic(self, file: impl Into<String>, span: Span) -> Diagnostic {
        match self {
            ResolveError::AliasCycle { name } => Diagnostic::from_code(
                file,
                span,
                diagnostic_codes::CIRCULAR_TYPE_ALIAS,
                &[&name],
            ),
            ResolveError::ArityMismatch {
                name,
                expected,
                got,
            } => Diagnostic::from_code(
                file,
                span,
                diagnostic_codes::GENERIC_ARITY_MISMATCH,
                &[&name, &expected.to_string(), &got.to_string()],
            ),
        }
    }
}

/// Resolve every alias reference inside `ty`.
pub fn resolve_alias(ty: &IrType, registry: &TypeRegistry) -> Result<IrType, ResolveError> {
    resolve_inner(ty, registry, &mut Vec::new())
}

fn resolve_inner(
    ty: &IrType,
    registry: &TypeRegistry,
    visiting: &mut Vec<String>,
) -> Result<IrType, ResolveError> {
    match ty {
        IrType::Primitive { .. } | IrType::Literal { .. } | IrType::TypeParameterRef { .. } => {
            Ok(ty.clone())
        }

        IrType::Reference {
            name,
            type_arguments,
            structural_members,
        } => {
            let resolved_args = type_arguments
                .iter()
                .map(|a| resolve_inner(a, registry, visiting))
                .collect::<Result<Vec<_>, _>>()?;

            match registry.get(name) {
                Some(decl) => {
                    check_arity(name, decl.arity(), decl, &resolved_args)?;
                    if let Declaration::Alias(alias) = decl {
                        if visiting.iter().any(|v| v == name) {
                            return Err(ResolveError::AliasCycle { name: name.clone() });
                        }
                        trace!(alias = %name, "expanding type alias");
                        visiting.push(name.clone());
                        let env = TypeEnv::from_params(&alias.type_parameters, &resolved_args);
                        let body = env.apply(&alias.ty);
                        let result = resolve_inner(&body, registry, visiting);
                        visiting.pop();
                        return result;
                    }
                    Ok(IrType::Reference {
                        name: name.clone(),
                        type_arguments: resolved_args,
                        structural_members: structural_members.clone(),
                    })
                }
                // Unregistered names (external runtime types, dynamic-any)
                // pass through untouched.
                None => Ok(IrType::Reference {
                    name: name.clone(),
                    type_arguments: resolved_args,
                    structural_members: structural_members.clone(),
                }),
            }
        }

        IrType::Array { element, origin } => Ok(IrType::Array {
            element: Box::new(resolve_inner(element, registry, visiting)?),
            origin: *origin,
        }),

        IrType::Function {
            parameters,
            return_type,
            type_parameters,
            is_async,
        } => Ok(IrType::Function {
            parameters: parameters
                .iter()
                .map(|p| {
                    Ok(Parameter {
                        name: p.name.clone(),
                        ty: p
                            .ty
                            .as_ref()
                            .map(|t| resolve_inner(t, registry, visiting))
                            .transpose()?,
                        optional: p.optional,
                        default: p.default.clone(),
                    })
                })
                .collect::<Result<Vec<_>, ResolveError>>()?,
            return_type: Box::new(resolve_inner(return_type, registry, visiting)?),
            type_parameters: type_parameters
                .iter()
                .map(|tp| {
                    Ok(TypeParameter {
                        name: tp.name.clone(),
                        constraint: tp
                            .constraint
                            .as_ref()
                            .map(|c| resolve_inner(c, registry, visiting))
                            .transpose()?,
                        default: tp
                            .default
                            .as_ref()
                            .map(|d| resolve_inner(d, registry, visiting))
                            .transpose()?,
                    })
                })
                .collect::<Result<Vec<_>, ResolveError>>()?,
            is_async: *is_async,
        }),

        IrType::Object {
            members,
            index_signature,
        } => Ok(IrType::Object {
            members: members
                .iter()
                .map(|m| {
                    Ok(tsn_ir::types::ObjectMember {
                        name: m.name.clone(),
                        ty: resolve_inner(&m.ty, registry, visiting)?,
                        optional: m.optional,
                        readonly: m.readonly,
                    })
                })
                .collect::<Result<Vec<_>, ResolveError>>()?,
            index_signature: index_signature
                .as_ref()
                .map(|sig| {
                    Ok(Box::new(IndexSignature {
                        key_type: resolve_inner(&sig.key_type, registry, visiting)?,
                        value_type: resolve_inner(&sig.value_type, registry, visiting)?,
                    }))
                })
                .transpose()?,
        }),

        // Alias expansion can surface nested unions; flatten on the way out
        // so resolved unions always satisfy the union invariants.
        IrType::Union { types } => {
            let resolved = types
                .iter()
                .map(|t| resolve_inner(t, registry, visiting))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(crate::unions::union_of(resolved))
        }

        IrType::Intersection { types } => Ok(IrType::Intersection {
            types: types
                .iter()
                .map(|t| resolve_inner(t, registry, visiting))
                .collect::<Result<Vec<_>, _>>()?,
        }),

        IrType::Tuple { elements } => Ok(IrType::Tuple {
            elements: elements
                .iter()
                .map(|t| resolve_inner(t, registry, visiting))
                .collect::<Result<Vec<_>, _>>()?,
        }),
    }
}

fn check_arity(
    name: &str,
    expected: usize,
    decl: &Declaration,
    args: &[IrType],
) -> Result<(), ResolveError> {
    if args.len() == expected {
        return Ok(());
    }
    // Trailing parameters with defaults may be omitted.
    let min_required = match decl {
        Declaration::Class(c) => required_params(&c.type_parameters),
        Declaration::Interface(i) => required_params(&i.type_parameters),
        Declaration::Alias(a) => required_params(&a.type_parameters),
        Declaration::Enum(_) => 0,
    };
    if args.len() >= min_required && args.len() <= expected {
        return Ok(());
    }
    Err(ResolveError::ArityMismatch {
        name: name.to_string(),
        expected,
        got: args.len(),
    })
}

fn required_params(params: &[tsn_ir::types::TypeParameter]) -> usize {
    params
        .iter()
        .take_while(|p| p.default.is_none())
        .count()
}

/// Structurally search a resolved type for the reserved dynamic-any marker.
pub fn contains_dynamic_any(ty: &IrType) -> bool {
    match ty {
        IrType::Reference {
            name,
            type_arguments,
            ..
        } => name == DYNAMIC_ANY || type_arguments.iter().any(contains_dynamic_any),
        IrType::Array { element, .. } => contains_dynamic_any(element),
        IrType::Union { types } | IrType::Intersection { types } => {
            types.iter().any(contains_dynamic_any)
        }
        IrType::Tuple { elements } => elements.iter().any(contains_dynamic_any),
        IrType::Function {
            parameters,
            return_type,
            ..
        } => {
            parameters
                .iter()
                .any(|p| p.ty.as_ref().is_some_and(contains_dynamic_any))
                || contains_dynamic_any(return_type)
        }
        IrType::Object { members, .. } => members.iter().any(|m| contains_dynamic_any(&m.ty)),
        _ => false,
    }
}
