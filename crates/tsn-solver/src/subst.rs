//! Type environments and capture-avoiding substitution.
//!
//! A `TypeEnv` maps type-parameter names to concrete types. Application is
//! capture-avoiding: a nested scope that declares its own type parameter of
//! the same name shadows the outer binding.

use rustc_hash::FxHashMap;
use tsn_ir::types::{IndexSignature, IrType, ObjectMember, Parameter, TypeParameter};

#[derive(Debug, Default, Clone)]
pub struct TypeEnv {
    map: FxHashMap<String, IrType>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair declared parameters with arguments. Missing trailing arguments
    /// fall back to the parameter's default; the caller has already checked
    /// arity.
    pub fn from_params(params: &[TypeParameter], args: &[IrType]) -> Self {
        let mut env = TypeEnv::new();
        for (i, param) in params.iter().enumerate() {
            let bound = args
                .get(i)
                .cloned()
                .or_else(|| param.default.clone())
                .unwrap_or(IrType::UNKNOWN);
            env.map.insert(param.name.clone(), bound);
        }
        env
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: IrType) {
        self.map.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&IrType> {
        self.map.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// A copy of this environment with the given parameters removed, for
    /// entering a scope that shadows them.
    pub fn shadowed_by(&self, params: &[TypeParameter]) -> TypeEnv {
        let mut inner = self.clone();
        for p in params {
            inner.map.remove(&p.name);
        }
        inner
    }

    /// Apply the substitution to a type.
    pub fn apply(&self, ty: &IrType) -> IrType {
        if self.map.is_empty() {
            return ty.clone();
        }
        match ty {
            IrType::Primitive { .. } | IrType::Literal { .. } => ty.clone(),

            IrType::TypeParameterRef {
                name,
                constraint,
                default,
            } => match self.map.get(name) {
                Some(bound) => bound.clone(),
                None => IrType::TypeParameterRef {
                    name: name.clone(),
                    constraint: constraint
                        .as_ref()
                        .map(|c| Box::new(self.apply(c))),
                    default: default.as_ref().map(|d| Box::new(self.apply(d))),
                },
            },

            IrType::Array { element, origin } => IrType::Array {
                element: Box::new(self.apply(element)),
                origin: *origin,
            },

            IrType::Reference {
                name,
                type_arguments,
                structural_members,
            } => IrType::Reference {
                name: name.clone(),
                type_arguments: type_arguments.iter().map(|a| self.apply(a)).collect(),
                structural_members: structural_members
                    .as_ref()
                    .map(|ms| ms.iter().map(|m| self.apply_member(m)).collect()),
            },

            IrType::Function {
                parameters,
                return_type,
                type_parameters,
                is_async,
            } => {
                // Nested generic scopes shadow outer bindings by name.
                let inner = self.shadowed_by(type_parameters);
                IrType::Function {
                    parameters: parameters.iter().map(|p| inner.apply_param(p)).collect(),
                    return_type: Box::new(inner.apply(return_type)),
                    type_parameters: type_parameters
                        .iter()
                        .map(|tp| TypeParameter {
                            name: tp.name.clone(),
                            constraint: tp.constraint.as_ref().map(|c| inner.apply(c)),
                            default: tp.default.as_ref().map(|d| inner.apply(d)),
                        })
                        .collect(),
                    is_async: *is_async,
                }
            }

            IrType::Object {
                members,
                index_signature,
            } => IrType::Object {
                members: members.iter().map(|m| self.apply_member(m)).collect(),
                index_signature: index_signature.as_ref().map(|sig| {
                    Box::new(IndexSignature {
                        key_type: self.apply(&sig.key_type),
                        value_type: self.apply(&sig.value_type),
                    })
                }),
            },

            IrType::Union { types } => IrType::Union {
                types: types.iter().map(|t| self.apply(t)).collect(),
            },

            IrType::Intersection { types } => IrType::Intersection {
                types: types.iter().map(|t| self.apply(t)).collect(),
            },

            IrType::Tuple { elements } => IrType::Tuple {
                elements: elements.iter().map(|t| self.apply(t)).collect(),
            },
        }
    }

    pub fn apply_param(&self, param: &Parameter) -> Parameter {
        Parameter {
            name: param.name.clone(),
            ty: param.ty.as_ref().map(|t| self.apply(t)),
            optional: param.optional,
            default: param.default.clone(),
        }
    }

    pub fn apply_member(&self, member: &ObjectMember) -> ObjectMember {
        ObjectMember {
            name: member.name.clone(),
            ty: self.apply(&member.ty),
            optional: member.optional,
            readonly: member.readonly,
        }
    }
}
