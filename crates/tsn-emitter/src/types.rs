//! Type emission: IR types to C# type text.
//!
//! Nullability discipline: a union carrying `null` and/or `undefined` emits
//! as `T?` of its stripped inner type (`Nullable<T>` for value types and a
//! nullable annotation for reference types, which C# spells identically).
//! Explicit `number` is always `double`, whatever the literals looked like.

use crate::emit_context::ModuleEmitter;
use tsn_binder::registry::Declaration;
use tsn_common::diagnostics::diagnostic_codes;
use tsn_common::span::Span;
use tsn_ir::expr::LiteralValue;
use tsn_ir::types::{IrType, PrimitiveName};
use tsn_solver::{DYNAMIC_ANY, nullishness, resolve_alias, strip_nullish};

impl ModuleEmitter<'_> {
    /// Emit a type. Exhaustive over the type family.
    pub(crate) fn cs_type(&mut self, ty: &IrType) -> String {
        match ty {
            IrType::Primitive { name } => self.cs_primitive(*name).to_string(),

            // Literal types stand in for their underlying primitive; they
            // exist for discriminants, not for emission.
            IrType::Literal { value } => match value {
                LiteralValue::Boolean(_) => "bool".into(),
                LiteralValue::Number(_) => "double".into(),
                LiteralValue::String(_) => "string".into(),
            },

            IrType::Array { element, .. } => format!("{}[]", self.cs_type(element)),

            IrType::Reference {
                name,
                type_arguments,
                ..
            } => self.cs_reference(name, type_arguments),

            IrType::Function {
                parameters,
                return_type,
                ..
            } => {
                self.add_using("System");
                let mut args: Vec<String> = parameters
                    .iter()
                    .map(|p| {
                        p.ty.as_ref()
                            .map_or_else(|| "object".into(), |t| self.cs_type(t))
                    })
                    .collect();
                if return_type.is_primitive(PrimitiveName::Void) {
                    if args.is_empty() {
                        "Action".into()
                    } else {
                        format!("Action<{}>", args.join(", "))
                    }
                } else {
                    args.push(self.cs_type(return_type));
                    format!("Func<{}>", args.join(", "))
                }
            }

            // Anonymous records have no nominal C# counterpart; uses that
            // survive to emission fall back to object.
            IrType::Object { .. } => "object".into(),

            IrType::Union { types } => {
                let n = nullishness(ty);
                if n.is_optional() {
                    let inner = strip_nullish(ty);
                    match &inner {
                        IrType::Union { .. } => "object?".into(),
                        single => format!("{}?", self.cs_type(single)),
                    }
                } else {
                    // A non-nullish union in type position is only
                    // expressible through a generated alias hierarchy; a
                    // bare one erases to object.
                    let _ = types;
                    "object".into()
                }
            }

            IrType::Intersection { .. } => "object".into(),

            IrType::Tuple { elements } => {
                if elements.len() < 2 {
                    match elements.first() {
                        Some(single) => format!("{}[]", self.cs_type(single)),
                        None => "object".into(),
                    }
                } else {
                    let parts: Vec<String> =
                        elements.iter().map(|e| self.cs_type(e)).collect();
                    format!("({})", parts.join(", "))
                }
            }

            IrType::TypeParameterRef { name, .. } => name.clone(),
        }
    }

    fn cs_primitive(&mut self, name: PrimitiveName) -> &'static str {
        match name {
            PrimitiveName::Boolean => "bool",
            PrimitiveName::String => "string",
            PrimitiveName::Number => "double",
            PrimitiveName::Int => "int",
            PrimitiveName::Long => "long",
            PrimitiveName::Null | PrimitiveName::Undefined => "object?",
            PrimitiveName::Void => "void",
            PrimitiveName::Unknown => "object",
            PrimitiveName::Any => {
                self.diag(
                    Span::synthetic(),
                    diagnostic_codes::UNSUPPORTED_CONSTRUCT,
                    &["any"],
                );
                "object"
            }
            PrimitiveName::Never => "void",
            PrimitiveName::StructMarker => "object",
        }
    }

    fn cs_reference(&mut self, name: &str, type_arguments: &[IrType]) -> String {
        if name == DYNAMIC_ANY {
            return "dynamic".into();
        }

        match self.ctx.registry.get(name) {
            Some(Declaration::Alias(alias)) => {
                if crate::declarations::is_object_union_alias(&alias.ty) {
                    // The alias has a generated class hierarchy named after
                    // it; a nullish union member makes the reference
                    // nullable without losing the name.
                    if nullishness(&alias.ty).is_optional() {
                        return format!("{name}?");
                    }
                    return name.to_string();
                }
                match resolve_alias(
                    &IrType::Reference {
                        name: name.to_string(),
                        type_arguments: type_arguments.to_vec(),
                        structural_members: None,
                    },
                    &self.ctx.registry,
                ) {
                    Ok(resolved) => self.cs_type(&resolved),
                    Err(err) => {
                        let (file, span) = self.ctx.declaration_site(name);
                        self.diagnostics.push(err.into_diagnostic(file, span));
                        "object".into()
                    }
                }
            }
            Some(_) => {
                // Classes, interfaces, enums (and specialised declarations)
                // emit by name; specialisation has already flattened any
                // type arguments.
                if type_arguments.is_empty() {
                    name.to_string()
                } else {
                    let args: Vec<String> =
                        type_arguments.iter().map(|a| self.cs_type(a)).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }
            None => match self.ctx.bindings.lookup_type_binding(name) {
                Some(binding) => {
                    let namespace = binding.namespace.clone();
                    let short = binding
                        .fq_name
                        .rsplit('.')
                        .next()
                        .unwrap_or(binding.fq_name.as_str())
                        .to_string();
                    self.add_using(namespace);
                    if type_arguments.is_empty() {
                        short
                    } else {
                        let args: Vec<String> =
                            type_arguments.iter().map(|a| self.cs_type(a)).collect();
                        format!("{}<{}>", short, args.join(", "))
                    }
                }
                None => {
                    // Unregistered and unbound: either a type parameter that
                    // survived into a generic method, or a genuine unknown.
                    if type_arguments.is_empty() {
                        name.to_string()
                    } else {
                        let args: Vec<String> =
                            type_arguments.iter().map(|a| self.cs_type(a)).collect();
                        format!("{}<{}>", name, args.join(", "))
                    }
                }
            },
        }
    }

    /// Emit a type for a value slot, wrapping optional types. Used where the
    /// IR carries an `optional` flag separate from the type itself.
    pub(crate) fn cs_type_optional(&mut self, ty: &IrType, optional: bool) -> String {
        let text = self.cs_type(ty);
        if optional && !text.ends_with('?') {
            format!("{text}?")
        } else {
            text
        }
    }
}
