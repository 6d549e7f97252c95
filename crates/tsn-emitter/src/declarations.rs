//! Declaration emission: classes, interfaces, enums, type aliases.
//!
//! Classes classified as value types by the nominal environment lower to
//! `struct`. A type alias whose body is a union of object shapes generates a
//! small class hierarchy: an abstract base named after the alias and one
//! sealed subclass per member carrying a sentinel shape index; `in`-tests
//! and object literals target the subclasses.

use crate::emit_context::ModuleEmitter;
use crate::printer::Printer;
use tsn_binder::nominal::{STRUCT_MARKER, TypeClassification};
use tsn_ir::expr::{IrExpr, LiteralValue};
use tsn_ir::stmt::{
    ClassDecl, ClassMember, EnumDecl, FunctionDecl, InterfaceDecl, IrStmt, MethodMember,
    TypeAliasDecl,
};
use tsn_ir::types::{IrType, ObjectMember, Parameter, TypeParameter};

fn generics_text(type_parameters: &[TypeParameter]) -> String {
    if type_parameters.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = type_parameters.iter().map(|tp| tp.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

/// The object shapes of a union alias body, paired with their positions in
/// the union. `null`/`undefined` members are skipped (they make the alias
/// nullable, not a different kind of union); any other non-object member
/// disqualifies the alias. Positions index the full union, so shape tests
/// and subclass names agree wherever the union is inspected.
pub fn object_union_shapes(ty: &IrType) -> Option<Vec<(usize, &Vec<ObjectMember>)>> {
    let IrType::Union { types } = ty else {
        return None;
    };
    let mut shapes = Vec::new();
    for (index, member) in types.iter().enumerate() {
        match member {
            IrType::Object { members, .. } => shapes.push((index, members)),
            nullish if nullish.is_nullish() => {}
            _ => return None,
        }
    }
    if shapes.is_empty() { None } else { Some(shapes) }
}

/// Whether an alias body is a union made of object shapes (possibly with
/// nullish members), which gets a generated class hierarchy instead of
/// erasure.
pub fn is_object_union_alias(ty: &IrType) -> bool {
    object_union_shapes(ty).is_some()
}

impl ModuleEmitter<'_> {
    pub(crate) fn emit_class(&mut self, p: &mut Printer, class: &ClassDecl) {
        let keyword = match self.ctx.nominal.classify_name(&class.name) {
            TypeClassification::Value => "struct",
            TypeClassification::Reference => "class",
        };
        let visibility = if class.is_exported { "public" } else { "internal" };

        let mut heritage: Vec<String> = Vec::new();
        if let Some(base) = &class.extends {
            heritage.push(base.name.clone());
        }
        for iface in &class.implements {
            // The struct marker is a compile-time classification, not a
            // real interface.
            if iface.name != STRUCT_MARKER {
                heritage.push(iface.name.clone());
            }
        }
        let heritage_text = if heritage.is_empty() {
            String::new()
        } else {
            format!(" : {}", heritage.join(", "))
        };

        p.open(format!(
            "{visibility} {keyword} {}{heritage_text}",
            class.name
        ));
        let previous_class = self.current_class.replace(class.name.clone());

        for member in &class.members {
            match member {
                ClassMember::Property(prop) => {
                    let ty_text = self.cs_type_optional(&prop.ty, prop.optional);
                    let mut modifiers = String::from("public ");
                    if prop.is_static {
                        modifiers.push_str("static ");
                    }
                    if prop.readonly {
                        modifiers.push_str("readonly ");
                    }
                    match &prop.initializer {
                        Some(init) => {
                            let init_text = self.emit_expr(init, Some(&prop.ty));
                            p.line(format!("{modifiers}{ty_text} {} = {init_text};", prop.name));
                        }
                        None => p.line(format!("{modifiers}{ty_text} {};", prop.name)),
                    }
                }
                ClassMember::Method(method) if method.is_constructor() => {
                    self.emit_constructor(p, class, method);
                }
                ClassMember::Method(method) => self.emit_method(p, method),
            }
        }

        self.current_class = previous_class;
        p.close();
    }

    fn emit_constructor(&mut self, p: &mut Printer, class: &ClassDecl, ctor: &MethodMember) {
        let params_text = self.params_text(&ctor.parameters);
        self.push_scope();
        self.declare_params(&ctor.parameters);

        let body = ctor.body.as_deref().unwrap_or(&[]);
        // A leading super(...) call becomes the base initialiser.
        let (base_call, rest) = split_super_call(body);
        let header = match base_call {
            Some(args) => {
                let arg_texts: Vec<String> =
                    args.iter().map(|a| self.emit_expr(a, None)).collect();
                format!(
                    "public {}({params_text}) : base({})",
                    class.name,
                    arg_texts.join(", ")
                )
            }
            None => format!("public {}({params_text})", class.name),
        };
        p.open(header);
        for stmt in rest {
            self.emit_stmt(p, stmt, None);
        }
        self.pop_scope();
        p.close();
    }

    pub(crate) fn emit_method(&mut self, p: &mut Printer, method: &MethodMember) {
        let mut modifiers = String::from("public ");
        if method.is_static {
            modifiers.push_str("static ");
        }
        let was_static = self.flags.in_static;
        self.flags.in_static = method.is_static;
        // Generic methods keep their parameters; the target supports
        // method-level generics natively.
        let name = format!(
            "{}{}",
            method.name,
            generics_text(&method.type_parameters)
        );
        self.emit_function_like(
            p,
            &name,
            &method.parameters,
            &method.return_type,
            method.body.as_deref(),
            method.is_async,
            method.is_generator,
            &modifiers,
        );
        self.flags.in_static = was_static;
    }

    /// Shared emission for functions, methods, and local functions.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn emit_function_like(
        &mut self,
        p: &mut Printer,
        name: &str,
        parameters: &[Parameter],
        return_type: &IrType,
        body: Option<&[IrStmt]>,
        is_async: bool,
        is_generator: bool,
        modifiers: &str,
    ) {
        let Some(body) = body else {
            // Ambient declarations have no emission.
            return;
        };
        if is_generator {
            self.emit_generator_function(p, name, parameters, return_type, body, is_async, modifiers);
            return;
        }

        let ret_text = self.return_type_text(return_type, is_async);
        let async_text = if is_async { "async " } else { "" };
        let params_text = self.params_text(parameters);

        self.push_scope();
        self.declare_params(parameters);
        let was_async = self.flags.in_async;
        self.flags.in_async = is_async;

        p.open(format!("{modifiers}{async_text}{ret_text} {name}({params_text})"));
        for stmt in body {
            self.emit_stmt(p, stmt, Some(return_type));
        }
        p.close();

        self.flags.in_async = was_async;
        self.pop_scope();
    }

    pub(crate) fn return_type_text(&mut self, return_type: &IrType, is_async: bool) -> String {
        use tsn_ir::types::PrimitiveName;
        if is_async {
            self.add_using("System.Threading.Tasks");
            if return_type.is_primitive(PrimitiveName::Void) {
                return "Task".into();
            }
        }
        self.cs_type(return_type)
    }

    pub(crate) fn params_text(&mut self, parameters: &[Parameter]) -> String {
        let parts: Vec<String> = parameters
            .iter()
            .map(|param| {
                let ty_text = match &param.ty {
                    Some(ty) => self.cs_type_optional(ty, param.optional),
                    None => "object".into(),
                };
                match &param.default {
                    Some(default) => {
                        let default_text = self.emit_expr(default, param.ty.as_ref());
                        format!("{ty_text} {} = {default_text}", param.name)
                    }
                    None if param.optional => format!("{ty_text} {} = default", param.name),
                    None => format!("{ty_text} {}", param.name),
                }
            })
            .collect();
        parts.join(", ")
    }

    pub(crate) fn declare_params(&mut self, parameters: &[Parameter]) {
        for param in parameters {
            let ty = param.ty.clone().unwrap_or(IrType::UNKNOWN);
            self.declare(param.name.clone(), ty);
        }
    }

    pub(crate) fn emit_interface(&mut self, p: &mut Printer, iface: &InterfaceDecl) {
        if iface.name == STRUCT_MARKER {
            return;
        }
        let visibility = if iface.is_exported { "public" } else { "internal" };
        let heritage: Vec<String> = iface
            .extends
            .iter()
            .filter(|h| h.name != STRUCT_MARKER)
            .map(|h| h.name.clone())
            .collect();
        let heritage_text = if heritage.is_empty() {
            String::new()
        } else {
            format!(" : {}", heritage.join(", "))
        };
        p.open(format!("{visibility} interface {}{heritage_text}", iface.name));
        for member in &iface.members {
            match &member.ty {
                IrType::Function {
                    parameters,
                    return_type,
                    is_async,
                    ..
                } => {
                    let ret = self.return_type_text(return_type, *is_async);
                    let params = self.params_text(parameters);
                    p.line(format!("{ret} {}({params});", member.name));
                }
                other => {
                    let ty_text = self.cs_type_optional(other, member.optional);
                    let accessors = if member.readonly { "{ get; }" } else { "{ get; set; }" };
                    p.line(format!("{ty_text} {} {accessors}", member.name));
                }
            }
        }
        p.close();
    }

    pub(crate) fn emit_enum(&mut self, p: &mut Printer, decl: &EnumDecl) {
        let visibility = if decl.is_exported { "public" } else { "internal" };
        let string_valued = decl
            .members
            .iter()
            .any(|m| matches!(m.value, Some(LiteralValue::String(_))));

        if string_valued {
            // String enums have no C# enum counterpart; a static class of
            // consts keeps the member access syntax identical.
            p.open(format!("{visibility} static class {}", decl.name));
            for member in &decl.members {
                let value = match &member.value {
                    Some(LiteralValue::String(s)) => crate::expressions::cs_string_literal(s),
                    Some(other) => other.to_string(),
                    None => crate::expressions::cs_string_literal(&member.name),
                };
                p.line(format!("public const string {} = {value};", member.name));
            }
            p.close();
            return;
        }

        p.open(format!("{visibility} enum {}", decl.name));
        for member in &decl.members {
            match &member.value {
                Some(LiteralValue::Number(n)) => {
                    p.line(format!(
                        "{} = {},",
                        member.name,
                        crate::expressions::format_number(*n)
                    ));
                }
                _ => p.line(format!("{},", member.name)),
            }
        }
        p.close();
    }

    /// Emit the class hierarchy for an object-union alias; other aliases are
    /// erased (the solver resolves them at every use). A nullish member in
    /// the union contributes no subclass; it only makes references to the
    /// alias nullable.
    pub(crate) fn emit_type_alias(&mut self, p: &mut Printer, alias: &TypeAliasDecl) {
        let Some(shapes) = object_union_shapes(&alias.ty) else {
            return;
        };
        let visibility = if alias.is_exported { "public" } else { "internal" };

        p.open(format!("{visibility} abstract class {}", alias.name));
        p.line("public abstract int __shape { get; }");
        p.close();

        for (index, shape) in shapes {
            p.open(format!(
                "{visibility} sealed class {}__{index} : {}",
                alias.name, alias.name
            ));
            p.line(format!("public override int __shape => {index};"));
            for field in shape {
                let ty_text = self.cs_type_optional(&field.ty, field.optional);
                p.line(format!("public {ty_text} {};", field.name));
            }
            p.close();
        }
    }

    pub(crate) fn emit_container_function(&mut self, p: &mut Printer, func: &FunctionDecl) {
        let modifiers = if func.is_exported {
            "public static "
        } else {
            "internal static "
        };
        self.emit_function_like(
            p,
            &func.name,
            &func.parameters,
            &func.return_type,
            func.body.as_deref(),
            func.is_async,
            func.is_generator,
            modifiers,
        );
    }
}

/// Split a leading `super(...)` call off a constructor body.
fn split_super_call(body: &[IrStmt]) -> (Option<&[IrExpr]>, &[IrStmt]) {
    if let Some(IrStmt::Expression {
        expression: IrExpr::Call {
            callee, arguments, ..
        },
        ..
    }) = body.first()
    {
        if matches!(callee.as_ref(), IrExpr::Identifier { name, .. } if name == "super") {
            return (Some(arguments.as_slice()), &body[1..]);
        }
    }
    (None, body)
}
