//! Expression emission.
//!
//! Each handler is a pure function of the node and the emitter context,
//! returning the C# fragment text; usings and diagnostics accumulate on the
//! context. Contextual types flow top-down only: a `return` passes the
//! function's return type into its argument, containers pass element types
//! into their elements.

use crate::emit_context::ModuleEmitter;
use tsn_common::diagnostics::diagnostic_codes;
use tsn_common::span::{Span, Spanned};
use tsn_ir::expr::{ArrowBody, BinaryOp, IrExpr, LiteralValue, LogicalOp, UnaryOp, UpdateOp};
use tsn_ir::types::{IrType, PrimitiveName};
use tsn_solver::widen::{NumericWidth, element_context, width_of};
use tsn_solver::{nullishness, resolve_alias, widen_literal};

/// Namespace of the companion runtime helpers.
pub const RUNTIME_NAMESPACE: &str = "Tsn.Runtime";

/// Render a number the way the surface language wrote it: integral values
/// without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Escape a string into a C# string literal (without the interpolation
/// escapes; see `escape_template_chunk` for those).
pub fn cs_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    push_escaped(&mut out, s);
    out.push('"');
    out
}

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
}

fn escape_template_chunk(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
}

impl ModuleEmitter<'_> {
    /// Emit an expression under an optional contextual type.
    pub(crate) fn emit_expr(&mut self, expr: &IrExpr, contextual: Option<&IrType>) -> String {
        match expr {
            IrExpr::Literal { value, span } => self.emit_literal(value, contextual, *span),
            IrExpr::Null { .. } | IrExpr::Undefined { .. } => "null".into(),

            IrExpr::Identifier { name, .. } => self
                .rename_of(name)
                .map(str::to_string)
                .unwrap_or_else(|| name.clone()),

            IrExpr::Binary {
                operator,
                left,
                right,
                span,
            } => self.emit_binary(*operator, left, right, *span),

            IrExpr::Logical {
                operator,
                left,
                right,
                ..
            } => self.emit_logical(*operator, left, right, contextual),

            IrExpr::Unary {
                operator, operand, ..
            } => self.emit_unary(*operator, operand),

            IrExpr::Update {
                operator,
                prefix,
                operand,
                ..
            } => {
                let op = match operator {
                    UpdateOp::Increment => "++",
                    UpdateOp::Decrement => "--",
                };
                let inner = self.emit_expr(operand, None);
                let text = if *prefix {
                    format!("{op}{inner}")
                } else {
                    format!("{inner}{op}")
                };
                if self.options.checked_numeric {
                    format!("checked({text})")
                } else {
                    text
                }
            }

            IrExpr::Assignment {
                operator,
                target,
                value,
                span,
            } => {
                let target_ty = self.expr_type(target);
                self.check_assignment_width(target_ty.as_ref(), value, *span);
                let target_text = self.emit_expr(target, None);
                let value_text = self.emit_expr(value, target_ty.as_ref());
                format!("{} {} {}", target_text, operator.cs_token(), value_text)
            }

            IrExpr::Conditional {
                condition,
                consequent,
                alternate,
                ..
            } => {
                let cond = self.emit_condition(condition);
                let cons = self.emit_expr(consequent, contextual);
                let alt = self.emit_expr(alternate, contextual);
                format!("{cond} ? {cons} : {alt}")
            }

            IrExpr::Call {
                callee, arguments, ..
            } => self.emit_call(callee, arguments),

            IrExpr::New {
                callee,
                type_arguments,
                arguments,
                span,
            } => self.emit_new(callee, type_arguments, arguments, *span),

            IrExpr::Member {
                object,
                property,
                optional,
                ..
            } => {
                let (object_text, member) = self.emit_receiver_and_member(object, property);
                let sep = if *optional { "?." } else { "." };
                format!("{object_text}{sep}{member}")
            }

            IrExpr::Index { object, index, .. } => {
                let obj = self.emit_operand(object);
                let idx = self.emit_expr(index, None);
                format!("{obj}[{idx}]")
            }

            IrExpr::Array { elements, .. } => self.emit_array_literal(elements, contextual),

            IrExpr::Object { properties, .. } => self.emit_object_literal(properties, contextual),

            IrExpr::Arrow {
                parameters,
                body,
                is_async,
                ..
            } => {
                let contextual_fn = contextual.filter(|c| matches!(c, IrType::Function { .. }));
                let (param_types, implicit) =
                    tsn_solver::infer_lambda_param_types(parameters, contextual_fn);
                for name in implicit {
                    self.diag(
                        expr.span(),
                        diagnostic_codes::IMPLICIT_UNKNOWN_PARAMETER,
                        &[&name],
                    );
                }
                self.push_scope();
                for (param, ty) in parameters.iter().zip(&param_types) {
                    self.declare(param.name.clone(), ty.clone());
                }
                let params: Vec<&str> =
                    parameters.iter().map(|p| p.name.as_str()).collect();
                let header = if *is_async { "async " } else { "" };
                let params_text = if params.len() == 1 {
                    params[0].to_string()
                } else {
                    format!("({})", params.join(", "))
                };
                let body_text = match body.as_ref() {
                    ArrowBody::Expression(e) => {
                        let ret_ctx = match contextual_fn {
                            Some(IrType::Function { return_type, .. }) => Some(return_type.as_ref()),
                            _ => None,
                        };
                        self.emit_expr(e, ret_ctx)
                    }
                    ArrowBody::Block(stmts) => {
                        let ret_ctx = match contextual_fn {
                            Some(IrType::Function { return_type, .. }) => {
                                Some(return_type.as_ref().clone())
                            }
                            _ => None,
                        };
                        self.emit_inline_block(stmts, ret_ctx.as_ref())
                    }
                };
                self.pop_scope();
                format!("{header}{params_text} => {body_text}")
            }

            IrExpr::Function {
                parameters,
                body,
                is_async,
                is_generator,
                span,
                ..
            } => {
                if *is_generator {
                    self.diag(
                        *span,
                        diagnostic_codes::UNSUPPORTED_CONSTRUCT,
                        &["generator function expression"],
                    );
                }
                self.push_scope();
                for param in parameters {
                    if let Some(ty) = &param.ty {
                        self.declare(param.name.clone(), ty.clone());
                    }
                }
                let params: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
                let header = if *is_async { "async " } else { "" };
                let body_text = self.emit_inline_block(body, None);
                self.pop_scope();
                format!("{header}({}) => {body_text}", params.join(", "))
            }

            IrExpr::Template {
                quasis,
                expressions,
                ..
            } => {
                let mut out = String::from("$\"");
                for (i, chunk) in quasis.iter().enumerate() {
                    escape_template_chunk(&mut out, chunk);
                    if let Some(e) = expressions.get(i) {
                        out.push('{');
                        out.push_str(&self.emit_expr(e, None));
                        out.push('}');
                    }
                }
                out.push('"');
                out
            }

            IrExpr::Spread { argument, span } => {
                self.diag(*span, diagnostic_codes::UNSUPPORTED_CONSTRUCT, &["spread"]);
                self.emit_expr(argument, None)
            }

            IrExpr::Cast {
                expression, ty, ..
            } => {
                // Parenthesised so a following member access or call binds
                // to the cast result: ((T)e).m
                let ty_text = self.cs_type(ty);
                let inner = self.emit_expr(expression, None);
                format!("(({ty_text}){inner})")
            }

            IrExpr::Await { argument, .. } => {
                let inner = self.emit_operand(argument);
                format!("await {inner}")
            }

            IrExpr::Yield { span, .. } => {
                // Yield only survives to this handler outside a generator
                // body; the iterator lowering consumes it otherwise.
                self.diag(*span, diagnostic_codes::UNSUPPORTED_CONSTRUCT, &["yield"]);
                "null".into()
            }
        }
    }

    /// Emit an operand, parenthesising compound expressions.
    pub(crate) fn emit_operand(&mut self, expr: &IrExpr) -> String {
        let text = self.emit_expr(expr, None);
        if needs_parens(expr) {
            format!("({text})")
        } else {
            text
        }
    }

    /// Emit a conditional position: boolean expressions pass through, known
    /// non-boolean operands go through the truthiness helper.
    pub(crate) fn emit_condition(&mut self, expr: &IrExpr) -> String {
        if self.is_boolean_expr(expr) {
            return self.emit_expr(expr, None);
        }
        match self.expr_type(expr) {
            // Unknown type: assume the front end checked it is boolean.
            None => self.emit_expr(expr, None),
            Some(_) => {
                self.add_using(RUNTIME_NAMESPACE);
                let inner = self.emit_expr(expr, None);
                format!("RuntimeOps.Truthy({inner})")
            }
        }
    }

    fn emit_literal(
        &mut self,
        value: &LiteralValue,
        contextual: Option<&IrType>,
        span: Span,
    ) -> String {
        match value {
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::String(s) => cs_string_literal(s),
            LiteralValue::Number(n) => {
                if let Err(width) = widen_literal(*n, contextual) {
                    self.diag(
                        span,
                        diagnostic_codes::INTEGER_WIDTH_MISMATCH,
                        &[&format_number(*n), width.cs_name()],
                    );
                }
                format_number(*n)
            }
        }
    }

    fn emit_binary(
        &mut self,
        operator: BinaryOp,
        left: &IrExpr,
        right: &IrExpr,
        span: Span,
    ) -> String {
        match operator {
            BinaryOp::In => self.emit_in_test(left, right, span),
            BinaryOp::InstanceOf => {
                let obj = self.emit_operand(left);
                let ty = self.emit_expr(right, None);
                format!("{obj} is {ty}")
            }
            BinaryOp::Eq | BinaryOp::Neq | BinaryOp::StrictEq | BinaryOp::StrictNeq => {
                if let Some(test) = self.try_typeof_test(operator, left, right) {
                    return test;
                }
                self.check_null_undefined_observation(left, right, span);
                let op = operator.cs_token();
                let l = self.emit_operand(left);
                let r = self.emit_operand(right);
                format!("{l} {op} {r}")
            }
            _ => {
                let op = operator.cs_token();
                let l = self.emit_operand(left);
                let r = self.emit_operand(right);
                format!("{l} {op} {r}")
            }
        }
    }

    /// `typeof x === "string"` lowers to `x is string`.
    fn try_typeof_test(
        &mut self,
        operator: BinaryOp,
        left: &IrExpr,
        right: &IrExpr,
    ) -> Option<String> {
        let IrExpr::Unary {
            operator: UnaryOp::TypeOf,
            operand,
            ..
        } = left
        else {
            return None;
        };
        let IrExpr::Literal {
            value: LiteralValue::String(tag),
            ..
        } = right
        else {
            return None;
        };
        let cs = match tag.as_str() {
            "string" => "string",
            "number" => "double",
            "boolean" => "bool",
            _ => return None,
        };
        let negated = matches!(operator, BinaryOp::Neq | BinaryOp::StrictNeq);
        let obj = self.emit_operand(operand);
        Some(if negated {
            format!("!({obj} is {cs})")
        } else {
            format!("{obj} is {cs}")
        })
    }

    /// `"k" in obj` on a discriminated union lowers to a shape test against
    /// the generated subclass that declares `k`.
    fn emit_in_test(&mut self, left: &IrExpr, right: &IrExpr, span: Span) -> String {
        let IrExpr::Literal {
            value: LiteralValue::String(property),
            ..
        } = left
        else {
            self.diag(span, diagnostic_codes::UNSUPPORTED_CONSTRUCT, &["in"]);
            return "false".into();
        };

        if let Some((alias, index)) = self.union_member_declaring(right, property) {
            let obj = self.emit_operand(right);
            return format!("{obj} is {alias}__{index}");
        }

        // `in` on a dictionary-shaped value is a key test.
        if let Some(IrType::Reference { name, .. }) =
            self.expr_type(right).map(|t| strip_for_lookup(&t))
        {
            if name == "Map" || name == "Dictionary" {
                let obj = self.emit_operand(right);
                return format!("{obj}.ContainsKey({})", cs_string_literal(property));
            }
        }

        self.diag(span, diagnostic_codes::UNSUPPORTED_CONSTRUCT, &["in"]);
        "false".into()
    }

    /// If `expr` has a declared object-union alias type with exactly one
    /// member declaring `property`, return the alias name and member index.
    pub(crate) fn union_member_declaring(
        &mut self,
        expr: &IrExpr,
        property: &str,
    ) -> Option<(String, usize)> {
        let declared = self.expr_type(expr)?;
        let alias_name = declared.reference_name()?.to_string();
        let resolved = resolve_alias(&declared, &self.ctx.registry).ok()?;
        let IrType::Union { types } = resolved else {
            return None;
        };
        let mut found = None;
        for (i, member) in types.iter().enumerate() {
            // Members without an object shape (a nullish member, a bare
            // primitive) cannot declare the property; keep scanning.
            let Some(members) = tsn_solver::infer::shape_members(member, &self.ctx.registry)
            else {
                continue;
            };
            if members.iter().any(|m| m.name == property) {
                if found.is_some() {
                    // More than one member declares it: not a discriminant.
                    return None;
                }
                found = Some(i);
            }
        }
        found.map(|i| (alias_name, i))
    }

    /// A comparison against `null`/`undefined` on a union carrying both
    /// cannot be expressed: both lower to the same absent value.
    fn check_null_undefined_observation(&mut self, left: &IrExpr, right: &IrExpr, span: Span) {
        let is_nullish_probe = matches!(right, IrExpr::Null { .. } | IrExpr::Undefined { .. });
        if !is_nullish_probe {
            return;
        }
        if let Some(ty) = self.expr_type(left) {
            if nullishness(&ty).is_ambiguous() {
                self.diag(span, diagnostic_codes::NULL_UNDEFINED_AMBIGUOUS, &[]);
            }
        }
    }

    fn emit_logical(
        &mut self,
        operator: LogicalOp,
        left: &IrExpr,
        right: &IrExpr,
        contextual: Option<&IrType>,
    ) -> String {
        match operator {
            LogicalOp::NullishCoalescing => {
                let l = self.emit_operand(left);
                let r = self.emit_expr(right, contextual);
                format!("{l} ?? {r}")
            }
            LogicalOp::And | LogicalOp::Or => {
                let token = if operator == LogicalOp::And { "&&" } else { "||" };
                if self.is_boolean_expr(left) && self.is_boolean_expr(right) {
                    let l = self.emit_operand(left);
                    let r = self.emit_operand(right);
                    return format!("{l} {token} {r}");
                }
                // JS truthiness with short-circuit: the right operand is a
                // thunk so it only evaluates when needed.
                self.add_using(RUNTIME_NAMESPACE);
                let helper = if operator == LogicalOp::And {
                    "RuntimeOps.And"
                } else {
                    "RuntimeOps.Or"
                };
                let l = self.emit_expr(left, None);
                let r = self.emit_expr(right, None);
                format!("{helper}({l}, () => {r})")
            }
        }
    }

    fn emit_unary(&mut self, operator: UnaryOp, operand: &IrExpr) -> String {
        match operator {
            UnaryOp::Not => {
                let inner = self.emit_condition(operand);
                format!("!({inner})")
            }
            UnaryOp::Neg => format!("-{}", self.emit_operand(operand)),
            UnaryOp::Plus => format!("+{}", self.emit_operand(operand)),
            UnaryOp::BitNot => format!("~{}", self.emit_operand(operand)),
            UnaryOp::TypeOf => {
                self.add_using(RUNTIME_NAMESPACE);
                format!("RuntimeOps.TypeOf({})", self.emit_expr(operand, None))
            }
            UnaryOp::Void => "null".into(),
        }
    }

    fn emit_call(&mut self, callee: &IrExpr, arguments: &[IrExpr]) -> String {
        let param_types = self.callee_param_types(callee);
        let args: Vec<String> = arguments
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let ctx = param_types.as_ref().and_then(|ps| ps.get(i)).cloned().flatten();
                self.emit_expr(a, ctx.as_ref())
            })
            .collect();
        let callee_text = match callee {
            IrExpr::Member {
                object, property, ..
            } => {
                let (obj, member) = self.emit_receiver_and_member(object, property);
                format!("{obj}.{member}")
            }
            other => self.emit_operand(other),
        };
        format!("{}({})", callee_text, args.join(", "))
    }

    /// Parameter types of the callee, where statically known, for contextual
    /// typing of arguments.
    fn callee_param_types(&self, callee: &IrExpr) -> Option<Vec<Option<IrType>>> {
        let ty = self.expr_type(callee)?;
        match ty {
            IrType::Function { parameters, .. } => {
                Some(parameters.into_iter().map(|p| p.ty).collect())
            }
            _ => None,
        }
    }

    /// Receivers bound to external runtime types emit their short name and
    /// Pascal-cased member (`Console.write` -> `Console.Write`).
    fn emit_receiver_and_member(&mut self, object: &IrExpr, property: &str) -> (String, String) {
        if let IrExpr::Identifier { name, .. } = object {
            if self.lookup_type(name).is_none() {
                if let Some(binding) = self.ctx.bindings.lookup_type_binding(name) {
                    let namespace = binding.namespace.clone();
                    let short = binding
                        .fq_name
                        .rsplit('.')
                        .next()
                        .unwrap_or(name)
                        .to_string();
                    self.add_using(namespace);
                    return (short, pascal_case(property));
                }
            }
        }
        (self.emit_operand(object), property.to_string())
    }

    fn emit_new(
        &mut self,
        callee: &str,
        type_arguments: &[IrType],
        arguments: &[IrExpr],
        span: Span,
    ) -> String {
        // `new Promise<T>(executor)` is recognised structurally and lowered
        // to a completed-task helper backed by a TaskCompletionSource.
        if callee == "Promise" {
            let arg_ty = type_arguments.first().cloned().unwrap_or(IrType::UNKNOWN);
            let ty_text = self.cs_type(&arg_ty);
            self.add_using(RUNTIME_NAMESPACE);
            self.add_using("System.Threading.Tasks");
            let executor = arguments
                .first()
                .map(|a| self.emit_expr(a, None))
                .unwrap_or_else(|| "null".into());
            return format!("PromiseRuntime.Executor<{ty_text}>({executor})");
        }

        let args: Vec<String> = arguments.iter().map(|a| self.emit_expr(a, None)).collect();

        if self.ctx.registry.contains(callee) {
            let targs = if type_arguments.is_empty() {
                String::new()
            } else {
                let parts: Vec<String> =
                    type_arguments.iter().map(|t| self.cs_type(t)).collect();
                format!("<{}>", parts.join(", "))
            };
            return format!("new {callee}{targs}({})", args.join(", "));
        }

        match self.ctx.bindings.lookup_type_binding(callee) {
            Some(binding) => {
                let namespace = binding.namespace.clone();
                let short = binding
                    .fq_name
                    .rsplit('.')
                    .next()
                    .unwrap_or(callee)
                    .to_string();
                self.add_using(namespace);
                let targs = if type_arguments.is_empty() {
                    String::new()
                } else {
                    let parts: Vec<String> =
                        type_arguments.iter().map(|t| self.cs_type(t)).collect();
                    format!("<{}>", parts.join(", "))
                };
                format!("new {short}{targs}({})", args.join(", "))
            }
            None => {
                self.diag(span, diagnostic_codes::CANNOT_FIND_NAME, &[callee]);
                format!("new {callee}({})", args.join(", "))
            }
        }
    }

    fn emit_array_literal(
        &mut self,
        elements: &[IrExpr],
        contextual: Option<&IrType>,
    ) -> String {
        let element_ctx = element_context(contextual).cloned();
        let element_type = match &element_ctx {
            // The annotated element type wins: explicit number[] stays
            // double[] even when every literal is integer-valued.
            Some(ty) => self.cs_type(ty),
            None => self.infer_array_element_type(elements),
        };
        let parts: Vec<String> = elements
            .iter()
            .map(|e| self.emit_expr(e, element_ctx.as_ref()))
            .collect();
        if parts.is_empty() {
            format!("new {element_type}[] {{}}")
        } else {
            format!("new {element_type}[] {{ {} }}", parts.join(", "))
        }
    }

    /// Element selection for unannotated array literals: integer-valued
    /// number literals stay integers; any fractional value forces double.
    fn infer_array_element_type(&mut self, elements: &[IrExpr]) -> String {
        let mut all_int = !elements.is_empty();
        let mut all_string = !elements.is_empty();
        let mut all_bool = !elements.is_empty();
        let mut any_number = false;
        for e in elements {
            match e {
                IrExpr::Literal {
                    value: LiteralValue::Number(n),
                    ..
                } => {
                    any_number = true;
                    all_string = false;
                    all_bool = false;
                    if n.fract() != 0.0 {
                        all_int = false;
                    }
                }
                IrExpr::Literal {
                    value: LiteralValue::String(_),
                    ..
                } => {
                    all_int = false;
                    all_bool = false;
                }
                IrExpr::Literal {
                    value: LiteralValue::Boolean(_),
                    ..
                } => {
                    all_int = false;
                    all_string = false;
                }
                _ => {
                    all_int = false;
                    all_string = false;
                    all_bool = false;
                }
            }
        }
        if any_number && all_int {
            "int".into()
        } else if any_number {
            "double".into()
        } else if all_string {
            "string".into()
        } else if all_bool {
            "bool".into()
        } else {
            "object".into()
        }
    }

    fn emit_object_literal(
        &mut self,
        properties: &[tsn_ir::expr::ObjectProperty],
        contextual: Option<&IrType>,
    ) -> String {
        let literal_members: Vec<tsn_ir::types::ObjectMember> = properties
            .iter()
            .map(|p| tsn_ir::types::ObjectMember {
                name: p.name.clone(),
                ty: self.expr_type(&p.value).unwrap_or(IrType::UNKNOWN),
                optional: false,
                readonly: false,
            })
            .collect();
        let inferred = tsn_solver::infer_object_literal(
            &literal_members,
            contextual,
            &self.ctx.registry,
        );

        let target = match &inferred {
            IrType::Reference { name, .. } => {
                // A union-alias context resolves to the member subclass.
                if let Some(ctx_ty) = contextual {
                    if let Some(name) = self.union_subclass_for_literal(ctx_ty, &literal_members) {
                        Some(name)
                    } else {
                        Some(name.clone())
                    }
                } else {
                    Some(name.clone())
                }
            }
            _ => None,
        };

        let assignments: Vec<String> = properties
            .iter()
            .map(|p| {
                let value = self.emit_expr(&p.value, None);
                format!("{} = {}", p.name, value)
            })
            .collect();

        match target {
            Some(class_name) => {
                if assignments.is_empty() {
                    format!("new {class_name}()")
                } else {
                    format!("new {class_name} {{ {} }}", assignments.join(", "))
                }
            }
            // No nominal context: a C# anonymous object carries the shape.
            None => format!("new {{ {} }}", assignments.join(", ")),
        }
    }

    /// When a literal is typed by an object-union alias, find the generated
    /// subclass matching its shape.
    fn union_subclass_for_literal(
        &mut self,
        contextual: &IrType,
        literal_members: &[tsn_ir::types::ObjectMember],
    ) -> Option<String> {
        let alias_name = contextual.reference_name()?.to_string();
        let resolved = resolve_alias(contextual, &self.ctx.registry).ok()?;
        let IrType::Union { types } = resolved else {
            return None;
        };
        types.iter().enumerate().find_map(|(i, member)| {
            tsn_solver::infer::is_shape_compatible(literal_members, member, &self.ctx.registry)
                .then(|| format!("{alias_name}__{i}"))
        })
    }

    fn check_assignment_width(
        &mut self,
        target_ty: Option<&IrType>,
        value: &IrExpr,
        span: Span,
    ) {
        let Some(target_width) = target_ty.and_then(width_of) else {
            return;
        };
        if target_width == NumericWidth::Double {
            return;
        }
        match value {
            IrExpr::Literal {
                value: LiteralValue::Number(n),
                ..
            } => {
                if !tsn_solver::literal_fits(*n, target_width) {
                    self.diag(
                        span,
                        diagnostic_codes::INTEGER_WIDTH_MISMATCH,
                        &[&format_number(*n), target_width.cs_name()],
                    );
                }
            }
            other => {
                if let Some(value_width) = self.expr_type(other).as_ref().and_then(width_of) {
                    if !value_width.fits_in(target_width) {
                        self.diag(
                            span,
                            diagnostic_codes::INTEGER_WIDTH_MISMATCH,
                            &[value_width.cs_name(), target_width.cs_name()],
                        );
                    }
                }
            }
        }
    }

    /// Render a block body inline for lambda emission.
    fn emit_inline_block(
        &mut self,
        stmts: &[tsn_ir::stmt::IrStmt],
        ret_ctx: Option<&IrType>,
    ) -> String {
        let mut printer = crate::printer::Printer::new();
        printer.line("{");
        printer.indent();
        self.push_scope();
        for stmt in stmts {
            self.emit_stmt(&mut printer, stmt, ret_ctx);
        }
        self.pop_scope();
        printer.dedent();
        printer.line("}");
        let text = printer.finish();
        text.trim_end().to_string()
    }
}

/// Strip nullish wrappers for receiver-kind lookups.
fn strip_for_lookup(ty: &IrType) -> IrType {
    tsn_solver::strip_nullish(ty)
}

fn needs_parens(expr: &IrExpr) -> bool {
    matches!(
        expr,
        IrExpr::Binary { .. }
            | IrExpr::Logical { .. }
            | IrExpr::Conditional { .. }
            | IrExpr::Assignment { .. }
            | IrExpr::Arrow { .. }
            | IrExpr::Await { .. }
    )
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
