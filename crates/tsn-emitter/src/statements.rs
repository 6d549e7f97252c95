//! Statement emission.
//!
//! Control flow always emits with explicit braces. `for...of` over an array
//! lowers to `foreach`; an `if` over a shape or `is` test introduces a
//! pattern binding and renames the narrowed variable through the true
//! branch.

use crate::emit_context::ModuleEmitter;
use crate::printer::Printer;
use tsn_common::diagnostics::diagnostic_codes;
use tsn_common::span::Spanned;
use tsn_ir::expr::{BinaryOp, IrExpr, LiteralValue};
use tsn_ir::stmt::{IrStmt, SwitchCase, VariableDecl};
use tsn_ir::types::IrType;

impl ModuleEmitter<'_> {
    pub(crate) fn emit_stmt(
        &mut self,
        p: &mut Printer,
        stmt: &IrStmt,
        ret_ctx: Option<&IrType>,
    ) {
        match stmt {
            IrStmt::Variable(decl) => self.emit_variable(p, decl),

            IrStmt::Block { statements, .. } => {
                p.line("{");
                p.indent();
                self.push_scope();
                for s in statements {
                    self.emit_stmt(p, s, ret_ctx);
                }
                self.pop_scope();
                p.dedent();
                p.line("}");
            }

            IrStmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.emit_if(p, condition, then_branch, else_branch.as_deref(), ret_ctx),

            IrStmt::While {
                condition, body, ..
            } => {
                let cond = self.emit_condition(condition);
                p.open(format!("while ({cond})"));
                self.emit_branch(p, body, ret_ctx);
                p.close();
            }

            IrStmt::DoWhile {
                body, condition, ..
            } => {
                p.open("do");
                self.emit_branch(p, body, ret_ctx);
                p.dedent();
                let cond = self.emit_condition(condition);
                p.line(format!("}} while ({cond});"));
            }

            IrStmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                self.push_scope();
                let init_text = init
                    .as_deref()
                    .map(|i| self.for_init_fragment(i))
                    .unwrap_or_default();
                let cond_text = condition
                    .as_ref()
                    .map(|c| self.emit_condition(c))
                    .unwrap_or_default();
                let update_text = update
                    .as_ref()
                    .map(|u| self.emit_expr(u, None))
                    .unwrap_or_default();
                p.open(format!("for ({init_text}; {cond_text}; {update_text})"));
                self.emit_branch(p, body, ret_ctx);
                p.close();
                self.pop_scope();
            }

            IrStmt::ForOf {
                binding,
                iterable,
                body,
                ..
            } => {
                let iterable_text = self.emit_expr(iterable, None);
                self.push_scope();
                if let Some(IrType::Array { element, .. }) = self.expr_type(iterable) {
                    self.declare(binding.clone(), (*element).clone());
                }
                p.open(format!("foreach (var {binding} in {iterable_text})"));
                self.emit_branch(p, body, ret_ctx);
                p.close();
                self.pop_scope();
            }

            IrStmt::Switch {
                discriminant,
                cases,
                ..
            } => self.emit_switch(p, discriminant, cases, ret_ctx),

            IrStmt::Try {
                block,
                catch,
                finally,
                ..
            } => {
                self.add_using("System");
                p.open("try");
                self.push_scope();
                for s in block {
                    self.emit_stmt(p, s, ret_ctx);
                }
                self.pop_scope();
                p.close();
                if let Some(clause) = catch {
                    match &clause.binding {
                        Some(name) => {
                            p.open(format!("catch (Exception {name})"));
                            self.push_scope();
                            self.declare(name.clone(), IrType::reference("Error"));
                            for s in &clause.body {
                                self.emit_stmt(p, s, ret_ctx);
                            }
                            self.pop_scope();
                            p.close();
                        }
                        None => {
                            p.open("catch");
                            self.push_scope();
                            for s in &clause.body {
                                self.emit_stmt(p, s, ret_ctx);
                            }
                            self.pop_scope();
                            p.close();
                        }
                    }
                }
                if let Some(fin) = finally {
                    p.open("finally");
                    self.push_scope();
                    for s in fin {
                        self.emit_stmt(p, s, ret_ctx);
                    }
                    self.pop_scope();
                    p.close();
                }
            }

            IrStmt::Throw { argument, span } => {
                self.add_using("System");
                match self.throw_text(argument) {
                    Ok(text) => p.line(format!("throw {text};")),
                    Err(text) => {
                        let shown = self
                            .expr_type(argument)
                            .map_or_else(|| "unknown".into(), type_display);
                        self.diag(*span, diagnostic_codes::THROW_NON_ERROR, &[&shown]);
                        p.line(format!("throw {text};"));
                    }
                }
            }

            IrStmt::Return { argument, .. } => match argument {
                Some(expr) => {
                    let text = self.emit_expr(expr, ret_ctx);
                    p.line(format!("return {text};"));
                }
                None => p.line("return;"),
            },

            IrStmt::Break { .. } => p.line("break;"),
            IrStmt::Continue { .. } => p.line("continue;"),

            IrStmt::Expression { expression, .. } => {
                let text = self.emit_expr(expression, None);
                p.line(format!("{text};"));
            }

            IrStmt::Function(func) => {
                // Nested functions become C# local functions. The iterator
                // lowering emits a class, which cannot nest in a body.
                if func.is_generator {
                    self.diag(
                        func.span,
                        diagnostic_codes::UNSUPPORTED_CONSTRUCT,
                        &["nested generator function"],
                    );
                    return;
                }
                self.emit_function_like(
                    p,
                    &func.name,
                    &func.parameters,
                    &func.return_type,
                    func.body.as_deref(),
                    func.is_async,
                    false,
                    "",
                );
            }

            IrStmt::Class(_) | IrStmt::Interface(_) | IrStmt::Enum(_) | IrStmt::TypeAlias(_) => {
                // Declarations nest at module level only.
                self.diag(
                    stmt.span(),
                    diagnostic_codes::UNSUPPORTED_CONSTRUCT,
                    &["nested declaration"],
                );
            }
        }
    }

    fn emit_variable(&mut self, p: &mut Printer, decl: &VariableDecl) {
        for declarator in &decl.declarations {
            let declared_ty = declarator.ty.clone();
            let ty_text = match &declared_ty {
                Some(ty) => self.cs_type(ty),
                None => "var".into(),
            };
            match &declarator.initializer {
                Some(init) => {
                    let init_text = self.emit_expr(init, declared_ty.as_ref());
                    p.line(format!("{ty_text} {} = {init_text};", declarator.name));
                }
                None => {
                    let fallback = if ty_text == "var" { "object".into() } else { ty_text };
                    p.line(format!("{fallback} {};", declarator.name));
                }
            }
            let recorded = declared_ty
                .or_else(|| {
                    declarator
                        .initializer
                        .as_ref()
                        .and_then(|i| self.expr_type(i))
                })
                .unwrap_or(IrType::UNKNOWN);
            self.declare(declarator.name.clone(), recorded);
        }
    }

    /// A `for` initialiser rendered without the trailing semicolon.
    fn for_init_fragment(&mut self, init: &IrStmt) -> String {
        match init {
            IrStmt::Variable(decl) => {
                let parts: Vec<String> = decl
                    .declarations
                    .iter()
                    .map(|d| {
                        let ty_text = d
                            .ty
                            .as_ref()
                            .map_or_else(|| "var".to_string(), |t| self.cs_type(t));
                        let init_text = d
                            .initializer
                            .as_ref()
                            .map(|i| self.emit_expr(i, d.ty.as_ref()))
                            .unwrap_or_else(|| "default".into());
                        let recorded = d.ty.clone().unwrap_or(IrType::NUMBER);
                        self.declare(d.name.clone(), recorded);
                        format!("{ty_text} {} = {init_text}", d.name)
                    })
                    .collect();
                parts.join(", ")
            }
            IrStmt::Expression { expression, .. } => self.emit_expr(expression, None),
            _ => String::new(),
        }
    }

    fn emit_if(
        &mut self,
        p: &mut Printer,
        condition: &IrExpr,
        then_branch: &IrStmt,
        else_branch: Option<&IrStmt>,
        ret_ctx: Option<&IrType>,
    ) {
        // Shape test with a narrowing binding: `"e" in r` where `r` has a
        // discriminated-union type.
        if let Some((subject, pattern_ty, member_shape)) = self.narrowing_pattern(condition) {
            let binding = self.temp_name(&subject);
            p.open(format!("if ({subject} is {pattern_ty} {binding})"));
            self.push_scope();
            self.rename(subject.clone(), binding.clone());
            self.declare(binding, member_shape);
            self.emit_branch_statements(p, then_branch, ret_ctx);
            self.pop_scope();
            p.close();
            self.emit_else(p, else_branch, ret_ctx);
            return;
        }

        let cond = self.emit_condition(condition);
        p.open(format!("if ({cond})"));
        self.emit_branch(p, then_branch, ret_ctx);
        p.close();
        self.emit_else(p, else_branch, ret_ctx);
    }

    fn emit_else(
        &mut self,
        p: &mut Printer,
        else_branch: Option<&IrStmt>,
        ret_ctx: Option<&IrType>,
    ) {
        if let Some(alt) = else_branch {
            p.open("else");
            self.emit_branch(p, alt, ret_ctx);
            p.close();
        }
    }

    /// Recognise narrowing conditions: `"k" in x` against a union alias, or
    /// `x instanceof T`. Returns (subject identifier, pattern type text,
    /// narrowed shape for member typing).
    fn narrowing_pattern(&mut self, condition: &IrExpr) -> Option<(String, String, IrType)> {
        match condition {
            IrExpr::Binary {
                operator: BinaryOp::In,
                left,
                right,
                ..
            } => {
                let IrExpr::Literal {
                    value: LiteralValue::String(property),
                    ..
                } = left.as_ref()
                else {
                    return None;
                };
                let IrExpr::Identifier { name, .. } = right.as_ref() else {
                    return None;
                };
                let (alias, index) = self.union_member_declaring(right, property)?;
                let shape = self.union_member_shape(right, index)?;
                Some((name.clone(), format!("{alias}__{index}"), shape))
            }
            IrExpr::Binary {
                operator: BinaryOp::InstanceOf,
                left,
                right,
                ..
            } => {
                let IrExpr::Identifier { name, .. } = left.as_ref() else {
                    return None;
                };
                let IrExpr::Identifier { name: ty_name, .. } = right.as_ref() else {
                    return None;
                };
                // Only narrow to declared class types.
                if !self.ctx.registry.contains(ty_name) {
                    return None;
                }
                Some((
                    name.clone(),
                    ty_name.clone(),
                    IrType::reference(ty_name.clone()),
                ))
            }
            _ => None,
        }
    }

    fn union_member_shape(&mut self, expr: &IrExpr, index: usize) -> Option<IrType> {
        let declared = self.expr_type(expr)?;
        let resolved = tsn_solver::resolve_alias(&declared, &self.ctx.registry).ok()?;
        match resolved {
            IrType::Union { types } => types.get(index).cloned(),
            _ => None,
        }
    }

    /// Emit a branch body; a block keeps its statements inline under the
    /// already-open brace, anything else emits as a single statement.
    fn emit_branch(&mut self, p: &mut Printer, branch: &IrStmt, ret_ctx: Option<&IrType>) {
        self.push_scope();
        self.emit_branch_statements(p, branch, ret_ctx);
        self.pop_scope();
    }

    fn emit_branch_statements(
        &mut self,
        p: &mut Printer,
        branch: &IrStmt,
        ret_ctx: Option<&IrType>,
    ) {
        match branch {
            IrStmt::Block { statements, .. } => {
                for s in statements {
                    self.emit_stmt(p, s, ret_ctx);
                }
            }
            single => self.emit_stmt(p, single, ret_ctx),
        }
    }

    fn emit_switch(
        &mut self,
        p: &mut Printer,
        discriminant: &IrExpr,
        cases: &[SwitchCase],
        ret_ctx: Option<&IrType>,
    ) {
        let disc = self.emit_expr(discriminant, None);
        p.open(format!("switch ({disc})"));
        for case in cases {
            match &case.test {
                Some(test) => {
                    let test_text = self.emit_expr(test, None);
                    p.line(format!("case {test_text}:"));
                }
                None => p.line("default:"),
            }
            p.indent();
            self.push_scope();
            for s in &case.statements {
                self.emit_stmt(p, s, ret_ctx);
            }
            self.pop_scope();
            if !ends_control_flow(case.statements.last()) {
                p.line("break;");
            }
            p.dedent();
        }
        p.close();
    }

    /// The throw argument if Error-shaped, or the best-effort fallback text
    /// as the error value.
    pub(crate) fn throw_text(&mut self, argument: &IrExpr) -> Result<String, String> {
        match argument {
            IrExpr::New { callee, arguments, .. } if callee == "Error" => {
                let args: Vec<String> =
                    arguments.iter().map(|a| self.emit_expr(a, None)).collect();
                Ok(format!("new Exception({})", args.join(", ")))
            }
            other => {
                let is_error_shaped = matches!(
                    self.expr_type(other),
                    Some(IrType::Reference { ref name, .. }) if name == "Error"
                );
                let text = self.emit_expr(other, None);
                if is_error_shaped {
                    Ok(text)
                } else {
                    Err(format!("new Exception($\"{{{text}}}\")"))
                }
            }
        }
    }
}

fn ends_control_flow(last: Option<&IrStmt>) -> bool {
    matches!(
        last,
        Some(
            IrStmt::Break { .. }
                | IrStmt::Continue { .. }
                | IrStmt::Return { .. }
                | IrStmt::Throw { .. }
        )
    )
}

fn type_display(ty: IrType) -> String {
    tsn_ir::type_key::type_key(&ty)
}
