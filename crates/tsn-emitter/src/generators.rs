//! Generator and async-generator lowering.
//!
//! A generator function lowers to a nested iterator class: parameters and
//! locals hoist to fields, the body compiles into numbered states, and a
//! `MoveNext`-style step function dispatches on `__state`. Within one step,
//! transitions use `goto case`; across steps, `__state` records the resume
//! point before `return true`. `yield` as an expression reads the value
//! pushed through `Send` from the `__sent` field.
//!
//! Supported control flow around `yield`: blocks, `if`, `while`, `do-while`,
//! `for`, and `for...of` over arrays. `yield` inside `try` is rejected
//! rather than miscompiled.

use crate::emit_context::ModuleEmitter;
use crate::printer::Printer;
use tsn_common::diagnostics::diagnostic_codes;
use tsn_common::span::Spanned;
use tsn_ir::expr::IrExpr;
use tsn_ir::stmt::IrStmt;
use tsn_ir::types::{IrType, Parameter};

/// State-machine accumulator: numbered states, hoisted fields, loop targets.
struct SmBuilder {
    states: Vec<Vec<String>>,
    current: usize,
    fields: Vec<(String, String)>,
    /// (continue target, break target) per enclosing compiled loop.
    loops: Vec<(usize, usize)>,
    temp: u32,
}

impl SmBuilder {
    fn new() -> Self {
        SmBuilder {
            states: vec![Vec::new()],
            current: 0,
            fields: Vec::new(),
            loops: Vec::new(),
            temp: 0,
        }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.states[self.current].push(line.into());
    }

    fn new_state(&mut self) -> usize {
        self.states.push(Vec::new());
        self.states.len() - 1
    }

    fn goto(&mut self, target: usize) {
        self.push(format!("goto case {target};"));
    }

    fn set_current(&mut self, state: usize) {
        self.current = state;
    }

    fn field(&mut self, ty: impl Into<String>, name: impl Into<String>) {
        let name = name.into();
        if !self.fields.iter().any(|(_, n)| *n == name) {
            self.fields.push((ty.into(), name));
        }
    }

    fn temp_name(&mut self, stem: &str) -> String {
        let name = format!("__{stem}{}", self.temp);
        self.temp += 1;
        name
    }
}

fn contains_yield_expr(expr: &IrExpr) -> bool {
    matches!(expr, IrExpr::Yield { .. })
}

impl ModuleEmitter<'_> {
    pub(crate) fn emit_generator_function(
        &mut self,
        p: &mut Printer,
        name: &str,
        parameters: &[Parameter],
        return_type: &IrType,
        body: &[IrStmt],
        is_async: bool,
        modifiers: &str,
    ) {
        let element_ty = generator_element_type(return_type);
        let element_text = self.cs_type(&element_ty);
        self.add_using("System.Collections.Generic");
        let iterator_class = format!("{name}__Iterator");

        let iface = if is_async {
            self.add_using("System.Threading.Tasks");
            self.add_using("System.Threading");
            "IAsyncEnumerable"
        } else {
            "IEnumerable"
        };

        // The visible function just constructs the iterator.
        let params_text = self.params_text(parameters);
        let arg_names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
        p.open(format!(
            "{modifiers}{iface}<{element_text}> {name}({params_text})"
        ));
        p.line(format!(
            "return new {iterator_class}({});",
            arg_names.join(", ")
        ));
        p.close();

        // Compile the body into states.
        self.push_scope();
        self.declare_params(parameters);
        let was_generator = self.flags.in_generator;
        let was_async = self.flags.in_async;
        self.flags.in_generator = true;
        self.flags.in_async = is_async;

        let mut sm = SmBuilder::new();
        for param in parameters {
            let ty = param.ty.clone().unwrap_or(IrType::UNKNOWN);
            let ty_text = self.cs_type(&ty);
            sm.field(ty_text, param.name.clone());
        }
        for stmt in body {
            self.compile_generator_stmt(&mut sm, stmt, &element_ty);
        }
        sm.push("__state = -1;");
        sm.push("return false;");

        self.flags.in_generator = was_generator;
        self.flags.in_async = was_async;
        self.pop_scope();

        self.emit_iterator_class(
            p,
            &iterator_class,
            &element_text,
            parameters,
            &sm,
            is_async,
        );
    }

    fn emit_iterator_class(
        &mut self,
        p: &mut Printer,
        class_name: &str,
        element_text: &str,
        parameters: &[Parameter],
        sm: &SmBuilder,
        is_async: bool,
    ) {
        let ifaces = if is_async {
            format!("IAsyncEnumerable<{element_text}>, IAsyncEnumerator<{element_text}>")
        } else {
            format!("IEnumerable<{element_text}>, IEnumerator<{element_text}>")
        };
        p.open(format!("private sealed class {class_name} : {ifaces}"));
        p.line("private int __state;");
        p.line(format!("private {element_text} __current = default!;"));
        p.line("private object? __sent;");

        let param_names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
        for (ty, name) in &sm.fields {
            p.line(format!("private {ty} {name} = default!;"));
        }

        let ctor_params: Vec<String> = sm
            .fields
            .iter()
            .filter(|(_, name)| param_names.contains(&name.as_str()))
            .map(|(ty, name)| format!("{ty} {name}"))
            .collect();
        p.open(format!("public {class_name}({})", ctor_params.join(", ")));
        for name in &param_names {
            p.line(format!("this.{name} = {name};"));
        }
        p.close();

        p.line(format!("public {element_text} Current => __current;"));
        p.line("public void Send(object? value) => __sent = value;");

        if is_async {
            p.line(format!(
                "public IAsyncEnumerator<{element_text}> GetAsyncEnumerator(CancellationToken cancellationToken = default) => this;"
            ));
            p.line("public ValueTask DisposeAsync() => default;");
            p.open("public async ValueTask<bool> MoveNextAsync()");
        } else {
            p.line("object? System.Collections.IEnumerator.Current => __current;");
            p.line(format!(
                "public IEnumerator<{element_text}> GetEnumerator() => this;"
            ));
            p.line(
                "System.Collections.IEnumerator System.Collections.IEnumerable.GetEnumerator() => this;",
            );
            p.line("public void Reset() { }");
            p.line("public void Dispose() { }");
            p.open("public bool MoveNext()");
        }

        p.open("switch (__state)");
        for (index, lines) in sm.states.iter().enumerate() {
            p.line(format!("case {index}: {{"));
            p.indent();
            for line in lines {
                p.line(line);
            }
            p.dedent();
            p.line("}");
        }
        p.close();
        p.line("return false;");
        p.close();

        p.close();
    }

    fn compile_generator_stmt(&mut self, sm: &mut SmBuilder, stmt: &IrStmt, element_ty: &IrType) {
        match stmt {
            IrStmt::Variable(decl) => {
                for declarator in &decl.declarations {
                    let ty = declarator
                        .ty
                        .clone()
                        .or_else(|| {
                            declarator
                                .initializer
                                .as_ref()
                                .and_then(|i| self.expr_type(i))
                        })
                        .unwrap_or(IrType::UNKNOWN);
                    let ty_text = self.cs_type(&ty);
                    sm.field(ty_text.clone(), declarator.name.clone());
                    self.declare(declarator.name.clone(), ty.clone());
                    match &declarator.initializer {
                        Some(IrExpr::Yield {
                            argument, span, ..
                        }) => {
                            self.compile_yield(sm, argument.as_deref(), element_ty);
                            sm.push(resume_assignment(&declarator.name, &ty_text));
                        }
                        Some(init) => {
                            let text = self.emit_expr(init, declarator.ty.as_ref());
                            sm.push(format!("{} = {text};", declarator.name));
                        }
                        None => {}
                    }
                }
            }

            IrStmt::Expression { expression, .. } => match expression {
                IrExpr::Yield {
                    argument, span, ..
                } => {
                    self.compile_yield(sm, argument.as_deref(), element_ty);
                }
                IrExpr::Assignment {
                    operator,
                    target,
                    value,
                    ..
                } if contains_yield_expr(value) => {
                    let IrExpr::Yield {
                        argument, span, ..
                    } = value.as_ref()
                    else {
                        unreachable!("guarded by contains_yield_expr");
                    };
                    self.compile_yield(sm, argument.as_deref(), element_ty);
                    let ty_text = self
                        .expr_type(target)
                        .map(|t| self.cs_type(&t))
                        .unwrap_or_else(|| "object".into());
                    let target_text = self.emit_expr(target, None);
                    let _ = operator;
                    sm.push(resume_assignment(&target_text, &ty_text));
                }
                other => {
                    let text = self.emit_expr(other, None);
                    sm.push(format!("{text};"));
                }
            },

            IrStmt::Return { .. } => {
                sm.push("__state = -1;");
                sm.push("return false;");
            }

            IrStmt::Throw { argument, .. } => {
                self.add_using("System");
                match self.throw_text(argument) {
                    Ok(text) | Err(text) => sm.push(format!("throw {text};")),
                }
            }

            IrStmt::Block { statements, .. } => {
                self.push_scope();
                for s in statements {
                    self.compile_generator_stmt(sm, s, element_ty);
                }
                self.pop_scope();
            }

            IrStmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond = self.emit_condition(condition);
                let join = sm.new_state();
                match else_branch {
                    Some(alt) => {
                        let else_start = sm.new_state();
                        sm.push(format!("if (!({cond})) {{ goto case {else_start}; }}"));
                        self.compile_branch(sm, then_branch, element_ty);
                        sm.goto(join);
                        sm.set_current(else_start);
                        self.compile_branch(sm, alt, element_ty);
                        sm.goto(join);
                    }
                    None => {
                        sm.push(format!("if (!({cond})) {{ goto case {join}; }}"));
                        self.compile_branch(sm, then_branch, element_ty);
                        sm.goto(join);
                    }
                }
                sm.set_current(join);
            }

            IrStmt::While {
                condition, body, ..
            } => {
                let head = sm.new_state();
                let exit = sm.new_state();
                sm.goto(head);
                sm.set_current(head);
                let cond = self.emit_condition(condition);
                sm.push(format!("if (!({cond})) {{ goto case {exit}; }}"));
                sm.loops.push((head, exit));
                self.compile_branch(sm, body, element_ty);
                sm.loops.pop();
                sm.goto(head);
                sm.set_current(exit);
            }

            IrStmt::DoWhile {
                body, condition, ..
            } => {
                let body_state = sm.new_state();
                let test = sm.new_state();
                let exit = sm.new_state();
                sm.goto(body_state);
                sm.set_current(body_state);
                sm.loops.push((test, exit));
                self.compile_branch(sm, body, element_ty);
                sm.loops.pop();
                sm.goto(test);
                sm.set_current(test);
                let cond = self.emit_condition(condition);
                sm.push(format!("if ({cond}) {{ goto case {body_state}; }}"));
                sm.goto(exit);
                sm.set_current(exit);
            }

            IrStmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                self.push_scope();
                if let Some(init_stmt) = init {
                    self.compile_generator_stmt(sm, init_stmt, element_ty);
                }
                let head = sm.new_state();
                let step = sm.new_state();
                let exit = sm.new_state();
                sm.goto(head);
                sm.set_current(head);
                if let Some(cond_expr) = condition {
                    let cond = self.emit_condition(cond_expr);
                    sm.push(format!("if (!({cond})) {{ goto case {exit}; }}"));
                }
                sm.loops.push((step, exit));
                self.compile_branch(sm, body, element_ty);
                sm.loops.pop();
                sm.goto(step);
                sm.set_current(step);
                if let Some(update_expr) = update {
                    let text = self.emit_expr(update_expr, None);
                    sm.push(format!("{text};"));
                }
                sm.goto(head);
                sm.set_current(exit);
                self.pop_scope();
            }

            IrStmt::ForOf {
                binding,
                iterable,
                body,
                ..
            } => {
                self.push_scope();
                let element = match self.expr_type(iterable) {
                    Some(IrType::Array { element, .. }) => *element,
                    _ => IrType::UNKNOWN,
                };
                let element_text = self.cs_type(&element);
                let arr = sm.temp_name("arr");
                let idx = sm.temp_name("idx");
                sm.field(format!("{element_text}[]"), arr.clone());
                sm.field("int", idx.clone());
                sm.field(element_text, binding.clone());
                self.declare(binding.clone(), element);

                let iterable_text = self.emit_expr(iterable, None);
                sm.push(format!("{arr} = {iterable_text};"));
                sm.push(format!("{idx} = 0;"));
                let head = sm.new_state();
                let exit = sm.new_state();
                sm.goto(head);
                sm.set_current(head);
                sm.push(format!(
                    "if (!({idx} < {arr}.Length)) {{ goto case {exit}; }}"
                ));
                sm.push(format!("{binding} = {arr}[{idx}];"));
                sm.push(format!("{idx}++;"));
                sm.loops.push((head, exit));
                self.compile_branch(sm, body, element_ty);
                sm.loops.pop();
                sm.goto(head);
                sm.set_current(exit);
                self.pop_scope();
            }

            IrStmt::Break { .. } => match sm.loops.last() {
                Some(&(_, exit)) => sm.goto(exit),
                None => sm.push("break;"),
            },
            IrStmt::Continue { .. } => match sm.loops.last() {
                Some(&(head, _)) => sm.goto(head),
                None => sm.push("continue;"),
            },

            IrStmt::Try { span, .. } => {
                self.diag(*span, diagnostic_codes::YIELD_IN_TRY, &[]);
            }

            other => {
                self.diag(
                    other.span(),
                    diagnostic_codes::UNSUPPORTED_CONSTRUCT,
                    &["statement in generator body"],
                );
            }
        }
    }

    fn compile_branch(&mut self, sm: &mut SmBuilder, branch: &IrStmt, element_ty: &IrType) {
        self.push_scope();
        match branch {
            IrStmt::Block { statements, .. } => {
                for s in statements {
                    self.compile_generator_stmt(sm, s, element_ty);
                }
            }
            single => self.compile_generator_stmt(sm, single, element_ty),
        }
        self.pop_scope();
    }

    fn compile_yield(
        &mut self,
        sm: &mut SmBuilder,
        argument: Option<&IrExpr>,
        element_ty: &IrType,
    ) {
        let value = match argument {
            Some(expr) => self.emit_expr(expr, Some(element_ty)),
            None => "default!".into(),
        };
        sm.push(format!("__current = {value};"));
        let resume = sm.new_state();
        sm.push(format!("__state = {resume};"));
        sm.push("return true;");
        sm.set_current(resume);
    }
}

/// The resumed value of a `yield` expression, read from the pushed slot.
fn resume_assignment(target: &str, ty_text: &str) -> String {
    if ty_text == "object" || ty_text == "object?" {
        format!("{target} = __sent;")
    } else {
        format!("{target} = ({ty_text})__sent!;")
    }
}

/// Element type of a generator's declared return type: the first argument of
/// `Iterable<T>`-shaped references.
fn generator_element_type(return_type: &IrType) -> IrType {
    match return_type {
        IrType::Reference {
            name,
            type_arguments,
            ..
        } if !type_arguments.is_empty()
            && matches!(
                name.as_str(),
                "Iterable" | "Iterator" | "IterableIterator" | "Generator" | "AsyncIterable"
                    | "AsyncIterator" | "AsyncGenerator"
            ) =>
        {
            type_arguments[0].clone()
        }
        IrType::Array { element, .. } => (**element).clone(),
        _ => IrType::UNKNOWN,
    }
}
