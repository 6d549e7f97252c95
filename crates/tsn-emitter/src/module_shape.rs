//! Namespace and static-container synthesis.
//!
//! A module at `pkg/foo/bar.ts` emits into namespace `Pkg.Foo` with its
//! free functions and module-level state in static class `Bar`. When a
//! declaration already claims the file's class name, the leftover top-level
//! code moves to a sibling `Bar__Module`. Module-level executable statements
//! collect into a synthesised `Main`, in source order; module-level bindings
//! referenced from declarations (or declared `const`) become static fields,
//! the rest become `Main` locals.

use crate::emit_context::ModuleEmitter;
use crate::printer::Printer;
use crate::result::EmitResult;
use rustc_hash::FxHashSet;
use tracing::debug;
use tsn_ir::expr::{ArrowBody, IrExpr};
use tsn_ir::stmt::{ClassMember, IrStmt};
use tsn_ir::types::IrType;

/// `pkg/foo/bar.ts` -> `Pkg.Foo`. Modules at the source root emit into
/// `Program`.
pub fn namespace_for_path(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();
    if segments.is_empty() {
        return "Program".into();
    }
    segments
        .iter()
        .map(|s| pascal_segment(s))
        .collect::<Vec<_>>()
        .join(".")
}

/// `pkg/foo/bar.ts` -> `Bar`.
pub fn container_class_name(path: &str) -> String {
    let stem = path
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .split('.')
        .next()
        .unwrap_or(path);
    pascal_segment(stem)
}

fn pascal_segment(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Where a module-level binding lives in the emitted container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingPlacement {
    StaticField,
    MainLocal,
}

impl ModuleEmitter<'_> {
    pub(crate) fn emit_module_shape(&mut self) -> EmitResult {
        let namespace = namespace_for_path(&self.module.path);
        let file_class = container_class_name(&self.module.path);
        debug!(module = %self.module.path, namespace = %namespace, "emitting module");

        let statements = &self.module.statements;
        let has_named_decl = statements
            .iter()
            .any(|s| s.declared_name() == Some(file_class.as_str()));
        let has_loose_code = statements.iter().any(|s| {
            !matches!(
                s,
                IrStmt::Class(_) | IrStmt::Interface(_) | IrStmt::Enum(_) | IrStmt::TypeAlias(_)
            )
        });
        let container = if has_named_decl && has_loose_code {
            format!("{file_class}__Module")
        } else {
            file_class.clone()
        };

        // Classify module-level bindings.
        let placements = self.classify_bindings();

        let mut body = Printer::new();
        body.indent(); // inside the namespace block

        // Named declarations are namespace members.
        for stmt in statements {
            match stmt {
                IrStmt::Class(c) => self.emit_class(&mut body, c),
                IrStmt::Interface(i) => self.emit_interface(&mut body, i),
                IrStmt::Enum(e) => self.emit_enum(&mut body, e),
                IrStmt::TypeAlias(a) => self.emit_type_alias(&mut body, a),
                _ => {}
            }
        }

        self.emit_container(&mut body, &container, &placements);
        self.emit_json_context(&mut body, &file_class);

        body.dedent();

        // Assemble: header, sorted usings, one namespace block.
        let mut out = Printer::new();
        out.line("// <auto-generated/>");
        out.line(format!(
            "// Generated by tsn {} from {}",
            env!("CARGO_PKG_VERSION"),
            self.module.path
        ));
        let usings: Vec<String> = self.usings.iter().cloned().collect();
        if !usings.is_empty() {
            for namespace in &usings {
                out.line(format!("using {namespace};"));
            }
        }
        out.blank();
        out.open(format!("namespace {namespace}"));
        out.dedent(); // body carries its own indentation
        for line in body.finish().lines() {
            if line.is_empty() {
                out.blank();
            } else {
                out.line(line);
            }
        }
        out.indent();
        out.close();

        let mut output_path = self.module.path.clone();
        if let Some(stripped) = output_path.strip_suffix(".ts") {
            output_path = format!("{stripped}.cs");
        } else {
            output_path.push_str(".cs");
        }

        EmitResult {
            path: output_path,
            namespace_name: namespace,
            text: out.finish(),
            required_usings: usings,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    /// Decide static-field vs Main-local for every module-level declarator:
    /// a binding referenced from any declaration becomes a field (exported
    /// members must reach it), `const` bindings become fields, the rest stay
    /// local to `Main`.
    fn classify_bindings(&self) -> Vec<(String, BindingPlacement)> {
        let decl_referenced: FxHashSet<String> = {
            let mut referenced = FxHashSet::default();
            for stmt in &self.module.statements {
                if stmt.is_declaration() && !matches!(stmt, IrStmt::Variable(_)) {
                    collect_identifiers_stmt(stmt, &mut referenced);
                }
            }
            referenced
        };

        let mut placements = Vec::new();
        for stmt in &self.module.statements {
            let IrStmt::Variable(decl) = stmt else {
                continue;
            };
            for declarator in &decl.declarations {
                let placement = if decl_referenced.contains(&declarator.name) || decl.is_const {
                    BindingPlacement::StaticField
                } else {
                    BindingPlacement::MainLocal
                };
                placements.push((declarator.name.clone(), placement));
            }
        }
        placements
    }

    fn emit_container(
        &mut self,
        body: &mut Printer,
        container: &str,
        placements: &[(String, BindingPlacement)],
    ) {
        let statements = &self.module.statements;
        let functions: Vec<&IrStmt> = statements
            .iter()
            .filter(|s| matches!(s, IrStmt::Function(_)))
            .collect();
        // Main holds the executable statements plus the variable statements
        // that stay local to it, in source order.
        let executables: Vec<&IrStmt> = statements
            .iter()
            .filter(|s| match s {
                IrStmt::Variable(v) => v.declarations.iter().any(|d| {
                    placement_of(placements, &d.name) == Some(BindingPlacement::MainLocal)
                }),
                other => !other.is_declaration(),
            })
            .collect();
        let fields: Vec<&IrStmt> = statements
            .iter()
            .filter(|s| {
                if let IrStmt::Variable(v) = s {
                    v.declarations.iter().any(|d| {
                        placement_of(placements, &d.name) == Some(BindingPlacement::StaticField)
                    })
                } else {
                    false
                }
            })
            .collect();

        let has_content = !functions.is_empty() || !executables.is_empty() || !fields.is_empty();
        let module_has_types = statements.iter().any(|s| {
            matches!(
                s,
                IrStmt::Class(_) | IrStmt::Interface(_) | IrStmt::Enum(_) | IrStmt::TypeAlias(_)
            )
        });
        if !has_content && module_has_types {
            return;
        }

        body.open(format!("public static class {container}"));

        // Static fields first, in source order.
        for stmt in &fields {
            let IrStmt::Variable(decl) = stmt else {
                continue;
            };
            for declarator in &decl.declarations {
                if placement_of(placements, &declarator.name)
                    != Some(BindingPlacement::StaticField)
                {
                    continue;
                }
                let visibility = if decl.is_exported { "internal" } else { "private" };
                let modifiers = if decl.is_const {
                    format!("{visibility} static readonly")
                } else {
                    format!("{visibility} static")
                };
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
                self.declare(declarator.name.clone(), ty);
                match &declarator.initializer {
                    Some(init) => {
                        let init_text = self.emit_expr(init, declarator.ty.as_ref());
                        body.line(format!(
                            "{modifiers} {ty_text} {} = {init_text};",
                            declarator.name
                        ));
                    }
                    None => body.line(format!("{modifiers} {ty_text} {};", declarator.name)),
                }
            }
        }

        for stmt in &functions {
            let IrStmt::Function(func) = stmt else {
                continue;
            };
            self.declare(
                func.name.clone(),
                IrType::Function {
                    parameters: func.parameters.clone(),
                    return_type: Box::new(func.return_type.clone()),
                    type_parameters: func.type_parameters.clone(),
                    is_async: func.is_async,
                },
            );
            self.emit_container_function(body, func);
        }

        if !executables.is_empty() {
            let is_async = executables.iter().any(|s| stmt_contains_await(s));
            let header = if is_async {
                self.add_using("System.Threading.Tasks");
                "public static async Task Main(string[] args)"
            } else {
                "public static void Main(string[] args)"
            };
            let was_async = self.flags.in_async;
            self.flags.in_async = is_async;
            body.open(header);
            self.push_scope();
            // Source order, with field-placed bindings skipped.
            for stmt in &executables {
                match stmt {
                    IrStmt::Variable(decl) => {
                        let all_fields = decl.declarations.iter().all(|d| {
                            placement_of(placements, &d.name)
                                == Some(BindingPlacement::StaticField)
                        });
                        if !all_fields {
                            self.emit_stmt(body, stmt, None);
                        }
                    }
                    other => self.emit_stmt(body, other, None),
                }
            }
            self.pop_scope();
            body.close();
            self.flags.in_async = was_async;
        }

        body.close();
    }

    /// Pre-compiled JSON support: one partial serializer context per module
    /// that registered types.
    fn emit_json_context(&mut self, body: &mut Printer, file_class: &str) {
        let owned: Vec<&String> = self
            .ctx
            .json_aot
            .iter()
            .filter(|(_, module)| module.as_str() == self.module.path)
            .map(|(name, _)| name)
            .collect();
        if owned.is_empty() {
            return;
        }
        self.add_using("System.Text.Json.Serialization");
        for name in &owned {
            body.line(format!("[JsonSerializable(typeof({name}))]"));
        }
        body.line(format!(
            "internal sealed partial class {file_class}__JsonContext : JsonSerializerContext"
        ));
        body.line("{");
        body.line("}");
    }
}

fn placement_of(
    placements: &[(String, BindingPlacement)],
    name: &str,
) -> Option<BindingPlacement> {
    placements
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, p)| *p)
}

// =============================================================================
// Reference walkers
// =============================================================================

fn collect_identifiers_stmt(stmt: &IrStmt, out: &mut FxHashSet<String>) {
    match stmt {
        IrStmt::Function(f) => {
            for param in &f.parameters {
                if let Some(default) = &param.default {
                    collect_identifiers_expr(default, out);
                }
            }
            for s in f.body.iter().flatten() {
                collect_identifiers_stmt(s, out);
            }
        }
        IrStmt::Class(c) => {
            for member in &c.members {
                match member {
                    ClassMember::Property(p) => {
                        if let Some(init) = &p.initializer {
                            collect_identifiers_expr(init, out);
                        }
                    }
                    ClassMember::Method(m) => {
                        for s in m.body.iter().flatten() {
                            collect_identifiers_stmt(s, out);
                        }
                    }
                }
            }
        }
        IrStmt::Variable(v) => {
            for d in &v.declarations {
                if let Some(init) = &d.initializer {
                    collect_identifiers_expr(init, out);
                }
            }
        }
        IrStmt::Block { statements, .. } => {
            for s in statements {
                collect_identifiers_stmt(s, out);
            }
        }
        IrStmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            collect_identifiers_expr(condition, out);
            collect_identifiers_stmt(then_branch, out);
            if let Some(alt) = else_branch {
                collect_identifiers_stmt(alt, out);
            }
        }
        IrStmt::While { condition, body, .. } | IrStmt::DoWhile { condition, body, .. } => {
            collect_identifiers_expr(condition, out);
            collect_identifiers_stmt(body, out);
        }
        IrStmt::For {
            init,
            condition,
            update,
            body,
            ..
        } => {
            if let Some(i) = init {
                collect_identifiers_stmt(i, out);
            }
            if let Some(c) = condition {
                collect_identifiers_expr(c, out);
            }
            if let Some(u) = update {
                collect_identifiers_expr(u, out);
            }
            collect_identifiers_stmt(body, out);
        }
        IrStmt::ForOf { iterable, body, .. } => {
            collect_identifiers_expr(iterable, out);
            collect_identifiers_stmt(body, out);
        }
        IrStmt::Switch {
            discriminant,
            cases,
            ..
        } => {
            collect_identifiers_expr(discriminant, out);
            for case in cases {
                if let Some(test) = &case.test {
                    collect_identifiers_expr(test, out);
                }
                for s in &case.statements {
                    collect_identifiers_stmt(s, out);
                }
            }
        }
        IrStmt::Try {
            block,
            catch,
            finally,
            ..
        } => {
            for s in block {
                collect_identifiers_stmt(s, out);
            }
            if let Some(clause) = catch {
                for s in &clause.body {
                    collect_identifiers_stmt(s, out);
                }
            }
            for s in finally.iter().flatten() {
                collect_identifiers_stmt(s, out);
            }
        }
        IrStmt::Throw { argument, .. } => collect_identifiers_expr(argument, out),
        IrStmt::Return { argument, .. } => {
            if let Some(a) = argument {
                collect_identifiers_expr(a, out);
            }
        }
        IrStmt::Expression { expression, .. } => collect_identifiers_expr(expression, out),
        IrStmt::Interface(_)
        | IrStmt::Enum(_)
        | IrStmt::TypeAlias(_)
        | IrStmt::Break { .. }
        | IrStmt::Continue { .. } => {}
    }
}

fn collect_identifiers_expr(expr: &IrExpr, out: &mut FxHashSet<String>) {
    match expr {
        IrExpr::Identifier { name, .. } => {
            out.insert(name.clone());
        }
        IrExpr::Binary { left, right, .. }
        | IrExpr::Logical { left, right, .. } => {
            collect_identifiers_expr(left, out);
            collect_identifiers_expr(right, out);
        }
        IrExpr::Unary { operand, .. } | IrExpr::Update { operand, .. } => {
            collect_identifiers_expr(operand, out);
        }
        IrExpr::Assignment { target, value, .. } => {
            collect_identifiers_expr(target, out);
            collect_identifiers_expr(value, out);
        }
        IrExpr::Conditional {
            condition,
            consequent,
            alternate,
            ..
        } => {
            collect_identifiers_expr(condition, out);
            collect_identifiers_expr(consequent, out);
            collect_identifiers_expr(alternate, out);
        }
        IrExpr::Call {
            callee, arguments, ..
        } => {
            collect_identifiers_expr(callee, out);
            for a in arguments {
                collect_identifiers_expr(a, out);
            }
        }
        IrExpr::New { arguments, .. } => {
            for a in arguments {
                collect_identifiers_expr(a, out);
            }
        }
        IrExpr::Member { object, .. } => collect_identifiers_expr(object, out),
        IrExpr::Index { object, index, .. } => {
            collect_identifiers_expr(object, out);
            collect_identifiers_expr(index, out);
        }
        IrExpr::Array { elements, .. } => {
            for e in elements {
                collect_identifiers_expr(e, out);
            }
        }
        IrExpr::Object { properties, .. } => {
            for p in properties {
                collect_identifiers_expr(&p.value, out);
            }
        }
        IrExpr::Arrow { body, .. } => match body.as_ref() {
            ArrowBody::Expression(e) => collect_identifiers_expr(e, out),
            ArrowBody::Block(stmts) => {
                for s in stmts {
                    collect_identifiers_stmt(s, out);
                }
            }
        },
        IrExpr::Function { body, .. } => {
            for s in body {
                collect_identifiers_stmt(s, out);
            }
        }
        IrExpr::Template { expressions, .. } => {
            for e in expressions {
                collect_identifiers_expr(e, out);
            }
        }
        IrExpr::Spread { argument, .. }
        | IrExpr::Await { argument, .. } => collect_identifiers_expr(argument, out),
        IrExpr::Cast { expression, .. } => collect_identifiers_expr(expression, out),
        IrExpr::Yield { argument, .. } => {
            if let Some(a) = argument {
                collect_identifiers_expr(a, out);
            }
        }
        IrExpr::Literal { .. } | IrExpr::Null { .. } | IrExpr::Undefined { .. } => {}
    }
}

fn stmt_contains_await(stmt: &IrStmt) -> bool {
    let mut found = false;
    walk_stmt_exprs(stmt, &mut |e| {
        if matches!(e, IrExpr::Await { .. }) {
            found = true;
        }
    });
    found
}

fn walk_stmt_exprs(stmt: &IrStmt, f: &mut impl FnMut(&IrExpr)) {
    match stmt {
        IrStmt::Expression { expression, .. } => walk_expr(expression, f),
        IrStmt::Variable(v) => {
            for d in &v.declarations {
                if let Some(init) = &d.initializer {
                    walk_expr(init, f);
                }
            }
        }
        IrStmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            walk_expr(condition, f);
            walk_stmt_exprs(then_branch, f);
            if let Some(alt) = else_branch {
                walk_stmt_exprs(alt, f);
            }
        }
        IrStmt::Block { statements, .. } => {
            for s in statements {
                walk_stmt_exprs(s, f);
            }
        }
        IrStmt::While { condition, body, .. } | IrStmt::DoWhile { condition, body, .. } => {
            walk_expr(condition, f);
            walk_stmt_exprs(body, f);
        }
        IrStmt::ForOf { iterable, body, .. } => {
            walk_expr(iterable, f);
            walk_stmt_exprs(body, f);
        }
        IrStmt::Return { argument, .. } => {
            if let Some(a) = argument {
                walk_expr(a, f);
            }
        }
        IrStmt::Throw { argument, .. } => walk_expr(argument, f),
        _ => {}
    }
}

fn walk_expr(expr: &IrExpr, f: &mut impl FnMut(&IrExpr)) {
    f(expr);
    match expr {
        IrExpr::Binary { left, right, .. } | IrExpr::Logical { left, right, .. } => {
            walk_expr(left, f);
            walk_expr(right, f);
        }
        IrExpr::Unary { operand, .. } | IrExpr::Update { operand, .. } => walk_expr(operand, f),
        IrExpr::Assignment { target, value, .. } => {
            walk_expr(target, f);
            walk_expr(value, f);
        }
        IrExpr::Conditional {
            condition,
            consequent,
            alternate,
            ..
        } => {
            walk_expr(condition, f);
            walk_expr(consequent, f);
            walk_expr(alternate, f);
        }
        IrExpr::Call {
            callee, arguments, ..
        } => {
            walk_expr(callee, f);
            for a in arguments {
                walk_expr(a, f);
            }
        }
        IrExpr::New { arguments, .. } => {
            for a in arguments {
                walk_expr(a, f);
            }
        }
        IrExpr::Member { object, .. } => walk_expr(object, f),
        IrExpr::Index { object, index, .. } => {
            walk_expr(object, f);
            walk_expr(index, f);
        }
        IrExpr::Array { elements, .. } => {
            for e in elements {
                walk_expr(e, f);
            }
        }
        IrExpr::Object { properties, .. } => {
            for p in properties {
                walk_expr(&p.value, f);
            }
        }
        IrExpr::Template { expressions, .. } => {
            for e in expressions {
                walk_expr(e, f);
            }
        }
        IrExpr::Spread { argument, .. } | IrExpr::Await { argument, .. } => walk_expr(argument, f),
        IrExpr::Cast { expression, .. } => walk_expr(expression, f),
        _ => {}
    }
}
