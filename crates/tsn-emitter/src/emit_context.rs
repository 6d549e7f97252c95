//! `ModuleEmitter` - per-module emission state.
//!
//! The emitter walks one module's IR and owns the state the handlers share:
//! the accumulating using-set, scope flags, the current class name, a stack
//! of lexical scopes carrying declared types (the narrow slice of the
//! binder's view the handlers need), and narrowing renames introduced by
//! `is`-pattern bindings.

use crate::result::EmitResult;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tsn_binder::context::ProgramContext;
use tsn_common::diagnostics::Diagnostic;
use tsn_common::span::Span;
use tsn_ir::expr::{BinaryOp, IrExpr, LiteralValue, LogicalOp, UnaryOp};
use tsn_ir::module::IrModule;
use tsn_ir::types::{IrType, PrimitiveName};
use tsn_solver::infer::shape_members;
use tsn_solver::widen::{NumericWidth, width_of};

/// Options the driver passes through to emission.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Wrap update expressions in `checked(...)`.
    pub checked_numeric: bool,
}

/// Flags for the current emission scope/branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitFlags {
    /// Inside an async function or method.
    pub in_async: bool,
    /// Inside a static member (affects `this` lowering).
    pub in_static: bool,
    /// Inside a generator body (yield handled by the iterator lowering).
    pub in_generator: bool,
}

pub struct ModuleEmitter<'a> {
    pub(crate) ctx: &'a ProgramContext,
    pub(crate) module: &'a IrModule,
    pub(crate) options: EmitOptions,
    pub(crate) flags: EmitFlags,
    /// Current class name, for `this`-relative lowering.
    pub(crate) current_class: Option<String>,
    pub(crate) usings: BTreeSet<String>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    scopes: Vec<FxHashMap<String, IrType>>,
    renames: Vec<FxHashMap<String, String>>,
    temp_counter: u32,
}

impl<'a> ModuleEmitter<'a> {
    pub fn new(ctx: &'a ProgramContext, module: &'a IrModule, options: EmitOptions) -> Self {
        ModuleEmitter {
            ctx,
            module,
            options,
            flags: EmitFlags::default(),
            current_class: None,
            usings: BTreeSet::new(),
            diagnostics: Vec::new(),
            scopes: vec![FxHashMap::default()],
            renames: vec![FxHashMap::default()],
            temp_counter: 0,
        }
    }

    /// Emit the whole module. Implemented in `module_shape`.
    pub fn emit(&mut self) -> EmitResult {
        self.emit_module_shape()
    }

    // =========================================================================
    // Usings and diagnostics
    // =========================================================================

    pub(crate) fn add_using(&mut self, namespace: impl Into<String>) {
        self.usings.insert(namespace.into());
    }

    pub(crate) fn diag(&mut self, span: Span, code: u32, args: &[&str]) {
        self.diagnostics
            .push(Diagnostic::from_code(&self.module.path, span, code, args));
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
        self.renames.push(FxHashMap::default());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
        self.renames.pop();
    }

    /// Record a declared binding's static type.
    pub(crate) fn declare(&mut self, name: impl Into<String>, ty: IrType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), ty);
        }
    }

    /// Record a narrowing rename: occurrences of `from` in the current scope
    /// emit as `to`.
    pub(crate) fn rename(&mut self, from: impl Into<String>, to: impl Into<String>) {
        if let Some(scope) = self.renames.last_mut() {
            scope.insert(from.into(), to.into());
        }
    }

    pub(crate) fn lookup_type(&self, name: &str) -> Option<&IrType> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    pub(crate) fn rename_of(&self, name: &str) -> Option<&str> {
        self.renames
            .iter()
            .rev()
            .find_map(|s| s.get(name))
            .map(String::as_str)
    }

    pub(crate) fn temp_name(&mut self, stem: &str) -> String {
        let name = format!("__{}_{}", stem, self.temp_counter);
        self.temp_counter += 1;
        name
    }

    // =========================================================================
    // Best-effort expression typing
    // =========================================================================

    /// The static type of an expression, where the emitter can know it from
    /// declared bindings alone. `None` means "unknown"; handlers that need a
    /// type fall back to conservative lowerings.
    pub(crate) fn expr_type(&self, expr: &IrExpr) -> Option<IrType> {
        match expr {
            IrExpr::Literal { value, .. } => Some(match value {
                LiteralValue::Boolean(_) => IrType::BOOLEAN,
                LiteralValue::Number(_) => IrType::NUMBER,
                LiteralValue::String(_) => IrType::STRING,
            }),
            IrExpr::Null { .. } => Some(IrType::NULL),
            IrExpr::Undefined { .. } => Some(IrType::UNDEFINED),
            IrExpr::Template { .. } => Some(IrType::STRING),

            IrExpr::Identifier { name, .. } => {
                // A narrowed binding shadows the original declaration.
                let effective = self.rename_of(name).unwrap_or(name);
                self.lookup_type(effective).cloned()
            }

            IrExpr::Member {
                object, property, ..
            } => {
                let object_ty = self.expr_type(object)?;
                let resolved =
                    tsn_solver::resolve_alias(&object_ty, &self.ctx.registry).ok()?;
                let members = shape_members(&resolved, &self.ctx.registry)?;
                members
                    .iter()
                    .find(|m| m.name == *property)
                    .map(|m| m.ty.clone())
            }

            IrExpr::New { callee, .. } => Some(IrType::reference(callee.clone())),
            IrExpr::Cast { ty, .. } => Some(ty.clone()),

            IrExpr::Unary { operator, operand, .. } => match operator {
                UnaryOp::Not => Some(IrType::BOOLEAN),
                UnaryOp::TypeOf => Some(IrType::STRING),
                UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot => self.expr_type(operand),
                UnaryOp::Void => Some(IrType::UNDEFINED),
            },

            IrExpr::Binary {
                operator,
                left,
                right,
                ..
            } => match operator {
                BinaryOp::Eq
                | BinaryOp::Neq
                | BinaryOp::StrictEq
                | BinaryOp::StrictNeq
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::In
                | BinaryOp::InstanceOf => Some(IrType::BOOLEAN),
                BinaryOp::Add => {
                    let lt = self.expr_type(left);
                    let rt = self.expr_type(right);
                    if lt.as_ref().is_some_and(|t| t.is_primitive(PrimitiveName::String))
                        || rt.as_ref().is_some_and(|t| t.is_primitive(PrimitiveName::String))
                    {
                        Some(IrType::STRING)
                    } else {
                        self.numeric_join(lt, rt)
                    }
                }
                _ => {
                    let lt = self.expr_type(left);
                    let rt = self.expr_type(right);
                    self.numeric_join(lt, rt)
                }
            },

            IrExpr::Logical {
                operator,
                left,
                right,
                ..
            } => match operator {
                // `a ?? b` has b's type once a's nullish members are gone.
                LogicalOp::NullishCoalescing => self
                    .expr_type(left)
                    .map(|t| tsn_solver::strip_nullish(&t))
                    .or_else(|| self.expr_type(right)),
                _ => self.expr_type(left),
            },

            IrExpr::Conditional { consequent, .. } => self.expr_type(consequent),
            IrExpr::Assignment { target, .. } => self.expr_type(target),
            IrExpr::Update { operand, .. } => self.expr_type(operand),

            IrExpr::Await { argument, .. } => {
                match self.expr_type(argument)? {
                    IrType::Reference {
                        name,
                        type_arguments,
                        ..
                    } if name == "Promise" && !type_arguments.is_empty() => {
                        Some(type_arguments[0].clone())
                    }
                    other => Some(other),
                }
            }

            IrExpr::Array { elements, .. } => {
                let element = elements
                    .first()
                    .and_then(|e| self.expr_type(e))
                    .unwrap_or(IrType::UNKNOWN);
                Some(IrType::Array {
                    element: Box::new(element),
                    origin: Default::default(),
                })
            }

            _ => None,
        }
    }

    fn numeric_join(&self, lt: Option<IrType>, rt: Option<IrType>) -> Option<IrType> {
        let lw = lt.as_ref().and_then(width_of)?;
        let rw = rt.as_ref().and_then(width_of)?;
        Some(match NumericWidth::widest(lw, rw) {
            NumericWidth::Int => IrType::INT,
            NumericWidth::Long => IrType::LONG,
            NumericWidth::Double => IrType::NUMBER,
        })
    }

    /// Whether an expression is statically known to be boolean, which decides
    /// between native `&&`/`||` and the truthiness helper.
    pub(crate) fn is_boolean_expr(&self, expr: &IrExpr) -> bool {
        self.expr_type(expr)
            .is_some_and(|t| t.is_primitive(PrimitiveName::Boolean))
    }
}
