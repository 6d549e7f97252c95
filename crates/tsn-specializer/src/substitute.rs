//! Substitution and request collection.
//!
//! A [`Substituter`] folds IR under a type environment, doing three things in
//! one pass: applying the environment to embedded types, rewriting references
//! to generic declarations with concrete arguments into their specialised
//! flat names, and recording a [`SpecializationRequest`] for each such
//! rewrite. Instantiations whose arguments still mention an in-scope type
//! parameter are left untouched; they are picked up when the enclosing
//! generic body is itself specialised.

use rustc_hash::FxHashMap;
use tsn_binder::context::ProgramContext;
use tsn_binder::registry::Declaration;
use tsn_ir::expr::{ArrowBody, IrExpr, ObjectProperty};
use tsn_ir::stmt::{
    CatchClause, ClassDecl, ClassMember, FunctionDecl, HeritageClause, InterfaceDecl,
    InterfaceMember, IrStmt, MethodMember, PropertyMember, SwitchCase, TypeAliasDecl,
    VariableDecl, VariableDeclarator,
};
use tsn_ir::type_key::type_key;
use tsn_ir::types::{IndexSignature, IrType, ObjectMember, Parameter};
use tsn_solver::TypeEnv;

/// One pending instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecializationRequest {
    pub declaration_name: String,
    pub type_arguments: Vec<IrType>,
    /// Instantiation-chain depth, for the divergence bound.
    pub depth: u32,
}

/// The stable name of a specialisation: `D__key(A)__key(B)`.
pub fn specialized_name(declaration_name: &str, type_arguments: &[IrType]) -> String {
    let keys: Vec<String> = type_arguments.iter().map(type_key).collect();
    format!("{}__{}", declaration_name, keys.join("__"))
}

/// What kind of generic declaration a name refers to, plus a clone of it and
/// its owning module. Snapshotted before the engine starts mutating modules.
#[derive(Debug, Clone)]
pub enum GenericDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Function(FunctionDecl),
}

#[derive(Debug, Default)]
pub struct GenericTargets {
    map: FxHashMap<String, (String, GenericDecl)>,
}

impl GenericTargets {
    /// Snapshot every generic class, interface, and module-level function.
    pub fn build(ctx: &ProgramContext) -> Self {
        let mut map = FxHashMap::default();
        for (name, entry) in ctx.registry.iter() {
            match &entry.declaration {
                Declaration::Class(c) if c.is_generic() => {
                    map.insert(
                        name.to_string(),
                        (entry.module_path.clone(), GenericDecl::Class(c.clone())),
                    );
                }
                Declaration::Interface(i) if !i.type_parameters.is_empty() => {
                    map.insert(
                        name.to_string(),
                        (entry.module_path.clone(), GenericDecl::Interface(i.clone())),
                    );
                }
                _ => {}
            }
        }
        for (path, module) in &ctx.modules {
            for stmt in &module.statements {
                if let IrStmt::Function(f) = stmt {
                    if !f.type_parameters.is_empty() {
                        map.insert(
                            f.name.clone(),
                            (path.clone(), GenericDecl::Function(f.clone())),
                        );
                    }
                }
            }
        }
        GenericTargets { map }
    }

    pub fn is_generic(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&(String, GenericDecl)> {
        self.map.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

/// True if the type still mentions any type parameter.
fn has_free_type_params(ty: &IrType) -> bool {
    match ty {
        IrType::TypeParameterRef { .. } => true,
        IrType::Primitive { .. } | IrType::Literal { .. } => false,
        IrType::Array { element, .. } => has_free_type_params(element),
        IrType::Reference { type_arguments, .. } => {
            type_arguments.iter().any(has_free_type_params)
        }
        IrType::Function {
            parameters,
            return_type,
            ..
        } => {
            parameters
                .iter()
                .any(|p| p.ty.as_ref().is_some_and(has_free_type_params))
                || has_free_type_params(return_type)
        }
        IrType::Object { members, .. } => members.iter().any(|m| has_free_type_params(&m.ty)),
        IrType::Union { types } | IrType::Intersection { types } => {
            types.iter().any(has_free_type_params)
        }
        IrType::Tuple { elements } => elements.iter().any(has_free_type_params),
    }
}

pub struct Substituter<'a> {
    pub env: TypeEnv,
    targets: &'a GenericTargets,
    pub requests: Vec<SpecializationRequest>,
    depth: u32,
}

impl<'a> Substituter<'a> {
    pub fn new(env: TypeEnv, targets: &'a GenericTargets, depth: u32) -> Self {
        Substituter {
            env,
            targets,
            requests: Vec::new(),
            depth,
        }
    }

    fn request(&mut self, name: &str, args: &[IrType]) -> String {
        let flat = specialized_name(name, args);
        self.requests.push(SpecializationRequest {
            declaration_name: name.to_string(),
            type_arguments: args.to_vec(),
            depth: self.depth + 1,
        });
        flat
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn fold_type(&mut self, ty: &IrType) -> IrType {
        let applied = self.env.apply(ty);
        self.rewrite_type(&applied)
    }

    fn rewrite_type(&mut self, ty: &IrType) -> IrType {
        match ty {
            IrType::Reference {
                name,
                type_arguments,
                structural_members,
            } if self.targets.is_generic(name) && !type_arguments.is_empty() => {
                let args: Vec<IrType> =
                    type_arguments.iter().map(|a| self.rewrite_type(a)).collect();
                if args.iter().any(has_free_type_params) {
                    // Still open: resolved when the enclosing body is
                    // specialised.
                    IrType::Reference {
                        name: name.clone(),
                        type_arguments: args,
                        structural_members: structural_members.clone(),
                    }
                } else {
                    let flat = self.request(name, &args);
                    IrType::Reference {
                        name: flat,
                        type_arguments: Vec::new(),
                        structural_members: structural_members.clone(),
                    }
                }
            }

            IrType::Primitive { .. } | IrType::Literal { .. } | IrType::TypeParameterRef { .. } => {
                ty.clone()
            }

            IrType::Array { element, origin } => IrType::Array {
                element: Box::new(self.rewrite_type(element)),
                origin: *origin,
            },

            IrType::Reference {
                name,
                type_arguments,
                structural_members,
            } => IrType::Reference {
                name: name.clone(),
                type_arguments: type_arguments.iter().map(|a| self.rewrite_type(a)).collect(),
                structural_members: structural_members.clone(),
            },

            IrType::Function {
                parameters,
                return_type,
                type_parameters,
                is_async,
            } => IrType::Function {
                parameters: parameters
                    .iter()
                    .map(|p| Parameter {
                        name: p.name.clone(),
                        ty: p.ty.as_ref().map(|t| self.rewrite_type(t)),
                        optional: p.optional,
                        default: p.default.clone(),
                    })
                    .collect(),
                return_type: Box::new(self.rewrite_type(return_type)),
                type_parameters: type_parameters.clone(),
                is_async: *is_async,
            },

            IrType::Object {
                members,
                index_signature,
            } => IrType::Object {
                members: members
                    .iter()
                    .map(|m| ObjectMember {
                        name: m.name.clone(),
                        ty: self.rewrite_type(&m.ty),
                        optional: m.optional,
                        readonly: m.readonly,
                    })
                    .collect(),
                index_signature: index_signature.as_ref().map(|sig| {
                    Box::new(IndexSignature {
                        key_type: self.rewrite_type(&sig.key_type),
                        value_type: self.rewrite_type(&sig.value_type),
                    })
                }),
            },

            IrType::Union { types } => IrType::Union {
                types: types.iter().map(|t| self.rewrite_type(t)).collect(),
            },
            IrType::Intersection { types } => IrType::Intersection {
                types: types.iter().map(|t| self.rewrite_type(t)).collect(),
            },
            IrType::Tuple { elements } => IrType::Tuple {
                elements: elements.iter().map(|t| self.rewrite_type(t)).collect(),
            },
        }
    }

    fn fold_opt_type(&mut self, ty: &Option<IrType>) -> Option<IrType> {
        ty.as_ref().map(|t| self.fold_type(t))
    }

    pub fn fold_heritage(&mut self, clause: &HeritageClause) -> HeritageClause {
        if self.targets.is_generic(&clause.name) && !clause.type_arguments.is_empty() {
            let args: Vec<IrType> = clause
                .type_arguments
                .iter()
                .map(|a| self.fold_type(a))
                .collect();
            if !args.iter().any(has_free_type_params) {
                let flat = self.request(&clause.name, &args);
                return HeritageClause {
                    name: flat,
                    type_arguments: Vec::new(),
                };
            }
            return HeritageClause {
                name: clause.name.clone(),
                type_arguments: args,
            };
        }
        HeritageClause {
            name: clause.name.clone(),
            type_arguments: clause
                .type_arguments
                .iter()
                .map(|a| self.fold_type(a))
                .collect(),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn fold_expr(&mut self, expr: &IrExpr) -> IrExpr {
        match expr {
            IrExpr::Literal { .. }
            | IrExpr::Null { .. }
            | IrExpr::Undefined { .. }
            | IrExpr::Identifier { .. } => expr.clone(),

            IrExpr::New {
                callee,
                type_arguments,
                arguments,
                span,
            } => {
                let folded_args: Vec<IrExpr> =
                    arguments.iter().map(|a| self.fold_expr(a)).collect();
                if self.targets.is_generic(callee) && !type_arguments.is_empty() {
                    let targs: Vec<IrType> =
                        type_arguments.iter().map(|t| self.fold_type(t)).collect();
                    if !targs.iter().any(has_free_type_params) {
                        let flat = self.request(callee, &targs);
                        return IrExpr::New {
                            callee: flat,
                            type_arguments: Vec::new(),
                            arguments: folded_args,
                            span: *span,
                        };
                    }
                    return IrExpr::New {
                        callee: callee.clone(),
                        type_arguments: targs,
                        arguments: folded_args,
                        span: *span,
                    };
                }
                IrExpr::New {
                    callee: callee.clone(),
                    type_arguments: type_arguments.iter().map(|t| self.fold_type(t)).collect(),
                    arguments: folded_args,
                    span: *span,
                }
            }

            IrExpr::Call {
                callee,
                type_arguments,
                arguments,
                span,
            } => {
                let folded_args: Vec<IrExpr> =
                    arguments.iter().map(|a| self.fold_expr(a)).collect();
                if let IrExpr::Identifier { name, .. } = callee.as_ref() {
                    if self.targets.is_generic(name) && !type_arguments.is_empty() {
                        let targs: Vec<IrType> =
                            type_arguments.iter().map(|t| self.fold_type(t)).collect();
                        if !targs.iter().any(has_free_type_params) {
                            let flat = self.request(name, &targs);
                            return IrExpr::Call {
                                callee: Box::new(IrExpr::ident(flat)),
                                type_arguments: Vec::new(),
                                arguments: folded_args,
                                span: *span,
                            };
                        }
                        return IrExpr::Call {
                            callee: callee.clone(),
                            type_arguments: targs,
                            arguments: folded_args,
                            span: *span,
                        };
                    }
                }
                IrExpr::Call {
                    callee: Box::new(self.fold_expr(callee)),
                    type_arguments: type_arguments.iter().map(|t| self.fold_type(t)).collect(),
                    arguments: folded_args,
                    span: *span,
                }
            }

            IrExpr::Binary {
                operator,
                left,
                right,
                span,
            } => IrExpr::Binary {
                operator: *operator,
                left: Box::new(self.fold_expr(left)),
                right: Box::new(self.fold_expr(right)),
                span: *span,
            },
            IrExpr::Logical {
                operator,
                left,
                right,
                span,
            } => IrExpr::Logical {
                operator: *operator,
                left: Box::new(self.fold_expr(left)),
                right: Box::new(self.fold_expr(right)),
                span: *span,
            },
            IrExpr::Unary {
                operator,
                operand,
                span,
            } => IrExpr::Unary {
                operator: *operator,
                operand: Box::new(self.fold_expr(operand)),
                span: *span,
            },
            IrExpr::Update {
                operator,
                prefix,
                operand,
                span,
            } => IrExpr::Update {
                operator: *operator,
                prefix: *prefix,
                operand: Box::new(self.fold_expr(operand)),
                span: *span,
            },
            IrExpr::Assignment {
                operator,
                target,
                value,
                span,
            } => IrExpr::Assignment {
                operator: *operator,
                target: Box::new(self.fold_expr(target)),
                value: Box::new(self.fold_expr(value)),
                span: *span,
            },
            IrExpr::Conditional {
                condition,
                consequent,
                alternate,
                span,
            } => IrExpr::Conditional {
                condition: Box::new(self.fold_expr(condition)),
                consequent: Box::new(self.fold_expr(consequent)),
                alternate: Box::new(self.fold_expr(alternate)),
                span: *span,
            },
            IrExpr::Member {
                object,
                property,
                optional,
                span,
            } => IrExpr::Member {
                object: Box::new(self.fold_expr(object)),
                property: property.clone(),
                optional: *optional,
                span: *span,
            },
            IrExpr::Index {
                object,
                index,
                span,
            } => IrExpr::Index {
                object: Box::new(self.fold_expr(object)),
                index: Box::new(self.fold_expr(index)),
                span: *span,
            },
            IrExpr::Array { elements, span } => IrExpr::Array {
                elements: elements.iter().map(|e| self.fold_expr(e)).collect(),
                span: *span,
            },
            IrExpr::Object { properties, span } => IrExpr::Object {
                properties: properties
                    .iter()
                    .map(|p| ObjectProperty {
                        name: p.name.clone(),
                        value: self.fold_expr(&p.value),
                    })
                    .collect(),
                span: *span,
            },
            IrExpr::Arrow {
                parameters,
                return_type,
                body,
                is_async,
                span,
            } => IrExpr::Arrow {
                parameters: parameters.iter().map(|p| self.fold_param(p)).collect(),
                return_type: self.fold_opt_type(return_type),
                body: Box::new(match body.as_ref() {
                    ArrowBody::Expression(e) => ArrowBody::Expression(self.fold_expr(e)),
                    ArrowBody::Block(stmts) => {
                        ArrowBody::Block(stmts.iter().map(|s| self.fold_stmt(s)).collect())
                    }
                }),
                is_async: *is_async,
                span: *span,
            },
            IrExpr::Function {
                parameters,
                return_type,
                body,
                is_async,
                is_generator,
                span,
            } => IrExpr::Function {
                parameters: parameters.iter().map(|p| self.fold_param(p)).collect(),
                return_type: self.fold_opt_type(return_type),
                body: body.iter().map(|s| self.fold_stmt(s)).collect(),
                is_async: *is_async,
                is_generator: *is_generator,
                span: *span,
            },
            IrExpr::Template {
                quasis,
                expressions,
                span,
            } => IrExpr::Template {
                quasis: quasis.clone(),
                expressions: expressions.iter().map(|e| self.fold_expr(e)).collect(),
                span: *span,
            },
            IrExpr::Spread { argument, span } => IrExpr::Spread {
                argument: Box::new(self.fold_expr(argument)),
                span: *span,
            },
            IrExpr::Cast {
                expression,
                ty,
                span,
            } => IrExpr::Cast {
                expression: Box::new(self.fold_expr(expression)),
                ty: self.fold_type(ty),
                span: *span,
            },
            IrExpr::Await { argument, span } => IrExpr::Await {
                argument: Box::new(self.fold_expr(argument)),
                span: *span,
            },
            IrExpr::Yield {
                argument,
                delegate,
                span,
            } => IrExpr::Yield {
                argument: argument.as_ref().map(|a| Box::new(self.fold_expr(a))),
                delegate: *delegate,
                span: *span,
            },
        }
    }

    fn fold_param(&mut self, param: &Parameter) -> Parameter {
        Parameter {
            name: param.name.clone(),
            ty: self.fold_opt_type(&param.ty),
            optional: param.optional,
            default: param.default.as_ref().map(|d| self.fold_expr(d)),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn fold_stmt(&mut self, stmt: &IrStmt) -> IrStmt {
        match stmt {
            IrStmt::Function(f) => IrStmt::Function(self.fold_function(f)),
            IrStmt::Class(c) => IrStmt::Class(self.fold_class(c)),
            IrStmt::Interface(i) => IrStmt::Interface(self.fold_interface(i)),
            IrStmt::Enum(e) => IrStmt::Enum(e.clone()),
            IrStmt::TypeAlias(a) => IrStmt::TypeAlias(TypeAliasDecl {
                name: a.name.clone(),
                type_parameters: a.type_parameters.clone(),
                ty: {
                    let inner_env = self.env.shadowed_by(&a.type_parameters);
                    let mut inner = Substituter::new(inner_env, self.targets, self.depth);
                    let ty = inner.fold_type(&a.ty);
                    self.requests.append(&mut inner.requests);
                    ty
                },
                is_exported: a.is_exported,
                span: a.span,
            }),
            IrStmt::Variable(v) => IrStmt::Variable(VariableDecl {
                declarations: v
                    .declarations
                    .iter()
                    .map(|d| VariableDeclarator {
                        name: d.name.clone(),
                        ty: self.fold_opt_type(&d.ty),
                        initializer: d.initializer.as_ref().map(|i| self.fold_expr(i)),
                    })
                    .collect(),
                is_const: v.is_const,
                is_exported: v.is_exported,
                span: v.span,
            }),

            IrStmt::Block { statements, span } => IrStmt::Block {
                statements: statements.iter().map(|s| self.fold_stmt(s)).collect(),
                span: *span,
            },
            IrStmt::If {
                condition,
                then_branch,
                else_branch,
                span,
            } => IrStmt::If {
                condition: self.fold_expr(condition),
                then_branch: Box::new(self.fold_stmt(then_branch)),
                else_branch: else_branch.as_ref().map(|e| Box::new(self.fold_stmt(e))),
                span: *span,
            },
            IrStmt::While {
                condition,
                body,
                span,
            } => IrStmt::While {
                condition: self.fold_expr(condition),
                body: Box::new(self.fold_stmt(body)),
                span: *span,
            },
            IrStmt::DoWhile {
                body,
                condition,
                span,
            } => IrStmt::DoWhile {
                body: Box::new(self.fold_stmt(body)),
                condition: self.fold_expr(condition),
                span: *span,
            },
            IrStmt::For {
                init,
                condition,
                update,
                body,
                span,
            } => IrStmt::For {
                init: init.as_ref().map(|i| Box::new(self.fold_stmt(i))),
                condition: condition.as_ref().map(|c| self.fold_expr(c)),
                update: update.as_ref().map(|u| self.fold_expr(u)),
                body: Box::new(self.fold_stmt(body)),
                span: *span,
            },
            IrStmt::ForOf {
                binding,
                iterable,
                body,
                span,
            } => IrStmt::ForOf {
                binding: binding.clone(),
                iterable: self.fold_expr(iterable),
                body: Box::new(self.fold_stmt(body)),
                span: *span,
            },
            IrStmt::Switch {
                discriminant,
                cases,
                span,
            } => IrStmt::Switch {
                discriminant: self.fold_expr(discriminant),
                cases: cases
                    .iter()
                    .map(|c| SwitchCase {
                        test: c.test.as_ref().map(|t| self.fold_expr(t)),
                        statements: c.statements.iter().map(|s| self.fold_stmt(s)).collect(),
                    })
                    .collect(),
                span: *span,
            },
            IrStmt::Try {
                block,
                catch,
                finally,
                span,
            } => IrStmt::Try {
                block: block.iter().map(|s| self.fold_stmt(s)).collect(),
                catch: catch.as_ref().map(|c| CatchClause {
                    binding: c.binding.clone(),
                    body: c.body.iter().map(|s| self.fold_stmt(s)).collect(),
                }),
                finally: finally
                    .as_ref()
                    .map(|f| f.iter().map(|s| self.fold_stmt(s)).collect()),
                span: *span,
            },
            IrStmt::Throw { argument, span } => IrStmt::Throw {
                argument: self.fold_expr(argument),
                span: *span,
            },
            IrStmt::Return { argument, span } => IrStmt::Return {
                argument: argument.as_ref().map(|a| self.fold_expr(a)),
                span: *span,
            },
            IrStmt::Break { span } => IrStmt::Break { span: *span },
            IrStmt::Continue { span } => IrStmt::Continue { span: *span },
            IrStmt::Expression { expression, span } => IrStmt::Expression {
                expression: self.fold_expr(expression),
                span: *span,
            },
        }
    }

    pub fn fold_function(&mut self, f: &FunctionDecl) -> FunctionDecl {
        // A nested generic scope shadows outer bindings by name.
        let inner_env = self.env.shadowed_by(&f.type_parameters);
        let mut inner = Substituter::new(inner_env, self.targets, self.depth);
        let folded = FunctionDecl {
            name: f.name.clone(),
            type_parameters: f.type_parameters.clone(),
            parameters: f.parameters.iter().map(|p| inner.fold_param(p)).collect(),
            return_type: inner.fold_type(&f.return_type),
            body: f
                .body
                .as_ref()
                .map(|b| b.iter().map(|s| inner.fold_stmt(s)).collect()),
            is_async: f.is_async,
            is_generator: f.is_generator,
            is_exported: f.is_exported,
            span: f.span,
        };
        self.requests.append(&mut inner.requests);
        folded
    }

    pub fn fold_class(&mut self, c: &ClassDecl) -> ClassDecl {
        let inner_env = self.env.shadowed_by(&c.type_parameters);
        let mut inner = Substituter::new(inner_env, self.targets, self.depth);
        let folded = ClassDecl {
            name: c.name.clone(),
            type_parameters: c.type_parameters.clone(),
            extends: c.extends.as_ref().map(|h| inner.fold_heritage(h)),
            implements: c.implements.iter().map(|h| inner.fold_heritage(h)).collect(),
            members: c.members.iter().map(|m| inner.fold_member(m)).collect(),
            is_exported: c.is_exported,
            json_aot: c.json_aot,
            span: c.span,
        };
        self.requests.append(&mut inner.requests);
        folded
    }

    pub fn fold_member(&mut self, member: &ClassMember) -> ClassMember {
        match member {
            ClassMember::Property(p) => ClassMember::Property(PropertyMember {
                name: p.name.clone(),
                ty: self.fold_type(&p.ty),
                optional: p.optional,
                readonly: p.readonly,
                is_static: p.is_static,
                initializer: p.initializer.as_ref().map(|i| self.fold_expr(i)),
                span: p.span,
            }),
            ClassMember::Method(m) => {
                // Generic methods keep their own parameters; the target
                // language supports method-level generics natively.
                let inner_env = self.env.shadowed_by(&m.type_parameters);
                let mut inner = Substituter::new(inner_env, self.targets, self.depth);
                let folded = ClassMember::Method(MethodMember {
                    name: m.name.clone(),
                    type_parameters: m.type_parameters.clone(),
                    parameters: m.parameters.iter().map(|p| inner.fold_param(p)).collect(),
                    return_type: inner.fold_type(&m.return_type),
                    body: m
                        .body
                        .as_ref()
                        .map(|b| b.iter().map(|s| inner.fold_stmt(s)).collect()),
                    is_static: m.is_static,
                    is_async: m.is_async,
                    is_generator: m.is_generator,
                    span: m.span,
                });
                self.requests.append(&mut inner.requests);
                folded
            }
        }
    }

    pub fn fold_interface(&mut self, i: &InterfaceDecl) -> InterfaceDecl {
        let inner_env = self.env.shadowed_by(&i.type_parameters);
        let mut inner = Substituter::new(inner_env, self.targets, self.depth);
        let folded = InterfaceDecl {
            name: i.name.clone(),
            type_parameters: i.type_parameters.clone(),
            extends: i.extends.iter().map(|h| inner.fold_heritage(h)).collect(),
            members: i
                .members
                .iter()
                .map(|m| InterfaceMember {
                    name: m.name.clone(),
                    ty: inner.fold_type(&m.ty),
                    optional: m.optional,
                    readonly: m.readonly,
                })
                .collect(),
            is_exported: i.is_exported,
            json_aot: i.json_aot,
            span: i.span,
        };
        self.requests.append(&mut inner.requests);
        folded
    }
}
