//! The specialisation fixed point.
//!
//! Pass 1 rewrites every non-generic top-level statement, which both renames
//! concrete generic uses to their flat specialised names and yields the
//! initial request list. Pass 2 processes requests depth-first: a request's
//! own nested requests (its base class among them) are processed before the
//! specialised declaration is appended, so base specialisations always
//! precede derived ones in the owning module. Pass 3 removes the generic
//! originals, which by then have no remaining references.

use crate::substitute::{
    GenericDecl, GenericTargets, SpecializationRequest, Substituter, specialized_name,
};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use tsn_binder::context::ProgramContext;
use tsn_binder::nominal::NominalEnv;
use tsn_binder::registry::Declaration;
use tsn_common::diagnostics::{Diagnostic, diagnostic_codes};
use tsn_common::span::Span;
use tsn_ir::stmt::{ClassDecl, FunctionDecl, InterfaceDecl, IrStmt};
use tsn_solver::TypeEnv;

/// Instantiation chains deeper than this are reported as divergent.
pub const MAX_SPECIALIZATION_DEPTH: u32 = 32;

/// Run the engine over a bound program. Generated declarations are appended
/// to the owning modules and the registry; generic originals are removed
/// from emission; the nominal environment is rebuilt to cover the new
/// declarations.
pub fn specialize(ctx: &mut ProgramContext) {
    let targets = GenericTargets::build(ctx);

    // Pass 1: rewrite non-generic code, collecting the initial requests.
    let mut initial: Vec<SpecializationRequest> = Vec::new();
    let paths: Vec<String> = ctx.modules.keys().cloned().collect();
    for path in &paths {
        let Some(module) = ctx.modules.get_mut(path) else {
            continue;
        };
        let statements = std::mem::take(&mut module.statements);
        let mut sub = Substituter::new(TypeEnv::new(), &targets, 0);
        module.statements = statements
            .iter()
            .map(|stmt| {
                if is_generic_decl(stmt) {
                    // Generic bodies are folded only under a concrete
                    // environment; requests inside them are deferred.
                    stmt.clone()
                } else {
                    sub.fold_stmt(stmt)
                }
            })
            .collect();
        initial.append(&mut sub.requests);
    }
    debug!(requests = initial.len(), "initial specialisation requests");

    // Pass 2: depth-first fixed point over the request worklist.
    let mut state = EngineState::default();
    for request in initial {
        state.process(request, &targets);
    }

    for (module_path, stmt) in state.generated {
        match &stmt {
            IrStmt::Class(c) => {
                ctx.registry
                    .insert(Declaration::Class(c.clone()), &module_path);
            }
            IrStmt::Interface(i) => {
                ctx.registry
                    .insert(Declaration::Interface(i.clone()), &module_path);
            }
            _ => {}
        }
        if let Some(module) = ctx.modules.get_mut(&module_path) {
            module.statements.push(stmt);
        }
    }
    ctx.diagnostics.extend(state.diagnostics);

    // Pass 3: the generic originals are no longer referenced; drop them.
    for module in ctx.modules.values_mut() {
        module.statements.retain(|s| !is_generic_decl(s));
    }

    // Specialised struct classes need classification too.
    ctx.nominal = NominalEnv::build(&ctx.registry);
}

fn is_generic_decl(stmt: &IrStmt) -> bool {
    match stmt {
        IrStmt::Class(c) => !c.type_parameters.is_empty(),
        IrStmt::Interface(i) => !i.type_parameters.is_empty(),
        IrStmt::Function(f) => !f.type_parameters.is_empty(),
        _ => false,
    }
}

#[derive(Default)]
struct EngineState {
    /// Specialised names already generated (or in flight).
    cache: FxHashSet<String>,
    /// Generated declarations in append order, with their owning module.
    generated: Vec<(String, IrStmt)>,
    diagnostics: Vec<Diagnostic>,
}

impl EngineState {
    fn process(&mut self, request: SpecializationRequest, targets: &GenericTargets) {
        let key = specialized_name(&request.declaration_name, &request.type_arguments);
        if self.cache.contains(&key) {
            return;
        }
        let Some((module_path, decl)) = targets.get(&request.declaration_name) else {
            return;
        };
        if request.depth > MAX_SPECIALIZATION_DEPTH {
            self.diagnostics.push(Diagnostic::from_code(
                module_path,
                Span::synthetic(),
                diagnostic_codes::GENERIC_RECURSION_DEPTH,
                &[
                    &request.declaration_name,
                    &MAX_SPECIALIZATION_DEPTH.to_string(),
                ],
            ));
            return;
        }
        // Insert before recursing so self-referential generics terminate.
        self.cache.insert(key.clone());
        trace!(name = %key, depth = request.depth, "specialising");

        let stmt = match decl {
            GenericDecl::Class(class) => {
                let (spec, nested) = specialize_class(class, &key, &request, targets);
                for inner in nested {
                    self.process(inner, targets);
                }
                IrStmt::Class(spec)
            }
            GenericDecl::Interface(iface) => {
                let (spec, nested) = specialize_interface(iface, &key, &request, targets);
                for inner in nested {
                    self.process(inner, targets);
                }
                IrStmt::Interface(spec)
            }
            GenericDecl::Function(func) => {
                let (spec, nested) = specialize_function(func, &key, &request, targets);
                for inner in nested {
                    self.process(inner, targets);
                }
                IrStmt::Function(spec)
            }
        };
        self.generated.push((module_path.clone(), stmt));
    }
}

fn specialize_class(
    class: &ClassDecl,
    key: &str,
    request: &SpecializationRequest,
    targets: &GenericTargets,
) -> (ClassDecl, Vec<SpecializationRequest>) {
    let env = TypeEnv::from_params(&class.type_parameters, &request.type_arguments);
    let mut sub = Substituter::new(env, targets, request.depth);
    let spec = ClassDecl {
        name: key.to_string(),
        // `T` leaves the parameter list once a binding for it exists.
        type_parameters: Vec::new(),
        extends: class.extends.as_ref().map(|h| sub.fold_heritage(h)),
        implements: class.implements.iter().map(|h| sub.fold_heritage(h)).collect(),
        members: class.members.iter().map(|m| sub.fold_member(m)).collect(),
        is_exported: class.is_exported,
        json_aot: class.json_aot,
        span: Span::synthetic(),
    };
    (spec, sub.requests)
}

fn specialize_interface(
    iface: &InterfaceDecl,
    key: &str,
    request: &SpecializationRequest,
    targets: &GenericTargets,
) -> (InterfaceDecl, Vec<SpecializationRequest>) {
    let env = TypeEnv::from_params(&iface.type_parameters, &request.type_arguments);
    let mut sub = Substituter::new(env, targets, request.depth);
    let spec = InterfaceDecl {
        name: key.to_string(),
        type_parameters: Vec::new(),
        extends: iface.extends.iter().map(|h| sub.fold_heritage(h)).collect(),
        members: iface
            .members
            .iter()
            .map(|m| tsn_ir::stmt::InterfaceMember {
                name: m.name.clone(),
                ty: sub.fold_type(&m.ty),
                optional: m.optional,
                readonly: m.readonly,
            })
            .collect(),
        is_exported: iface.is_exported,
        json_aot: iface.json_aot,
        span: Span::synthetic(),
    };
    (spec, sub.requests)
}

fn specialize_function(
    func: &FunctionDecl,
    key: &str,
    request: &SpecializationRequest,
    targets: &GenericTargets,
) -> (FunctionDecl, Vec<SpecializationRequest>) {
    let env = TypeEnv::from_params(&func.type_parameters, &request.type_arguments);
    let mut sub = Substituter::new(env, targets, request.depth);
    let spec = FunctionDecl {
        name: key.to_string(),
        type_parameters: Vec::new(),
        parameters: func
            .parameters
            .iter()
            .map(|p| tsn_ir::types::Parameter {
                name: p.name.clone(),
                ty: p.ty.as_ref().map(|t| sub.fold_type(t)),
                optional: p.optional,
                default: p.default.as_ref().map(|d| sub.fold_expr(d)),
            })
            .collect(),
        return_type: sub.fold_type(&func.return_type),
        body: func
            .body
            .as_ref()
            .map(|b| b.iter().map(|s| sub.fold_stmt(s)).collect()),
        is_async: func.is_async,
        is_generator: func.is_generator,
        is_exported: func.is_exported,
        span: Span::synthetic(),
    };
    (spec, sub.requests)
}
