//! Program context.
//!
//! Built once per compilation from the front end's modules and the external
//! binding tables. Populated during binding, then read-only during emission
//! except for the specialisation engine (which appends declarations to the
//! registry) and the diagnostic list (append-only).

use crate::bindings::ExternalBindings;
use crate::nominal::NominalEnv;
use crate::registry::{Declaration, TypeRegistry};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;
use tsn_common::diagnostics::{Diagnostic, diagnostic_codes};
use tsn_common::span::{Span, Spanned};
use tsn_ir::module::IrModule;
use tsn_ir::stmt::IrStmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Class,
    Interface,
    Enum,
    TypeAlias,
    Function,
    Variable,
}

impl ExportKind {
    /// Type-only exports are erased at emission and never force value edges.
    pub const fn is_type_only(self) -> bool {
        matches!(self, ExportKind::Interface | ExportKind::TypeAlias)
    }
}

/// Where an exported symbol is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub module_path: String,
    pub kind: ExportKind,
}

/// The per-compilation environment.
#[derive(Debug, Default)]
pub struct ProgramContext {
    /// Module map, keyed by path. Insertion order is the front end's input
    /// order; emission order comes from the dependency graph instead.
    pub modules: IndexMap<String, IrModule>,
    pub registry: TypeRegistry,
    pub exports: FxHashMap<String, ExportEntry>,
    pub nominal: NominalEnv,
    /// Types requiring ahead-of-time JSON support, name -> owning module.
    pub json_aot: IndexMap<String, String>,
    pub bindings: ExternalBindings,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProgramContext {
    /// Bind a module set: fill the registry, export map, nominal environment
    /// and JSON-AOT registry, reporting duplicate names and struct-hierarchy
    /// conflicts.
    pub fn build(module_list: Vec<IrModule>, bindings: ExternalBindings) -> Self {
        let mut ctx = ProgramContext {
            bindings,
            ..Default::default()
        };
        for module in module_list {
            ctx.bind_module(module);
        }
        ctx.nominal = NominalEnv::build(&ctx.registry);
        for name in ctx.nominal.conflicts(&ctx.registry) {
            let (file, span) = ctx.declaration_site(&name);
            ctx.diagnostics.push(Diagnostic::from_code(
                file,
                span,
                diagnostic_codes::STRUCT_HIERARCHY_CONFLICT,
                &[&name],
            ));
        }
        debug!(
            modules = ctx.modules.len(),
            declarations = ctx.registry.len(),
            "program context bound"
        );
        ctx
    }

    fn bind_module(&mut self, module: IrModule) {
        let path = module.path.clone();
        for stmt in &module.statements {
            let (declaration, kind, json_aot) = match stmt {
                IrStmt::Class(c) => (
                    Some(Declaration::Class(c.clone())),
                    ExportKind::Class,
                    c.json_aot,
                ),
                IrStmt::Interface(i) => (
                    Some(Declaration::Interface(i.clone())),
                    ExportKind::Interface,
                    i.json_aot,
                ),
                IrStmt::Enum(e) => (Some(Declaration::Enum(e.clone())), ExportKind::Enum, false),
                IrStmt::TypeAlias(a) => (
                    Some(Declaration::Alias(a.clone())),
                    ExportKind::TypeAlias,
                    false,
                ),
                IrStmt::Function(_) => (None, ExportKind::Function, false),
                IrStmt::Variable(_) => (None, ExportKind::Variable, false),
                _ => continue,
            };

            if let Some(decl) = declaration {
                let name = decl.name().to_string();
                if !self.registry.insert(decl, &path) {
                    self.diagnostics.push(Diagnostic::from_code(
                        &path,
                        stmt.span(),
                        diagnostic_codes::DUPLICATE_IDENTIFIER,
                        &[&name],
                    ));
                    continue;
                }
                if json_aot {
                    self.json_aot.insert(name.clone(), path.clone());
                }
            }

            if stmt.is_exported() {
                match stmt {
                    IrStmt::Variable(v) => {
                        for declarator in &v.declarations {
                            self.exports.insert(
                                declarator.name.clone(),
                                ExportEntry {
                                    module_path: path.clone(),
                                    kind: ExportKind::Variable,
                                },
                            );
                        }
                    }
                    other => {
                        if let Some(name) = other.declared_name() {
                            self.exports.insert(
                                name.to_string(),
                                ExportEntry {
                                    module_path: path.clone(),
                                    kind,
                                },
                            );
                        }
                    }
                }
            }
        }
        self.modules.insert(path, module);
    }

    /// Whether a specifier names a module in this compilation (vs the
    /// external runtime).
    pub fn is_local_module(&self, specifier: &str) -> bool {
        self.modules.contains_key(specifier)
    }

    pub fn module(&self, path: &str) -> Option<&IrModule> {
        self.modules.get(path)
    }

    /// Find the file and span where a registered declaration was written.
    pub fn declaration_site(&self, name: &str) -> (String, Span) {
        let Some(entry) = self.registry.entry(name) else {
            return (String::new(), Span::synthetic());
        };
        let span = match &entry.declaration {
            Declaration::Class(c) => c.span,
            Declaration::Interface(i) => i.span,
            Declaration::Enum(e) => e.span,
            Declaration::Alias(a) => a.span,
        };
        (entry.module_path.clone(), span)
    }

    pub fn error(&mut self, file: impl Into<String>, span: Span, code: u32, args: &[&str]) {
        self.diagnostics
            .push(Diagnostic::from_code(file, span, code, args));
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
