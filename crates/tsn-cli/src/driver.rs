//! Compilation driver: discovery, binding, ordering, specialisation,
//! emission, and file writing.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tsn_binder::{DependencyGraph, ExternalBindings, ProgramContext};
use tsn_common::diagnostics::{Diagnostic, diagnostic_codes};
use tsn_common::position::LineMap;
use tsn_common::span::Span;
use tsn_emitter::{EmitOptions, EmitResult, emit_program};
use tsn_ir::module::IrModule;
use tsn_specializer::specialize;
use walkdir::WalkDir;

/// Everything the reporter needs after a compilation.
#[derive(Debug)]
pub struct CompileSummary {
    /// Emission order, or empty when ordering failed.
    pub order: Vec<String>,
    pub results: Vec<EmitResult>,
    pub diagnostics: Vec<Diagnostic>,
    /// Line maps per module path, for rendering locations.
    pub line_maps: Vec<(String, LineMap)>,
}

impl CompileSummary {
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
            || self.results.iter().any(EmitResult::has_fatal)
    }

    pub fn line_map(&self, file: &str) -> Option<&LineMap> {
        self.line_maps
            .iter()
            .find(|(path, _)| path == file)
            .map(|(_, map)| map)
    }
}

/// Run a full compilation according to the CLI arguments.
pub fn compile(args: &CliArgs) -> Result<CompileSummary> {
    let module_files = discover_inputs(&args.inputs)?;
    info!(modules = module_files.len(), "loading IR modules");

    let mut modules = Vec::with_capacity(module_files.len());
    for file in &module_files {
        modules.push(load_module(file)?);
    }

    let bindings = load_bindings(args.bindings.as_deref())?;
    let mut ctx = ProgramContext::build(modules, bindings);
    let line_maps: Vec<(String, LineMap)> = ctx
        .modules
        .iter()
        .map(|(path, module)| (path.clone(), module.line_map()))
        .collect();

    if ctx.has_fatal() {
        return Ok(CompileSummary {
            order: Vec::new(),
            results: Vec::new(),
            diagnostics: ctx.take_diagnostics(),
            line_maps,
        });
    }

    let order = match DependencyGraph::build(&ctx).module_order() {
        Ok(order) => order,
        Err(cycle) => {
            // Import cycles with value edges abort the whole compilation.
            let first = cycle.first().cloned().unwrap_or_default();
            ctx.diagnostics.push(Diagnostic::from_code(
                &first,
                Span::at(0),
                diagnostic_codes::IMPORT_CYCLE_WITH_VALUES,
                &[&cycle.join(" -> ")],
            ));
            return Ok(CompileSummary {
                order: Vec::new(),
                results: Vec::new(),
                diagnostics: ctx.take_diagnostics(),
                line_maps,
            });
        }
    };
    debug!(?order, "emission order");

    specialize(&mut ctx);
    if ctx.has_fatal() {
        return Ok(CompileSummary {
            order,
            results: Vec::new(),
            diagnostics: ctx.take_diagnostics(),
            line_maps,
        });
    }

    let options = EmitOptions {
        checked_numeric: args.checked_numeric,
    };
    let results = emit_program(&ctx, &order, &options);

    if !args.check && !args.list_files {
        let fatal = results.iter().any(EmitResult::has_fatal);
        if !fatal {
            write_outputs(&args.out_dir, &results)?;
        }
    }

    Ok(CompileSummary {
        order,
        results,
        diagnostics: ctx.take_diagnostics(),
        line_maps,
    })
}

fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.with_context(|| format!("scanning {}", input.display()))?;
                let path = entry.path();
                if path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(".ir.json"))
                {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    anyhow::ensure!(!files.is_empty(), "no .ir.json module files found");
    Ok(files)
}

fn load_module(file: &Path) -> Result<IrModule> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("reading module {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing module {}", file.display()))
}

fn load_bindings(extra: Option<&Path>) -> Result<ExternalBindings> {
    let mut bindings = ExternalBindings::builtin();
    if let Some(path) = extra {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading binding table {}", path.display()))?;
        let table = ExternalBindings::from_json(&text)
            .with_context(|| format!("parsing binding table {}", path.display()))?;
        bindings.extend_with(table);
    }
    Ok(bindings)
}

fn write_outputs(out_dir: &Path, results: &[EmitResult]) -> Result<()> {
    for result in results {
        let target = out_dir.join(&result.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&target, &result.text)
            .with_context(|| format!("writing {}", target.display()))?;
        info!(file = %target.display(), "wrote output");
    }
    Ok(())
}
