//! C# emission core.
//!
//! A polymorphic walk over the specialised IR producing C# text. Each closed
//! family (types, statements, expressions) is dispatched through one
//! exhaustive `match`; handlers receive the emitting module's context, which
//! carries indentation, the current class, scope flags, and the accumulating
//! using-set. One input module produces exactly one [`EmitResult`].

pub mod declarations;
pub mod emit_context;
pub mod expressions;
pub mod generators;
pub mod module_shape;
pub mod printer;
pub mod result;
pub mod statements;
pub mod types;

pub use emit_context::{EmitFlags, EmitOptions, ModuleEmitter};
pub use module_shape::{container_class_name, namespace_for_path};
pub use printer::Printer;
pub use result::EmitResult;

use tsn_binder::context::ProgramContext;

/// Emit one module of a bound, specialised program.
pub fn emit_module(
    ctx: &ProgramContext,
    path: &str,
    options: &EmitOptions,
) -> Option<EmitResult> {
    let module = ctx.module(path)?;
    let mut emitter = ModuleEmitter::new(ctx, module, options.clone());
    Some(emitter.emit())
}

/// Emit every module in dependency order. The caller has already run the
/// binder, the solver checks, and the specialisation engine.
pub fn emit_program(ctx: &ProgramContext, order: &[String], options: &EmitOptions) -> Vec<EmitResult> {
    order
        .iter()
        .filter_map(|path| emit_module(ctx, path, options))
        .collect()
}
