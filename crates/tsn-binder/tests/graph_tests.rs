use tsn_binder::{ExternalBindings, ProgramContext, module_order};
use tsn_ir::module::{ImportBinding, IrModule};

fn module(path: &str, imports: Vec<(&str, bool)>) -> IrModule {
    let mut m = IrModule::new(path);
    m.imports = imports
        .into_iter()
        .map(|(specifier, type_only)| ImportBinding {
            specifier: specifier.into(),
            names: vec![],
            type_only,
        })
        .collect();
    m
}

fn ctx_of(modules: Vec<IrModule>) -> ProgramContext {
    ProgramContext::build(modules, ExternalBindings::new())
}

#[test]
fn dependencies_precede_dependents() {
    let ctx = ctx_of(vec![
        module("app.ts", vec![("util.ts", false)]),
        module("util.ts", vec![]),
    ]);
    let order = module_order(&ctx).expect("acyclic");
    assert_eq!(order, vec!["util.ts", "app.ts"]);
}

#[test]
fn ties_break_lexicographically() {
    let ctx = ctx_of(vec![
        module("c.ts", vec![]),
        module("a.ts", vec![]),
        module("b.ts", vec![]),
    ]);
    let order = module_order(&ctx).expect("acyclic");
    assert_eq!(order, vec!["a.ts", "b.ts", "c.ts"]);
}

#[test]
fn value_cycle_is_rejected() {
    let ctx = ctx_of(vec![
        module("a.ts", vec![("b.ts", false)]),
        module("b.ts", vec![("a.ts", false)]),
    ]);
    let cycle = module_order(&ctx).expect_err("value cycle");
    assert_eq!(cycle, vec!["a.ts", "b.ts"]);
}

#[test]
fn type_only_cycle_compiles() {
    let ctx = ctx_of(vec![
        module("a.ts", vec![("b.ts", true)]),
        module("b.ts", vec![("a.ts", true)]),
    ]);
    let order = module_order(&ctx).expect("type-only cycle is erased");
    assert_eq!(order.len(), 2);
}

#[test]
fn mixed_cycle_is_rejected() {
    // One value edge inside the cycle poisons it.
    let ctx = ctx_of(vec![
        module("a.ts", vec![("b.ts", true)]),
        module("b.ts", vec![("a.ts", false)]),
    ]);
    assert!(module_order(&ctx).is_err());
}

#[test]
fn downstream_value_edge_does_not_poison_type_only_cycle() {
    // a <-> b type-only, plus a value import of b from c.
    let ctx = ctx_of(vec![
        module("a.ts", vec![("b.ts", true)]),
        module("b.ts", vec![("a.ts", true)]),
        module("c.ts", vec![("b.ts", false)]),
    ]);
    let order = module_order(&ctx).expect("cycle core is type-only");
    assert_eq!(order.len(), 3);
    let b_pos = order.iter().position(|p| p == "b.ts").unwrap();
    let c_pos = order.iter().position(|p| p == "c.ts").unwrap();
    assert!(b_pos < c_pos, "value dependency still ordered");
}

#[test]
fn external_imports_are_not_graph_nodes() {
    let ctx = ctx_of(vec![module("app.ts", vec![("Console", false)])]);
    let order = module_order(&ctx).expect("external import ignored");
    assert_eq!(order, vec!["app.ts"]);
}

#[test]
fn duplicate_imports_value_wins() {
    // Importing the same module twice, once type-only and once not, makes
    // the edge a value edge.
    let ctx = ctx_of(vec![
        module("a.ts", vec![("b.ts", true), ("b.ts", false)]),
        module("b.ts", vec![("a.ts", false)]),
    ]);
    assert!(module_order(&ctx).is_err());
}
