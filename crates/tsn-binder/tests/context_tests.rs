use tsn_binder::{ExportKind, ExternalBindings, ProgramContext, TypeClassification};
use tsn_common::diagnostics::diagnostic_codes;
use tsn_ir::module::IrModule;
use tsn_ir::stmt::{
    ClassDecl, HeritageClause, InterfaceDecl, IrStmt, TypeAliasDecl, VariableDecl,
    VariableDeclarator,
};
use tsn_ir::types::IrType;

fn class(name: &str, exported: bool) -> IrStmt {
    IrStmt::Class(ClassDecl {
        name: name.into(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![],
        is_exported: exported,
        json_aot: false,
        span: Default::default(),
    })
}

#[test]
fn registry_and_exports_are_populated() {
    let mut module = IrModule::new("pkg/main.ts");
    module.statements.push(class("Widget", true));
    module.statements.push(IrStmt::TypeAlias(TypeAliasDecl {
        name: "Id".into(),
        type_parameters: vec![],
        ty: IrType::INT,
        is_exported: true,
        span: Default::default(),
    }));

    let ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    assert!(ctx.registry.contains("Widget"));
    assert!(ctx.registry.contains("Id"));
    assert_eq!(ctx.exports["Widget"].kind, ExportKind::Class);
    assert_eq!(ctx.exports["Id"].kind, ExportKind::TypeAlias);
    assert!(ctx.exports["Id"].kind.is_type_only());
    assert!(!ctx.has_fatal());
}

#[test]
fn duplicate_declarations_are_reported() {
    let mut a = IrModule::new("a.ts");
    a.statements.push(class("Dup", false));
    let mut b = IrModule::new("b.ts");
    b.statements.push(class("Dup", false));

    let ctx = ProgramContext::build(vec![a, b], ExternalBindings::new());
    assert!(ctx.has_fatal());
    assert_eq!(
        ctx.diagnostics[0].code,
        diagnostic_codes::DUPLICATE_IDENTIFIER
    );
}

#[test]
fn struct_marker_classifies_value_types() {
    let mut module = IrModule::new("geometry.ts");
    module.statements.push(IrStmt::Interface(InterfaceDecl {
        name: "__Struct__".into(),
        type_parameters: vec![],
        extends: vec![],
        members: vec![],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Point".into(),
        type_parameters: vec![],
        extends: None,
        implements: vec![HeritageClause {
            name: "__Struct__".into(),
            type_arguments: vec![],
        }],
        members: vec![],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module.statements.push(class("Plain", false));

    let ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    assert_eq!(
        ctx.nominal.classify_name("Point"),
        TypeClassification::Value
    );
    assert_eq!(
        ctx.nominal.classify_name("Plain"),
        TypeClassification::Reference
    );
    assert!(ctx.nominal.is_value_type(&IrType::reference("Point")));
}

#[test]
fn struct_hierarchy_conflict_is_fatal() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(IrStmt::Interface(InterfaceDecl {
        name: "__Struct__".into(),
        type_parameters: vec![],
        extends: vec![],
        members: vec![],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Base".into(),
        type_parameters: vec![],
        extends: None,
        implements: vec![HeritageClause {
            name: "__Struct__".into(),
            type_arguments: vec![],
        }],
        members: vec![],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    // Derived drops the marker: descendants must agree.
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Derived".into(),
        type_parameters: vec![],
        extends: Some(HeritageClause {
            name: "Base".into(),
            type_arguments: vec![],
        }),
        implements: vec![],
        members: vec![],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));

    let ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    // Extending a struct base keeps the classification, so no conflict...
    assert!(
        !ctx.diagnostics
            .iter()
            .any(|d| d.code == diagnostic_codes::STRUCT_HIERARCHY_CONFLICT)
    );
    // ...because the marker propagates down the base chain.
    assert_eq!(
        ctx.nominal.classify_name("Derived"),
        TypeClassification::Value
    );
}

#[test]
fn exported_variables_export_each_declarator() {
    let mut module = IrModule::new("vars.ts");
    module.statements.push(IrStmt::Variable(VariableDecl {
        declarations: vec![
            VariableDeclarator {
                name: "first".into(),
                ty: None,
                initializer: None,
            },
            VariableDeclarator {
                name: "second".into(),
                ty: None,
                initializer: None,
            },
        ],
        is_const: true,
        is_exported: true,
        span: Default::default(),
    }));

    let ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    assert_eq!(ctx.exports["first"].kind, ExportKind::Variable);
    assert_eq!(ctx.exports["second"].kind, ExportKind::Variable);
}

#[test]
fn builtin_bindings_resolve() {
    let ctx = ProgramContext::build(vec![], ExternalBindings::builtin());
    let console = ctx
        .bindings
        .lookup_type_binding("Console")
        .expect("builtin Console binding");
    assert_eq!(console.fq_name, "System.Console");
    assert_eq!(console.namespace, "System");
    assert!(ctx.bindings.lookup_type_binding("Missing").is_none());
}
