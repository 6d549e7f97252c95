use tsn_binder::{ExternalBindings, ProgramContext};
use tsn_common::diagnostics::diagnostic_codes;
use tsn_ir::expr::IrExpr;
use tsn_ir::module::IrModule;
use tsn_ir::stmt::{
    ClassDecl, ClassMember, FunctionDecl, HeritageClause, IrStmt, PropertyMember, VariableDecl,
    VariableDeclarator,
};
use tsn_ir::types::{IrType, TypeParameter};
use tsn_specializer::{specialize, specialized_name};

fn type_param(name: &str) -> TypeParameter {
    TypeParameter {
        name: name.into(),
        constraint: None,
        default: None,
    }
}

fn t_param_ref(name: &str) -> IrType {
    IrType::TypeParameterRef {
        name: name.into(),
        constraint: None,
        default: None,
    }
}

fn generic_box() -> IrStmt {
    IrStmt::Class(ClassDecl {
        name: "Box".into(),
        type_parameters: vec![type_param("T")],
        extends: None,
        implements: vec![],
        members: vec![ClassMember::Property(PropertyMember {
            name: "v".into(),
            ty: t_param_ref("T"),
            optional: false,
            readonly: false,
            is_static: false,
            initializer: None,
            span: Default::default(),
        })],
        is_exported: true,
        json_aot: false,
        span: Default::default(),
    })
}

fn new_expr(callee: &str, type_args: Vec<IrType>, args: Vec<IrExpr>) -> IrStmt {
    IrStmt::Expression {
        expression: IrExpr::New {
            callee: callee.into(),
            type_arguments: type_args,
            arguments: args,
            span: Default::default(),
        },
        span: Default::default(),
    }
}

fn class_names(module: &IrModule) -> Vec<&str> {
    module
        .statements
        .iter()
        .filter_map(|s| match s {
            IrStmt::Class(c) => Some(c.name.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn naming_is_deterministic() {
    assert_eq!(specialized_name("Box", &[IrType::INT]), "Box__int");
    assert_eq!(
        specialized_name("Pair", &[IrType::STRING, IrType::INT]),
        "Pair__string__int"
    );
}

#[test]
fn two_instantiations_produce_exactly_two_classes() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(generic_box());
    module
        .statements
        .push(new_expr("Box", vec![IrType::INT], vec![IrExpr::number(5.0)]));
    module.statements.push(new_expr(
        "Box",
        vec![IrType::STRING],
        vec![IrExpr::string("x")],
    ));
    // A duplicate instantiation coalesces with the first.
    module
        .statements
        .push(new_expr("Box", vec![IrType::INT], vec![IrExpr::number(7.0)]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let names = class_names(&ctx.modules["m.ts"]);
    assert_eq!(names, vec!["Box__int", "Box__string"]);
    assert!(ctx.registry.contains("Box__int"));
    assert!(ctx.registry.contains("Box__string"));
}

#[test]
fn generic_original_is_not_emitted() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(generic_box());
    module
        .statements
        .push(new_expr("Box", vec![IrType::INT], vec![]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let names = class_names(&ctx.modules["m.ts"]);
    assert!(!names.contains(&"Box"));
}

#[test]
fn specialised_member_types_are_substituted() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(generic_box());
    module
        .statements
        .push(new_expr("Box", vec![IrType::INT], vec![]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let spec = ctx.modules["m.ts"]
        .statements
        .iter()
        .find_map(|s| match s {
            IrStmt::Class(c) if c.name == "Box__int" => Some(c),
            _ => None,
        })
        .expect("Box__int generated");
    assert!(spec.type_parameters.is_empty());
    match &spec.members[0] {
        ClassMember::Property(p) => assert_eq!(p.ty, IrType::INT),
        other => panic!("expected property, got {other:?}"),
    }
}

#[test]
fn use_sites_are_renamed() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(generic_box());
    module.statements.push(IrStmt::Variable(VariableDecl {
        declarations: vec![VariableDeclarator {
            name: "b".into(),
            ty: Some(IrType::Reference {
                name: "Box".into(),
                type_arguments: vec![IrType::INT],
                structural_members: None,
            }),
            initializer: Some(IrExpr::New {
                callee: "Box".into(),
                type_arguments: vec![IrType::INT],
                arguments: vec![],
                span: Default::default(),
            }),
        }],
        is_const: false,
        is_exported: false,
        span: Default::default(),
    }));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let var = ctx.modules["m.ts"]
        .statements
        .iter()
        .find_map(|s| match s {
            IrStmt::Variable(v) => Some(v),
            _ => None,
        })
        .expect("variable survives");
    assert_eq!(
        var.declarations[0].ty.as_ref().unwrap().reference_name(),
        Some("Box__int")
    );
    match var.declarations[0].initializer.as_ref().unwrap() {
        IrExpr::New {
            callee,
            type_arguments,
            ..
        } => {
            assert_eq!(callee, "Box__int");
            assert!(type_arguments.is_empty());
        }
        other => panic!("expected new, got {other:?}"),
    }
}

#[test]
fn base_specialisation_precedes_derived() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Parent".into(),
        type_parameters: vec![type_param("T")],
        extends: None,
        implements: vec![],
        members: vec![],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Child".into(),
        type_parameters: vec![type_param("U")],
        extends: Some(HeritageClause {
            name: "Parent".into(),
            type_arguments: vec![t_param_ref("U")],
        }),
        implements: vec![],
        members: vec![],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module
        .statements
        .push(new_expr("Child", vec![IrType::INT], vec![]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let names = class_names(&ctx.modules["m.ts"]);
    let parent = names.iter().position(|n| *n == "Parent__int").unwrap();
    let child = names.iter().position(|n| *n == "Child__int").unwrap();
    assert!(parent < child, "base must precede derived");

    let child_decl = ctx.modules["m.ts"]
        .statements
        .iter()
        .find_map(|s| match s {
            IrStmt::Class(c) if c.name == "Child__int" => Some(c),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        child_decl.extends.as_ref().unwrap().name,
        "Parent__int"
    );
}

#[test]
fn requests_inside_generic_bodies_are_deferred() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(generic_box());
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Wrapper".into(),
        type_parameters: vec![type_param("T")],
        extends: None,
        implements: vec![],
        members: vec![ClassMember::Property(PropertyMember {
            name: "inner".into(),
            ty: IrType::Reference {
                name: "Box".into(),
                type_arguments: vec![t_param_ref("T")],
                structural_members: None,
            },
            optional: false,
            readonly: false,
            is_static: false,
            initializer: None,
            span: Default::default(),
        })],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module
        .statements
        .push(new_expr("Wrapper", vec![IrType::STRING], vec![]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let names = class_names(&ctx.modules["m.ts"]);
    assert!(names.contains(&"Wrapper__string"));
    // Box<T> inside Wrapper's body became a Box__string request only once
    // Wrapper itself was specialised.
    assert!(names.contains(&"Box__string"));
    assert!(!names.contains(&"Box"));
}

#[test]
fn generic_function_calls_specialise() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(IrStmt::Function(FunctionDecl {
        name: "identity".into(),
        type_parameters: vec![type_param("T")],
        parameters: vec![tsn_ir::types::Parameter {
            name: "value".into(),
            ty: Some(t_param_ref("T")),
            optional: false,
            default: None,
        }],
        return_type: t_param_ref("T"),
        body: Some(vec![IrStmt::Return {
            argument: Some(IrExpr::ident("value")),
            span: Default::default(),
        }]),
        is_async: false,
        is_generator: false,
        is_exported: false,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::Expression {
        expression: IrExpr::Call {
            callee: Box::new(IrExpr::ident("identity")),
            type_arguments: vec![IrType::STRING],
            arguments: vec![IrExpr::string("x")],
            span: Default::default(),
        },
        span: Default::default(),
    });

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let funcs: Vec<&str> = ctx.modules["m.ts"]
        .statements
        .iter()
        .filter_map(|s| match s {
            IrStmt::Function(f) => Some(f.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(funcs, vec!["identity__string"]);
    let spec = ctx.modules["m.ts"]
        .statements
        .iter()
        .find_map(|s| match s {
            IrStmt::Function(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert_eq!(spec.return_type, IrType::STRING);
}

#[test]
fn specialisation_is_idempotent() {
    let mut module = IrModule::new("m.ts");
    module.statements.push(generic_box());
    module
        .statements
        .push(new_expr("Box", vec![IrType::INT], vec![]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);
    let first = ctx.modules["m.ts"].statements.clone();
    specialize(&mut ctx);
    let second = ctx.modules["m.ts"].statements.clone();
    assert_eq!(first, second);
}

#[test]
fn divergent_recursion_is_bounded() {
    // class Node<T> { next: Node<Box<T>> } grows without bound.
    let mut module = IrModule::new("m.ts");
    module.statements.push(generic_box());
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Node".into(),
        type_parameters: vec![type_param("T")],
        extends: None,
        implements: vec![],
        members: vec![ClassMember::Property(PropertyMember {
            name: "next".into(),
            ty: IrType::Reference {
                name: "Node".into(),
                type_arguments: vec![IrType::Reference {
                    name: "Box".into(),
                    type_arguments: vec![t_param_ref("T")],
                    structural_members: None,
                }],
                structural_members: None,
            },
            optional: false,
            readonly: false,
            is_static: false,
            initializer: None,
            span: Default::default(),
        })],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module
        .statements
        .push(new_expr("Node", vec![IrType::INT], vec![]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    assert!(
        ctx.diagnostics
            .iter()
            .any(|d| d.code == diagnostic_codes::GENERIC_RECURSION_DEPTH)
    );
}

#[test]
fn self_referential_generics_terminate() {
    // class List<T> { next: List<T> } is fine: one specialisation per
    // instantiation.
    let mut module = IrModule::new("m.ts");
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "List".into(),
        type_parameters: vec![type_param("T")],
        extends: None,
        implements: vec![],
        members: vec![ClassMember::Property(PropertyMember {
            name: "next".into(),
            ty: IrType::Reference {
                name: "List".into(),
                type_arguments: vec![t_param_ref("T")],
                structural_members: None,
            },
            optional: true,
            readonly: false,
            is_static: false,
            initializer: None,
            span: Default::default(),
        })],
        is_exported: false,
        json_aot: false,
        span: Default::default(),
    }));
    module
        .statements
        .push(new_expr("List", vec![IrType::INT], vec![]));

    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::new());
    specialize(&mut ctx);

    let names = class_names(&ctx.modules["m.ts"]);
    assert_eq!(names, vec!["List__int"]);
    let spec = ctx.modules["m.ts"]
        .statements
        .iter()
        .find_map(|s| match s {
            IrStmt::Class(c) => Some(c),
            _ => None,
        })
        .unwrap();
    match &spec.members[0] {
        ClassMember::Property(p) => {
            assert_eq!(p.ty.reference_name(), Some("List__int"));
        }
        other => panic!("expected property, got {other:?}"),
    }
}
