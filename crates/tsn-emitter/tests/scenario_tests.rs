//! The literal end-to-end scenarios: full pipeline from bound IR through
//! specialisation to emitted C# text.

use tsn_binder::{ExternalBindings, ProgramContext, module_order};
use tsn_emitter::{EmitOptions, emit_module};
use tsn_ir::expr::{ArrowBody, IrExpr, LiteralValue};
use tsn_ir::module::{ImportBinding, IrModule};
use tsn_ir::stmt::{
    ClassDecl, ClassMember, FunctionDecl, IrStmt, MethodMember, PropertyMember, TypeAliasDecl,
    VariableDecl, VariableDeclarator,
};
use tsn_ir::types::{ArrayOrigin, IrType, ObjectMember, Parameter, TypeParameter};
use tsn_specializer::specialize;

fn member(name: &str, ty: IrType) -> ObjectMember {
    ObjectMember {
        name: name.into(),
        ty,
        optional: false,
        readonly: false,
    }
}

fn pipeline(mut module: IrModule) -> tsn_emitter::EmitResult {
    let path = module.path.clone();
    module.line_starts = vec![0];
    let mut ctx = ProgramContext::build(vec![module], ExternalBindings::builtin());
    specialize(&mut ctx);
    emit_module(&ctx, &path, &EmitOptions::default()).expect("module emits")
}

/// Scenario 1: `function f(): number[] { return [1,2,3]; }`
#[test]
fn integer_array_widens_to_double() {
    let mut module = IrModule::new("app.ts");
    module.statements.push(IrStmt::Function(FunctionDecl {
        name: "f".into(),
        type_parameters: vec![],
        parameters: vec![],
        return_type: IrType::Array {
            element: Box::new(IrType::NUMBER),
            origin: ArrayOrigin::Explicit,
        },
        body: Some(vec![IrStmt::Return {
            argument: Some(IrExpr::Array {
                elements: vec![
                    IrExpr::number(1.0),
                    IrExpr::number(2.0),
                    IrExpr::number(3.0),
                ],
                span: Default::default(),
            }),
            span: Default::default(),
        }]),
        is_async: false,
        is_generator: false,
        is_exported: true,
        span: Default::default(),
    }));

    let result = pipeline(module);
    assert!(
        result.text.contains("public static double[] f()"),
        "{}",
        result.text
    );
    assert!(
        result.text.contains("new double[] { 1, 2, 3 }"),
        "{}",
        result.text
    );
}

/// Scenario 2: `class Box<T>{v:T}` with `new Box<int>(5)` and
/// `new Box<string>("x")` yields exactly `Box__int` and `Box__string`.
#[test]
fn generic_specialisation_produces_two_classes() {
    let mut module = IrModule::new("app.ts");
    module.statements.push(IrStmt::Class(ClassDecl {
        name: "Box".into(),
        type_parameters: vec![TypeParameter {
            name: "T".into(),
            constraint: None,
            default: None,
        }],
        extends: None,
        implements: vec![],
        members: vec![
            ClassMember::Property(PropertyMember {
                name: "v".into(),
                ty: IrType::TypeParameterRef {
                    name: "T".into(),
                    constraint: None,
                    default: None,
                },
                optional: false,
                readonly: false,
                is_static: false,
                initializer: None,
                span: Default::default(),
            }),
            ClassMember::Method(MethodMember {
                name: "constructor".into(),
                type_parameters: vec![],
                parameters: vec![Parameter {
                    name: "v".into(),
                    ty: Some(IrType::TypeParameterRef {
                        name: "T".into(),
                        constraint: None,
                        default: None,
                    }),
                    optional: false,
                    default: None,
                }],
                return_type: IrType::VOID,
                body: Some(vec![]),
                is_static: false,
                is_async: false,
                is_generator: false,
                span: Default::default(),
            }),
        ],
        is_exported: true,
        json_aot: false,
        span: Default::default(),
    }));
    for (targ, arg) in [
        (IrType::INT, IrExpr::number(5.0)),
        (IrType::STRING, IrExpr::string("x")),
    ] {
        module.statements.push(IrStmt::Expression {
            expression: IrExpr::New {
                callee: "Box".into(),
                type_arguments: vec![targ],
                arguments: vec![arg],
                span: Default::default(),
            },
            span: Default::default(),
        });
    }

    let result = pipeline(module);
    assert!(result.text.contains("class Box__int"), "{}", result.text);
    assert!(result.text.contains("class Box__string"), "{}", result.text);
    assert!(
        !result.text.contains("class Box "),
        "generic original must not be emitted: {}",
        result.text
    );
    assert!(result.text.contains("public int v;"), "{}", result.text);
    assert!(result.text.contains("public string v;"), "{}", result.text);
    assert!(result.text.contains("new Box__int(5)"), "{}", result.text);
    assert!(
        result.text.contains("new Box__string(\"x\")"),
        "{}",
        result.text
    );
}

/// Scenario 3: discriminated union narrowing via `"e" in r`.
#[test]
fn in_test_narrows_without_cast() {
    let mut module = IrModule::new("app.ts");
    module.statements.push(IrStmt::TypeAlias(TypeAliasDecl {
        name: "R".into(),
        type_parameters: vec![],
        ty: IrType::Union {
            types: vec![
                IrType::Object {
                    members: vec![
                        member(
                            "ok",
                            IrType::Literal {
                                value: LiteralValue::Boolean(true),
                            },
                        ),
                        member("v", IrType::INT),
                    ],
                    index_signature: None,
                },
                IrType::Object {
                    members: vec![
                        member(
                            "ok",
                            IrType::Literal {
                                value: LiteralValue::Boolean(false),
                            },
                        ),
                        member("e", IrType::STRING),
                    ],
                    index_signature: None,
                },
            ],
        },
        is_exported: true,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::Function(FunctionDecl {
        name: "message".into(),
        type_parameters: vec![],
        parameters: vec![Parameter {
            name: "r".into(),
            ty: Some(IrType::reference("R")),
            optional: false,
            default: None,
        }],
        return_type: IrType::STRING,
        body: Some(vec![
            IrStmt::If {
                condition: IrExpr::Binary {
                    operator: tsn_ir::expr::BinaryOp::In,
                    left: Box::new(IrExpr::string("e")),
                    right: Box::new(IrExpr::ident("r")),
                    span: Default::default(),
                },
                then_branch: Box::new(IrStmt::Return {
                    argument: Some(IrExpr::Member {
                        object: Box::new(IrExpr::ident("r")),
                        property: "e".into(),
                        optional: false,
                        span: Default::default(),
                    }),
                    span: Default::default(),
                }),
                else_branch: None,
                span: Default::default(),
            },
            IrStmt::Return {
                argument: Some(IrExpr::string("")),
                span: Default::default(),
            },
        ]),
        is_async: false,
        is_generator: false,
        is_exported: true,
        span: Default::default(),
    }));

    let result = pipeline(module);
    // The alias generated its hierarchy with a sentinel.
    assert!(result.text.contains("abstract class R"), "{}", result.text);
    assert!(result.text.contains("sealed class R__1 : R"), "{}", result.text);
    assert!(result.text.contains("__shape"), "{}", result.text);
    // The shape test binds and the access needs no cast.
    assert!(result.text.contains("if (r is R__1 "), "{}", result.text);
    assert!(result.text.contains(".e;"), "{}", result.text);
    assert!(!result.text.contains("((R__1)"), "{}", result.text);
}

/// A nullish union member makes the alias nullable without losing either
/// the generated hierarchy or the narrowing.
#[test]
fn nullable_discriminated_union_keeps_name_and_narrows() {
    let mut module = IrModule::new("app.ts");
    module.statements.push(IrStmt::TypeAlias(TypeAliasDecl {
        name: "R".into(),
        type_parameters: vec![],
        ty: IrType::Union {
            types: vec![
                IrType::Object {
                    members: vec![
                        member(
                            "ok",
                            IrType::Literal {
                                value: LiteralValue::Boolean(true),
                            },
                        ),
                        member("v", IrType::INT),
                    ],
                    index_signature: None,
                },
                IrType::Object {
                    members: vec![
                        member(
                            "ok",
                            IrType::Literal {
                                value: LiteralValue::Boolean(false),
                            },
                        ),
                        member("e", IrType::STRING),
                    ],
                    index_signature: None,
                },
                IrType::NULL,
            ],
        },
        is_exported: true,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::Function(FunctionDecl {
        name: "message".into(),
        type_parameters: vec![],
        parameters: vec![Parameter {
            name: "r".into(),
            ty: Some(IrType::reference("R")),
            optional: false,
            default: None,
        }],
        return_type: IrType::STRING,
        body: Some(vec![
            IrStmt::If {
                condition: IrExpr::Binary {
                    operator: tsn_ir::expr::BinaryOp::In,
                    left: Box::new(IrExpr::string("e")),
                    right: Box::new(IrExpr::ident("r")),
                    span: Default::default(),
                },
                then_branch: Box::new(IrStmt::Return {
                    argument: Some(IrExpr::Member {
                        object: Box::new(IrExpr::ident("r")),
                        property: "e".into(),
                        optional: false,
                        span: Default::default(),
                    }),
                    span: Default::default(),
                }),
                else_branch: None,
                span: Default::default(),
            },
            IrStmt::Return {
                argument: Some(IrExpr::string("")),
                span: Default::default(),
            },
        ]),
        is_async: false,
        is_generator: false,
        is_exported: true,
        span: Default::default(),
    }));

    let result = pipeline(module);
    // The hierarchy is still generated; the null member contributes no
    // subclass but makes references to the alias nullable.
    assert!(result.text.contains("abstract class R"), "{}", result.text);
    assert!(result.text.contains("sealed class R__0 : R"), "{}", result.text);
    assert!(result.text.contains("sealed class R__1 : R"), "{}", result.text);
    assert!(!result.text.contains("R__2"), "{}", result.text);
    assert!(result.text.contains("R? r"), "{}", result.text);
    // Narrowing still scans past the null member to the unique declarer.
    assert!(result.text.contains("if (r is R__1 "), "{}", result.text);
    assert!(result.text.contains(".e;"), "{}", result.text);
}

/// Scenario 4: top-level wrap of `const g = "hi"; Console.write(g);`
#[test]
fn top_level_code_wraps_into_main() {
    let mut module = IrModule::new("app.ts");
    module.statements.push(IrStmt::Variable(VariableDecl {
        declarations: vec![VariableDeclarator {
            name: "g".into(),
            ty: None,
            initializer: Some(IrExpr::string("hi")),
        }],
        is_const: true,
        is_exported: false,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::Expression {
        expression: IrExpr::Call {
            callee: Box::new(IrExpr::Member {
                object: Box::new(IrExpr::ident("Console")),
                property: "write".into(),
                optional: false,
                span: Default::default(),
            }),
            type_arguments: vec![],
            arguments: vec![IrExpr::ident("g")],
            span: Default::default(),
        },
        span: Default::default(),
    });

    let result = pipeline(module);
    assert!(
        result
            .text
            .contains("private static readonly string g = \"hi\";"),
        "{}",
        result.text
    );
    assert!(
        result.text.contains("public static void Main(string[] args)"),
        "{}",
        result.text
    );
    assert!(result.text.contains("Console.Write(g);"), "{}", result.text);
}

/// Scenario 5: Promise executor lowering.
#[test]
fn promise_executor_lowers_to_completion_helper() {
    let mut module = IrModule::new("app.ts");
    module.statements.push(IrStmt::Variable(VariableDecl {
        declarations: vec![VariableDeclarator {
            name: "p".into(),
            ty: None,
            initializer: Some(IrExpr::New {
                callee: "Promise".into(),
                type_arguments: vec![IrType::BOOLEAN],
                arguments: vec![IrExpr::Arrow {
                    parameters: vec![Parameter {
                        name: "resolve".into(),
                        ty: None,
                        optional: false,
                        default: None,
                    }],
                    return_type: None,
                    body: Box::new(ArrowBody::Expression(IrExpr::Call {
                        callee: Box::new(IrExpr::ident("resolve")),
                        type_arguments: vec![],
                        arguments: vec![IrExpr::Literal {
                            value: LiteralValue::Boolean(true),
                            span: Default::default(),
                        }],
                        span: Default::default(),
                    })),
                    is_async: false,
                    span: Default::default(),
                }],
                span: Default::default(),
            }),
        }],
        is_const: true,
        is_exported: false,
        span: Default::default(),
    }));

    let result = pipeline(module);
    assert!(
        result.text.contains("PromiseRuntime.Executor<bool>("),
        "{}",
        result.text
    );
    assert!(
        result.text.contains("resolve => resolve(true)"),
        "{}",
        result.text
    );
    assert!(result.required_usings.contains(&"Tsn.Runtime".to_string()));
}

/// Scenario 6: value cycles are fatal, type-only cycles compile.
#[test]
fn cycle_detection_distinguishes_value_and_type_edges() {
    let make = |path: &str, other: &str, type_only: bool| {
        let mut m = IrModule::new(path);
        m.imports.push(ImportBinding {
            specifier: other.into(),
            names: vec![],
            type_only,
        });
        m
    };

    let value_cycle = ProgramContext::build(
        vec![
            make("a.ts", "b.ts", false),
            make("b.ts", "a.ts", false),
        ],
        ExternalBindings::new(),
    );
    assert!(module_order(&value_cycle).is_err());

    let type_cycle = ProgramContext::build(
        vec![make("a.ts", "b.ts", true), make("b.ts", "a.ts", true)],
        ExternalBindings::new(),
    );
    assert!(module_order(&type_cycle).is_ok());
}
