use tsn_binder::{ExternalBindings, ProgramContext};
use tsn_emitter::{EmitOptions, container_class_name, emit_module, namespace_for_path};
use tsn_ir::expr::IrExpr;
use tsn_ir::module::IrModule;
use tsn_ir::stmt::{
    ClassDecl, EnumDecl, EnumMember, FunctionDecl, IrStmt, VariableDecl, VariableDeclarator,
};
use tsn_ir::types::IrType;

fn emit_path(path: &str, statements: Vec<IrStmt>) -> tsn_emitter::EmitResult {
    let mut module = IrModule::new(path);
    module.statements = statements;
    let ctx = ProgramContext::build(vec![module], ExternalBindings::builtin());
    emit_module(&ctx, path, &EmitOptions::default()).expect("module emits")
}

fn class(name: &str) -> IrStmt {
    IrStmt::Class(ClassDecl {
        name: name.into(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![],
        is_exported: true,
        json_aot: false,
        span: Default::default(),
    })
}

fn free_function(name: &str) -> IrStmt {
    IrStmt::Function(FunctionDecl {
        name: name.into(),
        type_parameters: vec![],
        parameters: vec![],
        return_type: IrType::VOID,
        body: Some(vec![]),
        is_async: false,
        is_generator: false,
        is_exported: true,
        span: Default::default(),
    })
}

#[test]
fn namespace_derivation() {
    assert_eq!(namespace_for_path("pkg/foo/bar.ts"), "Pkg.Foo");
    assert_eq!(namespace_for_path("bar.ts"), "Program");
    assert_eq!(namespace_for_path("my-app/data_layer/store.ts"), "MyApp.DataLayer");
    assert_eq!(container_class_name("pkg/foo/bar.ts"), "Bar");
    assert_eq!(container_class_name("store.ts"), "Store");
}

#[test]
fn one_namespace_block_per_file() {
    let result = emit_path("pkg/foo/bar.ts", vec![class("Thing")]);
    assert_eq!(result.namespace_name, "Pkg.Foo");
    assert_eq!(result.path, "pkg/foo/bar.cs");
    assert_eq!(result.text.matches("namespace ").count(), 1);
    assert!(result.text.contains("namespace Pkg.Foo {"), "{}", result.text);
    assert!(result.text.starts_with("// <auto-generated/>"));
}

#[test]
fn declaration_matching_file_name_moves_code_to_module_sibling() {
    let result = emit_path(
        "pkg/widget.ts",
        vec![class("Widget"), free_function("helper")],
    );
    assert!(
        result.text.contains("public static class Widget__Module"),
        "{}",
        result.text
    );
    assert!(result.text.contains("public class Widget"), "{}", result.text);
}

#[test]
fn no_collision_keeps_file_container() {
    let result = emit_path("pkg/util.ts", vec![free_function("helper")]);
    assert!(result.text.contains("public static class Util"), "{}", result.text);
    assert!(!result.text.contains("__Module"));
}

#[test]
fn usings_are_sorted_and_referenced() {
    // Console (System) and a Map construction (System.Collections.Generic).
    let statements = vec![IrStmt::Expression {
        expression: IrExpr::Call {
            callee: Box::new(IrExpr::Member {
                object: Box::new(IrExpr::ident("Console")),
                property: "write".into(),
                optional: false,
                span: Default::default(),
            }),
            type_arguments: vec![],
            arguments: vec![IrExpr::New {
                callee: "Map".into(),
                type_arguments: vec![IrType::STRING, IrType::INT],
                arguments: vec![],
                span: Default::default(),
            }],
            span: Default::default(),
        },
        span: Default::default(),
    }];
    let result = emit_path("app.ts", statements);
    let mut sorted = result.required_usings.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(result.required_usings, sorted, "usings sorted and unique");
    for namespace in &result.required_usings {
        assert!(
            result.text.contains(&format!("using {namespace};")),
            "using {namespace} missing from text"
        );
    }
    // Minimality: nothing pulled in the runtime helpers here.
    assert!(!result.required_usings.contains(&"Tsn.Runtime".to_string()));
    assert!(
        result
            .required_usings
            .contains(&"System.Collections.Generic".to_string())
    );
}

#[test]
fn json_aot_types_get_a_serializer_context() {
    let mut config = ClassDecl {
        name: "Config".into(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![],
        is_exported: true,
        json_aot: true,
        span: Default::default(),
    };
    config.json_aot = true;
    let result = emit_path("cfg.ts", vec![IrStmt::Class(config)]);
    assert!(
        result.text.contains("[JsonSerializable(typeof(Config))]"),
        "{}",
        result.text
    );
    assert!(
        result
            .text
            .contains("internal sealed partial class Cfg__JsonContext : JsonSerializerContext"),
        "{}",
        result.text
    );
    assert!(
        result
            .required_usings
            .contains(&"System.Text.Json.Serialization".to_string())
    );
}

#[test]
fn numeric_enum_emits_cs_enum() {
    let result = emit_path(
        "colors.ts",
        vec![IrStmt::Enum(EnumDecl {
            name: "Color".into(),
            members: vec![
                EnumMember {
                    name: "Red".into(),
                    value: Some(tsn_ir::expr::LiteralValue::Number(1.0)),
                },
                EnumMember {
                    name: "Green".into(),
                    value: None,
                },
            ],
            is_exported: true,
            span: Default::default(),
        })],
    );
    assert!(result.text.contains("public enum Color"), "{}", result.text);
    assert!(result.text.contains("Red = 1,"), "{}", result.text);
}

#[test]
fn string_enum_becomes_const_class() {
    let result = emit_path(
        "levels.ts",
        vec![IrStmt::Enum(EnumDecl {
            name: "Level".into(),
            members: vec![EnumMember {
                name: "Debug".into(),
                value: Some(tsn_ir::expr::LiteralValue::String("debug".into())),
            }],
            is_exported: true,
            span: Default::default(),
        })],
    );
    assert!(
        result.text.contains("public static class Level"),
        "{}",
        result.text
    );
    assert!(
        result.text.contains("public const string Debug = \"debug\";"),
        "{}",
        result.text
    );
}

#[test]
fn generator_function_lowers_to_iterator_state_machine() {
    let body = vec![
        IrStmt::Expression {
            expression: IrExpr::Yield {
                argument: Some(Box::new(IrExpr::number(1.0))),
                delegate: false,
                span: Default::default(),
            },
            span: Default::default(),
        },
        IrStmt::Expression {
            expression: IrExpr::Yield {
                argument: Some(Box::new(IrExpr::number(2.0))),
                delegate: false,
                span: Default::default(),
            },
            span: Default::default(),
        },
    ];
    let result = emit_path(
        "gen.ts",
        vec![IrStmt::Function(FunctionDecl {
            name: "pair".into(),
            type_parameters: vec![],
            parameters: vec![],
            return_type: IrType::Reference {
                name: "Iterable".into(),
                type_arguments: vec![IrType::INT],
                structural_members: None,
            },
            body: Some(body),
            is_async: false,
            is_generator: true,
            is_exported: true,
            span: Default::default(),
        })],
    );
    assert!(
        result.text.contains("IEnumerable<int> pair()"),
        "{}",
        result.text
    );
    assert!(
        result.text.contains("private sealed class pair__Iterator"),
        "{}",
        result.text
    );
    assert!(result.text.contains("public bool MoveNext()"), "{}", result.text);
    assert!(result.text.contains("switch (__state)"), "{}", result.text);
    // Two yields, two resume states.
    assert!(result.text.contains("__current = 1;"), "{}", result.text);
    assert!(result.text.contains("__current = 2;"), "{}", result.text);
}

#[test]
fn module_variables_split_fields_and_locals() {
    // `const tag` is a field; `let scratch` only used by top-level code
    // stays local to Main.
    let statements = vec![
        IrStmt::Variable(VariableDecl {
            declarations: vec![VariableDeclarator {
                name: "tag".into(),
                ty: Some(IrType::STRING),
                initializer: Some(IrExpr::string("t")),
            }],
            is_const: true,
            is_exported: false,
            span: Default::default(),
        }),
        IrStmt::Variable(VariableDecl {
            declarations: vec![VariableDeclarator {
                name: "scratch".into(),
                ty: Some(IrType::INT),
                initializer: Some(IrExpr::number(0.0)),
            }],
            is_const: false,
            is_exported: false,
            span: Default::default(),
        }),
        IrStmt::Expression {
            expression: IrExpr::Assignment {
                operator: tsn_ir::expr::AssignOp::Assign,
                target: Box::new(IrExpr::ident("scratch")),
                value: Box::new(IrExpr::number(1.0)),
                span: Default::default(),
            },
            span: Default::default(),
        },
    ];
    let result = emit_path("app.ts", statements);
    assert!(
        result
            .text
            .contains("private static readonly string tag = \"t\";"),
        "{}",
        result.text
    );
    assert!(result.text.contains("int scratch = 0;"), "{}", result.text);
    let main_pos = result.text.find("static void Main").unwrap();
    let scratch_pos = result.text.find("int scratch").unwrap();
    assert!(scratch_pos > main_pos, "scratch is a Main local");
}
