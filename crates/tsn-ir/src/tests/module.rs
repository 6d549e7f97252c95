use super::*;
use crate::stmt::{IrStmt, TypeAliasDecl, VariableDecl, VariableDeclarator};
use crate::types::IrType;

#[test]
fn exported_names_cover_variable_declarators() {
    let mut module = IrModule::new("pkg/main.ts");
    module.statements.push(IrStmt::Variable(VariableDecl {
        declarations: vec![
            VariableDeclarator {
                name: "a".into(),
                ty: None,
                initializer: None,
            },
            VariableDeclarator {
                name: "b".into(),
                ty: None,
                initializer: None,
            },
        ],
        is_const: true,
        is_exported: true,
        span: Default::default(),
    }));
    module.statements.push(IrStmt::TypeAlias(TypeAliasDecl {
        name: "T".into(),
        type_parameters: vec![],
        ty: IrType::INT,
        is_exported: false,
        span: Default::default(),
    }));
    assert_eq!(module.exported_names(), vec!["a", "b"]);
}

#[test]
fn module_round_trips_through_json() {
    let json = r#"{
        "path": "pkg/foo/bar.ts",
        "lineStarts": [0, 10, 25],
        "imports": [
            {"specifier": "pkg/util.ts", "names": [{"name": "helper"}], "typeOnly": false}
        ],
        "statements": []
    }"#;
    let module: IrModule = serde_json::from_str(json).expect("deserialize");
    assert_eq!(module.path, "pkg/foo/bar.ts");
    assert_eq!(module.imports.len(), 1);
    assert_eq!(module.imports[0].names[0].local_name(), "helper");
    assert_eq!(module.line_map().line_count(), 3);
}

#[test]
fn import_alias_wins_as_local_name() {
    let name = ImportedName {
        name: "write".into(),
        alias: Some("log".into()),
    };
    assert_eq!(name.local_name(), "log");
}
