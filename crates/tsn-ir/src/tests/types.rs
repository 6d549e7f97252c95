use super::*;
use crate::expr::LiteralValue;

#[test]
fn primitive_names_round_trip_serde() {
    let ty = IrType::primitive(PrimitiveName::Int);
    let json = serde_json::to_string(&ty).expect("serialize");
    assert_eq!(json, r#"{"kind":"primitiveType","name":"int"}"#);
    let back: IrType = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, ty);
}

#[test]
fn struct_marker_spelling() {
    let json = r#"{"kind":"primitiveType","name":"struct-marker"}"#;
    let ty: IrType = serde_json::from_str(json).expect("deserialize");
    assert!(ty.is_primitive(PrimitiveName::StructMarker));
}

#[test]
fn array_origin_defaults_to_inferred() {
    let json = r#"{"kind":"arrayType","element":{"kind":"primitiveType","name":"number"}}"#;
    let ty: IrType = serde_json::from_str(json).expect("deserialize");
    match ty {
        IrType::Array { origin, .. } => assert_eq!(origin, ArrayOrigin::Inferred),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn nullish_predicates() {
    assert!(IrType::NULL.is_nullish());
    assert!(IrType::UNDEFINED.is_nullish());
    assert!(!IrType::STRING.is_nullish());
    assert!(IrType::INT.is_integer());
    assert!(IrType::LONG.is_integer());
    assert!(!IrType::NUMBER.is_integer());
}

#[test]
fn reference_type_deserializes_with_arguments() {
    let json = r#"{
        "kind": "referenceType",
        "name": "Box",
        "typeArguments": [{"kind": "primitiveType", "name": "int"}]
    }"#;
    let ty: IrType = serde_json::from_str(json).expect("deserialize");
    match &ty {
        IrType::Reference {
            name,
            type_arguments,
            ..
        } => {
            assert_eq!(name, "Box");
            assert_eq!(type_arguments.len(), 1);
        }
        other => panic!("expected reference, got {other:?}"),
    }
}

#[test]
fn literal_type_holds_value() {
    let ty = IrType::Literal {
        value: LiteralValue::Boolean(true),
    };
    let json = serde_json::to_string(&ty).expect("serialize");
    let back: IrType = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, ty);
}
