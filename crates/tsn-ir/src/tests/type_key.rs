use super::*;
use crate::types::{ArrayOrigin, IrType, ObjectMember, Parameter};

fn arr(element: IrType) -> IrType {
    IrType::Array {
        element: Box::new(element),
        origin: ArrayOrigin::Inferred,
    }
}

fn boxed(name: &str, args: Vec<IrType>) -> IrType {
    IrType::Reference {
        name: name.to_string(),
        type_arguments: args,
        structural_members: None,
    }
}

#[test]
fn primitives_key_by_name() {
    assert_eq!(type_key(&IrType::INT), "int");
    assert_eq!(type_key(&IrType::STRING), "string");
    assert_eq!(type_key(&IrType::NUMBER), "number");
}

#[test]
fn reference_keys_compose() {
    assert_eq!(type_key(&boxed("Box", vec![IrType::INT])), "Box_int");
    assert_eq!(
        type_key(&boxed("Pair", vec![IrType::STRING, arr(IrType::INT)])),
        "Pair_string_Arr_int"
    );
}

#[test]
fn union_key_is_order_independent() {
    let a = IrType::Union {
        types: vec![IrType::INT, IrType::STRING],
    };
    let b = IrType::Union {
        types: vec![IrType::STRING, IrType::INT],
    };
    assert_eq!(type_key(&a), type_key(&b));
    assert_eq!(type_key(&a), "Or_int_string");
}

#[test]
fn tuple_key_carries_length() {
    let t = IrType::Tuple {
        elements: vec![IrType::INT, IrType::INT],
    };
    assert_eq!(type_key(&t), "Tup2_int_int");
}

#[test]
fn function_key_includes_params_and_return() {
    let f = IrType::Function {
        parameters: vec![Parameter {
            name: "x".into(),
            ty: Some(IrType::INT),
            optional: false,
            default: None,
        }],
        return_type: Box::new(IrType::BOOLEAN),
        type_parameters: vec![],
        is_async: false,
    };
    assert_eq!(type_key(&f), "Fn_int_boolean");
}

#[test]
fn distinct_structures_get_distinct_keys() {
    let shapes = vec![
        IrType::INT,
        arr(IrType::INT),
        boxed("Box", vec![IrType::INT]),
        boxed("Box", vec![IrType::STRING]),
        IrType::Union {
            types: vec![IrType::INT, IrType::NULL],
        },
        IrType::Tuple {
            elements: vec![IrType::INT],
        },
        IrType::Object {
            members: vec![ObjectMember {
                name: "v".into(),
                ty: IrType::INT,
                optional: false,
                readonly: false,
            }],
            index_signature: None,
        },
    ];
    let keys: Vec<String> = shapes.iter().map(type_key).collect();
    let mut deduped = keys.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), keys.len(), "keys must be pairwise distinct");
}

#[test]
fn keys_are_stable_across_calls() {
    let ty = boxed("Map", vec![IrType::STRING, arr(IrType::NUMBER)]);
    assert_eq!(type_key(&ty), type_key(&ty.clone()));
}

#[test]
fn string_literal_keys_include_length() {
    // "a_b" and "a", "b" must not collide through the join separator.
    let a = IrType::Literal {
        value: crate::expr::LiteralValue::String("a_b".into()),
    };
    let b = IrType::Literal {
        value: crate::expr::LiteralValue::String("a".into()),
    };
    assert_ne!(type_key(&a), type_key(&b));
}
