use tsn_ir::type_key::type_key;
use tsn_ir::types::IrType;
use tsn_solver::{flatten_union, nullishness, strip_nullish, union_of};

fn union(types: Vec<IrType>) -> IrType {
    IrType::Union { types }
}

#[test]
fn nested_unions_are_inlined() {
    let nested = vec![
        IrType::INT,
        union(vec![IrType::STRING, union(vec![IrType::BOOLEAN])]),
    ];
    let flat = flatten_union(&nested);
    assert_eq!(flat, vec![IrType::INT, IrType::STRING, IrType::BOOLEAN]);
}

#[test]
fn duplicates_are_removed_by_structural_key() {
    let flat = flatten_union(&[IrType::INT, IrType::INT, IrType::STRING]);
    assert_eq!(flat.len(), 2);
    let keys: Vec<String> = flat.iter().map(type_key).collect();
    let mut deduped = keys.clone();
    deduped.dedup();
    assert_eq!(keys, deduped);
}

#[test]
fn flatten_is_a_fixed_point() {
    let once = union_of(vec![
        IrType::INT,
        union(vec![IrType::STRING, IrType::INT]),
        IrType::NULL,
    ]);
    let twice = match &once {
        IrType::Union { types } => union_of(types.clone()),
        other => other.clone(),
    };
    assert_eq!(once, twice);
}

#[test]
fn single_member_unwraps() {
    assert_eq!(union_of(vec![IrType::INT, IrType::INT]), IrType::INT);
    assert_eq!(union_of(vec![]), IrType::NEVER);
}

#[test]
fn strip_nullish_removes_only_nullish_members() {
    let ty = union(vec![IrType::STRING, IrType::NULL, IrType::UNDEFINED]);
    assert_eq!(strip_nullish(&ty), IrType::STRING);

    let two = union(vec![IrType::STRING, IrType::INT, IrType::NULL]);
    match strip_nullish(&two) {
        IrType::Union { types } => assert_eq!(types, vec![IrType::STRING, IrType::INT]),
        other => panic!("expected union, got {other:?}"),
    }
}

#[test]
fn strip_nullish_leaves_non_unions_alone() {
    assert_eq!(strip_nullish(&IrType::NULL), IrType::NULL);
    assert_eq!(strip_nullish(&IrType::INT), IrType::INT);
}

#[test]
fn nullishness_distinguishes_null_and_undefined() {
    let just_null = nullishness(&union(vec![IrType::INT, IrType::NULL]));
    assert!(just_null.has_null);
    assert!(!just_null.has_undefined);
    assert!(just_null.is_optional());
    assert!(!just_null.is_ambiguous());

    let both = nullishness(&union(vec![IrType::INT, IrType::NULL, IrType::UNDEFINED]));
    assert!(both.is_ambiguous());

    let none = nullishness(&IrType::INT);
    assert!(!none.is_optional());
}
