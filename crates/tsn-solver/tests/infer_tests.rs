use tsn_binder::registry::{Declaration, TypeRegistry};
use tsn_ir::stmt::{InterfaceDecl, InterfaceMember};
use tsn_ir::types::{IrType, ObjectMember, Parameter};
use tsn_solver::widen::{NumericWidth, literal_fits, tuple_element_context};
use tsn_solver::{infer_lambda_param_types, infer_object_literal, widen_literal, width_of};

fn param(name: &str, ty: Option<IrType>) -> Parameter {
    Parameter {
        name: name.into(),
        ty,
        optional: false,
        default: None,
    }
}

fn fn_type(params: Vec<Parameter>, ret: IrType) -> IrType {
    IrType::Function {
        parameters: params,
        return_type: Box::new(ret),
        type_parameters: vec![],
        is_async: false,
    }
}

fn member(name: &str, ty: IrType) -> ObjectMember {
    ObjectMember {
        name: name.into(),
        ty,
        optional: false,
        readonly: false,
    }
}

#[test]
fn lambda_params_take_contextual_types() {
    let contextual = fn_type(
        vec![param("x", Some(IrType::INT)), param("y", Some(IrType::STRING))],
        IrType::VOID,
    );
    let lambda = vec![param("a", None), param("b", None)];
    let (types, unknown) = infer_lambda_param_types(&lambda, Some(&contextual));
    assert_eq!(types, vec![IrType::INT, IrType::STRING]);
    assert!(unknown.is_empty());
}

#[test]
fn explicit_annotations_beat_context() {
    let contextual = fn_type(vec![param("x", Some(IrType::INT))], IrType::VOID);
    let lambda = vec![param("a", Some(IrType::LONG))];
    let (types, _) = infer_lambda_param_types(&lambda, Some(&contextual));
    assert_eq!(types, vec![IrType::LONG]);
}

#[test]
fn missing_context_yields_unknown() {
    let (types, unknown) = infer_lambda_param_types(&[param("a", None)], None);
    assert_eq!(types, vec![IrType::UNKNOWN]);
    assert_eq!(unknown, vec!["a"]);
}

#[test]
fn object_literal_takes_named_reference_context() {
    let registry = TypeRegistry::new();
    let contextual = IrType::Reference {
        name: "Config".into(),
        type_arguments: vec![IrType::INT],
        structural_members: None,
    };
    let inferred = infer_object_literal(&[member("v", IrType::INT)], Some(&contextual), &registry);
    assert_eq!(inferred, contextual);
}

#[test]
fn object_literal_picks_first_compatible_union_member() {
    let mut registry = TypeRegistry::new();
    registry.insert(
        Declaration::Interface(InterfaceDecl {
            name: "Ok".into(),
            type_parameters: vec![],
            extends: vec![],
            members: vec![InterfaceMember {
                name: "ok".into(),
                ty: IrType::BOOLEAN,
                optional: false,
                readonly: false,
            }],
            is_exported: false,
            json_aot: false,
            span: Default::default(),
        }),
        "m.ts",
    );
    registry.insert(
        Declaration::Interface(InterfaceDecl {
            name: "Err".into(),
            type_parameters: vec![],
            extends: vec![],
            members: vec![InterfaceMember {
                name: "error".into(),
                ty: IrType::STRING,
                optional: false,
                readonly: false,
            }],
            is_exported: false,
            json_aot: false,
            span: Default::default(),
        }),
        "m.ts",
    );

    let contextual = IrType::Union {
        types: vec![IrType::reference("Ok"), IrType::reference("Err")],
    };
    let inferred = infer_object_literal(
        &[member("error", IrType::STRING)],
        Some(&contextual),
        &registry,
    );
    assert_eq!(inferred, IrType::reference("Err"));
}

#[test]
fn object_literal_without_context_synthesises_shape() {
    let registry = TypeRegistry::new();
    let members = vec![member("a", IrType::INT)];
    let inferred = infer_object_literal(&members, None, &registry);
    assert_eq!(
        inferred,
        IrType::Object {
            members,
            index_signature: None,
        }
    );
}

#[test]
fn integer_literal_widens_in_number_context() {
    assert_eq!(widen_literal(42.0, Some(&IrType::NUMBER)), Ok(IrType::NUMBER));
    assert_eq!(widen_literal(42.0, None), Ok(IrType::NUMBER));
}

#[test]
fn integer_literal_keeps_width_in_integer_context() {
    assert_eq!(widen_literal(42.0, Some(&IrType::INT)), Ok(IrType::INT));
    assert_eq!(widen_literal(42.0, Some(&IrType::LONG)), Ok(IrType::LONG));
}

#[test]
fn out_of_range_int_literal_is_rejected() {
    // 2^31 does not fit a 32-bit slot; the caller turns this into TSN5110.
    let err = widen_literal(2_147_483_648.0, Some(&IrType::INT));
    assert_eq!(err, Err(NumericWidth::Int));
    assert!(literal_fits(2_147_483_648.0, NumericWidth::Long));
    assert!(!literal_fits(2_147_483_648.0, NumericWidth::Int));
}

#[test]
fn widths_order_by_widest() {
    assert_eq!(
        NumericWidth::widest(NumericWidth::Int, NumericWidth::Double),
        NumericWidth::Double
    );
    assert_eq!(
        NumericWidth::widest(NumericWidth::Int, NumericWidth::Long),
        NumericWidth::Long
    );
    assert!(NumericWidth::Int.fits_in(NumericWidth::Long));
    assert!(!NumericWidth::Double.fits_in(NumericWidth::Int));
}

#[test]
fn container_context_propagates_to_elements() {
    let arr = IrType::Array {
        element: Box::new(IrType::INT),
        origin: Default::default(),
    };
    assert_eq!(
        tsn_solver::widen::element_context(Some(&arr)),
        Some(&IrType::INT)
    );
    assert_eq!(width_of(&IrType::LONG), Some(NumericWidth::Long));

    let tup = IrType::Tuple {
        elements: vec![IrType::INT, IrType::STRING],
    };
    assert_eq!(tuple_element_context(Some(&tup), 0), Some(&IrType::INT));
    assert_eq!(tuple_element_context(Some(&tup), 1), Some(&IrType::STRING));
    assert_eq!(tuple_element_context(Some(&tup), 2), None);
}
