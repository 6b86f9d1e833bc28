use deepcopy::{
    ArrayValue, Category, Complex32, Complex64, CopyErrorKind, Field, ListValue, MapValue,
    PointerValue, Shape, StructValue, Uintptr, UnsupportedKind, Value, assert_same, builtins,
    category, deep_copy, deep_copy_as, deep_copy_or_default, deep_copy_value, is_copyable,
    is_detached, shape_category,
};
use deepcopy_testhelpers::IPanic;

static INTS: Shape = Shape::list("[]i64", || &builtins::I64);
static GRID: Shape = Shape::array("[2][3]i64", 2, || &ROW);
static ROW: Shape = Shape::array("[3]i64", 3, || &builtins::I64);

static POINT_FIELDS: [Field; 2] = [
    Field::new("x", || &builtins::F64),
    Field::new("y", || &builtins::F64),
];
static POINT: Shape = Shape::record("Point", &POINT_FIELDS);
static POINT_PTR: Shape = Shape::pointer("*Point", || &POINT);
static ROUTES: Shape = Shape::map("map[String][]*Point", || &builtins::STRING, || &PATH);
static PATH: Shape = Shape::list("[]*Point", || &POINT_PTR);

fn point(x: f64, y: f64) -> Value {
    Value::Pointer(PointerValue::new(
        &POINT_PTR,
        Value::Struct(StructValue::new(&POINT, vec![x.into(), y.into()])),
    ))
}

#[test]
fn leaves_copy_to_equal_values() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let leaves = [
        Value::Bool(true),
        Value::I8(-8),
        Value::I16(-16),
        Value::I32(-32),
        Value::I64(-64),
        Value::Isize(-1),
        Value::U8(8),
        Value::U16(16),
        Value::U32(32),
        Value::U64(64),
        Value::Usize(1),
        Value::F32(0.5),
        Value::F64(f64::NAN),
        Value::Complex32(Complex32::new(1.0, -1.0)),
        Value::Complex64(Complex64::new(0.0, 2.0)),
        Value::Char('λ'),
        Value::from("hello"),
        Value::Uintptr(Uintptr(0xdead_beef)),
        Value::UnsafePointer(core::ptr::null()),
    ];

    for leaf in &leaves {
        assert_eq!(category(leaf), Category::LeafScalar);
        assert!(is_copyable(leaf));
        let copy = deep_copy_value(leaf)?;
        assert_eq!(&copy, leaf);
        assert!(copy.shape().is_shape(leaf.shape()));
    }
    Ok(())
}

#[test]
fn string_copy_owns_its_buffer() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let original = Value::from("hello");
    let copy: String = deep_copy(&original)?;
    assert_eq!(copy, "hello");
    assert_ne!(copy.as_ptr(), original.as_str().unwrap().as_ptr());
    Ok(())
}

#[test]
fn narrowing_to_the_wrong_type_fails() {
    deepcopy_testhelpers::setup();

    let err = deep_copy::<i64>(&Value::from("seven")).unwrap_err();
    assert!(matches!(err.kind, CopyErrorKind::TypeMismatch { .. }));
    insta::assert_snapshot!(err.to_string(), @"Type mismatch: expected i64, got String for String");
}

#[test]
fn copy_as_checks_the_shape() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let original = Value::List(ListValue::from_values(&INTS, vec![Value::I64(1)]));
    let copy = deep_copy_as(&original, &INTS)?;
    assert_eq!(copy.as_list().unwrap().as_slice(), &[Value::I64(1)]);

    let err = deep_copy_as(&original, &ROW).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Type mismatch: expected [3]i64, got []i64 for []i64");
    Ok(())
}

#[test]
fn or_default_swallows_failures() {
    deepcopy_testhelpers::setup();

    let any: &'static Shape = &builtins::ANY;
    assert_eq!(shape_category(any), Category::Unsupported(UnsupportedKind::Dynamic));

    assert_eq!(deep_copy_or_default::<i64>(&Value::I64(3)), 3);
    assert_eq!(deep_copy_or_default::<i64>(&Value::from("x")), 0);
    assert_eq!(deep_copy_or_default::<String>(&Value::Invalid), "");
    assert!(deep_copy_or_default::<Value>(&Value::Invalid).is_invalid());
}

#[test]
fn list_copy_keeps_length_and_capacity() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let mut list = ListValue::with_capacity(&INTS, 16);
    for i in 0..5 {
        list.push(Value::I64(i));
    }
    let original = Value::List(list);

    let copy: ListValue = deep_copy(&original)?;
    let list = original.as_list().unwrap();
    assert_eq!(copy.len(), list.len());
    assert_eq!(copy.capacity(), list.capacity());
    assert_eq!(copy.as_slice(), list.as_slice());

    let empty: ListValue = deep_copy(&INTS.zero_value())?;
    assert!(empty.is_empty());
    Ok(())
}

#[test]
fn nested_arrays_copy_element_wise() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let row = |start: i64| {
        Value::Array(ArrayValue::new(&ROW, (start..start + 3).map(Value::I64).collect()))
    };
    let original = Value::Array(ArrayValue::new(&GRID, vec![row(0), row(3)]));

    let mut copy: ArrayValue = deep_copy(&original)?;
    assert_eq!(copy.len(), 2);
    assert_same!(original, Value::Array(copy.clone()));

    copy.set(0, row(10));
    assert_eq!(
        original.as_array().unwrap().get(0).unwrap().as_array().unwrap().get(0),
        Some(&Value::I64(0))
    );
    Ok(())
}

#[test]
fn map_values_are_deep_copied() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let mut routes = MapValue::new(&ROUTES);
    routes.insert(
        "home".into(),
        Value::List(ListValue::from_values(&PATH, vec![point(0.0, 0.0), point(1.0, 2.0)])),
    );
    routes.insert("empty".into(), PATH.zero_value());
    let original = Value::Map(routes);

    let copy = deep_copy_value(&original)?;
    assert_same!(original, copy);
    assert!(is_detached(&original, &copy));

    let copy = copy.as_map().unwrap();
    let keys: Vec<_> = copy.iter().map(|(k, _)| k.as_str().unwrap()).collect();
    assert_eq!(keys, ["home", "empty"]);

    // moving a point in the original leaves the copy alone
    let home = original.as_map().unwrap().get(&"home".into()).unwrap();
    let first = home.as_list().unwrap().get(0).unwrap().as_pointer().unwrap();
    first
        .target()
        .unwrap()
        .borrow_mut()
        .as_struct_mut()
        .unwrap()
        .set("x", Value::F64(9.0));

    let copied_home = copy.get(&"home".into()).unwrap();
    let copied_first = copied_home.as_list().unwrap().get(0).unwrap().as_pointer().unwrap();
    let copied_first = copied_first.target().unwrap().borrow();
    assert_eq!(copied_first.as_struct().unwrap().get("x"), Some(&Value::F64(0.0)));
    Ok(())
}
