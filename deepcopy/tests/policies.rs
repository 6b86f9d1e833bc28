use deepcopy::{
    ChannelValue, CopyErrorKind, CopyOptions, DynamicValue, Field, FieldAccess, FunctionValue,
    ListValue, MapValue, Shape, StructValue, UnsupportedKind, UnsupportedPolicy, Value, builtins,
    check_same, deep_copy_value, is_detached, is_fully_accessible,
};
use deepcopy_testhelpers::IPanic;

static CHAN: Shape = Shape::channel("chan i64", || &builtins::I64);
static CALLBACK: Shape = Shape::function("func(i64) i64");

static HOLDER_FIELDS: [Field; 2] = [
    Field::new("name", || &builtins::STRING),
    Field::new("inbox", || &CHAN),
];
static HOLDER: Shape = Shape::record("Holder", &HOLDER_FIELDS);

static HANDLERS: Shape = Shape::list("[]func(i64) i64", || &CALLBACK);
static ANYS: Shape = Shape::list("[]any", || &builtins::ANY);

static SECRET_FIELDS: [Field; 2] = [
    Field::new("label", || &builtins::STRING),
    Field::private("inbox", || &CHAN),
];
static SECRET: Shape = Shape::record("Secret", &SECRET_FIELDS);

static KEY_FIELDS: [Field; 2] = [
    Field::new("id", || &builtins::I64),
    Field::private("salt", || &builtins::I64),
];
static KEY: Shape = Shape::record("Key", &KEY_FIELDS);
static NAMES: Shape = Shape::map("map[Key]String", || &KEY, || &builtins::STRING);

fn holder() -> Value {
    Value::Struct(StructValue::new(
        &HOLDER,
        vec!["mailbox".into(), Value::Channel(ChannelValue::open(&CHAN))],
    ))
}

#[test]
fn nested_channel_fails_with_its_location() {
    deepcopy_testhelpers::setup();

    let err = deep_copy_value(&holder()).unwrap_err();
    assert!(matches!(
        err.kind,
        CopyErrorKind::Unsupported {
            kind: UnsupportedKind::Channel,
            ..
        }
    ));
    insta::assert_snapshot!(err.to_string(), @"Unsupported kind channel (chan i64) for Holder at inbox");
}

#[test]
fn nested_function_fails_with_its_location() {
    deepcopy_testhelpers::setup();

    let double = FunctionValue::new(&CALLBACK, |args| match args {
        [Value::I64(n)] => Value::I64(n * 2),
        _ => Value::Invalid,
    });
    let handlers = Value::List(ListValue::from_values(
        &HANDLERS,
        vec![Value::Function(FunctionValue::nil(&CALLBACK)), Value::Function(double)],
    ));

    let err = deep_copy_value(&handlers).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Unsupported kind function (func(i64) i64) for []func(i64) i64 at [0]");
}

#[test]
fn unsupported_root_fails_under_every_policy() {
    deepcopy_testhelpers::setup();

    let roots = [
        Value::Channel(ChannelValue::nil(&CHAN)),
        Value::Function(FunctionValue::nil(&CALLBACK)),
        Value::Dynamic(DynamicValue::new(Value::I64(1))),
        Value::Invalid,
    ];
    let share = CopyOptions::new().on_unsupported(UnsupportedPolicy::Share);

    for root in &roots {
        for options in [CopyOptions::new(), share.clone()] {
            let err = options.copy_value(root).unwrap_err();
            assert!(
                matches!(err.kind, CopyErrorKind::Unsupported { .. }),
                "{root:?} under {options:?}: {err}"
            );
            assert!(err.path.is_empty());
        }
    }
}

#[test]
fn share_policy_reuses_handles() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let original = holder();
    let copy = CopyOptions::new()
        .on_unsupported(UnsupportedPolicy::Share)
        .copy_value(&original)?;

    let original_inbox = original.as_struct().unwrap().get("inbox").unwrap();
    let copied_inbox = copy.as_struct().unwrap().get("inbox").unwrap();
    assert!(
        original_inbox
            .as_channel()
            .unwrap()
            .same_handle(copied_inbox.as_channel().unwrap())
    );
    assert_eq!(copy.as_struct().unwrap().get("name").and_then(Value::as_str), Some("mailbox"));
    assert!(!is_detached(&original, &copy));

    // both ends see the same queue
    original_inbox.as_channel().unwrap().send(Value::I64(9)).unwrap();
    assert_eq!(copied_inbox.as_channel().unwrap().recv(), Some(Value::I64(9)));

    // closing through the copy closes the original too
    original_inbox.as_channel().unwrap().send(Value::I64(10)).unwrap();
    copied_inbox.as_channel().unwrap().close();
    assert_eq!(
        original_inbox.as_channel().unwrap().send(Value::I64(11)),
        Err(Value::I64(11))
    );
    assert_eq!(original_inbox.as_channel().unwrap().recv(), Some(Value::I64(10)));
    assert_eq!(copied_inbox.as_channel().unwrap().recv(), None);
    Ok(())
}

#[test]
fn share_policy_keeps_functions_callable() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let double = FunctionValue::new(&CALLBACK, |args| match args {
        [Value::I64(n)] => Value::I64(n * 2),
        _ => Value::Invalid,
    });
    let original = Value::List(ListValue::from_values(
        &HANDLERS,
        vec![Value::Function(double), Value::Function(FunctionValue::nil(&CALLBACK))],
    ));

    let copy = CopyOptions::new()
        .on_unsupported(UnsupportedPolicy::Share)
        .copy_value(&original)?;
    let copied = copy.as_list().unwrap();
    let handlers = original.as_list().unwrap();

    let copied_double = copied.get(0).and_then(Value::as_function).unwrap();
    assert!(copied_double.same_handle(handlers.get(0).and_then(Value::as_function).unwrap()));
    assert_eq!(copied_double.call(&[Value::I64(21)]), Some(Value::I64(42)));

    let copied_nil = copied.get(1).and_then(Value::as_function).unwrap();
    assert_eq!(copied_nil.call(&[Value::I64(21)]), None);
    Ok(())
}

#[test]
fn share_policy_keeps_dynamic_values() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let original = Value::List(ListValue::from_values(
        &ANYS,
        vec![
            Value::Dynamic(DynamicValue::new("boxed".into())),
            Value::Dynamic(DynamicValue::nil()),
        ],
    ));

    let copy = CopyOptions::new()
        .on_unsupported(UnsupportedPolicy::Share)
        .copy_value(&original)?;
    assert_eq!(copy, original);

    // the erased value itself is shared, not duplicated
    let dynamics = |list: &Value| -> Vec<DynamicValue> {
        let list = list.as_list().unwrap();
        list.as_slice()
            .iter()
            .map(|v| v.as_dynamic().unwrap().clone())
            .collect()
    };
    for (original, copied) in dynamics(&original).iter().zip(&dynamics(&copy)) {
        assert!(original.same_handle(copied));
    }
    assert!(!is_detached(&original, &copy));

    let err = deep_copy_value(&original).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Unsupported kind dynamic value (any) for []any at [0]");
    Ok(())
}

#[test]
fn private_unsupported_field_is_skipped_by_default() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let original = Value::Struct(StructValue::new(
        &SECRET,
        vec!["sealed".into(), Value::Channel(ChannelValue::open(&CHAN))],
    ));

    // the private channel is never visited, so the copy succeeds
    let copy = deep_copy_value(&original)?;
    let inbox = copy.as_struct().unwrap().get("inbox").unwrap();
    assert!(inbox.as_channel().unwrap().is_nil());
    assert!(is_detached(&original, &copy));
    assert!(!is_fully_accessible(&original));

    let err = CopyOptions::new()
        .field_access(FieldAccess::All)
        .copy_value(&original)
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Unsupported kind channel (chan i64) for Secret at inbox");
    Ok(())
}

#[test]
fn keys_equal_only_after_dropping_private_fields_collide() -> Result<(), IPanic> {
    deepcopy_testhelpers::setup();

    let key = |id: i64, salt: i64| {
        Value::Struct(StructValue::new(&KEY, vec![Value::I64(id), Value::I64(salt)]))
    };
    let mut names = MapValue::new(&NAMES);
    names.insert(key(1, 1), "a".into());
    names.insert(key(1, 2), "b".into());
    let original = Value::Map(names);

    // without the salt both keys copy to Key { id: 1, salt: 0 }
    let err = deep_copy_value(&original).unwrap_err();
    assert!(matches!(err.kind, CopyErrorKind::KeyCollision { .. }));
    insta::assert_snapshot!(err.to_string(), @"Distinct keys of map[Key]String collide in the copy for map[Key]String at [key#1]");

    let copy = CopyOptions::new()
        .field_access(FieldAccess::All)
        .copy_value(&original)?;
    assert_eq!(copy.as_map().unwrap().len(), 2);
    assert!(check_same(&original, &copy).is_same());
    assert_eq!(copy.as_map().unwrap().get(&key(1, 2)).and_then(Value::as_str), Some("b"));
    Ok(())
}
