use deepcopy::{
    CopyError, CopyOptions, FieldAccess, Field, ListValue, PointerValue, Shape, StructValue,
    Value, builtins, check_same, deep_copy, is_detached,
};

static NODE_FIELDS: [Field; 2] = [
    Field::new("Next", || &NODE_PTR),
    Field::private("val", || &builtins::I64),
];
static NODE: Shape = Shape::record("Node", &NODE_FIELDS);
static NODE_PTR: Shape = Shape::pointer("*Node", || &NODE);

static INTS: Shape = Shape::list("[]i64", || &builtins::I64);

static EXAMPLE_FIELDS: [Field; 4] = [
    Field::private("flag", || &builtins::BOOL),
    Field::new("Node1", || &NODE),
    Field::new("Node2", || &NODE),
    Field::new("IntSlice", || &INTS),
];
static EXAMPLE: Shape = Shape::record("Example", &EXAMPLE_FIELDS);
static EXAMPLE_PTR: Shape = Shape::pointer("*Example", || &EXAMPLE);

fn node(next: Value, val: i64) -> Value {
    Value::Struct(StructValue::new(&NODE, vec![next, Value::I64(val)]))
}

fn main() -> Result<(), CopyError> {
    let node2 = node(NODE_PTR.zero_value(), 2);
    let node1 = node(
        Value::Pointer(PointerValue::new(&NODE_PTR, node2.clone())),
        1,
    );
    let ints = ListValue::from_values(&INTS, vec![3i64.into(), 4i64.into(), 5i64.into()]);

    let example = StructValue::new(
        &EXAMPLE,
        vec![true.into(), node1, node2, Value::List(ints)],
    );
    let original = PointerValue::new(&EXAMPLE_PTR, Value::Struct(example));
    let original_value = Value::Pointer(original.clone());

    let copy: PointerValue = CopyOptions::new()
        .field_access(FieldAccess::All)
        .copy(&original_value)?;

    println!("Original  {original:?}\n{:#?}\n", original.target().map(|t| t.borrow()));
    println!("Deep copy {copy:?}\n{:#?}\n", copy.target().map(|t| t.borrow()));

    if !original.same_target(&copy) {
        println!("Copy and original live in different slots");
    }
    let copy_value = Value::Pointer(copy.clone());
    if check_same(&original_value, &copy_value).is_same() {
        println!("Copy and original are structurally the same");
    }

    // original.Node1.Next = nil; original.IntSlice = append(original.IntSlice, 100)
    if let Some(slot) = original.target() {
        let mut example = slot.borrow_mut();
        if let Some(example) = example.as_struct_mut() {
            if let Some(node1) = example.get_mut("Node1").and_then(Value::as_struct_mut) {
                node1.set("Next", NODE_PTR.zero_value());
            }
            if let Some(ints) = example.get_mut("IntSlice").and_then(Value::as_list_mut) {
                ints.push(100i64.into());
            }
        }
    }

    let detached = copy.target().is_some_and(|slot| {
        let example = slot.borrow();
        let Some(example) = example.as_struct() else {
            return false;
        };
        let next_is_set = example
            .get("Node1")
            .and_then(Value::as_struct)
            .and_then(|node1| node1.get("Next"))
            .and_then(Value::as_pointer)
            .is_some_and(|next| !next.is_null());
        let len = example.get("IntSlice").and_then(Value::as_list).map(ListValue::len);
        next_is_set && len == Some(3)
    });
    if detached && is_detached(&original_value, &copy_value) {
        println!("\nCopy and original are detached, changing one doesn't affect the other");
        println!("\nOriginal\n{:#?}", original.target().map(|t| t.borrow()));
        println!("Deep copy\n{:#?}", copy.target().map(|t| t.borrow()));
    }

    // with default options private fields are left at zero
    let visible_only: PointerValue = deep_copy(&copy_value)?;
    if let Some(slot) = visible_only.target() {
        let example = slot.borrow();
        let flag = example.as_struct().and_then(|e| e.get("flag")).and_then(Value::as_bool);
        println!("\nflag without private access: {flag:?}");
    }

    Ok(())
}
