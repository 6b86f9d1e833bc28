use std::collections::BTreeMap;

use deepcopy::{
    Field, ListValue, MapValue, PointerValue, Sameness, Shape, StructValue, Value, builtins,
    check_same, deep_copy_value, is_detached,
};
use proptest::prelude::*;

static INTS: Shape = Shape::list("[]i64", || &builtins::I64);
static SCORES: Shape = Shape::map("map[String]i64", || &builtins::STRING, || &builtins::I64);

static CELL_FIELDS: [Field; 2] = [
    Field::new("label", || &builtins::STRING),
    Field::new("next", || &CELL_PTR),
];
static CELL: Shape = Shape::record("Cell", &CELL_FIELDS);
static CELL_PTR: Shape = Shape::pointer("*Cell", || &CELL);
static CELLS: Shape = Shape::list("[]*Cell", || &CELL_PTR);

/// Builds one cell per label, with `next` links given as indices.
fn graph(labels: &[String], links: &[usize]) -> Value {
    let cells: Vec<PointerValue> = labels
        .iter()
        .map(|label| {
            let record = StructValue::new(&CELL, vec![label.as_str().into(), CELL_PTR.zero_value()]);
            PointerValue::new(&CELL_PTR, Value::Struct(record))
        })
        .collect();

    for (cell, &link) in cells.iter().zip(links) {
        let target = cells[link % cells.len()].clone();
        cell.target()
            .unwrap()
            .borrow_mut()
            .as_struct_mut()
            .unwrap()
            .set("next", Value::Pointer(target));
    }

    Value::List(ListValue::from_values(
        &CELLS,
        cells.into_iter().map(Value::Pointer).collect(),
    ))
}

/// Unlinks every cell so the cycles can be freed.
fn unlink(cells: &Value) {
    for cell in cells.as_list().unwrap().as_slice() {
        let slot = cell.as_pointer().unwrap().target().unwrap();
        slot.borrow_mut()
            .as_struct_mut()
            .unwrap()
            .set("next", CELL_PTR.zero_value());
    }
}

proptest! {
    #[test]
    fn list_copy_is_equal_and_detached(items in prop::collection::vec(any::<i64>(), 0..64)) {
        deepcopy_testhelpers::setup();

        let mut original = Value::List(ListValue::from_values(
            &INTS,
            items.iter().copied().map(Value::I64).collect(),
        ));
        let copy = deep_copy_value(&original).unwrap();

        let list = original.as_list().unwrap();
        let copied = copy.as_list().unwrap();
        prop_assert_eq!(copied.as_slice(), list.as_slice());
        prop_assert_eq!(copied.capacity(), list.capacity());

        original.as_list_mut().unwrap().push(Value::I64(0));
        prop_assert_eq!(copy.as_list().unwrap().len(), items.len());
    }

    #[test]
    fn map_copy_keeps_every_pair(
        entries in prop::collection::btree_map("[a-z]{0,8}", any::<i64>(), 0..32)
    ) {
        deepcopy_testhelpers::setup();

        let mut scores = MapValue::new(&SCORES);
        for (key, value) in &entries {
            scores.insert(key.as_str().into(), Value::I64(*value));
        }
        let original = Value::Map(scores);
        let copy = deep_copy_value(&original).unwrap();

        let copied = copy.as_map().unwrap();
        prop_assert_eq!(copied.len(), entries.len());
        let round_trip: BTreeMap<String, i64> = copied
            .iter()
            .map(|(k, v)| (k.as_str().unwrap().to_owned(), v.as_i64().unwrap()))
            .collect();
        prop_assert_eq!(round_trip, entries);
    }

    #[test]
    fn linked_graphs_copy_isomorphically(
        labels in prop::collection::vec("[a-z]{1,4}", 1..24),
        links in prop::collection::vec(any::<usize>(), 0..24),
    ) {
        deepcopy_testhelpers::setup();

        let original = graph(&labels, &links);
        let copy = deep_copy_value(&original).unwrap();

        prop_assert_eq!(check_same(&original, &copy), Sameness::Same);
        prop_assert!(is_detached(&original, &copy));

        // cells that share a target in the original share one in the copy
        let targets = |cells: &Value| -> Vec<Option<usize>> {
            cells
                .as_list()
                .unwrap()
                .as_slice()
                .iter()
                .map(|cell| {
                    let slot = cell.as_pointer().unwrap().target().unwrap().borrow();
                    let next = slot.as_struct().unwrap().get("next").unwrap();
                    next.as_pointer().unwrap().target().map(|t| t.addr())
                })
                .collect()
        };
        let original_targets = targets(&original);
        let copied_targets = targets(&copy);
        for i in 0..labels.len() {
            for j in 0..labels.len() {
                prop_assert_eq!(
                    original_targets[i].is_some() && original_targets[i] == original_targets[j],
                    copied_targets[i].is_some() && copied_targets[i] == copied_targets[j]
                );
            }
        }

        unlink(&original);
        unlink(&copy);
    }
}
