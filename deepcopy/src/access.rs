//! Checking whether a copy would see every field.

use hashbrown::HashSet;

use deepcopy_core::Value;

use crate::trace;

/// Returns true if every record field reachable from `value` through records
/// and pointers to records is externally visible.
///
/// Stops at the first private field. Values with no record structure are
/// trivially accessible. A pointer whose target is currently mutably
/// borrowed cannot be inspected, and makes the answer `false`.
pub fn is_fully_accessible(value: &Value) -> bool {
    let mut stack = vec![value];
    let mut seen = HashSet::new();

    while let Some(current) = stack.pop() {
        match current {
            Value::Struct(record) => {
                for (field, value) in record.iter() {
                    if !field.is_visible() {
                        trace!("{}.{} is private", record.shape(), field.name);
                        return false;
                    }
                    if matches!(value, Value::Struct(_) | Value::Pointer(_)) {
                        stack.push(value);
                    }
                }
            }
            Value::Pointer(pointer) => {
                let Some(slot) = pointer.target() else {
                    continue;
                };
                if !seen.insert(slot.addr()) {
                    continue;
                }
                // SAFETY: this traversal never writes to the graph it reads.
                match unsafe { slot.peek_unguarded() } {
                    Ok(target) => {
                        if matches!(target, Value::Struct(_)) {
                            stack.push(target);
                        }
                    }
                    Err(_) => return false,
                }
            }
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcopy_core::{Field, PointerValue, Shape, StructValue, builtins};

    static OPEN_FIELDS: [Field; 2] = [
        Field::new("name", || &builtins::STRING),
        Field::new("inner", || &SEALED_PTR),
    ];
    static OPEN: Shape = Shape::record("Open", &OPEN_FIELDS);
    static SEALED_FIELDS: [Field; 1] = [Field::private("secret", || &builtins::I64)];
    static SEALED: Shape = Shape::record("Sealed", &SEALED_FIELDS);
    static SEALED_PTR: Shape = Shape::pointer("*Sealed", || &SEALED);

    static LOOP_FIELDS: [Field; 1] = [Field::new("next", || &LOOP_PTR)];
    static LOOP: Shape = Shape::record("Loop", &LOOP_FIELDS);
    static LOOP_PTR: Shape = Shape::pointer("*Loop", || &LOOP);

    fn open(inner: PointerValue) -> Value {
        Value::Struct(StructValue::new(
            &OPEN,
            vec![Value::from("o"), Value::Pointer(inner)],
        ))
    }

    #[test]
    fn leaves_are_accessible() {
        deepcopy_testhelpers::setup();
        assert!(is_fully_accessible(&Value::I64(1)));
        assert!(is_fully_accessible(&Value::from("x")));
    }

    #[test]
    fn null_pointer_hides_nothing() {
        deepcopy_testhelpers::setup();
        assert!(is_fully_accessible(&open(PointerValue::null(&SEALED_PTR))));
    }

    #[test]
    fn private_field_behind_pointer_is_found() {
        deepcopy_testhelpers::setup();
        let inner = PointerValue::new(&SEALED_PTR, SEALED.zero_value());
        assert!(!is_fully_accessible(&open(inner)));
    }

    #[test]
    fn cycles_terminate() {
        deepcopy_testhelpers::setup();

        let node = PointerValue::new(&LOOP_PTR, LOOP.zero_value());
        let slot = node.target().unwrap().clone();
        slot.borrow_mut()
            .as_struct_mut()
            .unwrap()
            .set("next", Value::Pointer(node.clone()));

        assert!(is_fully_accessible(&Value::Pointer(node.clone())));

        // break the cycle so the slot is freed
        slot.borrow_mut()
            .as_struct_mut()
            .unwrap()
            .set("next", LOOP_PTR.zero_value());
    }

    #[test]
    fn borrowed_target_is_not_accessible() {
        deepcopy_testhelpers::setup();

        let node = PointerValue::new(&LOOP_PTR, LOOP.zero_value());
        let slot = node.target().unwrap().clone();
        let _guard = slot.borrow_mut();
        assert!(!is_fully_accessible(&Value::Pointer(node.clone())));
    }
}
