//! Iterative destruction.
//!
//! Every container's `Drop` hands its children to [`drop_all`], which keeps
//! them on a heap-allocated stack instead of letting them drop recursively.

use std::rc::Rc;

use crate::Value;

/// Drops `pending` and everything it owns, one level at a time.
pub(crate) fn drop_all(mut pending: Vec<Value>) {
    while let Some(mut value) = pending.pop() {
        value.take_children(&mut pending);
    }
}

impl Value {
    /// Moves every value this one owns exclusively into `out`, leaving it empty.
    fn take_children(&mut self, out: &mut Vec<Value>) {
        match self {
            Value::Array(v) => out.extend(core::mem::take(&mut v.items).into_vec()),
            Value::List(v) => out.append(&mut v.items),
            Value::Map(v) => {
                for (key, value) in v.entries.drain(..) {
                    out.push(key);
                    out.push(value);
                }
            }
            Value::Struct(v) => out.extend(core::mem::take(&mut v.fields).into_vec()),
            Value::Pointer(v) => {
                if let Some(target) = v.target.take() {
                    target.release_into(out);
                }
            }
            Value::Dynamic(v) => {
                // still shared elsewhere: the last handle tears it down
                if let Some(Ok(inner)) = v.inner.take().map(Rc::try_unwrap) {
                    out.push(inner);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Field, PointerValue, Shape, StructValue, Value, builtins};

    static NODE_FIELDS: [Field; 2] = [
        Field::new("next", || &NODE_PTR),
        Field::new("val", || &builtins::I64),
    ];
    static NODE: Shape = Shape::record("Node", &NODE_FIELDS);
    static NODE_PTR: Shape = Shape::pointer("*Node", || &NODE);

    #[test]
    fn long_chains_drop_without_recursion() {
        deepcopy_testhelpers::setup();

        let mut head = PointerValue::null(&NODE_PTR);
        for i in 0..200_000 {
            let node = StructValue::new(&NODE, vec![Value::Pointer(head), Value::I64(i)]);
            head = PointerValue::new(&NODE_PTR, Value::Struct(node));
        }
        drop(head);
    }

    #[test]
    fn shared_slots_survive_dropping_one_owner() {
        deepcopy_testhelpers::setup();

        let shared = PointerValue::new(&NODE_PTR, NODE.zero_value());
        let owner = StructValue::new(&NODE, vec![Value::Pointer(shared.clone()), Value::I64(1)]);
        drop(owner);

        let target = shared.target().unwrap();
        assert_eq!(target.strong_count(), 1);
        assert!(target.borrow().as_struct().is_some());
    }
}
