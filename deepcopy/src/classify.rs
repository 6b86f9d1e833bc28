//! Sorting values into what can and cannot be copied.

use core::fmt;

use deepcopy_core::{
    ArrayValue, Def, ListValue, MapValue, PointerValue, Shape, StructValue, Value,
};

/// How a value is treated by the copy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// No substructure: copied by value, bit for bit.
    LeafScalar,
    /// Array, list, map, pointer or struct: rebuilt child by child.
    Composite,
    /// Never copied.
    Unsupported(UnsupportedKind),
}

/// The kinds that are rejected instead of copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedKind {
    /// An open communication channel.
    Channel,
    /// An executable closure.
    Function,
    /// A container whose static type is erased.
    Dynamic,
    /// The absence of a value.
    Invalid,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnsupportedKind::Channel => "channel",
            UnsupportedKind::Function => "function",
            UnsupportedKind::Dynamic => "dynamic value",
            UnsupportedKind::Invalid => "invalid value",
        })
    }
}

/// Returns the category of `value`. Looks at the top level only.
pub fn category(value: &Value) -> Category {
    classify(value).category()
}

/// Returns the category of every value of `shape`.
pub fn shape_category(shape: &Shape) -> Category {
    match shape.def {
        Def::Scalar(_) => Category::LeafScalar,
        Def::Array(_) | Def::List(_) | Def::Map(_) | Def::Pointer(_) | Def::Struct(_) => {
            Category::Composite
        }
        Def::Channel(_) => Category::Unsupported(UnsupportedKind::Channel),
        Def::Function => Category::Unsupported(UnsupportedKind::Function),
        Def::Dynamic => Category::Unsupported(UnsupportedKind::Dynamic),
        Def::Invalid => Category::Unsupported(UnsupportedKind::Invalid),
    }
}

/// A value sorted by category, with composites unwrapped to their payload.
#[derive(Clone, Copy)]
pub(crate) enum Classified<'a> {
    Leaf,
    Array(&'a ArrayValue),
    List(&'a ListValue),
    Map(&'a MapValue),
    Pointer(&'a PointerValue),
    Struct(&'a StructValue),
    Unsupported(UnsupportedKind),
}

impl Classified<'_> {
    pub(crate) fn category(self) -> Category {
        match self {
            Classified::Leaf => Category::LeafScalar,
            Classified::Unsupported(kind) => Category::Unsupported(kind),
            _ => Category::Composite,
        }
    }
}

pub(crate) fn classify(value: &Value) -> Classified<'_> {
    match value {
        Value::Array(v) => Classified::Array(v),
        Value::List(v) => Classified::List(v),
        Value::Map(v) => Classified::Map(v),
        Value::Pointer(v) => Classified::Pointer(v),
        Value::Struct(v) => Classified::Struct(v),
        Value::Channel(_) => Classified::Unsupported(UnsupportedKind::Channel),
        Value::Function(_) => Classified::Unsupported(UnsupportedKind::Function),
        Value::Dynamic(_) => Classified::Unsupported(UnsupportedKind::Dynamic),
        Value::Invalid => Classified::Unsupported(UnsupportedKind::Invalid),
        _ => Classified::Leaf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcopy_core::{ChannelValue, DynamicValue, Field, FunctionValue, builtins};

    static CHAN: Shape = Shape::channel("chan i64", || &builtins::I64);
    static CALLBACK: Shape = Shape::function("func()");
    static INTS: Shape = Shape::list("[]i64", || &builtins::I64);
    static EMPTY_FIELDS: [Field; 0] = [];
    static EMPTY: Shape = Shape::record("Empty", &EMPTY_FIELDS);

    #[test]
    fn scalars_are_leaves() {
        deepcopy_testhelpers::setup();

        for value in [
            Value::Bool(true),
            Value::U8(1),
            Value::F32(1.5),
            Value::from("text"),
            Value::Uintptr(deepcopy_core::Uintptr(0xdead)),
            Value::UnsafePointer(core::ptr::null()),
        ] {
            assert_eq!(category(&value), Category::LeafScalar, "{value:?}");
        }
    }

    #[test]
    fn composites() {
        deepcopy_testhelpers::setup();

        assert_eq!(category(&INTS.zero_value()), Category::Composite);
        assert_eq!(category(&EMPTY.zero_value()), Category::Composite);
        assert_eq!(shape_category(&INTS), Category::Composite);
    }

    #[test]
    fn unsupported_kinds() {
        deepcopy_testhelpers::setup();

        let cases = [
            (Value::Channel(ChannelValue::open(&CHAN)), UnsupportedKind::Channel),
            (
                Value::Function(FunctionValue::new(&CALLBACK, |_| Value::Invalid)),
                UnsupportedKind::Function,
            ),
            (Value::Dynamic(DynamicValue::new(Value::I64(1))), UnsupportedKind::Dynamic),
            (Value::Invalid, UnsupportedKind::Invalid),
        ];
        for (value, kind) in cases {
            assert_eq!(category(&value), Category::Unsupported(kind));
            assert_eq!(shape_category(value.shape()), Category::Unsupported(kind));
        }
    }
}
