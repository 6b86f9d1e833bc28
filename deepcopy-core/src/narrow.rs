use num_complex::{Complex32, Complex64};

use crate::{
    ArrayValue, ChannelValue, DynamicValue, FunctionValue, ListValue, MapValue, PointerValue,
    StructValue, Uintptr, Value,
};

/// Checked conversion from a generic [`Value`] to a static Rust type.
pub trait FromValue: Sized {
    /// Name of the expected type, used when the conversion fails.
    const EXPECTED: &'static str;

    /// Converts `value`, handing it back untouched if it has another type.
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "Value";

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident, $name:literal;)*) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = $name;

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool, "bool";
    i8 => I8, "i8";
    i16 => I16, "i16";
    i32 => I32, "i32";
    i64 => I64, "i64";
    isize => Isize, "isize";
    u8 => U8, "u8";
    u16 => U16, "u16";
    u32 => U32, "u32";
    u64 => U64, "u64";
    usize => Usize, "usize";
    f32 => F32, "f32";
    f64 => F64, "f64";
    Complex32 => Complex32, "Complex<f32>";
    Complex64 => Complex64, "Complex<f64>";
    char => Char, "char";
    String => String, "String";
    Uintptr => Uintptr, "uintptr";
    *const () => UnsafePointer, "*const ()";
    ArrayValue => Array, "array";
    ListValue => List, "list";
    MapValue => Map, "map";
    PointerValue => Pointer, "pointer";
    StructValue => Struct, "struct";
    ChannelValue => Channel, "channel";
    FunctionValue => Function, "function";
    DynamicValue => Dynamic, "dynamic value";
}
