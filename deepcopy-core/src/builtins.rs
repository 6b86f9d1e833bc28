//! Shapes of the builtin types.

use crate::{Def, ScalarType, Shape};

macro_rules! scalar_shapes {
    ($($name:ident => $ident:literal, $scalar:ident;)*) => {
        $(
            #[doc = concat!("Shape of `", $ident, "`.")]
            pub static $name: Shape = Shape::scalar($ident, ScalarType::$scalar);
        )*
    };
}

scalar_shapes! {
    BOOL => "bool", Bool;
    I8 => "i8", I8;
    I16 => "i16", I16;
    I32 => "i32", I32;
    I64 => "i64", I64;
    ISIZE => "isize", Isize;
    U8 => "u8", U8;
    U16 => "u16", U16;
    U32 => "u32", U32;
    U64 => "u64", U64;
    USIZE => "usize", Usize;
    F32 => "f32", F32;
    F64 => "f64", F64;
    COMPLEX32 => "Complex<f32>", Complex32;
    COMPLEX64 => "Complex<f64>", Complex64;
    CHAR => "char", Char;
    STRING => "String", String;
    UINTPTR => "uintptr", Uintptr;
    UNSAFE_POINTER => "*const ()", UnsafePointer;
}

/// Shape of a dynamic, type-erased container.
pub static ANY: Shape = Shape {
    type_identifier: "any",
    def: Def::Dynamic,
};

/// Shape of the absence of a value.
pub static INVALID: Shape = Shape {
    type_identifier: "<invalid>",
    def: Def::Invalid,
};
