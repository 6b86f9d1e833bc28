use core::fmt;

use num_complex::{Complex32, Complex64};

use crate::{Shape, Value, builtins};

/// Every scalar type the value model knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// Complex number with `f32` parts.
    Complex32,
    /// Complex number with `f64` parts.
    Complex64,
    /// `char`
    Char,
    /// `String`
    String,
    /// A pointer-sized integer that happens to hold an address.
    Uintptr,
    /// An opaque machine address with no type information about its target.
    UnsafePointer,
}

impl ScalarType {
    /// Returns the builtin shape for this scalar type.
    pub fn shape(self) -> &'static Shape {
        match self {
            ScalarType::Bool => &builtins::BOOL,
            ScalarType::I8 => &builtins::I8,
            ScalarType::I16 => &builtins::I16,
            ScalarType::I32 => &builtins::I32,
            ScalarType::I64 => &builtins::I64,
            ScalarType::Isize => &builtins::ISIZE,
            ScalarType::U8 => &builtins::U8,
            ScalarType::U16 => &builtins::U16,
            ScalarType::U32 => &builtins::U32,
            ScalarType::U64 => &builtins::U64,
            ScalarType::Usize => &builtins::USIZE,
            ScalarType::F32 => &builtins::F32,
            ScalarType::F64 => &builtins::F64,
            ScalarType::Complex32 => &builtins::COMPLEX32,
            ScalarType::Complex64 => &builtins::COMPLEX64,
            ScalarType::Char => &builtins::CHAR,
            ScalarType::String => &builtins::STRING,
            ScalarType::Uintptr => &builtins::UINTPTR,
            ScalarType::UnsafePointer => &builtins::UNSAFE_POINTER,
        }
    }

    /// Returns the zero value of this scalar type.
    pub fn zero(self) -> Value {
        match self {
            ScalarType::Bool => Value::Bool(false),
            ScalarType::I8 => Value::I8(0),
            ScalarType::I16 => Value::I16(0),
            ScalarType::I32 => Value::I32(0),
            ScalarType::I64 => Value::I64(0),
            ScalarType::Isize => Value::Isize(0),
            ScalarType::U8 => Value::U8(0),
            ScalarType::U16 => Value::U16(0),
            ScalarType::U32 => Value::U32(0),
            ScalarType::U64 => Value::U64(0),
            ScalarType::Usize => Value::Usize(0),
            ScalarType::F32 => Value::F32(0.0),
            ScalarType::F64 => Value::F64(0.0),
            ScalarType::Complex32 => Value::Complex32(Complex32::new(0.0, 0.0)),
            ScalarType::Complex64 => Value::Complex64(Complex64::new(0.0, 0.0)),
            ScalarType::Char => Value::Char('\0'),
            ScalarType::String => Value::String(String::new()),
            ScalarType::Uintptr => Value::Uintptr(Uintptr(0)),
            ScalarType::UnsafePointer => Value::UnsafePointer(core::ptr::null()),
        }
    }
}

/// A pointer-sized integer.
///
/// Copying one duplicates the number, never whatever it may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Uintptr(pub usize);

impl fmt::Display for Uintptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
