//! Runtime values.

use core::hash::{Hash, Hasher};

use num_complex::{Complex32, Complex64};

use crate::{Def, ScalarType, Shape, Uintptr, builtins};

mod map;
mod opaque;
mod pointer;
mod record;
mod sequence;
mod teardown;

pub use map::MapValue;
pub use opaque::{Channel, ChannelValue, DynamicValue, FunctionValue, NativeFn};
pub use pointer::{PointerValue, Ref};
pub use record::StructValue;
pub use sequence::{ArrayValue, ListValue};

/// A typed datum, as observed by introspection.
///
/// `Clone` has assignment semantics: composites are duplicated one level at a
/// time and every [`Ref`], channel and function handle is shared, never copied.
/// Use the `deepcopy` crate for a detached copy.
///
/// Equality and hashing follow the same rules: scalars compare by value (floats
/// bitwise), sequences, maps and records compare element-wise, and reference-like
/// payloads compare by identity. This is also what map keys use.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// `bool`
    Bool(bool),
    /// `i8`
    I8(i8),
    /// `i16`
    I16(i16),
    /// `i32`
    I32(i32),
    /// `i64`
    I64(i64),
    /// `isize`
    Isize(isize),
    /// `u8`
    U8(u8),
    /// `u16`
    U16(u16),
    /// `u32`
    U32(u32),
    /// `u64`
    U64(u64),
    /// `usize`
    Usize(usize),
    /// `f32`
    F32(f32),
    /// `f64`
    F64(f64),
    /// Complex number with `f32` parts.
    Complex32(Complex32),
    /// Complex number with `f64` parts.
    Complex64(Complex64),
    /// `char`
    Char(char),
    /// An owned text string.
    String(String),
    /// A pointer-sized integer.
    Uintptr(Uintptr),
    /// An opaque machine address.
    UnsafePointer(*const ()),
    /// A fixed-length sequence.
    Array(ArrayValue),
    /// A growable sequence.
    List(ListValue),
    /// An associative container.
    Map(MapValue),
    /// A nullable reference to a shared slot.
    Pointer(PointerValue),
    /// A record.
    Struct(StructValue),
    /// A communication channel.
    Channel(ChannelValue),
    /// An executable closure.
    Function(FunctionValue),
    /// A type-erased container.
    Dynamic(DynamicValue),
    /// The absence of a value.
    #[default]
    Invalid,
}

impl Value {
    /// Returns the shape of this value.
    pub fn shape(&self) -> &'static Shape {
        if let Some(scalar) = self.scalar_type() {
            return scalar.shape();
        }
        match self {
            Value::Array(v) => v.shape(),
            Value::List(v) => v.shape(),
            Value::Map(v) => v.shape(),
            Value::Pointer(v) => v.shape(),
            Value::Struct(v) => v.shape(),
            Value::Channel(v) => v.shape(),
            Value::Function(v) => v.shape(),
            Value::Dynamic(_) => &builtins::ANY,
            _ => &builtins::INVALID,
        }
    }

    /// Returns the scalar type of this value, if it is a scalar.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        Some(match self {
            Value::Bool(_) => ScalarType::Bool,
            Value::I8(_) => ScalarType::I8,
            Value::I16(_) => ScalarType::I16,
            Value::I32(_) => ScalarType::I32,
            Value::I64(_) => ScalarType::I64,
            Value::Isize(_) => ScalarType::Isize,
            Value::U8(_) => ScalarType::U8,
            Value::U16(_) => ScalarType::U16,
            Value::U32(_) => ScalarType::U32,
            Value::U64(_) => ScalarType::U64,
            Value::Usize(_) => ScalarType::Usize,
            Value::F32(_) => ScalarType::F32,
            Value::F64(_) => ScalarType::F64,
            Value::Complex32(_) => ScalarType::Complex32,
            Value::Complex64(_) => ScalarType::Complex64,
            Value::Char(_) => ScalarType::Char,
            Value::String(_) => ScalarType::String,
            Value::Uintptr(_) => ScalarType::Uintptr,
            Value::UnsafePointer(_) => ScalarType::UnsafePointer,
            _ => return None,
        })
    }

    /// Returns true for [`Value::Invalid`].
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid)
    }

    /// Returns the text if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! payload_accessors {
    ($($variant:ident($ty:ty) => $as_ref:ident, $as_mut:ident;)*) => {
        impl Value {
            $(
                #[doc = concat!("Returns the payload if this is a [`Value::", stringify!($variant), "`].")]
                pub fn $as_ref(&self) -> Option<&$ty> {
                    match self {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                #[doc = concat!("Returns the payload mutably if this is a [`Value::", stringify!($variant), "`].")]
                pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

payload_accessors! {
    Array(ArrayValue) => as_array, as_array_mut;
    List(ListValue) => as_list, as_list_mut;
    Map(MapValue) => as_map, as_map_mut;
    Pointer(PointerValue) => as_pointer, as_pointer_mut;
    Struct(StructValue) => as_struct, as_struct_mut;
    Channel(ChannelValue) => as_channel, as_channel_mut;
    Function(FunctionValue) => as_function, as_function_mut;
    Dynamic(DynamicValue) => as_dynamic, as_dynamic_mut;
}

macro_rules! from_scalar {
    ($($ty:ty => $variant:ident,)*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Complex32 => Complex32,
    Complex64 => Complex64,
    char => Char,
    String => String,
    Uintptr => Uintptr,
    *const () => UnsafePointer,
    ArrayValue => Array,
    ListValue => List,
    MapValue => Map,
    PointerValue => Pointer,
    StructValue => Struct,
    ChannelValue => Channel,
    FunctionValue => Function,
    DynamicValue => Dynamic,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::Isize(a), Value::Isize(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::Usize(a), Value::Usize(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Complex32(a), Value::Complex32(b)) => {
                a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
            }
            (Value::Complex64(a), Value::Complex64(b)) => {
                a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
            }
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Uintptr(a), Value::Uintptr(b)) => a == b,
            (Value::UnsafePointer(a), Value::UnsafePointer(b)) => core::ptr::eq(*a, *b),
            (Value::Array(a), Value::Array(b)) => {
                a.shape().is_shape(b.shape()) && a.as_slice() == b.as_slice()
            }
            (Value::List(a), Value::List(b)) => {
                a.shape().is_shape(b.shape()) && a.as_slice() == b.as_slice()
            }
            (Value::Map(a), Value::Map(b)) => {
                a.shape().is_shape(b.shape()) && a.entries() == b.entries()
            }
            (Value::Struct(a), Value::Struct(b)) => {
                a.shape().is_shape(b.shape()) && a.values() == b.values()
            }
            (Value::Pointer(a), Value::Pointer(b)) => {
                a.shape().is_shape(b.shape()) && a.same_target(b)
            }
            (Value::Channel(a), Value::Channel(b)) => a.same_handle(b),
            (Value::Function(a), Value::Function(b)) => a.same_handle(b),
            (Value::Dynamic(a), Value::Dynamic(b)) => a.inner() == b.inner(),
            (Value::Invalid, Value::Invalid) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(v) => v.hash(state),
            Value::I8(v) => v.hash(state),
            Value::I16(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::Isize(v) => v.hash(state),
            Value::U8(v) => v.hash(state),
            Value::U16(v) => v.hash(state),
            Value::U32(v) => v.hash(state),
            Value::U64(v) => v.hash(state),
            Value::Usize(v) => v.hash(state),
            Value::F32(v) => v.to_bits().hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Complex32(v) => {
                v.re.to_bits().hash(state);
                v.im.to_bits().hash(state);
            }
            Value::Complex64(v) => {
                v.re.to_bits().hash(state);
                v.im.to_bits().hash(state);
            }
            Value::Char(v) => v.hash(state),
            Value::String(v) => v.hash(state),
            Value::Uintptr(v) => v.hash(state),
            Value::UnsafePointer(v) => v.hash(state),
            Value::Array(v) => v.as_slice().hash(state),
            Value::List(v) => v.as_slice().hash(state),
            // entry order is not part of a map's identity
            Value::Map(v) => v.len().hash(state),
            Value::Struct(v) => v.values().hash(state),
            Value::Pointer(v) => v.target().map(Ref::addr).hash(state),
            Value::Channel(v) => v.addr().hash(state),
            Value::Function(v) => v.addr().hash(state),
            Value::Dynamic(v) => v.inner().hash(state),
            Value::Invalid => {}
        }
    }
}

impl Shape {
    /// Builds the zero value of this shape.
    ///
    /// Lists and maps are empty, pointers are null, records and arrays hold
    /// zero values, and channels, functions and dynamic values are nil.
    pub fn zero_value(&'static self) -> Value {
        match self.def {
            Def::Scalar(scalar) => scalar.zero(),
            Def::Array(ad) => {
                let t = ad.t();
                Value::Array(ArrayValue::new(self, (0..ad.n).map(|_| t.zero_value()).collect()))
            }
            Def::List(_) => Value::List(ListValue::new(self)),
            Def::Map(_) => Value::Map(MapValue::new(self)),
            Def::Pointer(_) => Value::Pointer(PointerValue::null(self)),
            Def::Struct(_) => Value::Struct(StructValue::zeroed(self)),
            Def::Channel(_) => Value::Channel(ChannelValue::nil(self)),
            Def::Function => Value::Function(FunctionValue::nil(self)),
            Def::Dynamic => Value::Dynamic(DynamicValue::nil()),
            Def::Invalid => Value::Invalid,
        }
    }
}

#[track_caller]
pub(crate) fn assert_shape(what: &str, expected: &'static Shape, value: &Value) {
    let actual = value.shape();
    assert!(
        expected.is_shape(actual),
        "{what}: expected a value of shape {expected}, got {actual}",
    );
}
