use core::fmt;

use crate::ScalarType;

/// Describes the structure of a runtime type.
///
/// Shapes are always used as `&'static Shape` and compared by address: two
/// values have the same type exactly when they point at the same shape.
#[derive(Debug)]
pub struct Shape {
    /// Human-readable name of the type, e.g. `"Node"` or `"[]i64"`.
    pub type_identifier: &'static str,

    /// What kind of type this is, and where its children live.
    pub def: Def,
}

/// The structural kind of a [`Shape`].
#[derive(Debug, Clone, Copy)]
pub enum Def {
    /// A value with no substructure.
    Scalar(ScalarType),
    /// A fixed-length sequence.
    Array(ArrayDef),
    /// A growable sequence with a capacity.
    List(ListDef),
    /// An associative container.
    Map(MapDef),
    /// A nullable reference to a shared slot.
    Pointer(PointerDef),
    /// A record with named fields in declared order.
    Struct(StructDef),
    /// A communication channel.
    Channel(ChannelDef),
    /// An executable closure.
    Function,
    /// A container whose static type is erased.
    Dynamic,
    /// The absence of a value.
    Invalid,
}

/// Element type and length of a fixed-size array.
#[derive(Debug, Clone, Copy)]
pub struct ArrayDef {
    /// Shape of the elements.
    pub t: fn() -> &'static Shape,
    /// Number of elements.
    pub n: usize,
}

impl ArrayDef {
    /// Returns the element shape.
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Element type of a list.
#[derive(Debug, Clone, Copy)]
pub struct ListDef {
    /// Shape of the elements.
    pub t: fn() -> &'static Shape,
}

impl ListDef {
    /// Returns the element shape.
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Key and value types of a map.
#[derive(Debug, Clone, Copy)]
pub struct MapDef {
    /// Shape of the keys.
    pub k: fn() -> &'static Shape,
    /// Shape of the values.
    pub v: fn() -> &'static Shape,
}

impl MapDef {
    /// Returns the key shape.
    pub fn k(&self) -> &'static Shape {
        (self.k)()
    }

    /// Returns the value shape.
    pub fn v(&self) -> &'static Shape {
        (self.v)()
    }
}

/// Target type of a pointer.
#[derive(Debug, Clone, Copy)]
pub struct PointerDef {
    /// Shape of the pointee.
    pub pointee: fn() -> &'static Shape,
}

impl PointerDef {
    /// Returns the pointee shape.
    pub fn pointee(&self) -> &'static Shape {
        (self.pointee)()
    }
}

/// Fields of a record.
#[derive(Debug, Clone, Copy)]
pub struct StructDef {
    /// Fields in declared order.
    pub fields: &'static [Field],
}

/// Element type of a channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelDef {
    /// Shape of the values carried by the channel.
    pub t: fn() -> &'static Shape,
}

impl ChannelDef {
    /// Returns the element shape.
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Whether a field can be read from outside the type that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Externally visible.
    Public,
    /// Only visible to the declaring type.
    Private,
}

/// A named field of a record.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Name of the field.
    pub name: &'static str,

    /// Shape of the field, behind a function so records can refer to themselves.
    pub shape: fn() -> &'static Shape,

    /// Whether the field is externally visible.
    pub visibility: Visibility,
}

impl Field {
    /// Declares an externally visible field.
    pub const fn new(name: &'static str, shape: fn() -> &'static Shape) -> Self {
        Self {
            name,
            shape,
            visibility: Visibility::Public,
        }
    }

    /// Declares a field that is only visible to its own type.
    pub const fn private(name: &'static str, shape: fn() -> &'static Shape) -> Self {
        Self {
            name,
            shape,
            visibility: Visibility::Private,
        }
    }

    /// Returns the shape of this field.
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }

    /// Returns true if the field is externally visible.
    pub const fn is_visible(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }
}

impl Shape {
    /// Shape of a scalar type.
    pub const fn scalar(type_identifier: &'static str, scalar: ScalarType) -> Self {
        Self {
            type_identifier,
            def: Def::Scalar(scalar),
        }
    }

    /// Shape of a fixed-size array of `n` elements.
    pub const fn array(type_identifier: &'static str, n: usize, t: fn() -> &'static Shape) -> Self {
        Self {
            type_identifier,
            def: Def::Array(ArrayDef { t, n }),
        }
    }

    /// Shape of a growable list.
    pub const fn list(type_identifier: &'static str, t: fn() -> &'static Shape) -> Self {
        Self {
            type_identifier,
            def: Def::List(ListDef { t }),
        }
    }

    /// Shape of a map.
    pub const fn map(
        type_identifier: &'static str,
        k: fn() -> &'static Shape,
        v: fn() -> &'static Shape,
    ) -> Self {
        Self {
            type_identifier,
            def: Def::Map(MapDef { k, v }),
        }
    }

    /// Shape of a nullable pointer.
    pub const fn pointer(type_identifier: &'static str, pointee: fn() -> &'static Shape) -> Self {
        Self {
            type_identifier,
            def: Def::Pointer(PointerDef { pointee }),
        }
    }

    /// Shape of a record.
    pub const fn record(type_identifier: &'static str, fields: &'static [Field]) -> Self {
        Self {
            type_identifier,
            def: Def::Struct(StructDef { fields }),
        }
    }

    /// Shape of a channel.
    pub const fn channel(type_identifier: &'static str, t: fn() -> &'static Shape) -> Self {
        Self {
            type_identifier,
            def: Def::Channel(ChannelDef { t }),
        }
    }

    /// Shape of a closure.
    pub const fn function(type_identifier: &'static str) -> Self {
        Self {
            type_identifier,
            def: Def::Function,
        }
    }

    /// Check if this shape is the given shape.
    #[inline]
    pub fn is_shape(&self, other: &Shape) -> bool {
        core::ptr::eq(self, other)
    }

    /// Returns the fields of a record shape, or an empty slice.
    pub fn fields(&self) -> &'static [Field] {
        match self.def {
            Def::Struct(sd) => sd.fields,
            _ => &[],
        }
    }

    /// Looks up a record field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    /// Returns true if the shape is a scalar.
    pub const fn is_scalar(&self) -> bool {
        matches!(self.def, Def::Scalar(_))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_identifier)
    }
}
