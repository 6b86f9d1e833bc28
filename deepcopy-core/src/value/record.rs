use core::fmt;

use crate::{Def, Field, Shape, Value};

use super::{assert_shape, teardown};

#[track_caller]
fn struct_fields(shape: &'static Shape) -> &'static [Field] {
    match shape.def {
        Def::Struct(sd) => sd.fields,
        _ => panic!("{shape} is not a struct shape"),
    }
}

/// A record: one value per declared field, in declared order.
#[derive(Clone)]
pub struct StructValue {
    pub(crate) shape: &'static Shape,
    pub(crate) fields: Box<[Value]>,
}

impl StructValue {
    /// Builds a record from its field values, in declared order.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a struct shape, if the number of values does
    /// not match the number of fields, or if a value has the wrong shape.
    #[track_caller]
    pub fn new(shape: &'static Shape, values: Vec<Value>) -> Self {
        let fields = struct_fields(shape);
        assert_eq!(
            values.len(),
            fields.len(),
            "{shape} has {} fields",
            fields.len()
        );
        for (field, value) in fields.iter().zip(&values) {
            assert_shape(field.name, field.shape(), value);
        }
        Self {
            shape,
            fields: values.into_boxed_slice(),
        }
    }

    /// Builds a record whose fields all hold their zero value.
    #[track_caller]
    pub fn zeroed(shape: &'static Shape) -> Self {
        let fields = struct_fields(shape);
        Self {
            shape,
            fields: fields.iter().map(|f| f.shape().zero_value()).collect(),
        }
    }

    /// Returns the shape of this record.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// The declared fields.
    pub fn field_defs(&self) -> &'static [Field] {
        struct_fields(self.shape)
    }

    /// Returns the value of the field called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.shape.field_index(name)?;
        self.fields.get(index)
    }

    /// Returns the value of the field called `name`, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let index = self.shape.field_index(name)?;
        self.fields.get_mut(index)
    }

    /// Replaces the value of the field called `name`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if there is no such field or `value` has the wrong shape.
    #[track_caller]
    pub fn set(&mut self, name: &str, value: Value) -> Value {
        let Some(index) = self.shape.field_index(name) else {
            panic!("{} has no field named {name}", self.shape);
        };
        let field = &self.field_defs()[index];
        assert_shape(field.name, field.shape(), &value);
        core::mem::replace(&mut self.fields[index], value)
    }

    /// Field values, in declared order.
    pub fn values(&self) -> &[Value] {
        &self.fields
    }

    /// Iterates over declared fields alongside their values.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Field, &Value)> {
        self.field_defs().iter().zip(self.fields.iter())
    }

    /// Mutable access to the field slots. Writes are not shape-checked.
    pub fn slots_mut(&mut self) -> &mut [Value] {
        &mut self.fields
    }
}

impl Drop for StructValue {
    fn drop(&mut self) {
        teardown::drop_all(core::mem::take(&mut self.fields).into_vec());
    }
}

impl fmt::Debug for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.shape.type_identifier);
        for (field, value) in self.iter() {
            s.field(field.name, value);
        }
        s.finish()
    }
}
