use core::fmt;

use crate::{ArrayDef, Def, ListDef, Shape, Value};

use super::{assert_shape, teardown};

#[track_caller]
fn array_def(shape: &'static Shape) -> ArrayDef {
    match shape.def {
        Def::Array(ad) => ad,
        _ => panic!("{shape} is not an array shape"),
    }
}

#[track_caller]
fn list_def(shape: &'static Shape) -> ListDef {
    match shape.def {
        Def::List(ld) => ld,
        _ => panic!("{shape} is not a list shape"),
    }
}

/// A fixed-length sequence.
#[derive(Clone)]
pub struct ArrayValue {
    pub(crate) shape: &'static Shape,
    pub(crate) items: Box<[Value]>,
}

impl ArrayValue {
    /// Builds an array from its elements.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not an array shape, if the number of elements does
    /// not match its length, or if an element has the wrong shape.
    #[track_caller]
    pub fn new(shape: &'static Shape, items: Vec<Value>) -> Self {
        let ad = array_def(shape);
        assert_eq!(items.len(), ad.n, "{shape} holds exactly {} elements", ad.n);
        let t = ad.t();
        for item in &items {
            assert_shape("array element", t, item);
        }
        Self {
            shape,
            items: items.into_boxed_slice(),
        }
    }

    /// Builds an array whose slots all hold [`Value::Invalid`], to be written
    /// through [`ArrayValue::slots_mut`].
    #[track_caller]
    pub fn with_slots(shape: &'static Shape) -> Self {
        let ad = array_def(shape);
        Self {
            shape,
            items: (0..ad.n).map(|_| Value::Invalid).collect(),
        }
    }

    /// Returns the shape of this array.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Returns the element shape.
    pub fn element_shape(&self) -> &'static Shape {
        array_def(self.shape).t()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or `value` has the wrong shape.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: Value) -> Value {
        assert_shape("array element", self.element_shape(), &value);
        core::mem::replace(&mut self.items[index], value)
    }

    /// The elements, in order.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Mutable access to the element slots. Writes are not shape-checked.
    pub fn slots_mut(&mut self) -> &mut [Value] {
        &mut self.items
    }
}

impl Drop for ArrayValue {
    fn drop(&mut self) {
        teardown::drop_all(core::mem::take(&mut self.items).into_vec());
    }
}

impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.shape)?;
        f.debug_list().entries(self.items.iter()).finish()
    }
}

/// A growable sequence.
///
/// Capacity is part of the observable state and survives a deep copy.
#[derive(Clone)]
pub struct ListValue {
    pub(crate) shape: &'static Shape,
    pub(crate) items: Vec<Value>,
}

impl ListValue {
    /// Builds an empty list.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a list shape.
    #[track_caller]
    pub fn new(shape: &'static Shape) -> Self {
        Self::with_capacity(shape, 0)
    }

    /// Builds an empty list with room for `capacity` elements.
    #[track_caller]
    pub fn with_capacity(shape: &'static Shape, capacity: usize) -> Self {
        list_def(shape);
        Self {
            shape,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Builds a list from its elements.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a list shape or an element has the wrong shape.
    #[track_caller]
    pub fn from_values(shape: &'static Shape, items: Vec<Value>) -> Self {
        let t = list_def(shape).t();
        for item in &items {
            assert_shape("list element", t, item);
        }
        Self { shape, items }
    }

    /// Builds a list of `len` slots holding [`Value::Invalid`], with exactly
    /// `capacity` room (or `len`, if larger). Slots are written through
    /// [`ListValue::slots_mut`].
    #[track_caller]
    pub fn with_slots(shape: &'static Shape, len: usize, capacity: usize) -> Self {
        list_def(shape);
        let mut items = Vec::with_capacity(capacity.max(len));
        items.resize_with(len, Value::default);
        Self { shape, items }
    }

    /// Returns the shape of this list.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Returns the element shape.
    pub fn element_shape(&self) -> &'static Shape {
        list_def(self.shape).t()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements the list can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Appends an element.
    ///
    /// # Panics
    ///
    /// Panics if `value` has the wrong shape.
    #[track_caller]
    pub fn push(&mut self, value: Value) {
        assert_shape("list element", self.element_shape(), &value);
        self.items.push(value);
    }

    /// Removes the last element.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or `value` has the wrong shape.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: Value) -> Value {
        assert_shape("list element", self.element_shape(), &value);
        core::mem::replace(&mut self.items[index], value)
    }

    /// The elements, in order.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Mutable access to the element slots. Writes are not shape-checked.
    pub fn slots_mut(&mut self) -> &mut [Value] {
        &mut self.items
    }
}

impl Drop for ListValue {
    fn drop(&mut self) {
        teardown::drop_all(core::mem::take(&mut self.items));
    }
}

impl fmt::Debug for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.shape)?;
        f.debug_list().entries(self.items.iter()).finish()
    }
}
