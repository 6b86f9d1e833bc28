use core::fmt;

use indexmap::IndexMap;

use crate::{Def, MapDef, Shape, Value};

use super::{assert_shape, teardown};

#[track_caller]
fn map_def(shape: &'static Shape) -> MapDef {
    match shape.def {
        Def::Map(md) => md,
        _ => panic!("{shape} is not a map shape"),
    }
}

/// An associative container.
///
/// Iteration follows insertion order, but that order carries no meaning:
/// two maps are equal when they hold the same pairs.
#[derive(Clone)]
pub struct MapValue {
    pub(crate) shape: &'static Shape,
    pub(crate) entries: IndexMap<Value, Value>,
}

impl MapValue {
    /// Builds an empty map.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a map shape.
    #[track_caller]
    pub fn new(shape: &'static Shape) -> Self {
        Self::with_capacity(shape, 0)
    }

    /// Builds an empty map with room for `capacity` entries.
    #[track_caller]
    pub fn with_capacity(shape: &'static Shape, capacity: usize) -> Self {
        map_def(shape);
        Self {
            shape,
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Returns the shape of this map.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Returns the key and value shapes.
    pub fn def(&self) -> MapDef {
        map_def(self.shape)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a pair, returning the value previously stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key or the value has the wrong shape.
    #[track_caller]
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let md = self.def();
        assert_shape("map key", md.k(), &key);
        assert_shape("map value", md.v(), &value);
        self.entries.insert(key, value)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Removes the pair stored under `key`.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterates over the pairs.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.entries.iter()
    }

    /// The underlying entries.
    pub fn entries(&self) -> &IndexMap<Value, Value> {
        &self.entries
    }
}

impl Drop for MapValue {
    fn drop(&mut self) {
        let mut pending = Vec::with_capacity(self.entries.len() * 2);
        for (key, value) in self.entries.drain(..) {
            pending.push(key);
            pending.push(value);
        }
        teardown::drop_all(pending);
    }
}

impl fmt::Debug for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.shape)?;
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a MapValue {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
