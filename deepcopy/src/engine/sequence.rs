use deepcopy_core::{ArrayValue, ListValue, Value};

use super::{Engine, Phase};
use crate::{CopyError, PathStep};

impl<'a> Engine<'a> {
    pub(super) fn step_array(
        &mut self,
        top: usize,
        source: &'a ArrayValue,
    ) -> Result<(), CopyError> {
        self.step_sequence(top, source.as_slice(), || {
            Value::Array(ArrayValue::with_slots(source.shape()))
        })
    }

    pub(super) fn step_list(&mut self, top: usize, source: &'a ListValue) -> Result<(), CopyError> {
        self.step_sequence(top, source.as_slice(), || {
            Value::List(ListValue::with_slots(
                source.shape(),
                source.len(),
                source.capacity(),
            ))
        })
    }

    /// Arrays and lists: allocate every slot up front, then fill slot
    /// `cursor` each time an element's copy comes back.
    fn step_sequence(
        &mut self,
        top: usize,
        elements: &'a [Value],
        allocate: impl FnOnce() -> Value,
    ) -> Result<(), CopyError> {
        if self.work[top].phase == Phase::Unvisited {
            self.products.push(allocate());
            self.work[top].phase = Phase::AwaitingChild;
        } else {
            let cursor = self.work[top].cursor;
            let element = self.pop_product()?;
            let slot = match self.products.last_mut() {
                Some(Value::Array(array)) => array.slots_mut().get_mut(cursor),
                Some(Value::List(list)) => list.slots_mut().get_mut(cursor),
                _ => None,
            };
            let Some(slot) = slot else {
                return Err(self.invariant("sequence copy is not below its element"));
            };
            *slot = element;
            self.work[top].cursor += 1;
        }

        let cursor = self.work[top].cursor;
        match elements.get(cursor) {
            Some(element) => self.push_child(element, PathStep::Index(cursor as u32)),
            None => self.finish(),
        }
        Ok(())
    }
}
