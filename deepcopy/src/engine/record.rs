use deepcopy_core::{StructValue, Value};

use super::{Engine, Phase};
use crate::{CopyError, FieldAccess, PathStep, trace};

impl<'a> Engine<'a> {
    /// Records: start from the zero value, then copy fields in declared order.
    /// Under [`FieldAccess::Visible`], private fields are never visited and
    /// keep their zero value.
    pub(super) fn step_struct(
        &mut self,
        top: usize,
        source: &'a StructValue,
    ) -> Result<(), CopyError> {
        if self.work[top].phase == Phase::Unvisited {
            self.products
                .push(Value::Struct(StructValue::zeroed(source.shape())));
            self.work[top].phase = Phase::AwaitingChild;
        } else {
            let cursor = self.work[top].cursor;
            let field = self.pop_product()?;
            let slot = match self.products.last_mut() {
                Some(Value::Struct(record)) => record.slots_mut().get_mut(cursor),
                _ => None,
            };
            let Some(slot) = slot else {
                return Err(self.invariant("struct copy is not below its field"));
            };
            *slot = field;
            self.work[top].cursor += 1;
        }

        let defs = source.field_defs();
        let mut cursor = self.work[top].cursor;
        while let Some(def) = defs.get(cursor) {
            if def.is_visible() || self.options.field_access == FieldAccess::All {
                break;
            }
            trace!("leaving {}.{} at zero", source.shape(), def.name);
            cursor += 1;
        }
        self.work[top].cursor = cursor;

        match source.values().get(cursor) {
            Some(field) => self.push_child(field, PathStep::Field(cursor as u32)),
            None => self.finish(),
        }
        Ok(())
    }
}
