use deepcopy_core::{PointerValue, Ref, Value};

use super::{Engine, ItemState, Phase};
use crate::{CopyError, CopyErrorKind, PathStep, trace};

impl<'a> Engine<'a> {
    /// Pointers: null stays null; otherwise the target is copied into a new
    /// slot, unless this original slot already has one.
    pub(super) fn step_pointer(
        &mut self,
        top: usize,
        source: &'a PointerValue,
    ) -> Result<(), CopyError> {
        let shape = source.shape();

        if self.work[top].phase != Phase::Unvisited {
            let target = self.pop_product()?;
            let ItemState::Pointer { slot } = &self.work[top].state else {
                return Err(self.invariant("pointer item lost its slot"));
            };
            slot.replace(target);
            self.finish();
            return Ok(());
        }

        let Some(original) = source.target() else {
            self.products.push(Value::Pointer(PointerValue::null(shape)));
            self.finish();
            return Ok(());
        };

        if let Some(slot) = self.slots.get(&original.addr()) {
            trace!("{} at {:#x} already copied", shape, original.addr());
            self.products
                .push(Value::Pointer(PointerValue::from_ref(shape, slot.clone())));
            self.finish();
            return Ok(());
        }

        // SAFETY: nothing writes to the original graph while the engine runs;
        // the only slots it writes are the ones it allocates below.
        let Ok(target) = (unsafe { original.peek_unguarded() }) else {
            return Err(self.error(CopyErrorKind::Borrowed { shape }));
        };

        let slot = Ref::new(Value::Invalid);
        self.slots.insert(original.addr(), slot.clone());
        self.products
            .push(Value::Pointer(PointerValue::from_ref(shape, slot.clone())));

        let item = &mut self.work[top];
        item.state = ItemState::Pointer { slot };
        item.phase = Phase::AwaitingChild;
        self.push_child(target, PathStep::Deref);
        Ok(())
    }
}
