use deepcopy_core::{MapValue, Value};

use super::{Engine, ItemState, Phase};
use crate::{CopyError, CopyErrorKind, PathStep, trace};

impl<'a> Engine<'a> {
    /// Maps: snapshot the entries once, then per entry copy the key, park it,
    /// copy the value, and insert the pair.
    pub(super) fn step_map(&mut self, top: usize, source: &'a MapValue) -> Result<(), CopyError> {
        if self.work[top].phase == Phase::Unvisited {
            self.products.push(Value::Map(MapValue::with_capacity(
                source.shape(),
                source.len(),
            )));
            let item = &mut self.work[top];
            item.state = ItemState::Map {
                entries: source.iter().collect(),
                pending_key: None,
            };
            item.phase = Phase::AwaitingChild;
        } else {
            let resolved = self.pop_product()?;
            let pending = match &mut self.work[top].state {
                ItemState::Map { pending_key, .. } => Some(pending_key),
                _ => None,
            };
            let Some(pending_key) = pending else {
                return Err(self.invariant("map item lost its entries"));
            };

            match pending_key.take() {
                // the key came back; its value is next
                None => *pending_key = Some(resolved),
                Some(key) => {
                    let cursor = self.work[top].cursor;
                    let Some(Value::Map(map)) = self.products.last_mut() else {
                        return Err(self.invariant("map copy is not below its entry"));
                    };
                    // keys that differed only in skipped private fields are now equal
                    if map.insert(key, resolved).is_some() {
                        let mut path = self.path();
                        path.push(PathStep::MapKey(cursor as u32));
                        let kind = CopyErrorKind::KeyCollision {
                            shape: source.shape(),
                        };
                        return Err(CopyError::new(path, kind));
                    }
                    self.work[top].cursor += 1;
                }
            }
        }

        let item = &self.work[top];
        let cursor = item.cursor;
        let next = match &item.state {
            ItemState::Map {
                entries,
                pending_key,
            } => entries.get(cursor).map(|&(key, value)| match pending_key {
                None => (key, PathStep::MapKey(cursor as u32)),
                Some(_) => (value, PathStep::MapValue(cursor as u32)),
            }),
            _ => None,
        };
        match next {
            Some((child, step)) => self.push_child(child, step),
            None => {
                trace!(entries = cursor, "map complete");
                self.finish();
            }
        }
        Ok(())
    }
}
