use deepcopy_core::{Ref, Value};

use crate::PathStep;

/// Where a work item is in its life.
///
/// `Unvisited → AwaitingChild → Complete`, with no other path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Discovered, nothing allocated yet.
    Unvisited,
    /// Product allocated; children are being copied one at a time.
    AwaitingChild,
    /// Product finished and handed to the parent.
    Complete,
}

/// One original value awaiting its copy.
pub(crate) struct WorkItem<'a> {
    pub(crate) source: &'a Value,
    pub(crate) phase: Phase,
    /// Next element, field or map entry to copy.
    pub(crate) cursor: usize,
    /// How the parent reached this value; `None` for the root.
    pub(crate) step: Option<PathStep>,
    pub(crate) state: ItemState<'a>,
}

impl<'a> WorkItem<'a> {
    pub(crate) fn new(source: &'a Value, step: Option<PathStep>) -> Self {
        Self {
            source,
            phase: Phase::Unvisited,
            cursor: 0,
            step,
            state: ItemState::None,
        }
    }
}

/// State only some kinds need.
pub(crate) enum ItemState<'a> {
    None,
    Map {
        /// Entries captured on first visit; their order carries no meaning.
        entries: Vec<(&'a Value, &'a Value)>,
        /// Copy of the current entry's key while its value is being copied.
        pending_key: Option<Value>,
    },
    Pointer {
        /// The new slot the copied target goes into.
        slot: Ref,
    },
}
