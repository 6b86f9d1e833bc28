//! The copy engine.
//!
//! Traversal state lives in two heap-allocated stacks instead of the native
//! call stack:
//!
//! - the work stack holds one [`WorkItem`] per original value whose copy is
//!   not finished, innermost on top;
//! - the product stack holds the copies being built, innermost on top.
//!
//! Each loop iteration advances the top work item by one step. A composite
//! allocates its product on first visit, then pushes its children one at a
//! time; when a child finishes, its product is popped and written into the
//! parent's product. When the work stack empties, the product stack holds
//! exactly the finished copy of the root.
//!
//! Reference slots are copied once: the engine remembers, per original slot,
//! the new slot it allocated, and every later pointer to the same original
//! (including one that closes a cycle) points at that new slot.

use hashbrown::HashMap;

use deepcopy_core::{Ref, Value};

use crate::classify::{Classified, classify};
use crate::{
    Category, CopyError, CopyErrorKind, CopyOptions, Path, PathStep, UnsupportedKind,
    UnsupportedPolicy, debug, trace,
};

mod item;
mod map;
mod pointer;
mod record;
mod sequence;

use item::{ItemState, Phase, WorkItem};

pub(crate) struct Engine<'a> {
    options: &'a CopyOptions,
    root: &'a Value,
    work: Vec<WorkItem<'a>>,
    products: Vec<Value>,
    /// Original slot address to the slot allocated for its copy.
    slots: HashMap<usize, Ref>,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(options: &'a CopyOptions, root: &'a Value) -> Self {
        Self {
            options,
            root,
            work: Vec::new(),
            products: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Value, CopyError> {
        let shape = self.root.shape();
        if let Category::Unsupported(kind) = classify(self.root).category() {
            debug!("refusing to copy {} ({})", kind, shape);
            return Err(CopyError::at_root(
                shape,
                CopyErrorKind::Unsupported { kind, shape },
            ));
        }

        debug!("copying {}", shape);
        self.work.push(WorkItem::new(self.root, None));

        while let Some(item) = self.work.last() {
            let source = item.source;
            let top = self.work.len() - 1;
            match classify(source) {
                Classified::Leaf => self.copy_leaf(source),
                Classified::Array(array) => self.step_array(top, array)?,
                Classified::List(list) => self.step_list(top, list)?,
                Classified::Map(map) => self.step_map(top, map)?,
                Classified::Pointer(pointer) => self.step_pointer(top, pointer)?,
                Classified::Struct(record) => self.step_struct(top, record)?,
                Classified::Unsupported(kind) => self.unsupported(source, kind)?,
            }
            self.retire();
        }

        let copy = self.pop_product()?;
        if !self.products.is_empty() {
            return Err(self.invariant("products left over after the root finished"));
        }
        debug!(slots = self.slots.len(), "copied {}", shape);
        Ok(copy)
    }

    /// Scalars are their own copy; cloning a string allocates new storage.
    fn copy_leaf(&mut self, source: &'a Value) {
        self.products.push(source.clone());
        self.finish();
    }

    fn unsupported(&mut self, source: &'a Value, kind: UnsupportedKind) -> Result<(), CopyError> {
        match self.options.on_unsupported {
            UnsupportedPolicy::Fail => Err(self.error(CopyErrorKind::Unsupported {
                kind,
                shape: source.shape(),
            })),
            UnsupportedPolicy::Share => {
                trace!("sharing {} ({})", kind, source.shape());
                self.products.push(source.clone());
                self.finish();
                Ok(())
            }
        }
    }

    /// Discovers a child of the top item.
    fn push_child(&mut self, source: &'a Value, step: PathStep) {
        trace!(depth = self.work.len(), "visiting {}", source.shape());
        self.work.push(WorkItem::new(source, Some(step)));
    }

    /// Marks the top item complete. Its product is on top of the product stack.
    fn finish(&mut self) {
        if let Some(item) = self.work.last_mut() {
            debug_assert_ne!(item.phase, Phase::Complete, "item finished twice");
            item.phase = Phase::Complete;
        }
    }

    /// Pops the top item once it is complete, handing its product to the
    /// parent, which picks it up on its next visit.
    fn retire(&mut self) {
        let Some(item) = self.work.last() else {
            return;
        };
        if item.phase != Phase::Complete {
            return;
        }
        trace!(depth = self.work.len() - 1, "finished {}", item.source.shape());
        self.work.pop();
    }

    fn pop_product(&mut self) -> Result<Value, CopyError> {
        match self.products.pop() {
            Some(product) => Ok(product),
            None => Err(self.invariant("product stack is empty")),
        }
    }

    /// Location of the top work item.
    fn path(&self) -> Path {
        Path {
            shape: self.root.shape(),
            steps: self.work.iter().filter_map(|item| item.step).collect(),
        }
    }

    fn error(&self, kind: CopyErrorKind) -> CopyError {
        CopyError::new(self.path(), kind)
    }

    fn invariant(&self, what: &'static str) -> CopyError {
        self.error(CopyErrorKind::Invariant(what))
    }
}
