use core::cell::{BorrowError, RefCell};
use core::fmt;
use std::rc::Rc;

use crate::{Def, PointerDef, Shape, Value};

use super::{assert_shape, teardown};

#[track_caller]
fn pointer_def(shape: &'static Shape) -> PointerDef {
    match shape.def {
        Def::Pointer(pd) => pd,
        _ => panic!("{shape} is not a pointer shape"),
    }
}

/// A shared, mutable slot holding one value.
///
/// Cloning a `Ref` shares the slot. Two refs are the same slot when
/// [`Ref::ptr_eq`] says so, which is how aliasing, shared structure and
/// cycles are expressed in the value model.
#[derive(Clone)]
pub struct Ref(Rc<RefCell<Value>>);

impl Ref {
    /// Allocates a new slot.
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Borrows the value in the slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is mutably borrowed.
    pub fn borrow(&self) -> core::cell::Ref<'_, Value> {
        self.0.borrow()
    }

    /// Mutably borrows the value in the slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is borrowed.
    pub fn borrow_mut(&self) -> core::cell::RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    /// Stores `value` in the slot, returning the previous value.
    pub fn replace(&self, value: Value) -> Value {
        self.0.replace(value)
    }

    /// Reads the slot without holding a borrow guard.
    ///
    /// Fails if the slot is currently mutably borrowed.
    ///
    /// # Safety
    ///
    /// No mutable borrow of this slot may be taken, and the slot may not be
    /// written through [`Ref::replace`], while the returned reference is alive.
    pub unsafe fn peek_unguarded(&self) -> Result<&Value, BorrowError> {
        // SAFETY: the caller promises not to mutate the slot while the
        // reference is alive.
        unsafe { self.0.try_borrow_unguarded() }
    }

    /// Returns true if both refs are the same slot.
    pub fn ptr_eq(&self, other: &Ref) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the slot, stable for as long as it is alive.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Number of handles sharing this slot.
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Moves the slot's value into `out` if this is the last handle to it.
    pub(crate) fn release_into(mut self, out: &mut Vec<Value>) {
        if let Some(cell) = Rc::get_mut(&mut self.0) {
            let value = core::mem::take(cell.get_mut());
            if !value.is_invalid() {
                out.push(value);
            }
        }
    }
}

impl Drop for Ref {
    fn drop(&mut self) {
        if let Some(cell) = Rc::get_mut(&mut self.0) {
            let value = core::mem::take(cell.get_mut());
            if !value.is_invalid() {
                teardown::drop_all(vec![value]);
            }
        }
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({:#x})", self.addr())
    }
}

/// A nullable reference to a [`Ref`] slot whose value has the pointee shape.
#[derive(Clone)]
pub struct PointerValue {
    pub(crate) shape: &'static Shape,
    pub(crate) target: Option<Ref>,
}

impl PointerValue {
    /// Builds a null pointer.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a pointer shape.
    #[track_caller]
    pub fn null(shape: &'static Shape) -> Self {
        pointer_def(shape);
        Self {
            shape,
            target: None,
        }
    }

    /// Allocates a new slot holding `value` and points at it.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a pointer shape or `value` is not of its pointee shape.
    #[track_caller]
    pub fn new(shape: &'static Shape, value: Value) -> Self {
        assert_shape("pointee", pointer_def(shape).pointee(), &value);
        Self {
            shape,
            target: Some(Ref::new(value)),
        }
    }

    /// Points at an existing slot, sharing it. The slot's content is not checked.
    #[track_caller]
    pub fn from_ref(shape: &'static Shape, target: Ref) -> Self {
        pointer_def(shape);
        Self {
            shape,
            target: Some(target),
        }
    }

    /// Returns the shape of this pointer.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Returns the pointee shape.
    pub fn pointee_shape(&self) -> &'static Shape {
        pointer_def(self.shape).pointee()
    }

    /// Returns the slot, or `None` for a null pointer.
    pub fn target(&self) -> Option<&Ref> {
        self.target.as_ref()
    }

    /// Returns true for a null pointer.
    pub fn is_null(&self) -> bool {
        self.target.is_none()
    }

    /// Repoints this pointer, returning the previous slot.
    pub fn set_target(&mut self, target: Option<Ref>) -> Option<Ref> {
        core::mem::replace(&mut self.target, target)
    }

    /// Returns true if both pointers are null or point at the same slot.
    pub fn same_target(&self, other: &PointerValue) -> bool {
        match (&self.target, &other.target) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for PointerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}({:#x})", self.shape, target.addr()),
            None => write!(f, "{}(nil)", self.shape),
        }
    }
}
