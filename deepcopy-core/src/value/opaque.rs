//! Kinds the value model can hold but never copies: channels, closures and
//! type-erased containers.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::{Def, Shape, Value, builtins};

use super::assert_shape;

/// An in-process queue shared by every handle to it.
#[derive(Default)]
pub struct Channel {
    queue: RefCell<VecDeque<Value>>,
    closed: Cell<bool>,
}

/// A channel handle. The nil handle has no queue.
#[derive(Clone)]
pub struct ChannelValue {
    shape: &'static Shape,
    channel: Option<Rc<Channel>>,
}

impl ChannelValue {
    /// Opens a new channel.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a channel shape.
    #[track_caller]
    pub fn open(shape: &'static Shape) -> Self {
        Self::check(shape);
        Self {
            shape,
            channel: Some(Rc::new(Channel::default())),
        }
    }

    /// The nil channel.
    #[track_caller]
    pub fn nil(shape: &'static Shape) -> Self {
        Self::check(shape);
        Self {
            shape,
            channel: None,
        }
    }

    #[track_caller]
    fn check(shape: &'static Shape) {
        assert!(
            matches!(shape.def, Def::Channel(_)),
            "{shape} is not a channel shape"
        );
    }

    /// Returns the shape of this channel.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Returns true for the nil channel.
    pub fn is_nil(&self) -> bool {
        self.channel.is_none()
    }

    /// Queues a value. Returns it back if the channel is nil or closed.
    pub fn send(&self, value: Value) -> Result<(), Value> {
        let Def::Channel(cd) = self.shape.def else {
            return Err(value);
        };
        assert_shape("channel element", cd.t(), &value);
        match &self.channel {
            Some(channel) if !channel.closed.get() => {
                channel.queue.borrow_mut().push_back(value);
                Ok(())
            }
            _ => Err(value),
        }
    }

    /// Takes the oldest queued value.
    pub fn recv(&self) -> Option<Value> {
        self.channel.as_ref()?.queue.borrow_mut().pop_front()
    }

    /// Closes the channel. Queued values can still be received.
    pub fn close(&self) {
        if let Some(channel) = &self.channel {
            channel.closed.set(true);
        }
    }

    /// Returns true if both handles share a queue (or are both nil).
    pub fn same_handle(&self, other: &ChannelValue) -> bool {
        match (&self.channel, &other.channel) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Address of the queue, or 0 for nil.
    pub fn addr(&self) -> usize {
        self.channel.as_ref().map_or(0, |c| Rc::as_ptr(c) as usize)
    }
}

impl fmt::Debug for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", self.shape, self.addr())
    }
}

/// Signature of the closures held by a [`FunctionValue`].
pub type NativeFn = dyn Fn(&[Value]) -> Value;

/// A closure handle. The nil handle has no closure.
#[derive(Clone)]
pub struct FunctionValue {
    shape: &'static Shape,
    func: Option<Rc<NativeFn>>,
}

impl FunctionValue {
    /// Wraps a closure.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not a function shape.
    #[track_caller]
    pub fn new(shape: &'static Shape, func: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self::check(shape);
        let func: Rc<NativeFn> = Rc::new(func);
        Self {
            shape,
            func: Some(func),
        }
    }

    /// The nil function.
    #[track_caller]
    pub fn nil(shape: &'static Shape) -> Self {
        Self::check(shape);
        Self { shape, func: None }
    }

    #[track_caller]
    fn check(shape: &'static Shape) {
        assert!(
            matches!(shape.def, Def::Function),
            "{shape} is not a function shape"
        );
    }

    /// Returns the shape of this function.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Calls the closure, or returns `None` for the nil function.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        self.func.as_ref().map(|func| func(args))
    }

    /// Returns true if both handles share a closure (or are both nil).
    pub fn same_handle(&self, other: &FunctionValue) -> bool {
        match (&self.func, &other.func) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Address of the closure, or 0 for nil.
    pub fn addr(&self) -> usize {
        self.func
            .as_ref()
            .map_or(0, |func| Rc::as_ptr(func) as *const () as usize)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", self.shape, self.addr())
    }
}

/// A value whose static type has been erased. Its shape is always [`builtins::ANY`].
///
/// Cloning shares the erased value; it is never duplicated.
#[derive(Debug, Clone, Default)]
pub struct DynamicValue {
    pub(crate) inner: Option<Rc<Value>>,
}

impl DynamicValue {
    /// Erases the type of `value`.
    pub fn new(value: Value) -> Self {
        Self {
            inner: Some(Rc::new(value)),
        }
    }

    /// The empty dynamic value.
    pub const fn nil() -> Self {
        Self { inner: None }
    }

    /// Returns the shape of dynamic values.
    pub fn shape(&self) -> &'static Shape {
        &builtins::ANY
    }

    /// Returns true if both handles share an erased value (or are both nil).
    pub fn same_handle(&self, other: &DynamicValue) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Address of the erased value, or 0 for nil.
    pub fn addr(&self) -> usize {
        self.inner.as_ref().map_or(0, |v| Rc::as_ptr(v) as usize)
    }

    /// Returns the erased value.
    pub fn inner(&self) -> Option<&Value> {
        self.inner.as_deref()
    }
}
