use deepcopy_core::{FromValue, Shape, Value};

use crate::engine::Engine;
use crate::{CopyError, CopyErrorKind, Path};

/// Which record fields the engine copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldAccess {
    /// Copy externally visible fields only; private fields keep their zero value.
    #[default]
    Visible,
    /// Copy every field, private ones included.
    All,
}

/// What happens when a channel, function, dynamic or invalid value is found
/// below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// The whole copy fails, naming the offending kind and its position.
    #[default]
    Fail,
    /// The original handle is shared at that position and the copy continues.
    /// A shared dynamic value is the same erased value, not a copy of it.
    Share,
}

/// Options for deep copies.
///
/// An unsupported root is always an error, whatever the policy.
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Which record fields are copied.
    pub field_access: FieldAccess,

    /// How unsupported kinds below the root are handled.
    pub on_unsupported: UnsupportedPolicy,
}

impl CopyOptions {
    /// Create default options: visible fields only, fail on unsupported kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which record fields are copied.
    pub fn field_access(mut self, access: FieldAccess) -> Self {
        self.field_access = access;
        self
    }

    /// Set how unsupported kinds below the root are handled.
    pub fn on_unsupported(mut self, policy: UnsupportedPolicy) -> Self {
        self.on_unsupported = policy;
        self
    }

    /// Deep-copies `value`.
    pub fn copy_value(&self, value: &Value) -> Result<Value, CopyError> {
        Engine::new(self, value).run()
    }

    /// Deep-copies `value` and narrows the copy to `T`.
    pub fn copy<T: FromValue>(&self, value: &Value) -> Result<T, CopyError> {
        let copy = self.copy_value(value)?;
        let shape = copy.shape();
        T::from_value(copy).map_err(|_| {
            CopyError::at_root(
                shape,
                CopyErrorKind::TypeMismatch {
                    expected: T::EXPECTED,
                    actual: shape,
                },
            )
        })
    }

    /// Deep-copies `value`, checking that the copy has exactly `shape`.
    pub fn copy_as(&self, value: &Value, shape: &'static Shape) -> Result<Value, CopyError> {
        let copy = self.copy_value(value)?;
        let actual = copy.shape();
        if !actual.is_shape(shape) {
            return Err(CopyError::new(
                Path::new(actual),
                CopyErrorKind::TypeMismatch {
                    expected: shape.type_identifier,
                    actual,
                },
            ));
        }
        Ok(copy)
    }
}
