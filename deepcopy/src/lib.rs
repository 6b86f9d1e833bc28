#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub use deepcopy_core::*;

mod access;
pub use access::is_fully_accessible;

mod classify;
pub use classify::{Category, UnsupportedKind, category, shape_category};

mod engine;

mod error;
pub use error::*;

mod options;
pub use options::*;

mod path;
pub use path::*;

mod same;
pub use same::{Difference, Sameness, check_same, is_detached};

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
#[macro_export]
/// Forwards to tracing::trace when the tracing feature is enabled
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[macro_export]
/// Forwards to tracing::debug when the tracing feature is enabled
macro_rules! debug {
    ($($tt:tt)*) => {};
}

/// Deep-copies `value` and narrows the copy to `T`.
///
/// Private record fields are left at their zero value, and any channel,
/// function, dynamic or invalid value makes the copy fail. Use
/// [`CopyOptions`] to change either behavior.
///
/// # Errors
///
/// Fails if `value` holds an unsupported kind, or if the copy is not a `T`.
pub fn deep_copy<T: FromValue>(value: &Value) -> Result<T, CopyError> {
    CopyOptions::default().copy(value)
}

/// Deep-copies `value` with default options.
pub fn deep_copy_value(value: &Value) -> Result<Value, CopyError> {
    CopyOptions::default().copy_value(value)
}

/// Deep-copies `value`, checking that the copy has exactly `shape`.
pub fn deep_copy_as(value: &Value, shape: &'static Shape) -> Result<Value, CopyError> {
    CopyOptions::default().copy_as(value, shape)
}

/// Deep-copies `value`, falling back to `T::default()` on any failure.
pub fn deep_copy_or_default<T: FromValue + Default>(value: &Value) -> T {
    deep_copy(value).unwrap_or_default()
}

/// Returns true if the top-level kind of `value` can be copied at all.
///
/// Does not look inside composites: a record holding a channel is copyable
/// here, and still fails to copy under [`UnsupportedPolicy::Fail`].
pub fn is_copyable(value: &Value) -> bool {
    !matches!(category(value), Category::Unsupported(_))
}
