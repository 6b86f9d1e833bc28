#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod shape;
pub use shape::*;

mod scalar;
pub use scalar::*;

pub mod builtins;

mod value;
pub use value::*;

mod narrow;
pub use narrow::*;

pub use num_complex::{Complex32, Complex64};
