//! Error types for deep copies.

use core::fmt;

use deepcopy_core::Shape;

use crate::{Path, UnsupportedKind};

/// A failed deep copy: what went wrong, and where.
#[derive(Clone)]
pub struct CopyError {
    /// Root shape and the steps to the offending position.
    pub path: Path,

    /// What went wrong.
    pub kind: CopyErrorKind,
}

impl CopyError {
    /// Create a new error at the given path.
    pub fn new(path: Path, kind: CopyErrorKind) -> Self {
        Self { path, kind }
    }

    /// Create a new error at the root (empty path).
    pub fn at_root(shape: &'static Shape, kind: CopyErrorKind) -> Self {
        Self::new(Path::new(shape), kind)
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.kind, self.path.shape)?;
        if !self.path.is_empty() {
            write!(f, " at {}", self.path)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl core::error::Error for CopyError {}

/// The kind of copy error.
#[derive(Clone)]
pub enum CopyErrorKind {
    /// A channel, function, dynamic value or invalid value was reached.
    Unsupported {
        /// Which unsupported kind.
        kind: UnsupportedKind,
        /// Its shape.
        shape: &'static Shape,
    },
    /// The copy could not be narrowed to the requested type.
    TypeMismatch {
        /// What the caller asked for.
        expected: &'static str,
        /// What the copy actually is.
        actual: &'static Shape,
    },
    /// A reference slot in the original was mutably borrowed during the copy.
    Borrowed {
        /// Shape of the pointer that could not be followed.
        shape: &'static Shape,
    },
    /// Two distinct original keys copied to equal keys, so the copied map
    /// would hold fewer pairs than the original.
    KeyCollision {
        /// Shape of the map.
        shape: &'static Shape,
    },
    /// The engine broke one of its own invariants.
    Invariant(&'static str),
}

impl fmt::Display for CopyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyErrorKind::Unsupported { kind, shape } => {
                write!(f, "Unsupported kind {} ({})", kind, shape.type_identifier)
            }
            CopyErrorKind::TypeMismatch { expected, actual } => {
                write!(
                    f,
                    "Type mismatch: expected {}, got {}",
                    expected, actual.type_identifier
                )
            }
            CopyErrorKind::Borrowed { shape } => {
                write!(
                    f,
                    "Target of {} is mutably borrowed",
                    shape.type_identifier
                )
            }
            CopyErrorKind::KeyCollision { shape } => {
                write!(
                    f,
                    "Distinct keys of {} collide in the copy",
                    shape.type_identifier
                )
            }
            CopyErrorKind::Invariant(what) => write!(f, "Engine invariant violated: {what}"),
        }
    }
}

impl fmt::Debug for CopyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
