//! Locating a position inside a value.

use core::fmt::{self, Write};

use deepcopy_core::{Def, Shape};

/// A single step from a value to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathStep {
    /// A record field, by declared index.
    Field(u32),
    /// An array or list element.
    Index(u32),
    /// The key of the n-th map entry visited.
    MapKey(u32),
    /// The value of the n-th map entry visited.
    MapValue(u32),
    /// Through a pointer to its target.
    Deref,
}

/// A series of steps starting at a root shape.
///
/// Only indices are stored; field names are recovered by replaying the steps
/// against the root shape.
#[derive(Debug, Clone)]
pub struct Path {
    /// Shape of the root value.
    pub shape: &'static Shape,

    /// Steps from the root, outermost first.
    pub steps: Vec<PathStep>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.shape.is_shape(other.shape) && self.steps == other.steps
    }
}

impl Eq for Path {}

impl Path {
    /// Create a new empty path.
    pub const fn new(shape: &'static Shape) -> Self {
        Self {
            shape,
            steps: Vec::new(),
        }
    }

    /// Push a step onto the path.
    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    /// Pop the last step from the path.
    pub fn pop(&mut self) -> Option<PathStep> {
        self.steps.pop()
    }

    /// Get the steps in this path.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Check if this path is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Formats the path as `next.next.items[3][key#0]`, or `<root>` when empty.
    ///
    /// Pointers are followed silently.
    pub fn format(&self) -> String {
        let mut result = String::new();
        let mut current = Some(self.shape);

        for step in &self.steps {
            let shape = current.take();
            match *step {
                PathStep::Field(idx) => {
                    let field = shape.and_then(|s| s.fields().get(idx as usize));
                    if !result.is_empty() {
                        result.push('.');
                    }
                    match field {
                        Some(field) => {
                            result.push_str(field.name);
                            current = Some(field.shape());
                        }
                        None => write!(result, "{idx}").unwrap_or_default(),
                    }
                }
                PathStep::Index(idx) => {
                    write!(result, "[{idx}]").unwrap_or_default();
                    current = shape.and_then(|s| match s.def {
                        Def::Array(ad) => Some(ad.t()),
                        Def::List(ld) => Some(ld.t()),
                        _ => None,
                    });
                }
                PathStep::MapKey(idx) => {
                    write!(result, "[key#{idx}]").unwrap_or_default();
                    current = shape.and_then(|s| match s.def {
                        Def::Map(md) => Some(md.k()),
                        _ => None,
                    });
                }
                PathStep::MapValue(idx) => {
                    write!(result, "[value#{idx}]").unwrap_or_default();
                    current = shape.and_then(|s| match s.def {
                        Def::Map(md) => Some(md.v()),
                        _ => None,
                    });
                }
                PathStep::Deref => {
                    current = shape.and_then(|s| match s.def {
                        Def::Pointer(pd) => Some(pd.pointee()),
                        _ => None,
                    });
                }
            }
        }

        if result.is_empty() {
            result.push_str("<root>");
        }
        result
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcopy_core::{Field, builtins};

    static NODE_FIELDS: [Field; 3] = [
        Field::new("next", || &NODE_PTR),
        Field::new("tags", || &TAGS),
        Field::new("scores", || &SCORES),
    ];
    static NODE: Shape = Shape::record("Node", &NODE_FIELDS);
    static NODE_PTR: Shape = Shape::pointer("*Node", || &NODE);
    static TAGS: Shape = Shape::list("[]String", || &builtins::STRING);
    static SCORES: Shape = Shape::map("map[String]i64", || &builtins::STRING, || &builtins::I64);

    #[test]
    fn empty_path_is_root() {
        deepcopy_testhelpers::setup();
        assert_eq!(Path::new(&NODE).format(), "<root>");
    }

    #[test]
    fn pointers_are_followed_silently() {
        deepcopy_testhelpers::setup();

        let mut path = Path::new(&NODE_PTR);
        path.push(PathStep::Deref);
        path.push(PathStep::Field(0));
        path.push(PathStep::Deref);
        path.push(PathStep::Field(1));
        path.push(PathStep::Index(3));
        assert_eq!(path.format(), "next.tags[3]");
    }

    #[test]
    fn map_entries_are_numbered() {
        deepcopy_testhelpers::setup();

        let mut path = Path::new(&NODE);
        path.push(PathStep::Field(2));
        path.push(PathStep::MapValue(1));
        assert_eq!(path.to_string(), "scores[value#1]");
        path.pop();
        path.push(PathStep::MapKey(0));
        assert_eq!(path.to_string(), "scores[key#0]");
    }
}
