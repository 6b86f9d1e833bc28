//! Structural comparison, for checking a copy against its original.
//!
//! `==` on [`Value`] compares pointers by identity, which is exactly what a
//! deep copy changes. [`check_same`] instead follows pointers and compares
//! what they point at, so an original and its copy are the same.

use core::fmt;

use hashbrown::HashSet;

use deepcopy_core::{Ref, Value};

use crate::{Path, PathStep};

/// The result of [`check_same`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sameness {
    /// Structurally equal.
    Same,
    /// The first difference found.
    Different(Difference),
}

impl Sameness {
    /// Returns true for [`Sameness::Same`].
    pub fn is_same(&self) -> bool {
        matches!(self, Sameness::Same)
    }
}

/// Where two values first differ, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Location in the left value.
    pub path: Path,
    /// What differs there.
    pub reason: String,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Asserts that two values are structurally the same.
///
/// # Panics
///
/// Panics with the first difference if they are not.
#[macro_export]
macro_rules! assert_same {
    ($left:expr, $right:expr $(,)?) => {
        if let $crate::Sameness::Different(diff) = $crate::check_same(&$left, &$right) {
            panic!("assertion `assert_same!(left, right)` failed\n\n{diff}\n");
        }
    };
}

/// One breadcrumb of the path to a pending pair.
struct Crumb {
    parent: Option<usize>,
    step: PathStep,
}

struct Pending<'l, 'r> {
    left: &'l Value,
    right: &'r Value,
    crumb: Option<usize>,
}

/// Compares two values structurally.
///
/// Scalars compare by value (floats bitwise), sequences and records
/// element-wise, maps by looking each left key up in the right map, and
/// pointers by what they point at. Channels and functions must be the same
/// handle. Reference cycles are compared co-inductively: a pair of slots
/// already under comparison is assumed to match.
///
/// Map keys are looked up with `==`, so a map keyed by pointers only
/// matches a map holding those very pointers.
pub fn check_same(left: &Value, right: &Value) -> Sameness {
    let root = left.shape();
    let mut crumbs: Vec<Crumb> = Vec::new();
    let mut pending = vec![Pending {
        left,
        right,
        crumb: None,
    }];
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    let different = |crumbs: &[Crumb], at: Option<usize>, reason: String| {
        let mut steps = Vec::new();
        let mut cursor = at;
        while let Some(index) = cursor {
            steps.push(crumbs[index].step);
            cursor = crumbs[index].parent;
        }
        steps.reverse();
        Sameness::Different(Difference {
            path: Path { shape: root, steps },
            reason,
        })
    };

    while let Some(Pending { left, right, crumb }) = pending.pop() {
        if !left.shape().is_shape(right.shape()) {
            return different(
                &crumbs,
                crumb,
                format!("{} vs {}", left.shape(), right.shape()),
            );
        }

        match (left, right) {
            (Value::Array(l), Value::Array(r)) => {
                let children = pair_up(l.as_slice(), r.as_slice(), PathStep::Index);
                pending.extend(
                    children
                        .rev()
                        .map(|(l, r, s)| descend(&mut crumbs, crumb, l, r, s)),
                );
            }
            (Value::List(l), Value::List(r)) => {
                if l.len() != r.len() {
                    return different(
                        &crumbs,
                        crumb,
                        format!("length {} vs {}", l.len(), r.len()),
                    );
                }
                let children = pair_up(l.as_slice(), r.as_slice(), PathStep::Index);
                pending.extend(
                    children
                        .rev()
                        .map(|(l, r, s)| descend(&mut crumbs, crumb, l, r, s)),
                );
            }
            (Value::Struct(l), Value::Struct(r)) => {
                let children = pair_up(l.values(), r.values(), PathStep::Field);
                pending.extend(
                    children
                        .rev()
                        .map(|(l, r, s)| descend(&mut crumbs, crumb, l, r, s)),
                );
            }
            (Value::Map(l), Value::Map(r)) => {
                if l.len() != r.len() {
                    return different(
                        &crumbs,
                        crumb,
                        format!("{} entries vs {}", l.len(), r.len()),
                    );
                }
                let mut children = Vec::with_capacity(l.len());
                for (index, (key, lv)) in l.iter().enumerate() {
                    let Some(rv) = r.get(key) else {
                        let reason = format!("key {key:?} missing on the right");
                        return different(&crumbs, crumb, reason);
                    };
                    let step = PathStep::MapValue(index as u32);
                    children.push(descend(&mut crumbs, crumb, lv, rv, step));
                }
                pending.extend(children.into_iter().rev());
            }
            (Value::Pointer(l), Value::Pointer(r)) => match (l.target(), r.target()) {
                (None, None) => {}
                (Some(lt), Some(rt)) => {
                    if !seen.insert((lt.addr(), rt.addr())) {
                        continue;
                    }
                    match (peek(lt), peek(rt)) {
                        (Some(lv), Some(rv)) => {
                            pending.push(descend(&mut crumbs, crumb, lv, rv, PathStep::Deref));
                        }
                        _ => {
                            let reason = "target is mutably borrowed".to_owned();
                            return different(&crumbs, crumb, reason);
                        }
                    }
                }
                (lt, _) => {
                    let (l, r) = if lt.is_some() { ("set", "null") } else { ("null", "set") };
                    return different(&crumbs, crumb, format!("{l} pointer vs {r} pointer"));
                }
            },
            (Value::Channel(l), Value::Channel(r)) if !l.same_handle(r) => {
                return different(&crumbs, crumb, "distinct channels".into());
            }
            (Value::Function(l), Value::Function(r)) if !l.same_handle(r) => {
                return different(&crumbs, crumb, "distinct functions".into());
            }
            (Value::Dynamic(l), Value::Dynamic(r)) => match (l.inner(), r.inner()) {
                (None, None) => {}
                (Some(lv), Some(rv)) => {
                    pending.push(descend(&mut crumbs, crumb, lv, rv, PathStep::Deref));
                }
                _ => {
                    let reason = "nil vs non-nil dynamic value".to_owned();
                    return different(&crumbs, crumb, reason);
                }
            },
            (Value::Channel(_), Value::Channel(_)) | (Value::Function(_), Value::Function(_)) => {}
            _ => {
                if left != right {
                    return different(&crumbs, crumb, format!("{left:?} vs {right:?}"));
                }
            }
        }
    }

    Sameness::Same
}

fn descend<'l, 'r>(
    crumbs: &mut Vec<Crumb>,
    parent: Option<usize>,
    left: &'l Value,
    right: &'r Value,
    step: PathStep,
) -> Pending<'l, 'r> {
    crumbs.push(Crumb { parent, step });
    Pending {
        left,
        right,
        crumb: Some(crumbs.len() - 1),
    }
}

fn pair_up<'l, 'r>(
    left: &'l [Value],
    right: &'r [Value],
    step: fn(u32) -> PathStep,
) -> impl DoubleEndedIterator<Item = (&'l Value, &'r Value, PathStep)> + ExactSizeIterator {
    left.iter()
        .zip(right)
        .enumerate()
        .map(move |(index, (l, r))| (l, r, step(index as u32)))
}

fn peek(slot: &Ref) -> Option<&Value> {
    // SAFETY: comparisons only read the graphs they walk.
    unsafe { slot.peek_unguarded() }.ok()
}

/// Identities of every slot, channel, function and dynamic value reachable
/// from `value`.
fn handles(value: &Value) -> HashSet<usize> {
    let mut found = HashSet::new();
    let mut stack = vec![value];

    while let Some(current) = stack.pop() {
        match current {
            Value::Array(v) => stack.extend(v.as_slice()),
            Value::List(v) => stack.extend(v.as_slice()),
            Value::Struct(v) => stack.extend(v.values()),
            Value::Map(v) => {
                for (key, value) in v {
                    stack.push(key);
                    stack.push(value);
                }
            }
            Value::Pointer(v) => {
                if let Some(slot) = v.target() {
                    if found.insert(slot.addr()) {
                        stack.extend(peek(slot));
                    }
                }
            }
            Value::Dynamic(v) => {
                if v.addr() != 0 && found.insert(v.addr()) {
                    stack.extend(v.inner());
                }
            }
            Value::Channel(v) if !v.is_nil() => {
                found.insert(v.addr());
            }
            Value::Function(v) if v.addr() != 0 => {
                found.insert(v.addr());
            }
            _ => {}
        }
    }
    found
}

/// Returns true if no reference slot, channel, function or dynamic value
/// reachable from `copy` is also reachable from `original`.
pub fn is_detached(original: &Value, copy: &Value) -> bool {
    let original = handles(original);
    handles(copy).is_disjoint(&original)
}
