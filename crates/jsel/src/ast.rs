//! Selector AST - what the stream engine consumes
//!
//! A [`Selector`] is an immutable description of a navigation path through a
//! stream of structural document tokens. The builder and the string parser
//! both produce this form; a downstream token-stream filter interprets it.

use std::hash::Hash;

use indexmap::IndexSet;

/// A compiled navigation path.
///
/// Values are plain data: structurally comparable, freely cloneable, with no
/// identity semantics. Equality on predicate sets ignores insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Identity: matches the whole current value. The root of every chain.
    This,

    /// Apply `first`, then feed each of its results into `second`.
    ///
    /// Built by [`Selector::pipe`] when a step wraps its parent; not intended
    /// for direct construction.
    Pipe {
        first: Box<Selector>,
        second: Box<Selector>,
    },

    /// Expand the current value, which must be an array, into its elements.
    Iterate {
        /// Error on a non-array value (`true`) or skip it (`false`).
        strict: bool,
    },

    /// Keep array elements whose index satisfies the predicate.
    Index {
        predicate: IndexPredicate,
        strict: bool,
    },

    /// Keep object fields whose name satisfies the predicate.
    Name {
        predicate: NamePredicate,
        strict: bool,
        /// Error if no field matched by the predicate is present.
        mandatory: bool,
    },
}

impl Selector {
    /// Pipe `first` into `second`, collapsing an identity parent:
    /// `pipe(This, step)` is just `step`.
    ///
    /// This is the only simplification performed; chained real pipes keep
    /// their nested shape.
    ///
    /// ```
    /// use jsel::Selector;
    ///
    /// let step = Selector::Iterate { strict: true };
    /// assert_eq!(Selector::pipe(Selector::This, step.clone()), step);
    /// ```
    pub fn pipe(first: Selector, second: Selector) -> Selector {
        if first == Selector::This {
            second
        } else {
            Selector::Pipe {
                first: Box::new(first),
                second: Box::new(second),
            }
        }
    }
}

/// Which array indices an [`Selector::Index`] step matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPredicate {
    /// Exactly one index.
    Single(usize),
    /// Any index in a de-duplicated, insertion-ordered set.
    Several(IndexSet<usize>),
    /// Any index in the half-open interval `[start, end)`.
    ///
    /// `end < start` denotes an empty range that can never match; such values
    /// are accepted, not rejected (see [`IndexPredicate::range`]).
    Range { start: usize, end: usize },
}

impl IndexPredicate {
    /// Build the `[start, end)` range predicate.
    ///
    /// An inverted range (`end < start`) is accepted for compatibility but can
    /// never match; it is reported through `log::warn!` so it can be spotted
    /// during review instead of silently selecting nothing.
    pub fn range(start: usize, end: usize) -> IndexPredicate {
        if end < start {
            log::warn!(
                "index range [{}, {}) is empty: end precedes start, selector will never match",
                start,
                end
            );
        }
        IndexPredicate::Range { start, end }
    }
}

/// Which object fields a [`Selector::Name`] step matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePredicate {
    /// Exactly one field name.
    Single(String),
    /// Any name in a de-duplicated, insertion-ordered set.
    Several(IndexSet<String>),
}

/// Union the required first element into the rest, preserving insertion order.
/// Guarantees the resulting set is non-empty and duplicate-free.
pub(crate) fn set_of<T: Hash + Eq>(first: T, rest: impl IntoIterator<Item = T>) -> IndexSet<T> {
    let mut set = IndexSet::new();
    set.insert(first);
    set.extend(rest);
    set
}
