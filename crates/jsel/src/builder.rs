//! Fluent builder for assembling selectors
//!
//! Every chaining call appends one node that owns its parent by value, so a
//! finished chain is a nested type such as
//! `FieldBuilder<IteratorBuilder<Root>>`. Each node carries its modifier state
//! as phantom marker parameters; the modifier methods are only defined on the
//! states where the transition is legal, which turns an illegal call sequence
//! into a missing-method compile error instead of a runtime check.
//!
//! [`SelectorBuilder::compile`] lowers a chain into the [`Selector`] AST by
//! compiling the parent first and wrapping the result with the node's own
//! step, so the most recently appended step ends up outermost.

use std::marker::PhantomData;

use crate::ast::{IndexPredicate, NamePredicate, Selector, set_of};

mod sealed {
    pub trait Sealed {}
}

// ============ Axis markers ============

/// Strictness axis of a builder node: whether a shape mismatch during stream
/// matching is an error or a silent non-match.
///
/// Sealed; implemented only by [`Strict`] and [`Lenient`]. The root carries no
/// strictness parameter at all, so it has nothing to toggle.
pub trait Strictness: sealed::Sealed {
    const IS_STRICT: bool;
}

/// Initial strictness state of every freshly appended step.
#[derive(Debug, Clone, Copy)]
pub enum Strict {}

/// Strictness state after `lenient()`: mismatches become non-matches.
#[derive(Debug, Clone, Copy)]
pub enum Lenient {}

impl sealed::Sealed for Strict {}
impl Strictness for Strict {
    const IS_STRICT: bool = true;
}

impl sealed::Sealed for Lenient {}
impl Strictness for Lenient {
    const IS_STRICT: bool = false;
}

/// Mandatory axis of a field node: whether the absence of every matched field
/// is itself an error. Iterator and index nodes carry no presence parameter
/// and therefore expose no `mandatory()`.
pub trait Presence: sealed::Sealed {
    const IS_MANDATORY: bool;
}

/// Initial presence state of a field node; eligible for `mandatory()`.
#[derive(Debug, Clone, Copy)]
pub enum Optional {}

/// Presence state after `mandatory()`.
#[derive(Debug, Clone, Copy)]
pub enum Mandatory {}

impl sealed::Sealed for Optional {}
impl Presence for Optional {
    const IS_MANDATORY: bool = false;
}

impl sealed::Sealed for Mandatory {}
impl Presence for Mandatory {
    const IS_MANDATORY: bool = true;
}

// ============ Chain nodes ============

/// The entry point of every chain; compiles to the identity selector.
///
/// `Root` has neither modifier axis, so `lenient()` and `mandatory()` do not
/// exist on it:
///
/// ```compile_fail
/// use jsel::{SelectorBuilder, root};
///
/// let _ = root().lenient();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Root;

/// Start a new selector chain.
///
/// ```
/// use jsel::{Selector, SelectorBuilder, root};
///
/// assert_eq!(root().compile(), Selector::This);
/// ```
pub fn root() -> Root {
    Root
}

/// A step that expands the current array into its elements.
///
/// No mandatory axis; `mandatory()` on an iterator step does not compile:
///
/// ```compile_fail
/// use jsel::{SelectorBuilder, root};
///
/// let _ = root().iterate().mandatory();
/// ```
#[derive(Debug, Clone)]
pub struct IteratorBuilder<P, S = Strict> {
    parent: P,
    strictness: PhantomData<S>,
}

/// A step that keeps array elements matching an index predicate.
///
/// Like [`IteratorBuilder`], it has no mandatory axis:
///
/// ```compile_fail
/// use jsel::{SelectorBuilder, root};
///
/// let _ = root().index(0).mandatory();
/// ```
#[derive(Debug, Clone)]
pub struct IndexBuilder<P, S = Strict> {
    parent: P,
    predicate: IndexPredicate,
    strictness: PhantomData<S>,
}

/// A step that keeps object fields matching a name predicate.
#[derive(Debug, Clone)]
pub struct FieldBuilder<P, M = Optional, S = Strict> {
    parent: P,
    predicate: NamePredicate,
    presence: PhantomData<M>,
    strictness: PhantomData<S>,
}

impl sealed::Sealed for Root {}
impl<P, S> sealed::Sealed for IteratorBuilder<P, S> {}
impl<P, S> sealed::Sealed for IndexBuilder<P, S> {}
impl<P, M, S> sealed::Sealed for FieldBuilder<P, M, S> {}

// ============ Chaining ============

/// Fluent chaining surface shared by every node in a builder chain.
///
/// Chaining methods consume `self` and return the appended node, strict and
/// (for field steps) optional by default. [`compile`](Self::compile) borrows
/// the chain and may be called any number of times; it always yields
/// structurally equal selectors.
///
/// ```
/// use jsel::{SelectorBuilder, root};
///
/// let selector = root().field("entries").iterate().index(0).compile();
/// assert_eq!(selector, jsel::parse(".entries.[].[0]").unwrap());
/// ```
pub trait SelectorBuilder: sealed::Sealed + Sized {
    /// Compile the chain into its selector, parent first.
    fn compile(&self) -> Selector;

    /// Append a step expanding the current array into its elements.
    fn iterate(self) -> IteratorBuilder<Self, Strict> {
        IteratorBuilder {
            parent: self,
            strictness: PhantomData,
        }
    }

    /// Append a step selecting exactly index `at`.
    fn index(self, at: usize) -> IndexBuilder<Self, Strict> {
        IndexBuilder {
            parent: self,
            predicate: IndexPredicate::Single(at),
            strictness: PhantomData,
        }
    }

    /// Append a step selecting any of the given indices.
    ///
    /// The first index is required; the rest are unioned into a set, so
    /// duplicates collapse:
    ///
    /// ```
    /// use jsel::{SelectorBuilder, root};
    ///
    /// let selector = root().indices(1, [1, 2]).compile();
    /// assert_eq!(selector, jsel::parse(".[1,2]").unwrap());
    /// ```
    fn indices(
        self,
        first: usize,
        rest: impl IntoIterator<Item = usize>,
    ) -> IndexBuilder<Self, Strict> {
        IndexBuilder {
            parent: self,
            predicate: IndexPredicate::Several(set_of(first, rest)),
            strictness: PhantomData,
        }
    }

    /// Append a step selecting indices in the half-open range `[start, end)`.
    ///
    /// An inverted range (`end < start`) is accepted but never matches; it is
    /// flagged through `log::warn!` rather than rejected.
    fn range(self, start: usize, end: usize) -> IndexBuilder<Self, Strict> {
        IndexBuilder {
            parent: self,
            predicate: IndexPredicate::range(start, end),
            strictness: PhantomData,
        }
    }

    /// Append a step selecting exactly the field `name`.
    fn field(self, name: impl Into<String>) -> FieldBuilder<Self, Optional, Strict> {
        FieldBuilder {
            parent: self,
            predicate: NamePredicate::Single(name.into()),
            presence: PhantomData,
            strictness: PhantomData,
        }
    }

    /// Append a step selecting any of the given field names, de-duplicated
    /// the same way as [`indices`](Self::indices).
    ///
    /// Note that `fields` appends a *new* step parented at `self`; it never
    /// merges names into a previous step's predicate.
    fn fields(
        self,
        first: impl Into<String>,
        rest: impl IntoIterator<Item = impl Into<String>>,
    ) -> FieldBuilder<Self, Optional, Strict> {
        FieldBuilder {
            parent: self,
            predicate: NamePredicate::Several(set_of(
                first.into(),
                rest.into_iter().map(Into::into),
            )),
            presence: PhantomData,
            strictness: PhantomData,
        }
    }
}

// ============ Modifiers ============

impl<P> IteratorBuilder<P, Strict> {
    /// Treat a non-array value as "no match" instead of an error.
    pub fn lenient(self) -> IteratorBuilder<P, Lenient> {
        IteratorBuilder {
            parent: self.parent,
            strictness: PhantomData,
        }
    }
}

impl<P> IndexBuilder<P, Strict> {
    /// Treat a non-array value as "no match" instead of an error.
    pub fn lenient(self) -> IndexBuilder<P, Lenient> {
        IndexBuilder {
            parent: self.parent,
            predicate: self.predicate,
            strictness: PhantomData,
        }
    }
}

impl<P, M> FieldBuilder<P, M, Strict> {
    /// Treat a non-object value as "no match" instead of an error.
    ///
    /// Only a strict step exposes this; a second application has no valid
    /// target state and does not compile:
    ///
    /// ```compile_fail
    /// use jsel::{SelectorBuilder, root};
    ///
    /// let _ = root().field("a").lenient().lenient();
    /// ```
    pub fn lenient(self) -> FieldBuilder<P, M, Lenient> {
        FieldBuilder {
            parent: self.parent,
            predicate: self.predicate,
            presence: PhantomData,
            strictness: PhantomData,
        }
    }
}

impl<P, S> FieldBuilder<P, Optional, S> {
    /// Make the absence of every matched field an error in its own right,
    /// independent of the strictness axis.
    ///
    /// `mandatory()` and `lenient()` commute; applying `mandatory()` twice
    /// does not compile:
    ///
    /// ```compile_fail
    /// use jsel::{SelectorBuilder, root};
    ///
    /// let _ = root().field("a").mandatory().mandatory();
    /// ```
    pub fn mandatory(self) -> FieldBuilder<P, Mandatory, S> {
        FieldBuilder {
            parent: self.parent,
            predicate: self.predicate,
            presence: PhantomData,
            strictness: PhantomData,
        }
    }
}

// ============ Compilation ============

impl SelectorBuilder for Root {
    fn compile(&self) -> Selector {
        Selector::This
    }
}

impl<P: SelectorBuilder, S: Strictness> SelectorBuilder for IteratorBuilder<P, S> {
    fn compile(&self) -> Selector {
        Selector::pipe(
            self.parent.compile(),
            Selector::Iterate {
                strict: S::IS_STRICT,
            },
        )
    }
}

impl<P: SelectorBuilder, S: Strictness> SelectorBuilder for IndexBuilder<P, S> {
    fn compile(&self) -> Selector {
        Selector::pipe(
            self.parent.compile(),
            Selector::Index {
                predicate: self.predicate.clone(),
                strict: S::IS_STRICT,
            },
        )
    }
}

impl<P: SelectorBuilder, M: Presence, S: Strictness> SelectorBuilder for FieldBuilder<P, M, S> {
    fn compile(&self) -> Selector {
        Selector::pipe(
            self.parent.compile(),
            Selector::Name {
                predicate: self.predicate.clone(),
                strict: S::IS_STRICT,
                mandatory: M::IS_MANDATORY,
            },
        )
    }
}

// ============ Sanity Tests ============
// Most testing is done via integration tests in tests/integration.rs
