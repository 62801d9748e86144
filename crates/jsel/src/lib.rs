//! jsel - typed selectors for streaming JSON
//!
//! A selector describes how to navigate into a stream of hierarchical
//! document tokens and pick out sub-values without materializing the whole
//! document. Build one through the fluent builder (illegal modifier
//! sequences fail to compile) or parse one from the string syntax; both
//! produce the same immutable [`Selector`] value for a stream-filtering
//! engine to consume.
//!
//! ## Quick Start
//!
//! ```
//! use jsel::{SelectorBuilder, root};
//!
//! let selector = root()
//!     .field("entries")
//!     .iterate()
//!     .fields("id", ["name"])
//!     .compile();
//!
//! assert_eq!(selector, jsel::parse(r#".entries.[].["id","name"]"#).unwrap());
//! assert_eq!(selector.to_string(), r#".entries.[].["id","name"]"#);
//! ```
//!
//! ## String Syntax
//!
//! - `.` → the identity selector
//! - `.name` / `.["two words"]` → select an object field
//! - `.["a","b"]` → select any of several fields
//! - `.[]` → iterate all array elements
//! - `.[3]` / `.[0,2]` / `.[1:4]` → select array elements by index
//! - `!` suffix → matched fields are mandatory (field steps only)
//! - `?` suffix → lenient: a shape mismatch skips instead of failing
//!
//! ## Static Legality
//!
//! Modifier misuse through the builder is a compile error, not a runtime
//! check; each node type only exposes the transitions that make sense for
//! its current marker state:
//!
//! ```compile_fail
//! use jsel::{SelectorBuilder, root};
//!
//! // Iteration has no mandatory axis.
//! let _ = root().iterate().mandatory();
//! ```
//!
//! The string front end performs the same checks at parse time, since its
//! input is runtime data:
//!
//! ```
//! let err = jsel::parse(".[]!").unwrap_err();
//! assert!(err.message.contains("only applies to field steps"));
//! ```

mod ast;
mod builder;
mod parse;
mod pretty;

// ============ Primary Public API ============

pub use ast::{IndexPredicate, NamePredicate, Selector};
pub use builder::{
    FieldBuilder, IndexBuilder, IteratorBuilder, Lenient, Mandatory, Optional, Presence, Root,
    SelectorBuilder, Strict, Strictness, root,
};

// ============ String Front End ============

pub use parse::{ParseError, parse};
