//! Resource query builder.
//!
//! Turns raw read criteria (field/operator/value triples, a combinator, a
//! sort and a projection) into a validated, typed [`ResourceQuery`] that a
//! data store can execute.
//!
//! ```text
//! ┌────────────┐  build()  ┌───────────────┐  to_document()  ┌─────────┐
//! │ QuerySpec  │──────────>│ ResourceQuery │────────────────>│ MongoDB │
//! │ (strings)  │           │ (typed)       │                 └─────────┘
//! └────────────┘           │               │  evaluate()     ┌─────────┐
//!                          │               │────────────────>│ Vec<R>  │
//!                          └───────────────┘                 └─────────┘
//! ```
//!
//! The builder is pure: it performs no I/O and keeps no state between calls.
//! Resources opt in by implementing [`Queryable`] for the record and
//! [`QueryField`] for its field enum.
//!
//! # Features
//!
//! - `mongodb` - filter and sort document translation for the MongoDB driver

pub mod builder;
pub mod error;
pub mod field;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod operator;
pub mod predicate;
pub mod projection;
pub mod sort;

#[cfg(test)]
mod test_support;

pub use builder::{QuerySpec, RawComparison, ResourceQuery};
pub use error::{QueryError, QueryResult};
pub use field::{FieldKind, FieldValue, QueryField, Queryable, format_timestamp};
pub use operator::{Combinator, Operator};
pub use predicate::{Comparison, Predicate};
pub use projection::{Projection, ProjectionMode};
pub use sort::{SortDirection, SortSpec};
