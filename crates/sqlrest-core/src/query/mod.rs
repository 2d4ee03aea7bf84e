//! The chained query engine.
//!
//! A [`ChainedQuery`] collects query-string clauses in call order, keeps aggregate
//! functions apart until serialization, and performs a single request on
//! [`ChainedQuery::execute`].
//!
//! # Submodules
//!
//! - [`ops`]: operators, aggregates, join kinds, render modes and request kinds.
//! - `clause`: the clause model and its wire rendering.
//! - `builder`: [`ChainedQuery`] and [`PreparedRequest`].

mod builder;
mod clause;
mod encode;
pub mod ops;

pub use builder::{ChainedQuery, PreparedRequest};
pub use ops::{Aggregate, FilterOp, JoinKind, Operation, Renderer, RequestKind};
