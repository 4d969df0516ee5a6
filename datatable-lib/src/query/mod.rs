//! Query state, filter predicates and ordering.
//!
//! # Types
//!
//! - [`TableQueryState`] - page, page size, sort keys, filters and join
//! - [`FilterPredicate`] - a single filter condition
//! - [`SortEntry`] - one sort key
//! - [`Page`] - a page of results with the filtered total
//!
//! # Evaluation
//!
//! - [`evaluate`] / [`evaluate_all`] - predicate evaluation against a [`Row`](crate::model::Row)
//! - [`sort_rows`] / [`compare_rows`] - stable multi-column ordering

mod filter;
mod order;
mod page;
mod state;

pub use filter::*;
pub use order::*;
pub use page::Page;
pub use state::*;
