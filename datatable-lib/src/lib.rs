//! Data table query-state engine
//!
//! Keeps a data table's sort, filter and pagination state consistent across
//! three places: the URL, the in-memory state driving a rendering engine,
//! and a server-side query over an in-memory record store.
//!
//! - [`codec`] - URL query parameters to and from [`query::TableQueryState`]
//! - [`query`] - filter predicates, sorting and paging
//! - [`store`] - the record store, query executor, aggregates and page loader
//! - [`table`] - the stateful controller with debounced URL synchronization

pub mod codec;
pub mod error;
pub mod model;
pub mod query;
pub mod store;
pub mod table;

pub use error::Error;
