//! Query-string codec.
//!
//! Translates between [`TableQueryState`](crate::query::TableQueryState) and
//! URL query parameters. Decoding parses untrusted, user-editable input and
//! never fails; encoding is exact, and `decode(encode(s)) == s`.
//!
//! | Parameter | Format |
//! |-----------|--------|
//! | `page` | 1-based integer |
//! | `perPage` | integer |
//! | `sort` | `column.asc,other.desc` |
//! | `filters` | JSON array of `{id, operator, value}` |
//! | `joinOperator` | `and` (default) or `or` |
//!
//! Parameter names are configurable through [`QueryKeys`].

mod decode;
mod encode;
mod keys;
mod params;

pub use decode::*;
pub use encode::*;
pub use keys::QueryKeys;
pub use params::QueryParams;
pub use params::QueryUpdate;
