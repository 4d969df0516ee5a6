//! Table state controller
//!
//! Bridges a rendering engine, the URL and the server-side query:
//!
//! - [`TableController`] - live state, change events, debounced URL sync
//! - [`TableState`] / [`InitialState`] - what the controller holds and how it
//!   is seeded
//! - [`TableOptions`] / [`TableEngine`] - the configuration handed to the
//!   rendering engine
//! - [`Navigator`] - the routing layer, with an in-memory implementation

mod config;
mod controller;
mod navigation;
mod options;
mod state;
mod sync;
mod update;

pub use config::TableConfig;
pub use controller::*;
pub use navigation::*;
pub use options::*;
pub use state::*;
pub use update::StateUpdate;
