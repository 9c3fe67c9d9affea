//! Bulwark-api: HTTP layer over the treasury policy engine
//!
//! Serves the treasury's read-only queries, accepts operation submissions,
//! and exposes the simulated chain clock that stamps a caller identity,
//! height, and timestamp onto each submitted operation.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, start_server};
pub use state::{AppState, SimChain};
