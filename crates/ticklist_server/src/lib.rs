//! HTTP surface for ticklist.
//!
//! # Responsibility
//! - Expose task CRUD from `ticklist_core` over a small JSON API.
//! - Keep the wire contract stable for the CLI and browser clients.
//!
//! # Invariants
//! - Every mutation response carries the full stored record.
//! - Handlers never touch SQL directly; all storage access goes through the
//!   core repository and service layers.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
