//! Shared server state.
//!
//! # Responsibility
//! - Own the SQLite connection shared across request handlers.
//!
//! # Invariants
//! - The connection is only touched while the mutex is held, so store calls
//!   never interleave.

use rusqlite::Connection;
use tokio::sync::Mutex;

/// State handed to every handler through the router.
pub struct AppState {
    /// Single writer connection; SQLite serializes per-record writes itself,
    /// the mutex keeps rusqlite usage single-threaded.
    pub conn: Mutex<Connection>,
}

impl AppState {
    /// Wraps an already-migrated connection for handler use.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}
