//! Repository layer abstraction and persistence implementation.
//!
//! # Responsibility
//! - Define the data access contract the service layer runs on.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository writes validate titles before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
