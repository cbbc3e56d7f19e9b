//! Domain model for the task tracker.
//!
//! # Responsibility
//! - Define the canonical task record and its write-side inputs.
//! - Keep one wire-compatible shape shared by server and client.
//!
//! # Invariants
//! - Every task is identified by a stable storage-assigned `TaskId`.
//! - Deletion is represented by soft-delete tombstones, not hard delete.

pub mod task;
