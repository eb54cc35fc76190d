//! Domain model for follow-up tracking.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one record shape shared by storage, handlers and the CLI.
//!
//! # Invariants
//! - Every follow-up belongs to exactly one workspace.
//! - The core never hard-deletes follow-ups.

pub mod account;
pub mod followup;
