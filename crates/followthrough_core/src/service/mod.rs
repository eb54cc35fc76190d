//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and lifecycle engine outputs into
//!   use-case level APIs.
//! - Keep handler and CLI layers decoupled from storage details.

pub mod auth_service;
pub mod followup_service;
pub mod seed;
