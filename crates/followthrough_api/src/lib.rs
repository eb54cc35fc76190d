//! Request handlers for the FollowThrough follow-up API.
//!
//! Handlers take an open SQLite connection and plain request data and
//! return an `ApiResponse`. Binding them to an HTTP server is left to the
//! embedding process.

pub mod config;
pub mod handlers;
pub mod response;
pub mod router;

pub use config::ApiConfig;
pub use response::ApiResponse;
pub use router::{handle, ApiRequest};
