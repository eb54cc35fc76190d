//! Core domain logic for FollowThrough.
//! The lifecycle engine here is the single source of truth for status,
//! due-date and risk rules; the API and CLI crates only call into it.

pub mod db;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::account::{ApiKey, AuthContext, User, Workspace};
pub use model::followup::{
    Followup, FollowupId, FollowupPatch, FollowupStatus, FollowupValidationError, NewFollowup,
};
pub use repo::api_key_repo::{ApiKeyRepository, SqliteApiKeyRepository};
pub use repo::followup_repo::{
    FollowupListQuery, FollowupRepository, RepoError, RepoResult, SqliteFollowupRepository,
};
pub use repo::workspace_repo::{SqliteWorkspaceRepository, WorkspaceRepository};
pub use service::auth_service::{hash_api_key, AuthError, AuthService, IssuedKey};
pub use service::followup_service::{FollowupService, FollowupServiceError, RefreshOutcome};
pub use service::seed::{seed_demo, SeedOutcome, DEMO_OWNER_ID, DEMO_WORKSPACE_ID};
pub use view::{AssessedFollowup, Counters, SortDir, SortKey, StatusFilter, ViewState};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
