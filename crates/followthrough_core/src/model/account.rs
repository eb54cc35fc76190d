//! Tenant, user and API key records.
//!
//! # Responsibility
//! - Describe the workspace boundary that scopes every follow-up query.
//! - Describe bearer API keys and the auth context they resolve to.
//!
//! # Invariants
//! - Plaintext API keys are never stored; only the sha256 hex digest is.
//! - A key with `revoked_at` set never authenticates.

use serde::{Deserialize, Serialize};

/// Tenant boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// Workspace member owning follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub workspace_id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: String,
}

/// Stored API key row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// `k_<uuid>`.
    pub id: String,
    /// Lowercase sha256 hex digest of the plaintext key.
    pub key_hash: String,
    pub workspace_id: String,
    pub owner_id: String,
    pub label: String,
    pub created_at: String,
    pub revoked_at: Option<String>,
}

impl ApiKey {
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    /// Auth context granted by this key.
    pub fn auth_context(&self) -> AuthContext {
        AuthContext {
            workspace_id: self.workspace_id.clone(),
            owner_id: self.owner_id.clone(),
            api_key_id: self.id.clone(),
        }
    }
}

/// Identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub workspace_id: String,
    pub owner_id: String,
    pub api_key_id: String,
}
