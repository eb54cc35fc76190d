//! Bearer API key authentication.
//!
//! # Responsibility
//! - Resolve `Authorization: Bearer <key>` headers to an `AuthContext`.
//! - Issue and revoke API keys.
//!
//! # Invariants
//! - Plaintext keys are returned once at issue time and never stored.
//! - Keys shorter than `MIN_API_KEY_LEN` are rejected before any lookup.

use crate::model::account::{ApiKey, AuthContext};
use crate::model::followup::sqlite_timestamp_now;
use crate::repo::api_key_repo::ApiKeyRepository;
use crate::repo::followup_repo::RepoError;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const MIN_API_KEY_LEN: usize = 16;

static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Bearer\s+(.+)$").expect("valid bearer regex"));

#[derive(Debug)]
pub enum AuthError {
    /// Header absent or not in `Bearer <key>` form.
    MissingBearer,
    /// Key too short to be one we issued.
    InvalidKey,
    /// No active key matches.
    UnknownKey,
    /// Revocation target does not exist.
    KeyNotFound(String),
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBearer => write!(f, "Missing Authorization: Bearer <apiKey>"),
            Self::InvalidKey => write!(f, "Invalid API key"),
            Self::UnknownKey => write!(f, "Invalid or revoked API key"),
            Self::KeyNotFound(id) => write!(f, "api key not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::KeyNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Freshly issued key. `api_key` is the only copy of the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedKey {
    pub id: String,
    pub api_key: String,
    pub workspace_id: String,
    pub owner_id: String,
    pub label: String,
}

pub struct AuthService<R: ApiKeyRepository> {
    repo: R,
}

impl<R: ApiKeyRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Resolves an `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<AuthContext, AuthError> {
        let header = authorization.unwrap_or_default().trim();
        let api_key = BEARER_RE
            .captures(header)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .ok_or(AuthError::MissingBearer)?;
        self.authenticate_key(api_key)
    }

    /// Resolves a bare plaintext key.
    pub fn authenticate_key(&self, api_key: &str) -> Result<AuthContext, AuthError> {
        let api_key = api_key.trim();
        if api_key.len() < MIN_API_KEY_LEN {
            return Err(AuthError::InvalidKey);
        }

        match self.repo.find_active_by_hash(&hash_api_key(api_key))? {
            Some(key) => Ok(key.auth_context()),
            None => {
                warn!("event=auth module=service status=denied reason=unknown_key");
                Err(AuthError::UnknownKey)
            }
        }
    }

    pub fn issue_key(
        &self,
        workspace_id: &str,
        owner_id: &str,
        label: &str,
    ) -> Result<IssuedKey, AuthError> {
        let plaintext = format!("vd_{}", Uuid::new_v4().simple());
        let key = ApiKey {
            id: format!("k_{}", Uuid::new_v4()),
            key_hash: hash_api_key(&plaintext),
            workspace_id: workspace_id.to_string(),
            owner_id: owner_id.to_string(),
            label: label.to_string(),
            created_at: sqlite_timestamp_now(),
            revoked_at: None,
        };
        self.repo.create_api_key(&key)?;
        info!(
            "event=api_key_issue module=service status=ok key_id={} workspace_id={workspace_id}",
            key.id
        );

        Ok(IssuedKey {
            id: key.id,
            api_key: plaintext,
            workspace_id: key.workspace_id,
            owner_id: key.owner_id,
            label: key.label,
        })
    }

    pub fn revoke_key(&self, id: &str) -> Result<(), AuthError> {
        self.repo.revoke_api_key(id)?;
        info!("event=api_key_revoke module=service status=ok key_id={id}");
        Ok(())
    }
}

/// Lowercase sha256 hex digest of a plaintext key.
pub fn hash_api_key(plaintext: &str) -> String {
    format!("{:x}", Sha256::digest(plaintext.as_bytes()))
}
