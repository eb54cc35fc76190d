//! API key repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Lookups only ever match on the stored hash, never plaintext.
//! - Revocation is a soft flag (`revoked_at`); keys are never deleted.

use crate::model::account::ApiKey;
use crate::model::followup::sqlite_timestamp_now;
use crate::repo::followup_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const API_KEY_SELECT_SQL: &str = "SELECT
    id,
    key_hash,
    workspace_id,
    owner_id,
    label,
    created_at,
    revoked_at
FROM api_keys";

/// Repository interface for bearer API keys.
pub trait ApiKeyRepository {
    fn create_api_key(&self, key: &ApiKey) -> RepoResult<()>;
    /// Returns the non-revoked key with this hash, if any.
    fn find_active_by_hash(&self, key_hash: &str) -> RepoResult<Option<ApiKey>>;
    /// Marks a key revoked. Revoking twice keeps the first timestamp.
    fn revoke_api_key(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed API key repository.
pub struct SqliteApiKeyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteApiKeyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ApiKeyRepository for SqliteApiKeyRepository<'_> {
    fn create_api_key(&self, key: &ApiKey) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO api_keys (
                id,
                key_hash,
                workspace_id,
                owner_id,
                label,
                created_at,
                revoked_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                key.id.as_str(),
                key.key_hash.as_str(),
                key.workspace_id.as_str(),
                key.owner_id.as_str(),
                key.label.as_str(),
                key.created_at.as_str(),
                key.revoked_at.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn find_active_by_hash(&self, key_hash: &str) -> RepoResult<Option<ApiKey>> {
        let mut stmt = self.conn.prepare(&format!(
            "{API_KEY_SELECT_SQL}
             WHERE key_hash = ?1
               AND revoked_at IS NULL
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([key_hash])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_api_key_row(row)?));
        }
        Ok(None)
    }

    fn revoke_api_key(&self, id: &str) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM api_keys WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        self.conn.execute(
            "UPDATE api_keys
             SET revoked_at = ?2
             WHERE id = ?1
               AND revoked_at IS NULL;",
            params![id, sqlite_timestamp_now()],
        )?;
        Ok(())
    }
}

fn parse_api_key_row(row: &Row<'_>) -> RepoResult<ApiKey> {
    Ok(ApiKey {
        id: row.get("id")?,
        key_hash: row.get("key_hash")?,
        workspace_id: row.get("workspace_id")?,
        owner_id: row.get("owner_id")?,
        label: row.get("label")?,
        created_at: row.get("created_at")?,
        revoked_at: row.get("revoked_at")?,
    })
}
