//! Follow-up repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide workspace-scoped create/get/list/update over `followups`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every read and write is constrained by `workspace_id`.
//! - Write paths validate input before SQL mutations.
//! - Updates touch only `status`, `due_at` and `next_step`, then read back.
//! - Unknown persisted statuses load as `open` instead of failing the read.

use crate::db::DbError;
use crate::model::followup::{
    Followup, FollowupId, FollowupPatch, FollowupStatus, FollowupValidationError,
};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FOLLOWUP_SELECT_SQL: &str = "SELECT
    id,
    workspace_id,
    owner_id,
    contact_name,
    company_name,
    next_step,
    due_at,
    status,
    created_at
FROM followups";

pub const FOLLOWUPS_DEFAULT_LIMIT: u32 = 100;
pub const FOLLOWUPS_LIMIT_MAX: u32 = 500;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(FollowupValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<FollowupValidationError> for RepoError {
    fn from(value: FollowupValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing follow-ups of one workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowupListQuery {
    pub workspace_id: String,
    /// `None` lists every status.
    pub status: Option<FollowupStatus>,
    /// Defaults to 100 and clamps to 500.
    pub limit: Option<u32>,
}

impl FollowupListQuery {
    pub fn workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            ..Self::default()
        }
    }
}

/// Repository interface for follow-up persistence.
pub trait FollowupRepository {
    fn create_followup(&self, followup: &Followup) -> RepoResult<FollowupId>;
    fn get_followup(&self, workspace_id: &str, id: &str) -> RepoResult<Option<Followup>>;
    /// Ordered `due_at DESC, id ASC`.
    fn list_followups(&self, query: &FollowupListQuery) -> RepoResult<Vec<Followup>>;
    /// Every `sent`/`waiting` row of the workspace, unbounded, ordered
    /// `due_at ASC, id ASC`.
    fn list_escalation_candidates(&self, workspace_id: &str) -> RepoResult<Vec<Followup>>;
    /// Applies `patch` and returns the stored record, or `NotFound`.
    fn update_followup(
        &self,
        workspace_id: &str,
        id: &str,
        patch: &FollowupPatch,
    ) -> RepoResult<Followup>;
}

/// SQLite-backed follow-up repository.
pub struct SqliteFollowupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFollowupRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FollowupRepository for SqliteFollowupRepository<'_> {
    fn create_followup(&self, followup: &Followup) -> RepoResult<FollowupId> {
        followup.validate()?;

        self.conn.execute(
            "INSERT INTO followups (
                id,
                workspace_id,
                owner_id,
                contact_name,
                company_name,
                next_step,
                due_at,
                status,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                followup.id.as_str(),
                followup.workspace_id.as_str(),
                followup.owner_id.as_str(),
                followup.contact_name.as_str(),
                followup.company_name.as_str(),
                followup.next_step.as_str(),
                followup.due_at.as_str(),
                followup.status.as_str(),
                followup.created_at.as_str(),
            ],
        )?;

        Ok(followup.id.clone())
    }

    fn get_followup(&self, workspace_id: &str, id: &str) -> RepoResult<Option<Followup>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FOLLOWUP_SELECT_SQL}
             WHERE id = ?1
               AND workspace_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id, workspace_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_followup_row(row)?));
        }

        Ok(None)
    }

    fn list_followups(&self, query: &FollowupListQuery) -> RepoResult<Vec<Followup>> {
        let mut sql = format!("{FOLLOWUP_SELECT_SQL} WHERE workspace_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.workspace_id.clone())];

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY due_at DESC, id ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_followup_limit(
            query.limit,
        ))));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut followups = Vec::new();

        while let Some(row) = rows.next()? {
            followups.push(parse_followup_row(row)?);
        }

        Ok(followups)
    }

    fn list_escalation_candidates(&self, workspace_id: &str) -> RepoResult<Vec<Followup>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FOLLOWUP_SELECT_SQL}
             WHERE workspace_id = ?1
               AND status IN (?2, ?3)
             ORDER BY due_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![
            workspace_id,
            FollowupStatus::Sent.as_str(),
            FollowupStatus::Waiting.as_str(),
        ])?;
        let mut followups = Vec::new();
        while let Some(row) = rows.next()? {
            followups.push(parse_followup_row(row)?);
        }

        Ok(followups)
    }

    fn update_followup(
        &self,
        workspace_id: &str,
        id: &str,
        patch: &FollowupPatch,
    ) -> RepoResult<Followup> {
        patch.validate()?;

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(status) = patch.status {
            assignments.push("status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(due_at) = patch.due_at.as_deref() {
            assignments.push("due_at = ?");
            bind_values.push(Value::Text(due_at.trim().to_string()));
        }
        if let Some(next_step) = patch.next_step.as_deref() {
            assignments.push("next_step = ?");
            bind_values.push(Value::Text(next_step.trim().to_string()));
        }
        bind_values.push(Value::Text(id.to_string()));
        bind_values.push(Value::Text(workspace_id.to_string()));

        let sql = format!(
            "UPDATE followups SET {} WHERE id = ? AND workspace_id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        self.get_followup(workspace_id, id)?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }
}

/// Normalizes list limit according to the list contract.
pub fn normalize_followup_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => FOLLOWUPS_DEFAULT_LIMIT,
        Some(value) if value > FOLLOWUPS_LIMIT_MAX => FOLLOWUPS_LIMIT_MAX,
        Some(value) => value,
    }
}

fn parse_followup_row(row: &Row<'_>) -> RepoResult<Followup> {
    let id: String = row.get("id")?;
    if id.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "empty id in followups.id".to_string(),
        ));
    }

    let status_text: String = row.get("status")?;
    let status = match FollowupStatus::parse(&status_text) {
        Some(status) => status,
        None => {
            warn!(
                "event=followup_status_fallback module=repo status=warn followup_id={id} stored_status_len={}",
                status_text.len()
            );
            FollowupStatus::Open
        }
    };

    Ok(Followup {
        id,
        workspace_id: row.get("workspace_id")?,
        owner_id: row.get("owner_id")?,
        contact_name: row.get("contact_name")?,
        company_name: row.get("company_name")?,
        next_step: row.get("next_step")?,
        due_at: row.get("due_at")?,
        status,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::normalize_followup_limit;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_followup_limit(None), 100);
        assert_eq!(normalize_followup_limit(Some(0)), 100);
        assert_eq!(normalize_followup_limit(Some(25)), 25);
        assert_eq!(normalize_followup_limit(Some(10_000)), 500);
    }
}
