//! Workspace/user repository.
//!
//! Only the insert-if-missing paths needed for bootstrapping and the
//! workspace listing are provided.

use crate::model::account::{User, Workspace};
use crate::repo::followup_repo::RepoResult;
use rusqlite::{params, Connection};

pub trait WorkspaceRepository {
    /// Inserts the workspace when missing. Returns `true` when inserted.
    fn ensure_workspace(&self, workspace: &Workspace) -> RepoResult<bool>;
    /// Inserts the user when missing. Returns `true` when inserted.
    fn ensure_user(&self, user: &User) -> RepoResult<bool>;
    fn list_workspaces(&self) -> RepoResult<Vec<Workspace>>;
}

pub struct SqliteWorkspaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkspaceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WorkspaceRepository for SqliteWorkspaceRepository<'_> {
    fn ensure_workspace(&self, workspace: &Workspace) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO workspaces (id, name, created_at)
             VALUES (?1, ?2, ?3);",
            params![
                workspace.id.as_str(),
                workspace.name.as_str(),
                workspace.created_at.as_str(),
            ],
        )?;
        Ok(changed == 1)
    }

    fn ensure_user(&self, user: &User) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO users (id, workspace_id, email, display_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.as_str(),
                user.workspace_id.as_str(),
                user.email.as_str(),
                user.display_name.as_str(),
                user.created_at.as_str(),
            ],
        )?;
        Ok(changed == 1)
    }

    fn list_workspaces(&self) -> RepoResult<Vec<Workspace>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM workspaces ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut workspaces = Vec::new();
        while let Some(row) = rows.next()? {
            workspaces.push(Workspace {
                id: row.get("id")?,
                name: row.get("name")?,
                created_at: row.get("created_at")?,
            });
        }
        Ok(workspaces)
    }
}
