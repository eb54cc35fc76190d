//! Follow-up use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/patch entry points for handler and CLI callers.
//! - Persist lifecycle engine outputs (advance, snooze, auto-escalation).
//! - Expose advisory risk without writing anything.
//!
//! # Invariants
//! - Every call is scoped to one workspace.
//! - Lifecycle rules come from `crate::lifecycle` only; nothing here
//!   re-derives them.
//! - Log events carry ids and counts only, never contact or company text.

use crate::lifecycle::{auto_escalate, plan_advance, plan_snooze};
use crate::model::followup::{
    Followup, FollowupId, FollowupPatch, FollowupStatus, FollowupValidationError, NewFollowup,
};
use crate::repo::followup_repo::{FollowupListQuery, FollowupRepository, RepoError};
use crate::view::{annotate_risk, AssessedFollowup};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for follow-up use-cases.
#[derive(Debug)]
pub enum FollowupServiceError {
    /// Caller input failed validation.
    Invalid(FollowupValidationError),
    /// Target follow-up does not exist in this workspace.
    NotFound(FollowupId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for FollowupServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "follow-up not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FollowupServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for FollowupServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

impl From<FollowupValidationError> for FollowupServiceError {
    fn from(value: FollowupValidationError) -> Self {
        Self::Invalid(value)
    }
}

pub type ServiceResult<T> = Result<T, FollowupServiceError>;

/// Result of a list refresh with auto-escalation applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    /// Workspace list after escalation patches were persisted.
    pub items: Vec<Followup>,
    /// Ids escalated to `followup` during this refresh.
    pub escalated: Vec<FollowupId>,
}

/// Follow-up service facade over repository implementations.
pub struct FollowupService<R: FollowupRepository> {
    repo: R,
}

impl<R: FollowupRepository> FollowupService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new follow-up, then reads it back.
    pub fn create(
        &self,
        workspace_id: &str,
        owner_id: &str,
        input: NewFollowup,
    ) -> ServiceResult<Followup> {
        let followup = Followup::new(workspace_id, owner_id, input)?;
        let id = self.repo.create_followup(&followup)?;
        info!(
            "event=followup_create module=service status=ok workspace_id={workspace_id} followup_id={id}"
        );
        self.require(workspace_id, &id)
    }

    pub fn get(&self, workspace_id: &str, id: &str) -> ServiceResult<Option<Followup>> {
        Ok(self.repo.get_followup(workspace_id, id)?)
    }

    /// Lists follow-ups ordered by due date descending.
    pub fn list(
        &self,
        workspace_id: &str,
        status: Option<FollowupStatus>,
    ) -> ServiceResult<Vec<Followup>> {
        let query = FollowupListQuery {
            status,
            ..FollowupListQuery::workspace(workspace_id)
        };
        Ok(self.repo.list_followups(&query)?)
    }

    /// Applies a validated partial update.
    pub fn patch(
        &self,
        workspace_id: &str,
        id: &str,
        patch: &FollowupPatch,
    ) -> ServiceResult<Followup> {
        patch.validate()?;
        let updated = self.repo.update_followup(workspace_id, id, patch)?;
        info!(
            "event=followup_patch module=service status=ok workspace_id={workspace_id} followup_id={id} new_status={}",
            updated.status
        );
        Ok(updated)
    }

    /// Moves the follow-up one step forward and persists the plan.
    pub fn advance(&self, workspace_id: &str, id: &str, today: NaiveDate) -> ServiceResult<Followup> {
        let current = self.require(workspace_id, id)?;
        let plan = plan_advance(&current, today);
        self.patch(workspace_id, id, &plan.into_patch())
    }

    /// Pushes the due date out by `days`.
    pub fn snooze(
        &self,
        workspace_id: &str,
        id: &str,
        days: i64,
        today: NaiveDate,
    ) -> ServiceResult<Followup> {
        let current = self.require(workspace_id, id)?;
        self.patch(workspace_id, id, &plan_snooze(&current, days, today))
    }

    pub fn mark_done(&self, workspace_id: &str, id: &str) -> ServiceResult<Followup> {
        self.patch(workspace_id, id, &FollowupPatch::status(FollowupStatus::Done))
    }

    pub fn reopen(&self, workspace_id: &str, id: &str) -> ServiceResult<Followup> {
        self.patch(workspace_id, id, &FollowupPatch::status(FollowupStatus::Open))
    }

    /// Escalates stale `sent`/`waiting` records and returns the fresh list.
    ///
    /// Every candidate row is checked regardless of the list limit. Records
    /// that disappear between lookup and update are skipped.
    pub fn refresh(&self, workspace_id: &str, today: NaiveDate) -> ServiceResult<RefreshOutcome> {
        let candidates = self.repo.list_escalation_candidates(workspace_id)?;

        let mut escalated = Vec::new();
        for item in &candidates {
            let Some(patch) = auto_escalate(item, today) else {
                continue;
            };
            match self.repo.update_followup(workspace_id, &item.id, &patch) {
                Ok(_) => escalated.push(item.id.clone()),
                Err(RepoError::NotFound(id)) => {
                    warn!(
                        "event=followup_escalate module=service status=skipped workspace_id={workspace_id} followup_id={id}"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(
            "event=followup_refresh module=service status=ok workspace_id={workspace_id} candidates={} escalated={}",
            candidates.len(),
            escalated.len()
        );

        let items = self
            .repo
            .list_followups(&FollowupListQuery::workspace(workspace_id))?;
        Ok(RefreshOutcome { items, escalated })
    }

    /// Risk assessment for every follow-up in the workspace. Read-only.
    pub fn assess(&self, workspace_id: &str, today: NaiveDate) -> ServiceResult<Vec<AssessedFollowup>> {
        let items = self.list(workspace_id, None)?;
        Ok(annotate_risk(&items, today))
    }

    fn require(&self, workspace_id: &str, id: &str) -> ServiceResult<Followup> {
        self.repo
            .get_followup(workspace_id, id)?
            .ok_or_else(|| FollowupServiceError::NotFound(id.to_string()))
    }
}
