//! Demo data bootstrap.
//!
//! Inserts a workspace, one user and three sample follow-ups. Workspace
//! and user inserts are idempotent; follow-ups always get fresh ids.

use crate::lifecycle::{add_days, format_date};
use crate::model::account::{User, Workspace};
use crate::model::followup::{sqlite_timestamp_now, FollowupId, FollowupStatus, NewFollowup};
use crate::repo::followup_repo::FollowupRepository;
use crate::repo::workspace_repo::WorkspaceRepository;
use crate::service::followup_service::{FollowupService, ServiceResult};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

/// Workspace the demo data lands in unless a caller picks another.
pub const DEMO_WORKSPACE_ID: &str = "w_demo";
pub const DEMO_OWNER_ID: &str = "u_demo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedOutcome {
    pub workspace_created: bool,
    pub user_created: bool,
    pub inserted: Vec<FollowupId>,
}

const DEMO_ROWS: &[(&str, &str, &str, i64, FollowupStatus)] = &[
    (
        "Sarah Lim",
        "Brightline Retail",
        "Send pricing summary",
        -2,
        FollowupStatus::Sent,
    ),
    (
        "Miguel Ortiz",
        "AltoSoft",
        "Schedule demo",
        0,
        FollowupStatus::Open,
    ),
    (
        "Priya Nair",
        "Northwind Logistics",
        "Confirm stakeholders",
        3,
        FollowupStatus::Waiting,
    ),
];

pub fn seed_demo<W, F>(
    workspaces: &W,
    followups: &FollowupService<F>,
    workspace_id: &str,
    owner_id: &str,
    today: NaiveDate,
) -> ServiceResult<SeedOutcome>
where
    W: WorkspaceRepository,
    F: FollowupRepository,
{
    let now = sqlite_timestamp_now();
    let workspace_created = workspaces.ensure_workspace(&Workspace {
        id: workspace_id.to_string(),
        name: "Demo Workspace".to_string(),
        created_at: now.clone(),
    })?;
    let user_created = workspaces.ensure_user(&User {
        id: owner_id.to_string(),
        workspace_id: workspace_id.to_string(),
        email: "alex@followthrough.demo".to_string(),
        display_name: "Alex".to_string(),
        created_at: now,
    })?;

    let mut inserted = Vec::with_capacity(DEMO_ROWS.len());
    for &(contact, company, next_step, offset, status) in DEMO_ROWS {
        let created = followups.create(
            workspace_id,
            owner_id,
            NewFollowup {
                contact_name: contact.to_string(),
                company_name: company.to_string(),
                next_step: next_step.to_string(),
                due_at: format_date(add_days(today, offset)),
                status: Some(status),
            },
        )?;
        inserted.push(created.id);
    }

    info!(
        "event=seed_demo module=service status=ok workspace_id={workspace_id} inserted={}",
        inserted.len()
    );
    Ok(SeedOutcome {
        workspace_created,
        user_created,
        inserted,
    })
}
