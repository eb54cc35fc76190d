//! Follow-up domain model.
//!
//! # Responsibility
//! - Define the canonical follow-up record and its ordered status set.
//! - Define the partial patch shape accepted by write paths.
//! - Validate caller input before it reaches persistence.
//!
//! # Invariants
//! - `status` is always one of the five `FollowupStatus` values.
//! - `id` and `created_at` are assigned once at creation and never mutated.
//! - Only `status`, `due_at` and `next_step` are mutable after creation.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid due date regex"));

/// Opaque follow-up identifier (`f_<uuid>`).
pub type FollowupId = String;

/// Ordered follow-up lifecycle state.
///
/// Declaration order matches the forward progression used by the
/// lifecycle engine; `Done` is terminal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FollowupStatus {
    /// Newly captured, nothing sent yet.
    #[default]
    Open,
    /// First message sent to the contact.
    Sent,
    /// Waiting for the contact to respond.
    Waiting,
    /// Needs an active follow-up from the owner.
    Followup,
    /// Closed.
    Done,
}

impl FollowupStatus {
    /// Wire/storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Sent => "sent",
            Self::Waiting => "waiting",
            Self::Followup => "followup",
            Self::Done => "done",
        }
    }

    /// Human-readable label for list rendering.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Sent => "Sent",
            Self::Waiting => "Waiting",
            Self::Followup => "Follow-up",
            Self::Done => "Done",
        }
    }

    /// Strict parse; trims and ignores ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "sent" => Some(Self::Sent),
            "waiting" => Some(Self::Waiting),
            "followup" => Some(Self::Followup),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Fail-soft parse: anything unrecognized is treated as `Open`.
    pub fn parse_lenient(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Open)
    }
}

impl Display for FollowupStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for follow-up writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowupValidationError {
    /// Required text field is blank after trim.
    BlankField(&'static str),
    /// `due_at` is not a real `YYYY-MM-DD` calendar date.
    InvalidDueDate(String),
    /// Patch carries no fields.
    EmptyPatch,
}

impl Display for FollowupValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidDueDate(value) => {
                write!(f, "due date `{value}` is not a valid YYYY-MM-DD date")
            }
            Self::EmptyPatch => write!(f, "no fields to update"),
        }
    }
}

impl Error for FollowupValidationError {}

/// Canonical follow-up record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Followup {
    pub id: FollowupId,
    /// Tenant boundary; every query is scoped to one workspace.
    pub workspace_id: String,
    pub owner_id: String,
    pub contact_name: String,
    pub company_name: String,
    pub next_step: String,
    /// Raw stored due date, normally `YYYY-MM-DD`. Kept as text so that
    /// malformed legacy values still load and classify as "No date".
    pub due_at: String,
    pub status: FollowupStatus,
    /// `YYYY-MM-DD HH:MM:SS` in UTC.
    pub created_at: String,
}

impl Followup {
    /// Builds a new record from validated input with a generated id and
    /// creation timestamp.
    pub fn new(
        workspace_id: impl Into<String>,
        owner_id: impl Into<String>,
        input: NewFollowup,
    ) -> Result<Self, FollowupValidationError> {
        input.validate()?;
        let followup = Self {
            id: new_followup_id(),
            workspace_id: workspace_id.into(),
            owner_id: owner_id.into(),
            contact_name: input.contact_name.trim().to_string(),
            company_name: input.company_name.trim().to_string(),
            next_step: input.next_step.trim().to_string(),
            due_at: input.due_at.trim().to_string(),
            status: input.status.unwrap_or_default(),
            created_at: sqlite_timestamp_now(),
        };
        followup.validate()?;
        Ok(followup)
    }

    /// Checks identity, tenant and required text fields plus the due date.
    pub fn validate(&self) -> Result<(), FollowupValidationError> {
        require_text("id", &self.id)?;
        require_text("workspace_id", &self.workspace_id)?;
        require_text("owner_id", &self.owner_id)?;
        require_text("contact_name", &self.contact_name)?;
        require_text("company_name", &self.company_name)?;
        require_text("next_step", &self.next_step)?;
        validate_due_date(&self.due_at)?;
        Ok(())
    }

    /// Returns whether the record reached the terminal state.
    pub fn is_done(&self) -> bool {
        self.status == FollowupStatus::Done
    }
}

/// Create input for one follow-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFollowup {
    pub contact_name: String,
    pub company_name: String,
    pub next_step: String,
    pub due_at: String,
    #[serde(default)]
    pub status: Option<FollowupStatus>,
}

impl NewFollowup {
    pub fn validate(&self) -> Result<(), FollowupValidationError> {
        require_text("contact_name", &self.contact_name)?;
        require_text("company_name", &self.company_name)?;
        require_text("next_step", &self.next_step)?;
        validate_due_date(&self.due_at)?;
        Ok(())
    }
}

/// Partial update for the mutable follow-up fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FollowupStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
}

impl FollowupPatch {
    pub fn status(status: FollowupStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn due_at(due_at: impl Into<String>) -> Self {
        Self {
            due_at: Some(due_at.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.due_at.is_none() && self.next_step.is_none()
    }

    /// Rejects empty patches, blank next steps and malformed due dates.
    pub fn validate(&self) -> Result<(), FollowupValidationError> {
        if self.is_empty() {
            return Err(FollowupValidationError::EmptyPatch);
        }
        if let Some(next_step) = self.next_step.as_deref() {
            require_text("next_step", next_step)?;
        }
        if let Some(due_at) = self.due_at.as_deref() {
            validate_due_date(due_at)?;
        }
        Ok(())
    }

    /// Applies present fields onto `followup` in place.
    pub fn apply_to(&self, followup: &mut Followup) {
        if let Some(status) = self.status {
            followup.status = status;
        }
        if let Some(due_at) = self.due_at.as_deref() {
            followup.due_at = due_at.trim().to_string();
        }
        if let Some(next_step) = self.next_step.as_deref() {
            followup.next_step = next_step.trim().to_string();
        }
    }
}

/// Generates a new `f_<uuid>` follow-up id.
pub fn new_followup_id() -> FollowupId {
    format!("f_{}", Uuid::new_v4())
}

/// Current UTC time in SQLite-friendly `YYYY-MM-DD HH:MM:SS` form.
pub fn sqlite_timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn require_text(field: &'static str, value: &str) -> Result<(), FollowupValidationError> {
    if value.trim().is_empty() {
        return Err(FollowupValidationError::BlankField(field));
    }
    Ok(())
}

fn validate_due_date(value: &str) -> Result<(), FollowupValidationError> {
    let trimmed = value.trim();
    let valid = DUE_DATE_RE.is_match(trimmed)
        && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok();
    if !valid {
        return Err(FollowupValidationError::InvalidDueDate(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Followup, FollowupPatch, FollowupStatus, FollowupValidationError, NewFollowup};
    use serde_json::json;

    fn input() -> NewFollowup {
        NewFollowup {
            contact_name: "Alice Example".to_string(),
            company_name: "Example GmbH".to_string(),
            next_step: "Send intro email".to_string(),
            due_at: "2026-01-10".to_string(),
            status: None,
        }
    }

    #[test]
    fn lenient_parse_defaults_unknown_values_to_open() {
        assert_eq!(FollowupStatus::parse_lenient("Overdue"), FollowupStatus::Open);
        assert_eq!(FollowupStatus::parse_lenient(" WAITING "), FollowupStatus::Waiting);
        assert_eq!(FollowupStatus::parse("due today"), None);
    }

    #[test]
    fn new_input_rejects_blank_fields_and_bad_dates() {
        let mut blank = input();
        blank.company_name = "   ".to_string();
        assert_eq!(
            blank.validate(),
            Err(FollowupValidationError::BlankField("company_name"))
        );

        let mut bad_date = input();
        bad_date.due_at = "2026-02-30".to_string();
        assert!(matches!(
            bad_date.validate(),
            Err(FollowupValidationError::InvalidDueDate(_))
        ));

        assert!(input().validate().is_ok());
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert_eq!(
            FollowupPatch::default().validate(),
            Err(FollowupValidationError::EmptyPatch)
        );
        assert!(FollowupPatch::status(FollowupStatus::Done).validate().is_ok());
    }

    #[test]
    fn followup_serializes_with_camel_case_keys() {
        let followup = Followup::new("w_demo", "u_demo", input()).unwrap();
        let value = serde_json::to_value(&followup).unwrap();

        assert_eq!(value["workspaceId"], json!("w_demo"));
        assert_eq!(value["contactName"], json!("Alice Example"));
        assert_eq!(value["dueAt"], json!("2026-01-10"));
        assert_eq!(value["status"], json!("open"));
        assert!(value.get("due_at").is_none());
        assert_eq!(serde_json::from_value::<Followup>(value).unwrap(), followup);
    }

    #[test]
    fn patch_json_omits_absent_fields() {
        let patch = FollowupPatch {
            due_at: Some("2026-01-13".to_string()),
            ..FollowupPatch::status(FollowupStatus::Waiting)
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "status": "waiting", "dueAt": "2026-01-13" })
        );

        let parsed: FollowupPatch = serde_json::from_str(r#"{"nextStep":"Call back"}"#).unwrap();
        assert_eq!(parsed.next_step.as_deref(), Some("Call back"));
        assert!(parsed.status.is_none());
        assert!(serde_json::from_str::<FollowupPatch>(r#"{"status":"late"}"#).is_err());
    }
}
