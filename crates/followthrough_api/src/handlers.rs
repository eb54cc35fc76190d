//! Follow-up HTTP handlers, transport-agnostic.
//!
//! # Responsibility
//! - Translate JSON bodies into core service calls and back.
//! - Map service failures to status codes.
//!
//! # Invariants
//! - Workspace and owner always come from the authenticated key; ids in
//!   request bodies are ignored.
//! - Handlers never panic; storage failures become 500 responses.

use crate::config::ApiConfig;
use crate::response::ApiResponse;
use chrono::NaiveDate;
use followthrough_core::{
    seed_demo, AuthContext, AuthError, AuthService, FollowupPatch, FollowupService,
    FollowupServiceError, FollowupStatus, NewFollowup, SqliteApiKeyRepository,
    SqliteFollowupRepository, SqliteWorkspaceRepository, StatusFilter, WorkspaceRepository,
    DEMO_OWNER_ID, DEMO_WORKSPACE_ID,
};
use log::{error, warn};
use rusqlite::Connection;
use serde_json::{json, Map, Value};

const DEV_KEY_DEFAULT_LABEL: &str = "dev";

/// Resolves the bearer header or returns the 401/403 response to send.
pub fn authenticate(conn: &Connection, authorization: Option<&str>) -> Result<AuthContext, ApiResponse> {
    let auth = AuthService::new(SqliteApiKeyRepository::new(conn));
    auth.authenticate(authorization).map_err(|err| match err {
        AuthError::MissingBearer => ApiResponse::error(401, err.to_string()),
        AuthError::InvalidKey | AuthError::UnknownKey => {
            ApiResponse::error(403, "Invalid or revoked API key")
        }
        other => internal_error("authenticate", &other),
    })
}

pub fn health(conn: &Connection) -> ApiResponse {
    match conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0)) {
        Ok(_) => ApiResponse::ok(json!({ "ok": true })),
        Err(err) => internal_error("health", &err),
    }
}

/// `status` of `None` or `all` lists every status.
pub fn list_followups(conn: &Connection, ctx: &AuthContext, status: Option<&str>) -> ApiResponse {
    let filter = match status.map(StatusFilter::parse) {
        None => StatusFilter::All,
        Some(Some(filter)) => filter,
        Some(None) => return ApiResponse::error(400, "Invalid status"),
    };
    let status = match filter {
        StatusFilter::All => None,
        StatusFilter::Only(status) => Some(status),
    };

    match followups(conn).list(&ctx.workspace_id, status) {
        Ok(items) => ApiResponse::ok(json!({ "items": items })),
        Err(err) => service_error("list_followups", err),
    }
}

pub fn get_followup(conn: &Connection, ctx: &AuthContext, id: &str) -> ApiResponse {
    match followups(conn).get(&ctx.workspace_id, id) {
        Ok(Some(item)) => ApiResponse::ok(json!({ "item": item })),
        Ok(None) => ApiResponse::not_found(),
        Err(err) => service_error("get_followup", err),
    }
}

pub fn create_followup(conn: &Connection, ctx: &AuthContext, body: &str) -> ApiResponse {
    let fields = match parse_object(body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let required = ["contactName", "companyName", "nextStep", "dueAt"].map(|key| text_field(&fields, key));
    let [Some(contact_name), Some(company_name), Some(next_step), Some(due_at)] = required else {
        return ApiResponse::error(400, "Missing required fields");
    };
    let input = NewFollowup {
        contact_name,
        company_name,
        next_step,
        due_at,
        status: text_field(&fields, "status").map(|value| FollowupStatus::parse_lenient(&value)),
    };

    match followups(conn).create(&ctx.workspace_id, &ctx.owner_id, input) {
        Ok(item) => ApiResponse::ok(json!({ "ok": true, "id": item.id })),
        Err(err) => service_error("create_followup", err),
    }
}

/// Applies `status`, `dueAt` and `nextStep` from the body. Other keys are ignored.
pub fn patch_followup(conn: &Connection, ctx: &AuthContext, id: &str, body: &str) -> ApiResponse {
    let fields = match parse_object(body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let status = match fields.get("status").and_then(Value::as_str) {
        None => None,
        Some(raw) => match FollowupStatus::parse(raw) {
            Some(status) => Some(status),
            None => return ApiResponse::error(400, "Invalid status"),
        },
    };
    let patch = FollowupPatch {
        status,
        due_at: fields.get("dueAt").and_then(Value::as_str).map(str::to_string),
        next_step: fields
            .get("nextStep")
            .and_then(Value::as_str)
            .map(str::to_string),
    };
    if patch.is_empty() {
        return ApiResponse::error(400, "No fields to update");
    }

    match followups(conn).patch(&ctx.workspace_id, id, &patch) {
        Ok(item) => ApiResponse::ok(json!({ "item": item })),
        Err(err) => service_error("patch_followup", err),
    }
}

pub fn advance_followup(conn: &Connection, ctx: &AuthContext, id: &str, today: NaiveDate) -> ApiResponse {
    match followups(conn).advance(&ctx.workspace_id, id, today) {
        Ok(item) => ApiResponse::ok(json!({ "item": item })),
        Err(err) => service_error("advance_followup", err),
    }
}

pub fn refresh_followups(conn: &Connection, ctx: &AuthContext, today: NaiveDate) -> ApiResponse {
    match followups(conn).refresh(&ctx.workspace_id, today) {
        Ok(outcome) => ApiResponse::ok(json!({
            "items": outcome.items,
            "escalated": outcome.escalated,
        })),
        Err(err) => service_error("refresh_followups", err),
    }
}

pub fn risk_followups(conn: &Connection, ctx: &AuthContext, today: NaiveDate) -> ApiResponse {
    match followups(conn).assess(&ctx.workspace_id, today) {
        Ok(items) => ApiResponse::ok(json!({ "items": items })),
        Err(err) => service_error("risk_followups", err),
    }
}

/// Issues a key when `guard` matches the configured dev guard.
///
/// Responds 404 when no guard is configured so the route stays invisible.
pub fn create_dev_key(conn: &Connection, config: &ApiConfig, guard: Option<&str>, body: &str) -> ApiResponse {
    if let Err(response) = check_dev_guard(config, guard, "dev_key") {
        return response;
    }
    let fields = match parse_optional_object(body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    let (workspace_id, owner_id) = demo_scope(&fields);
    let label = text_field(&fields, "label").unwrap_or_else(|| DEV_KEY_DEFAULT_LABEL.to_string());

    let auth = AuthService::new(SqliteApiKeyRepository::new(conn));
    match auth.issue_key(&workspace_id, &owner_id, &label) {
        Ok(issued) => ApiResponse::ok(json!({
            "ok": true,
            "apiKey": issued.api_key,
            "id": issued.id,
            "workspaceId": issued.workspace_id,
            "ownerId": issued.owner_id,
        })),
        Err(err) => internal_error("create_dev_key", &err),
    }
}

/// Lists the caller's workspace. Other tenants stay invisible.
pub fn list_workspaces(conn: &Connection, ctx: &AuthContext) -> ApiResponse {
    match SqliteWorkspaceRepository::new(conn).list_workspaces() {
        Ok(rows) => {
            let workspaces: Vec<_> = rows
                .into_iter()
                .filter(|workspace| workspace.id == ctx.workspace_id)
                .collect();
            ApiResponse::ok(json!({ "workspaces": workspaces }))
        }
        Err(err) => internal_error("list_workspaces", &err),
    }
}

/// Inserts the demo workspace, user and follow-ups. Guarded like
/// `create_dev_key`.
pub fn seed(
    conn: &Connection,
    config: &ApiConfig,
    guard: Option<&str>,
    body: &str,
    today: NaiveDate,
) -> ApiResponse {
    if let Err(response) = check_dev_guard(config, guard, "seed") {
        return response;
    }
    let fields = match parse_optional_object(body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    let (workspace_id, owner_id) = demo_scope(&fields);

    let workspaces = SqliteWorkspaceRepository::new(conn);
    match seed_demo(&workspaces, &followups(conn), &workspace_id, &owner_id, today) {
        Ok(outcome) => ApiResponse::ok(json!({
            "seeded": true,
            "workspaceId": workspace_id,
            "inserted": outcome.inserted,
        })),
        Err(err) => service_error("seed", err),
    }
}

/// 404 unless a dev guard is configured and `guard` matches it.
fn check_dev_guard(config: &ApiConfig, guard: Option<&str>, handler: &str) -> Result<(), ApiResponse> {
    let Some(expected) = config.dev_guard.as_deref() else {
        return Err(ApiResponse::not_found());
    };
    if guard.map(str::trim) != Some(expected) {
        warn!("event=dev_guard module=api status=denied handler={handler}");
        return Err(ApiResponse::not_found());
    }
    Ok(())
}

fn demo_scope(fields: &Map<String, Value>) -> (String, String) {
    let workspace_id = text_field(fields, "workspaceId").unwrap_or_else(|| DEMO_WORKSPACE_ID.to_string());
    let owner_id = text_field(fields, "ownerId").unwrap_or_else(|| DEMO_OWNER_ID.to_string());
    (workspace_id, owner_id)
}

fn followups(conn: &Connection) -> FollowupService<SqliteFollowupRepository<'_>> {
    FollowupService::new(SqliteFollowupRepository::new(conn))
}

fn parse_object(body: &str) -> Result<Map<String, Value>, ApiResponse> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        _ => Err(ApiResponse::error(400, "Invalid JSON body")),
    }
}

/// Like `parse_object`, but an empty body is an empty object.
fn parse_optional_object(body: &str) -> Result<Map<String, Value>, ApiResponse> {
    if body.trim().is_empty() {
        return Ok(Map::new());
    }
    parse_object(body)
}

/// Non-blank string field, trimmed.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn service_error(handler: &str, err: FollowupServiceError) -> ApiResponse {
    match err {
        FollowupServiceError::Invalid(invalid) => ApiResponse::error(400, invalid.to_string()),
        FollowupServiceError::NotFound(_) => ApiResponse::not_found(),
        FollowupServiceError::Repo(repo) => internal_error(handler, &repo),
    }
}

fn internal_error(handler: &str, err: &dyn std::error::Error) -> ApiResponse {
    error!("event=api_error module=api status=error handler={handler} error={err}");
    ApiResponse::error(500, err.to_string())
}
