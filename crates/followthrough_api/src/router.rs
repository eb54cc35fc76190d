//! Request routing.
//!
//! Maps `(method, path)` onto handlers, runs authentication for protected
//! routes and decorates every response with CORS headers.

use crate::config::ApiConfig;
use crate::handlers;
use crate::response::ApiResponse;
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;
use url::form_urlencoded;

const COLLECTION_METHODS: &str = "GET, POST, OPTIONS";
const ITEM_METHODS: &str = "GET, PATCH, OPTIONS";
const ACTION_METHODS: &str = "POST, OPTIONS";
const READ_METHODS: &str = "GET, OPTIONS";

/// Minimal request shape consumed by `handle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ApiRequest {
    /// Builds a request from a method and a `path?query` target.
    ///
    /// Query pairs are form-urlencoded, so `%20` and `+` decode to spaces.
    pub fn new(method: &str, target: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method: method.trim().to_ascii_uppercase(),
            path: path.to_string(),
            query: form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Health,
    Followups,
    Refresh,
    Risk,
    Followup(&'a str),
    Advance(&'a str),
    Workspaces,
    Seed,
    DevKey,
}

impl<'a> Route<'a> {
    fn resolve(path: &'a str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["api", "health"] => Some(Self::Health),
            ["api", "followups"] => Some(Self::Followups),
            ["api", "followups", "refresh"] => Some(Self::Refresh),
            ["api", "followups", "risk"] => Some(Self::Risk),
            ["api", "followups", id] if !id.is_empty() => Some(Self::Followup(*id)),
            ["api", "followups", id, "advance"] if !id.is_empty() => Some(Self::Advance(*id)),
            ["api", "workspaces"] => Some(Self::Workspaces),
            ["api", "seed"] => Some(Self::Seed),
            ["api", "dev", "create-key"] => Some(Self::DevKey),
            _ => None,
        }
    }

    fn methods(self) -> &'static str {
        match self {
            Self::Health | Self::Risk | Self::Workspaces => READ_METHODS,
            Self::Followups => COLLECTION_METHODS,
            Self::Followup(_) => ITEM_METHODS,
            Self::Refresh | Self::Advance(_) | Self::Seed | Self::DevKey => ACTION_METHODS,
        }
    }

    fn requires_auth(self) -> bool {
        !matches!(self, Self::Health | Self::Seed | Self::DevKey)
    }
}

/// Dispatches one request. `today` feeds the lifecycle engine.
pub fn handle(conn: &Connection, config: &ApiConfig, request: &ApiRequest, today: NaiveDate) -> ApiResponse {
    let origin = request.header("Origin");
    let Some(route) = Route::resolve(&request.path) else {
        return log_response(request, ApiResponse::not_found().with_cors(origin, config, READ_METHODS));
    };

    let response = dispatch(conn, config, request, route, today);
    log_response(request, response.with_cors(origin, config, route.methods()))
}

fn dispatch(
    conn: &Connection,
    config: &ApiConfig,
    request: &ApiRequest,
    route: Route<'_>,
    today: NaiveDate,
) -> ApiResponse {
    if request.method == "OPTIONS" {
        return ApiResponse::no_content();
    }

    let ctx = if route.requires_auth() {
        match handlers::authenticate(conn, request.header("Authorization")) {
            Ok(ctx) => Some(ctx),
            Err(response) => return response,
        }
    } else {
        None
    };

    match (request.method.as_str(), route, ctx.as_ref()) {
        ("GET", Route::Health, _) => handlers::health(conn),
        ("POST", Route::DevKey, _) => handlers::create_dev_key(
            conn,
            config,
            request.header("x-dev-guard"),
            &request.body,
        ),
        ("POST", Route::Seed, _) => handlers::seed(
            conn,
            config,
            request.header("x-dev-guard"),
            &request.body,
            today,
        ),
        ("GET", Route::Workspaces, Some(ctx)) => handlers::list_workspaces(conn, ctx),
        ("GET", Route::Followups, Some(ctx)) => {
            handlers::list_followups(conn, ctx, request.query_param("status"))
        }
        ("POST", Route::Followups, Some(ctx)) => {
            handlers::create_followup(conn, ctx, &request.body)
        }
        ("GET", Route::Followup(id), Some(ctx)) => handlers::get_followup(conn, ctx, id),
        ("PATCH", Route::Followup(id), Some(ctx)) => {
            handlers::patch_followup(conn, ctx, id, &request.body)
        }
        ("POST", Route::Advance(id), Some(ctx)) => {
            handlers::advance_followup(conn, ctx, id, today)
        }
        ("POST", Route::Refresh, Some(ctx)) => handlers::refresh_followups(conn, ctx, today),
        ("GET", Route::Risk, Some(ctx)) => handlers::risk_followups(conn, ctx, today),
        _ => ApiResponse::error(405, "Method not allowed"),
    }
}

fn log_response(request: &ApiRequest, response: ApiResponse) -> ApiResponse {
    info!(
        "event=api_request module=api method={} path={} status={}",
        request.method, request.path, response.status
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_target_splits_query() {
        let request = ApiRequest::new("get", "/api/followups?status=waiting&x");
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/followups");
        assert_eq!(request.query_param("status"), Some("waiting"));
        assert_eq!(request.query_param("x"), Some(""));
        assert_eq!(request.query_param("y"), None);
    }

    #[test]
    fn query_values_are_decoded() {
        let request = ApiRequest::new("GET", "/api/followups?status=%20waiting&q=Sarah+Lim&k=a%26b");
        assert_eq!(request.query_param("status"), Some(" waiting"));
        assert_eq!(request.query_param("q"), Some("Sarah Lim"));
        assert_eq!(request.query_param("k"), Some("a&b"));
    }

    #[test]
    fn routes_resolve() {
        assert_eq!(Route::resolve("/api/health"), Some(Route::Health));
        assert_eq!(Route::resolve("/api/followups/"), Some(Route::Followups));
        assert_eq!(Route::resolve("/api/followups/risk"), Some(Route::Risk));
        assert_eq!(
            Route::resolve("/api/followups/f_1/advance"),
            Some(Route::Advance("f_1"))
        );
        assert_eq!(Route::resolve("/api/followups/f_1"), Some(Route::Followup("f_1")));
        assert_eq!(Route::resolve("/api/workspaces"), Some(Route::Workspaces));
        assert_eq!(Route::resolve("/api/seed"), Some(Route::Seed));
        assert_eq!(Route::resolve("/api/other"), None);
    }
}
