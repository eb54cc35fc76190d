//! Response envelope and CORS decoration.
//!
//! # Invariants
//! - Error bodies are always `{ "ok": false, "error": <message> }`.
//! - Every routed response carries `Vary: Origin`.

use crate::config::ApiConfig;
use serde_json::{json, Value};

pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Accept, Authorization";
pub const CORS_MAX_AGE_SECS: &str = "86400";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![(
                "Content-Type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )],
            body: Some(body),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "ok": false, "error": message.into() }))
    }

    pub fn not_found() -> Self {
        Self::error(404, "Not found")
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Serialized body, or an empty string for 204s.
    pub fn body_text(&self) -> String {
        self.body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default()
    }

    /// Adds CORS headers for a route allowing `methods`.
    ///
    /// The request origin is echoed only when it is the configured UI origin.
    pub fn with_cors(mut self, request_origin: Option<&str>, config: &ApiConfig, methods: &str) -> Self {
        let allow_origin = match request_origin {
            Some(origin) if origin == config.ui_origin => origin,
            _ => config.ui_origin.as_str(),
        };
        self.headers.extend([
            (
                "Access-Control-Allow-Origin".to_string(),
                allow_origin.to_string(),
            ),
            ("Access-Control-Allow-Methods".to_string(), methods.to_string()),
            (
                "Access-Control-Allow-Headers".to_string(),
                CORS_ALLOW_HEADERS.to_string(),
            ),
            (
                "Access-Control-Max-Age".to_string(),
                CORS_MAX_AGE_SECS.to_string(),
            ),
            ("Vary".to_string(), "Origin".to_string()),
        ]);
        self
    }
}
