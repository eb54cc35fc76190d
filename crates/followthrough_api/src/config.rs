//! Handler-layer configuration.

pub const DEFAULT_UI_ORIGIN: &str = "https://followthrough-ui.pages.dev";
pub const UI_ORIGIN_ENV: &str = "FOLLOWTHROUGH_UI_ORIGIN";
pub const DEV_GUARD_ENV: &str = "FOLLOWTHROUGH_DEV_GUARD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Origin echoed in CORS headers.
    pub ui_origin: String,
    /// Shared secret for the dev key endpoint. `None` disables it.
    pub dev_guard: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            ui_origin: DEFAULT_UI_ORIGIN.to_string(),
            dev_guard: None,
        }
    }
}

impl ApiConfig {
    /// Reads `FOLLOWTHROUGH_UI_ORIGIN` and `FOLLOWTHROUGH_DEV_GUARD`.
    /// Blank values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            ui_origin: non_blank_env(UI_ORIGIN_ENV)
                .unwrap_or_else(|| DEFAULT_UI_ORIGIN.to_string()),
            dev_guard: non_blank_env(DEV_GUARD_ENV),
        }
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
