//! Process configuration, read once from the environment and injected into
//! the server and the chat client.

use std::env;
use std::path::PathBuf;

use crate::gemini::DEFAULT_GEMINI_BASE_URL;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_LANGUAGE: &str = "en";

/// Advisory server configuration. The API key is optional here on purpose:
/// its absence is surfaced as a per-request configuration error, not a
/// startup crash.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
}

impl ServerConfig {
    pub fn from_env(port: u16) -> Self {
        Self {
            port,
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_base_url: env::var("SHOPSCOUT_GEMINI_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
        }
    }
}

/// Chat client configuration. `language` is the explicit override; when
/// absent, the persisted preference (or the default) applies.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub language: Option<String>,
    pub prefs_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env(server: Option<String>, language: Option<String>) -> Self {
        Self {
            server_url: server.unwrap_or_else(|| {
                format!("http://127.0.0.1:{DEFAULT_PORT}")
            }),
            language,
            prefs_path: env::var("SHOPSCOUT_PREFS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".shopscout-language")),
        }
    }
}
