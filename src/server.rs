//! The advisory HTTP service: accepts a conversation transcript, forwards it
//! to Gemini behind the fixed advisory prompt, enriches any recommendation
//! envelope with shopping links, and answers in an OpenAI-shaped body.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use crate::config::{ServerConfig, DEFAULT_LANGUAGE};
use crate::envelope::try_parse_envelope;
use crate::gemini::{GeminiClient, ProviderError};
use crate::links::{LinkTable, DEFAULT_LINK_TABLE};
use crate::prompt::system_prompt;
use crate::types::{ConversationTurn, Role};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    links: Arc<LinkTable>,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig, links: LinkTable) -> Self {
        Self {
            config: Arc::new(config),
            links: Arc::new(links),
            http: reqwest::Client::new(),
        }
    }
}

/// Request body from the chat client.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationTurn>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Success body, kept OpenAI-shaped for generic chat-completion consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: AssistantTurn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantTurn {
    pub content: String,
    pub role: String,
}

impl ChatResponse {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: AssistantTurn {
                    content: content.into(),
                    role: "assistant".to_string(),
                },
            }],
        }
    }
}

/// Everything that can go wrong while answering a chat request. Each class
/// maps to a status code; the body always carries `{ "error": ... }`.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Gemini API key not configured")]
    MissingApiKey,
    #[error("request contained no conversation turns")]
    EmptyTranscript,
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl AdvisoryError {
    fn status(&self) -> StatusCode {
        match self {
            AdvisoryError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            AdvisoryError::EmptyTranscript => StatusCode::BAD_REQUEST,
            AdvisoryError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AdvisoryError {
    fn into_response(self) -> Response {
        error!(error = %self, "chat request failed");
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AdvisoryError> {
    if request.messages.is_empty() {
        return Err(AdvisoryError::EmptyTranscript);
    }
    let api_key = state
        .config
        .gemini_api_key
        .clone()
        .ok_or(AdvisoryError::MissingApiKey)?;

    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    log_conversation_state(&request.messages);

    let client = GeminiClient::new(
        state.http.clone(),
        state.config.gemini_base_url.clone(),
        api_key,
    );
    let reply = client
        .complete(&system_prompt(language), &request.messages)
        .await?;

    let content = enrich_reply(&reply, &state.links);
    Ok(Json(ChatResponse::assistant(content)))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// If the reply is a recommendation envelope, attach shopping links to every
/// option and re-serialize it; otherwise pass the text through unchanged.
pub fn enrich_reply(reply: &str, links: &LinkTable) -> String {
    let Some(mut envelope) = try_parse_envelope(reply) else {
        debug!("reply is not a recommendation envelope, passing through as text");
        return reply.to_string();
    };
    let country = envelope.country.clone().unwrap_or_default();
    for option in &mut envelope.options {
        option.shopping_links = Some(links.links(&option.name, &country));
    }
    serde_json::to_string(&envelope).unwrap_or_else(|_| reply.to_string())
}

/// Debug-level view of how far the interview has progressed.
fn log_conversation_state(turns: &[ConversationTurn]) {
    let mut has_country = false;
    let mut has_budget = false;
    for turn in turns.iter().filter(|t| t.role == Role::User) {
        let lower = turn.content.to_lowercase();
        if ["egypt", "usa", "united states", "uk", "united kingdom"]
            .iter()
            .any(|country| lower.contains(country))
        {
            has_country = true;
        }
        if lower.contains('$') || lower.contains("budget") {
            has_budget = true;
        }
    }
    debug!(has_country, has_budget, "conversation state");
}

pub fn router(state: AppState) -> Router {
    // Permissive cross-origin policy so a browser client on another origin
    // can talk to the advisory endpoint, preflight included.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-api-key"),
        ]);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(config: ServerConfig) -> Result<()> {
    let port = config.port;
    let state = AppState::new(config, DEFAULT_LINK_TABLE.clone());
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("advisory server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Advisory server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl-C received, shutting down");
    }
}
