//! Client-side chat state: the append-only message list, the single-flight
//! loading guard, and the HTTP client for the advisory server.

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::classify::{classify_reply, QuestionStyle, ReplyPart};
use crate::server::ChatResponse;
use crate::types::{ConversationTurn, Message, Role};

/// HTTP client for the advisory server's `/chat` endpoint.
#[derive(Debug, Clone)]
pub struct AdvisoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl AdvisoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// POST the transcript and return the assistant's reply text. A reply
    /// missing `choices[0].message.content` is an error, same as a failed
    /// request.
    pub async fn send(&self, transcript: &[ConversationTurn], language: &str) -> Result<String> {
        let url = format!("{}/chat", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "messages": transcript, "language": language }))
            .send()
            .await
            .context("failed to reach the advisory server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(anyhow!("advisory request failed with status {status}: {body}"));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("failed to parse advisory reply")?;
        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("advisory reply missing choices[0].message.content"))
    }
}

/// Result of a `submit` call, for the caller to surface (or not).
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted,
    /// Empty input or a request already in flight; no state change.
    Ignored,
    Failed(String),
}

/// Owns the conversation shown to the user. Messages and the loading flag
/// are read-only to everything else; all mutation goes through submission.
pub struct ChatController {
    client: AdvisoryClient,
    language: String,
    question_style: QuestionStyle,
    messages: Vec<Message>,
    loading: bool,
    next_id: u64,
}

impl ChatController {
    pub fn new(client: AdvisoryClient, language: impl Into<String>, style: QuestionStyle) -> Self {
        Self {
            client,
            language: language.into(),
            question_style: style,
            messages: Vec::new(),
            loading: false,
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// First half of a submission: append the outgoing message, raise the
    /// loading flag, and return the transcript to send. Returns `None` (and
    /// changes nothing) for blank input or while a request is in flight.
    pub fn begin_submit(&mut self, text: &str) -> Option<Vec<ConversationTurn>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.loading {
            debug!("submit ignored, a request is already in flight");
            return None;
        }
        let id = self.take_id();
        self.messages.push(Message::outgoing(id, trimmed));
        self.loading = true;
        Some(self.transcript())
    }

    /// Second half on success: classify the reply and append the resulting
    /// assistant message(s).
    pub fn apply_reply(&mut self, content: &str) {
        let last_user = self
            .messages
            .iter()
            .rev()
            .find(|message| message.is_outgoing)
            .map(|message| message.content.clone());
        let parts = classify_reply(content, self.question_style, last_user.as_deref());
        for part in parts {
            let id = self.take_id();
            let message = match part {
                ReplyPart::Text(text) => Message::incoming_text(id, text),
                ReplyPart::Question { content, options } => {
                    Message::incoming_question(id, content, options)
                }
                ReplyPart::Product { content, product } => {
                    Message::incoming_product(id, content, product)
                }
            };
            self.messages.push(message);
        }
        self.loading = false;
    }

    /// Second half on failure: clear the guard. The user's own message
    /// stays; nothing else changed, so resubmitting is always safe.
    pub fn fail_submit(&mut self) {
        self.loading = false;
    }

    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let Some(transcript) = self.begin_submit(text) else {
            return SubmitOutcome::Ignored;
        };
        match self.client.send(&transcript, &self.language).await {
            Ok(content) => {
                self.apply_reply(&content);
                SubmitOutcome::Submitted
            }
            Err(err) => {
                warn!(error = %err, "advisory request failed");
                self.fail_submit();
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    fn transcript(&self) -> Vec<ConversationTurn> {
        self.messages
            .iter()
            .map(|message| ConversationTurn {
                role: if message.is_outgoing {
                    Role::User
                } else {
                    Role::Assistant
                },
                content: message.content.clone(),
            })
            .collect()
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
