use chrono::Local;
use serde::{Deserialize, Serialize};

/// Display name attached to incoming assistant messages.
pub const ASSISTANT_SENDER: &str = "ShopScout";

/// How a chat message should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Question,
    Product,
}

/// A product extracted from a recommendation reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopping_links: Option<Vec<String>>,
}

/// One entry in the conversation. Immutable once appended; the message list
/// is append-only in insertion order.
///
/// Invariant: `options` is present only on `Question` messages (menu variant)
/// and `product` only on `Product` messages; the two never coexist.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub timestamp: String,
    pub content: String,
    pub is_outgoing: bool,
    pub sender: Option<String>,
    pub kind: MessageKind,
    pub options: Option<Vec<String>>,
    pub product: Option<Product>,
}

impl Message {
    pub fn outgoing(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            timestamp: now(),
            content: content.into(),
            is_outgoing: true,
            sender: None,
            kind: MessageKind::Text,
            options: None,
            product: None,
        }
    }

    pub fn incoming_text(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            timestamp: now(),
            content: content.into(),
            is_outgoing: false,
            sender: Some(ASSISTANT_SENDER.to_string()),
            kind: MessageKind::Text,
            options: None,
            product: None,
        }
    }

    pub fn incoming_question(
        id: u64,
        content: impl Into<String>,
        options: Option<Vec<String>>,
    ) -> Self {
        Self {
            kind: MessageKind::Question,
            options,
            ..Self::incoming_text(id, content)
        }
    }

    pub fn incoming_product(id: u64, content: impl Into<String>, product: Product) -> Self {
        Self {
            kind: MessageKind::Product,
            product: Some(product),
            ..Self::incoming_text(id, content)
        }
    }
}

fn now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Role of a conversation turn on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Wire projection of a `Message` sent to the advisory server. Drops id,
/// kind, and any attached product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
