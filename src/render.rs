//! Terminal presentation of chat state. Pure functions from messages to
//! strings; no business logic lives here.

use crate::types::{Message, MessageKind};

pub fn header(title: &str, language: &str) -> String {
    format!("=== {title} (language: {language}) ===")
}

/// Render one message bubble, options and product card included.
pub fn render_message(message: &Message) -> String {
    let sender = if message.is_outgoing {
        "you"
    } else {
        message.sender.as_deref().unwrap_or("assistant")
    };
    let mut lines = vec![format!(
        "[{}] {}: {}",
        message.timestamp, sender, message.content
    )];

    match message.kind {
        MessageKind::Question => {
            if let Some(options) = &message.options {
                for (i, option) in options.iter().enumerate() {
                    lines.push(format!("  {}) {}", i + 1, option));
                }
            }
        }
        MessageKind::Product => {
            if let Some(product) = &message.product {
                lines.push(format!("  * {} -- ${:.2}", product.name, product.price));
                if !product.description.is_empty() {
                    lines.push(format!("    {}", product.description));
                }
                if let Some(image_url) = &product.image_url {
                    lines.push(format!("    image: {image_url}"));
                }
                if let Some(links) = &product.shopping_links {
                    for link in links {
                        lines.push(format!("    shop: {link}"));
                    }
                }
            }
        }
        MessageKind::Text => {}
    }

    lines.join("\n")
}

pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    #[test]
    fn test_renders_outgoing_as_you() {
        let rendered = render_message(&Message::outgoing(1, "hello"));
        assert!(rendered.contains("you: hello"));
    }

    #[test]
    fn test_renders_question_options_numbered() {
        let message = Message::incoming_question(
            2,
            "Which one?",
            Some(vec!["Laptop".to_string(), "Tablet".to_string()]),
        );
        let rendered = render_message(&message);
        assert!(rendered.contains("1) Laptop"));
        assert!(rendered.contains("2) Tablet"));
    }

    #[test]
    fn test_renders_product_card_with_links() {
        let product = Product {
            id: "rec-0".to_string(),
            name: "Laptop X".to_string(),
            description: "Light and fast".to_string(),
            price: 899.99,
            image_url: None,
            shopping_links: Some(vec!["https://www.amazon.com/s?k=Laptop%20X".to_string()]),
        };
        let rendered = render_message(&Message::incoming_product(3, "Best pick", product));
        assert!(rendered.contains("Laptop X -- $899.99"));
        assert!(rendered.contains("Light and fast"));
        assert!(rendered.contains("shop: https://www.amazon.com/s?k=Laptop%20X"));
    }

    #[test]
    fn test_transcript_joins_messages() {
        let messages = vec![
            Message::outgoing(1, "hi"),
            Message::incoming_text(2, "hello"),
        ];
        let rendered = render_transcript(&messages);
        assert!(rendered.contains("you: hi"));
        assert!(rendered.contains("ShopScout: hello"));
    }
}
