//! Classification of advisory replies into renderable message parts.
//!
//! The rules are order-sensitive and total: a recommendation envelope wins,
//! then question handling, then plain text. Same input string, same output;
//! nothing in here can panic on provider output.

use crate::envelope::{try_parse_envelope, RecommendationEnvelope};
use crate::types::Product;

/// How replies containing `?` are turned into question messages.
///
/// `SplitSentences` splits the reply into one bubble per question.
/// `FixedMenu` reproduces the earlier protocol revision: keyword matches in
/// the user's previous message select a fixed multiple-choice menu, falling
/// back to sentence splitting when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionStyle {
    #[default]
    SplitSentences,
    FixedMenu,
}

/// One classified chunk of a reply, ready to become a `Message`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPart {
    Text(String),
    Question {
        content: String,
        options: Option<Vec<String>>,
    },
    Product {
        content: String,
        product: Product,
    },
}

/// Classify a raw reply string. `last_user_message` feeds the `FixedMenu`
/// keyword matching and is ignored otherwise.
pub fn classify_reply(
    reply: &str,
    style: QuestionStyle,
    last_user_message: Option<&str>,
) -> Vec<ReplyPart> {
    if reply.trim().starts_with('{') {
        if let Some(envelope) = try_parse_envelope(reply) {
            return match envelope_parts(envelope) {
                Some(parts) => parts,
                // Envelope with an out-of-range index or no options:
                // degrade to showing the raw reply as text.
                None => vec![ReplyPart::Text(reply.to_string())],
            };
        }
    }

    if reply.contains('?') {
        if style == QuestionStyle::FixedMenu {
            if let Some(menu) = fixed_menu(last_user_message.unwrap_or_default()) {
                return vec![menu];
            }
        }
        return split_questions(reply);
    }

    vec![ReplyPart::Text(reply.to_string())]
}

fn envelope_parts(envelope: RecommendationEnvelope) -> Option<Vec<ReplyPart>> {
    let index = envelope.top_recommendation.option_index;
    let option = envelope.options.get(index)?;
    let product = Product {
        id: format!("rec-{index}"),
        name: option.name.clone(),
        description: envelope.analysis.clone(),
        price: option.price,
        image_url: option.image_url.clone(),
        shopping_links: option.shopping_links.clone(),
    };
    let content = if envelope.top_recommendation.reason.is_empty() {
        option.name.clone()
    } else {
        envelope.top_recommendation.reason.clone()
    };
    Some(vec![
        ReplyPart::Text(envelope.analysis.clone()),
        ReplyPart::Product { content, product },
    ])
}

/// Split a reply on `?` followed by whitespace, one part per segment.
/// Every non-final segment gets its `?` back; the final one keeps it only
/// when the original reply ended with `?`.
fn split_questions(reply: &str) -> Vec<ReplyPart> {
    let trimmed = reply.trim();
    let ended_with_question = trimmed.ends_with('?');

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '?' && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let segment = current.trim();
            if !segment.is_empty() {
                segments.push(segment.to_string());
            }
            current.clear();
            while chars.peek().map_or(false, |next| next.is_whitespace()) {
                chars.next();
            }
            continue;
        }
        current.push(c);
    }
    let segment = current.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }

    if segments.is_empty() {
        return vec![ReplyPart::Text(reply.to_string())];
    }

    let last = segments.len() - 1;
    segments
        .into_iter()
        .enumerate()
        .map(|(i, mut content)| {
            if i < last || ended_with_question {
                content.push('?');
            }
            if content.contains('?') {
                ReplyPart::Question {
                    content,
                    options: None,
                }
            } else {
                ReplyPart::Text(content)
            }
        })
        .collect()
}

/// Fixed multiple-choice menus keyed on what the user last asked about.
fn fixed_menu(last_user_message: &str) -> Option<ReplyPart> {
    let lower = last_user_message.to_lowercase();
    if lower.contains("laptop") {
        return Some(ReplyPart::Question {
            content: "What will you mainly use the laptop for?".to_string(),
            options: Some(vec![
                "Gaming".to_string(),
                "Work and productivity".to_string(),
                "School".to_string(),
                "General home use".to_string(),
            ]),
        });
    }
    if lower.contains("device") || lower.contains("gadget") || lower.contains("electronics") {
        return Some(ReplyPart::Question {
            content: "What type of device are you looking for?".to_string(),
            options: Some(vec![
                "Laptop".to_string(),
                "Smartphone".to_string(),
                "Tablet".to_string(),
                "Headphones".to_string(),
            ]),
        });
    }
    None
}
