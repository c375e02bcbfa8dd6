//! The structured reply shape the model is asked to emit once it has enough
//! information to recommend products. Anything that is not a well-formed
//! envelope is treated as free-form prose by the rest of the system.

use serde::{Deserialize, Serialize};

/// Tag value the model puts in the `type` field.
pub const ENVELOPE_TYPE: &str = "product_recommendations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEnvelope {
    #[serde(rename = "type")]
    pub envelope_type: String,
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub options: Vec<RecommendationOption>,
    pub top_recommendation: TopRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOption {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub match_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tradeoffs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopping_links: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRecommendation {
    pub option_index: usize,
    #[serde(default)]
    pub reason: String,
}

/// Attempt to read a reply string as a recommendation envelope.
///
/// Returns `None` for anything else: prose, truncated JSON, JSON with the
/// wrong `type` tag. Never fails loudly; callers pattern-match on presence.
pub fn try_parse_envelope(text: &str) -> Option<RecommendationEnvelope> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let envelope: RecommendationEnvelope = serde_json::from_str(trimmed).ok()?;
    if envelope.envelope_type != ENVELOPE_TYPE {
        return None;
    }
    Some(envelope)
}
