//! Shopping-link generation: country-aware retailer search URLs for a
//! product name. Pure lookup over an immutable table, no network access.

use lazy_static::lazy_static;
use urlencoding::encode;

/// Placeholder replaced with the percent-encoded product name.
const QUERY_SLOT: &str = "{query}";

/// Immutable country -> retailer URL-template table. Injected into the
/// advisory server rather than consulted as a global.
#[derive(Debug, Clone)]
pub struct LinkTable {
    entries: Vec<LinkEntry>,
    fallback: String,
}

#[derive(Debug, Clone)]
struct LinkEntry {
    aliases: Vec<String>,
    templates: Vec<String>,
}

lazy_static! {
    /// The retailers the assistant knows about, keyed by country aliases.
    pub static ref DEFAULT_LINK_TABLE: LinkTable = LinkTable::with_default_retailers();
}

impl LinkTable {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Register a country (with any aliases) and its retailer URL templates.
    /// Each template embeds `{query}` where the encoded product name goes.
    pub fn with_country<S: AsRef<str>>(mut self, aliases: &[S], templates: &[S]) -> Self {
        self.entries.push(LinkEntry {
            aliases: aliases.iter().map(|a| a.as_ref().to_lowercase()).collect(),
            templates: templates.iter().map(|t| t.as_ref().to_string()).collect(),
        });
        self
    }

    fn with_default_retailers() -> Self {
        Self::new("https://www.amazon.com/s?k={query}")
            .with_country(
                &["egypt"],
                &[
                    "https://www.amazon.eg/s?k={query}",
                    "https://www.noon.com/egypt-en/search?q={query}",
                ],
            )
            .with_country(
                &["usa", "united states"],
                &[
                    "https://www.amazon.com/s?k={query}",
                    "https://www.bestbuy.com/site/searchpage.jsp?st={query}",
                ],
            )
            .with_country(
                &["uk", "united kingdom"],
                &[
                    "https://www.amazon.co.uk/s?k={query}",
                    "https://www.currys.co.uk/search?q={query}",
                ],
            )
    }

    /// Ordered retailer search URLs for a product in a country.
    ///
    /// The country match is case-insensitive; an unknown country yields a
    /// single generic fallback link.
    pub fn links(&self, product_name: &str, country: &str) -> Vec<String> {
        let needle = country.trim().to_lowercase();
        let query = encode(product_name);
        for entry in &self.entries {
            if entry.aliases.iter().any(|alias| *alias == needle) {
                return entry
                    .templates
                    .iter()
                    .map(|template| template.replace(QUERY_SLOT, &query))
                    .collect();
            }
        }
        vec![self.fallback.replace(QUERY_SLOT, &query)]
    }
}

impl Default for LinkTable {
    fn default() -> Self {
        Self::with_default_retailers()
    }
}
