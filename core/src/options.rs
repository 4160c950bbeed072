use crate::expr::Operator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const USE_STEMMING: &str = "use.stemming";
pub const LANGUAGE: &str = "webhelp.language";
pub const SEARCH_RANKING: &str = "webhelp.search.ranking";
pub const ENABLE_PAGINATION: &str = "webhelp.search.enable.pagination";
pub const ITEMS_PER_PAGE: &str = "webhelp.search.page.numberOfItems";

/// Search settings taken from the WebHelp transformation properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    pub use_stemming: bool,
    /// Indexer language code, e.g. `en` or `zh`.
    pub language: Option<String>,
    pub search_ranking: bool,
    pub enable_pagination: bool,
    pub items_per_page: Option<usize>,
    pub default_operator: Operator,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_stemming: false,
            language: None,
            search_ranking: false,
            enable_pagination: false,
            items_per_page: None,
            default_operator: Operator::Or,
        }
    }
}

impl SearchOptions {
    pub fn from_properties(props: &HashMap<String, String>) -> Self {
        let flag = |key: &str| props.get(key).map_or(false, |v| parse_bool(v));
        Self {
            use_stemming: flag(USE_STEMMING),
            language: props.get(LANGUAGE).map(|l| indexer_language(l)),
            search_ranking: flag(SEARCH_RANKING),
            enable_pagination: flag(ENABLE_PAGINATION),
            items_per_page: props.get(ITEMS_PER_PAGE).and_then(|v| v.trim().parse().ok()),
            default_operator: Operator::Or,
        }
    }

    pub fn indexer_language(&self) -> &str { self.language.as_deref().unwrap_or("") }
}

/// `true` and `yes` are the only truthy property values.
pub fn parse_bool(value: &str) -> bool { value == "true" || value == "yes" }

/// `en_US` becomes `en`.
pub fn indexer_language(language: &str) -> String {
    language.split('_').next().unwrap_or(language).to_lowercase()
}
