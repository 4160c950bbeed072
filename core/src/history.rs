use serde::{Deserialize, Serialize};

pub const MAX_HISTORY_ITEMS: usize = 30;

/// Every non-empty query word must be a case-insensitive prefix of some word of the phrase.
pub fn matches_history_item(phrase: &str, query: &str) -> bool {
    let phrase_words: Vec<String> = phrase.split(' ').map(str::to_lowercase).collect();
    query
        .split(' ')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .all(|w| {
            let w = w.to_lowercase();
            phrase_words.iter().any(|p| p.starts_with(&w))
        })
}

/// Recently searched queries, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistory {
    items: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[String] { &self.items }

    /// Record a query at the front. A repeated query moves to the front instead of duplicating.
    pub fn add(&mut self, query: &str) {
        let query = query.to_lowercase();
        self.items.retain(|q| *q != query);
        self.items.insert(0, query);
        self.items.truncate(MAX_HISTORY_ITEMS);
    }

    pub fn remove(&mut self, query: &str) -> bool {
        let query = query.to_lowercase();
        match self.items.iter().position(|q| *q == query) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    /// History entries matching what the user has typed so far.
    pub fn proposals(&self, query: &str) -> Vec<&str> {
        self.items.iter().filter(|item| matches_history_item(item, query)).map(String::as_str).collect()
    }
}
