use crate::index::{DocId, WebHelpIndex};
use crate::postings::DocumentResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Highest scaled score inside a category.
pub const MAX_CATEGORY_SCORE: u32 = 99;
/// Offset separating consecutive categories.
pub const CATEGORY_SPAN: u32 = 100;

/// A resolved search hit handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    #[serde(rename = "topicID")]
    pub topic_id: DocId,
    pub relative_path: String,
    /// `<` and `>` are escaped so the title can be embedded in markup as is.
    pub title: String,
    pub short_description: String,
    pub words: Vec<String>,
    #[serde(rename = "scoring")]
    pub score: u32,
}

/// Result categories in priority order. A document lands in the first category that contains it.
#[derive(Debug, Default)]
pub struct ResultCategories {
    categories: Vec<Vec<DocumentResult>>,
    seen: HashSet<DocId>,
}

impl ResultCategories {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.categories.len() }

    pub fn is_empty(&self) -> bool { self.categories.is_empty() }

    /// Append a lower priority category. Scores are floored at 1 and documents already placed
    /// are dropped; an empty remainder adds nothing.
    pub fn add_category(&mut self, results: Vec<DocumentResult>) {
        let mut kept = Vec::new();
        for mut doc in results {
            doc.score = doc.score.max(1);
            if self.seen.insert(doc.doc_id) {
                kept.push(doc);
            }
        }
        if !kept.is_empty() {
            self.categories.push(kept);
        }
    }

    /// One category per distinct number of matched words, most words first.
    pub fn group_by_word_count(&mut self, results: Vec<DocumentResult>) {
        let mut by_count: BTreeMap<usize, Vec<DocumentResult>> = BTreeMap::new();
        for doc in results {
            by_count.entry(doc.words.len()).or_default().push(doc);
        }
        for (_, group) in by_count.into_iter().rev() {
            self.add_category(group);
        }
    }

    /// Flatten into a single list where every category outranks the next.
    pub fn into_ranked(self) -> Vec<DocumentResult> {
        let count = self.categories.len() as u32;
        let mut ranked = Vec::new();
        for (k, mut category) in self.categories.into_iter().enumerate() {
            scale_scores(&mut category);
            category.sort_by(|a, b| b.score.cmp(&a.score));
            let offset = (count - 1 - k as u32) * CATEGORY_SPAN;
            for doc in &mut category {
                doc.score += offset;
            }
            ranked.extend(category);
        }
        ranked
    }
}

/// Rescale so the best document of the category scores 99.
pub fn scale_scores(category: &mut [DocumentResult]) {
    let max = category.iter().map(|d| d.score).max().unwrap_or(0);
    if max == 0 {
        return;
    }
    let ratio = MAX_CATEGORY_SCORE as f64 / max as f64;
    for doc in category.iter_mut() {
        let scaled = (doc.score as f64 * ratio).ceil() as u32;
        doc.score = scaled.min(MAX_CATEGORY_SCORE);
    }
}

pub fn escape_title(title: &str) -> String { title.replace('<', "&lt;").replace('>', "&gt;") }

/// Attach file info to ranked documents. Unknown ids are skipped with a warning.
pub fn resolve_documents(index: &WebHelpIndex, ranked: &[DocumentResult]) -> Vec<DocumentInfo> {
    let mut docs = Vec::with_capacity(ranked.len());
    for doc in ranked {
        let Some(topic) = index.topic(doc.doc_id) else {
            tracing::warn!(doc_id = doc.doc_id, "there is no definition for topic");
            continue;
        };
        docs.push(DocumentInfo {
            topic_id: doc.doc_id,
            relative_path: topic.relative_path,
            title: escape_title(&topic.title),
            short_description: topic.short_description,
            words: doc.words.iter().map(|m| m.word.clone()).collect(),
            score: doc.score,
        });
    }
    docs
}
