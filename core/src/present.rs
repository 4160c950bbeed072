//! Presentation model for a search result page: ordering, star rating, grouping
//! of similar topics, missing words and pagination.

use crate::options::SearchOptions;
use crate::rank::DocumentInfo;
use crate::search::SearchResult;
use serde::Serialize;
use std::cmp::Ordering;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
const TOC_PAGE: &str = "toc.html";
const MAX_STAR_WIDTH: f64 = 85.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub document: DocumentInfo,
    /// Width of the rating bar, 0 when ranking display is off.
    pub star_width: f64,
    pub missing_words: Vec<String>,
    /// Following topics with the same title and short description.
    pub similar_results: Vec<SearchResultItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ResultStatus {
    Error(String),
    OnlyStopWords,
    NoResults,
    Found(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPresentation {
    pub items: Vec<SearchResultItem>,
    pub items_per_page: usize,
    pub status: ResultStatus,
}

impl SearchPresentation {
    pub fn from_result(result: &SearchResult, options: &SearchOptions, cjk: bool) -> Self {
        let mut docs = result.documents.clone();
        docs.sort_by(compare_documents);
        let first_score = docs.first().map_or(1, |d| d.score);
        let search_words: Vec<&str> = result.search_expression.split(' ').collect();

        let mut items: Vec<SearchResultItem> = Vec::new();
        for (i, doc) in docs.iter().enumerate() {
            if doc.relative_path == TOC_PAGE {
                continue;
            }
            let star_width = if options.search_ranking { star_width(doc.score, doc.words.len(), first_score) } else { 0.0 };
            let missing_words = if cjk { Vec::new() } else { missing_words(&search_words, doc, result) };
            let item = SearchResultItem { document: doc.clone(), star_width, missing_words, similar_results: Vec::new() };

            let similar = i > 0 && is_similar(doc, &docs[i - 1]);
            match items.last_mut() {
                Some(current) if similar => current.similar_results.push(item),
                _ => items.push(item),
            }
        }

        let status = match &result.error {
            Some(err) if !err.is_empty() => ResultStatus::Error(err.clone()),
            _ if items.is_empty() && result.mode.is_none() && !result.excluded.is_empty() => ResultStatus::OnlyStopWords,
            _ if items.is_empty() => ResultStatus::NoResults,
            _ => ResultStatus::Found(items.len()),
        };

        Self { items, items_per_page: items_per_page(options), status }
    }

    pub fn total_pages(&self) -> usize {
        if self.items.is_empty() { 0 } else { (self.items.len() - 1) / self.items_per_page + 1 }
    }

    /// Items of a 1-based page; pages out of range show the first page.
    pub fn page(&self, number: usize) -> &[SearchResultItem] {
        let number = if number == 0 || number > self.total_pages() { 1 } else { number };
        let start = (number - 1).saturating_mul(self.items_per_page).min(self.items.len());
        let end = start.saturating_add(self.items_per_page).min(self.items.len());
        &self.items[start..end]
    }
}

/// Score descending, then title and short description descending.
fn compare_documents(a: &DocumentInfo, b: &DocumentInfo) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.title.cmp(&a.title))
        .then_with(|| b.short_description.cmp(&a.short_description))
}

fn is_similar(a: &DocumentInfo, b: &DocumentInfo) -> bool {
    a.title.trim() == b.title.trim() && a.short_description.trim() == b.short_description.trim()
}

/// Rating bar width relative to the best hit, padded below 10 and capped at 85.
pub fn star_width(score: u32, words: usize, first_score: u32) -> f64 {
    let hundred = score as f64 + 100.0 * words as f64;
    // max_words is the document's own word count, so the word ratio is always 1.
    let max_words = words;
    let word_ratio = if max_words == 0 { 1.0 } else { words as f64 / max_words as f64 };
    let width = (score as f64 * 100.0 / hundred) / (first_score as f64 / hundred) * word_ratio;
    let width = if width < 10.0 { width + 5.0 } else { width };
    width.min(MAX_STAR_WIDTH)
}

fn missing_words(search_words: &[&str], doc: &DocumentInfo, result: &SearchResult) -> Vec<String> {
    if search_words.len() == doc.words.len() {
        return Vec::new();
    }
    let typed: Vec<&str> = doc
        .words
        .iter()
        .map(|w| result.stem_map.get(w).map_or(w.as_str(), String::as_str))
        .collect();
    search_words
        .iter()
        .copied()
        .filter(|&w| !doc.words.iter().any(|d| d == w) && !typed.contains(&w))
        .map(str::to_string)
        .collect()
}

pub fn items_per_page(options: &SearchOptions) -> usize {
    if !options.enable_pagination {
        return usize::MAX;
    }
    options.items_per_page.filter(|&n| n > 0).unwrap_or(DEFAULT_ITEMS_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: u32, path: &str, title: &str, score: u32, words: &[&str]) -> DocumentInfo {
        DocumentInfo {
            topic_id: id,
            relative_path: path.into(),
            title: title.into(),
            short_description: String::new(),
            words: words.iter().map(|w| w.to_string()).collect(),
            score,
        }
    }

    fn result(expr: &str, docs: Vec<DocumentInfo>) -> SearchResult {
        SearchResult { search_expression: expr.into(), documents: docs, ..SearchResult::default() }
    }

    #[test]
    fn star_width_is_padded_and_capped() {
        assert_eq!(star_width(199, 1, 199), 85.0);
        let low = star_width(1, 1, 199);
        assert!(low > 5.0 && low < 10.0);
    }

    #[test]
    fn orders_groups_and_skips_toc() {
        let r = result(
            "flower",
            vec![
                doc(0, "a.html", "Alpha", 50, &["flower"]),
                doc(1, "toc.html", "Contents", 99, &["flower"]),
                doc(2, "b.html", "Beta", 50, &["flower"]),
                doc(3, "a2.html", "Alpha ", 40, &["flower"]),
            ],
        );
        let p = SearchPresentation::from_result(&r, &SearchOptions::default(), false);
        let ids: Vec<u32> = p.items.iter().map(|i| i.document.topic_id).collect();
        assert_eq!(ids, vec![2, 0]);
        assert_eq!(p.status, ResultStatus::Found(2));
        assert!(p.items[0].similar_results.is_empty());
        assert_eq!(p.items[1].similar_results[0].document.topic_id, 3);
    }

    #[test]
    fn similar_topics_fold_into_the_previous_item() {
        let r = result("flower", vec![doc(0, "a.html", "Same", 90, &["flower"]), doc(1, "b.html", "Same", 80, &["flower"])]);
        let p = SearchPresentation::from_result(&r, &SearchOptions::default(), false);
        assert_eq!(p.items.len(), 1);
        assert_eq!(p.items[0].similar_results[0].document.topic_id, 1);
    }

    #[test]
    fn reports_missing_words() {
        let r = result("iris or flower", vec![doc(0, "a.html", "A", 99, &["iris"])]);
        let p = SearchPresentation::from_result(&r, &SearchOptions::default(), false);
        assert_eq!(p.items[0].missing_words, vec!["or", "flower"]);
    }

    #[test]
    fn paginates() {
        let docs = (0..25).map(|i| doc(i, &format!("{i}.html"), &format!("T{i:02}"), 99, &["w"])).collect();
        let options = SearchOptions { enable_pagination: true, ..SearchOptions::default() };
        let p = SearchPresentation::from_result(&result("w", docs), &options, false);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.page(3).len(), 5);
        assert_eq!(p.page(0), p.page(1));
        assert_eq!(p.page(9).len(), 10);

        let unpaged = SearchPresentation::from_result(&result("w", p.items.iter().map(|i| i.document.clone()).collect()), &SearchOptions::default(), false);
        assert_eq!(unpaged.total_pages(), 1);
        assert_eq!(unpaged.page(1).len(), 25);
    }

    #[test]
    fn status_distinguishes_stop_words_from_no_results() {
        let stop_only = SearchResult { search_expression: "the".into(), excluded: vec!["the".into()], ..SearchResult::default() };
        assert_eq!(SearchPresentation::from_result(&stop_only, &SearchOptions::default(), false).status, ResultStatus::OnlyStopWords);
        let error = SearchResult { error: Some("Invalid expression!".into()), ..SearchResult::default() };
        assert_eq!(
            SearchPresentation::from_result(&error, &SearchOptions::default(), false).status,
            ResultStatus::Error("Invalid expression!".into())
        );
        assert_eq!(SearchPresentation::from_result(&result("x", vec![]), &SearchOptions::default(), false).status, ResultStatus::NoResults);
    }
}
