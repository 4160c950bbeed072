use crate::index::DocId;
use crate::search::SearchContext;
use crate::tokenizer::{cjk_tokenize, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A matched word in one document with its word offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMatch {
    pub word: String,
    pub positions: Vec<u32>,
}

/// All matches of an operand in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub doc_id: DocId,
    pub words: Vec<TermMatch>,
    pub score: u32,
}

/// Expand a search term into the indexed words it should match.
///
/// Stemmed and two letter terms must match exactly; unmatched ones are recorded as
/// not found. Other terms match by prefix, or by substring for path-like queries.
pub fn expand_term(ctx: &mut SearchContext<'_>, term: &str) -> Vec<String> {
    let words = vec![term.to_string()];
    let stemmer = ctx.active_stemmer();
    let tokens = if ctx.cjk {
        cjk_tokenize(&words, stemmer, &mut ctx.stem_map)
    } else if ctx.use_stemming {
        tokenize(&words, stemmer, &mut ctx.stem_map)
    } else {
        words
    };

    if ctx.cjk {
        return dedup(tokens);
    }

    let mut expanded = Vec::new();
    for token in tokens {
        if ctx.index.is_stop_word(&token) {
            continue;
        }
        if ctx.use_stemming || token.chars().count() == 2 {
            if ctx.index.contains_word(&token) {
                expanded.push(token);
            } else {
                tracing::debug!(word = %token, "word not found in index");
                ctx.words_not_found.push(token);
            }
        } else if ctx.single_word_exact {
            expanded.push(token);
        } else if ctx.inside_file_path {
            expanded.extend(ctx.index.words_containing(&token));
        } else {
            expanded.extend(ctx.index.words_starting_with(&token));
        }
    }
    dedup(expanded)
}

fn dedup(words: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for w in words {
        if !out.contains(&w) {
            out.push(w);
        }
    }
    out
}

/// Look up a single search term: expand it, read postings per document and collapse derivatives.
///
/// Documents come back by descending score; ties keep ascending document id order.
pub fn search_term(ctx: &mut SearchContext<'_>, term: &str) -> Vec<DocumentResult> {
    let searched = term.trim().to_lowercase();
    let words = expand_term(ctx, &searched);
    if words.is_empty() {
        return Vec::new();
    }

    let mut per_doc: BTreeMap<DocId, (Vec<TermMatch>, u32)> = BTreeMap::new();
    for word in &words {
        for posting in ctx.index.postings_for(word) {
            let entry = per_doc.entry(posting.doc_id).or_default();
            entry.0.push(TermMatch { word: word.clone(), positions: posting.positions });
            entry.1 = entry.1.saturating_add(posting.score);
        }
    }

    let mut results: Vec<DocumentResult> = per_doc
        .into_iter()
        .map(|(doc_id, (matches, score))| DocumentResult {
            doc_id,
            words: collapse_derivatives(matches, &searched, ctx.inside_file_path),
            score,
        })
        .collect();
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Relabel every word derived from `searched` as `searched` and merge their positions.
pub fn collapse_derivatives(matches: Vec<TermMatch>, searched: &str, contains: bool) -> Vec<TermMatch> {
    let mut out: Vec<TermMatch> = Vec::new();
    for m in matches {
        let derived = if contains { m.word.contains(searched) } else { m.word.starts_with(searched) };
        let label = if derived { searched.to_string() } else { m.word };
        match out.iter_mut().find(|t| t.word == label) {
            Some(existing) => existing.positions.extend(m.positions),
            None => out.push(TermMatch { word: label, positions: m.positions }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tm(word: &str, positions: &[u32]) -> TermMatch { TermMatch { word: word.into(), positions: positions.to_vec() } }

    #[test]
    fn derivatives_merge_under_the_search_term() {
        let merged = collapse_derivatives(vec![tm("flow", &[1]), tm("flower", &[4]), tm("fly", &[9])], "flow", false);
        assert_eq!(merged, vec![tm("flow", &[1, 4]), tm("fly", &[9])]);
    }

    #[test]
    fn path_mode_merges_on_substring() {
        let merged = collapse_derivatives(vec![tm("overflow", &[2]), tm("flows", &[3])], "flow", true);
        assert_eq!(merged, vec![tm("flow", &[2, 3])]);
    }
}
