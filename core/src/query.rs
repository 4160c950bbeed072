//! Query preprocessing: parenthesis validation, punctuation cleanup, stop word
//! removal and detection of phrase and path-like queries.

use crate::error::{Result, SearchError};
use crate::expr::Operator;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static! {
    static ref OPEN_PAREN_WORD: Regex = Regex::new(r"\((\S*)").expect("valid regex");
    static ref CLOSE_PAREN_WORD: Regex = Regex::new(r"\)(\S*)").expect("valid regex");
    static ref WORD_CLOSE_PAREN: Regex = Regex::new(r"(\S*)\)").expect("valid regex");
    static ref SENTENCE_PUNCT: Regex = Regex::new(r"\s[.!?]|[.!?]\s").expect("valid regex");
    static ref PATH_CHARS: Regex = Regex::new(r"[./\\\-:_]").expect("valid regex");
    static ref MARKUP_CHARS: Regex = Regex::new(r#"[<>"'=]|0\\|\\|/"#).expect("valid regex");
    static ref URL_ESCAPES: Regex = Regex::new(r"%2C|%3B|%21|%3A|@|\*").expect("valid regex");
    static ref ENCODED_SPACES: Regex = Regex::new(r"(%20)+").expect("valid regex");
    static ref MULTI_SPACE: Regex = Regex::new(r"  +").expect("valid regex");
}

/// How a query is matched against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryMode {
    SingleWord,
    Phrase,
    Boolean,
    FreeTerms,
    PathLike,
}

/// Output of [`preprocess`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preprocessed {
    /// Lowercase terms, operators and parentheses separated by single spaces.
    pub expression: String,
    /// Stop words, plus operators and parentheses dropped from a phrase.
    pub excluded: Vec<String>,
}

/// Validate parentheses, split punctuation away from words and drop stop words.
pub fn preprocess(query: &str, phrase_search: bool, stop_words: &HashSet<String>) -> Result<Preprocessed> {
    validate_parentheses(query)?;

    let text = query.trim();
    let text = OPEN_PAREN_WORD.replace_all(text, "( ${1}");
    let text = CLOSE_PAREN_WORD.replace_all(&text, ") ${1}");
    let text = WORD_CLOSE_PAREN.replace_all(&text, "${1} )");
    let text = text.replace(',', " ");
    let text = strip_sentence_punctuation(&text);

    let mut words = Vec::new();
    let mut excluded = Vec::new();
    for token in text.split_whitespace() {
        let word = token.to_lowercase();
        let structural = Operator::parse(&word).is_some() || word == "(" || word == ")";
        if structural {
            if phrase_search { excluded.push(word) } else { words.push(word) }
        } else if stop_words.contains(&word) {
            excluded.push(word);
        } else {
            words.push(word);
        }
    }

    Ok(Preprocessed { expression: words.join(" ").trim().to_string(), excluded })
}

/// Counts of `(` and `)` must match and the n-th opener must come before the n-th closer.
pub fn validate_parentheses(query: &str) -> Result<()> {
    let opens: Vec<usize> = query.match_indices('(').map(|(i, _)| i).collect();
    let closes: Vec<usize> = query.match_indices(')').map(|(i, _)| i).collect();
    if opens.len() != closes.len() {
        return Err(SearchError::InvalidExpression);
    }
    if opens.iter().zip(&closes).any(|(o, c)| o > c) {
        return Err(SearchError::InvalidExpression);
    }
    Ok(())
}

// Overlapping matches like "a . . b" need repeated passes.
fn strip_sentence_punctuation(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = SENTENCE_PUNCT.replace_all(&current, " ").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// A query wrapped in single or double quotes, longer than two characters.
pub fn is_phrase_query(query: &str, cjk: bool) -> bool {
    let q = query.trim();
    if cjk || q.chars().count() <= 2 {
        return false;
    }
    let is_quote = |c: char| c == '\'' || c == '"';
    matches!((q.chars().next(), q.chars().last()), (Some(f), Some(l)) if is_quote(f) && is_quote(l))
}

/// Quote characters become spaces.
pub fn strip_quotes(query: &str) -> String { query.replace(&['"', '\''][..], " ") }

/// Queries that look like URLs or file paths are matched by substring.
pub fn is_path_like(query: &str) -> bool { PATH_CHARS.is_match(query) }

/// Scrub markup and URL escapes from the expression echoed back to the page.
pub fn filter_original_expression(text: &str) -> String {
    let text = MARKUP_CHARS.replace_all(text, " ");
    let text = MULTI_SPACE.replace_all(&text, " ");
    let text = text.replace("$_", "%24_");
    let text = URL_ESCAPES.replace_all(&text, " ");
    let text = ENCODED_SPACES.replace_all(&text, " ");
    let text = MULTI_SPACE.replace_all(&text, " ");
    text.strip_suffix(' ').unwrap_or(&text).to_string()
}
