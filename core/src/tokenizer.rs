use crate::stemmer::Stem;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref QUOTE_OR_LEADING_DASH: Regex = Regex::new(r"%22|^-").expect("valid regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Stemmed form -> word as the user typed it.
pub type StemQueryMap = BTreeMap<String, String>;

/// Mean character code above which a word is treated as CJK text.
const CJK_CHAR_CODE_THRESHOLD: f64 = 127.0;

/// True for indexer languages that were indexed with the CJK bigram analyzer.
pub fn is_cjk_language(language: &str) -> bool {
    let lang = language.to_lowercase();
    ["zh", "ja", "ko"].iter().any(|p| lang.starts_with(p))
}

/// Latin tokenization: strips `%22` and a leading `-`, drops `%20` and stems when a stemmer is given.
pub fn tokenize(words: &[String], stemmer: Option<&dyn Stem>, stem_map: &mut StemQueryMap) -> Vec<String> {
    for word in words {
        let key = match stemmer {
            Some(s) => s.stem(word),
            None => word.clone(),
        };
        stem_map.insert(key, word.clone());
    }

    let cleaned = words
        .iter()
        .map(|w| QUOTE_OR_LEADING_DASH.replace_all(w, "").into_owned())
        .filter(|w| w != "%20");

    match stemmer {
        Some(s) => cleaned.map(|w| s.stem(&w)).collect(),
        None => cleaned.collect(),
    }
}

/// CJK tokenization: bigrams for words that look like CJK text, Latin tokenization for the rest.
///
/// Latin tokens are appended after all bigrams.
pub fn cjk_tokenize(words: &[String], stemmer: Option<&dyn Stem>, stem_map: &mut StemQueryMap) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut latin = Vec::new();
    for word in words {
        if avg_char_code(word) < CJK_CHAR_CODE_THRESHOLD {
            latin.push(word.clone());
        } else {
            tokens.extend(bigrams(word));
        }
    }
    tokens.extend(tokenize(&latin, stemmer, stem_map));
    tokens
}

/// Overlapping two character windows, first occurrence kept.
pub fn bigrams(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out: Vec<String> = Vec::new();
    for pair in chars.windows(2) {
        let gram: String = pair.iter().collect();
        if !out.contains(&gram) {
            out.push(gram);
        }
    }
    out
}

/// Mean UTF-16 code unit over the first five units of `word`.
pub fn avg_char_code(word: &str) -> f64 {
    let units: Vec<u16> = word.encode_utf16().take(5).collect();
    if units.is_empty() {
        return 0.0;
    }
    units.iter().map(|&u| u as f64).sum::<f64>() / units.len() as f64
}

/// Rewrites an unsegmented CJK query as every substring of two or more characters,
/// by start offset and then by decreasing length, separated by spaces.
pub fn expand_cjk_query(query: &str) -> String {
    let compact: Vec<char> = WHITESPACE.replace_all(query, "").chars().collect();
    let mut parts = Vec::new();
    for start in 0..compact.len() {
        for end in (start + 2..=compact.len()).rev() {
            parts.push(compact[start..end].iter().collect::<String>());
        }
    }
    parts.join(" ")
}
