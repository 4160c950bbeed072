use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub type DocId = u32;

/// Separates path, title and short description inside a file info entry.
pub const FILE_INFO_DELIMITER: &str = "@@@";

/// One decoded `docId*score*pos1$pos2...` entry of a posting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub score: u32,
    pub positions: Vec<u32>,
}

/// Decoded `relativePath@@@title@@@shortDescription` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    pub relative_path: String,
    pub title: String,
    pub short_description: String,
}

impl TopicInfo {
    /// The title sits between the first and the last delimiter, so titles may themselves contain `@@@`.
    pub fn parse(entry: &str) -> Self {
        let first = entry.find(FILE_INFO_DELIMITER);
        let last = entry.rfind(FILE_INFO_DELIMITER);
        match (first, last) {
            (Some(first), Some(last)) if first < last => TopicInfo {
                relative_path: entry[..first].to_string(),
                title: entry[first + FILE_INFO_DELIMITER.len()..last].to_string(),
                short_description: entry[last + FILE_INFO_DELIMITER.len()..].to_string(),
            },
            // One delimiter: no title, the remainder is the short description.
            (Some(only), _) => TopicInfo {
                relative_path: entry[..only].to_string(),
                title: String::new(),
                short_description: entry[only + FILE_INFO_DELIMITER.len()..].to_string(),
            },
            _ => TopicInfo { relative_path: entry.to_string(), title: String::new(), short_description: String::new() },
        }
    }
}

/// The precomputed WebHelp search index: word postings, stop words and the file info table.
///
/// Read-only once loaded; searches borrow it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebHelpIndex {
    /// Indexed word -> serialized posting list.
    pub postings: BTreeMap<String, String>,
    pub stop_words: HashSet<String>,
    /// Indexed by document id.
    pub file_info: Vec<String>,
}

impl WebHelpIndex {
    pub fn new(postings: BTreeMap<String, String>, stop_words: HashSet<String>, file_info: Vec<String>) -> Self {
        Self { postings, stop_words, file_info }
    }

    pub fn is_stop_word(&self, word: &str) -> bool { self.stop_words.contains(word) }

    pub fn contains_word(&self, word: &str) -> bool { self.postings.contains_key(word) }

    pub fn num_docs(&self) -> usize { self.file_info.len() }

    /// Decoded postings of an indexed word; empty if the word is not indexed.
    pub fn postings_for(&self, word: &str) -> Vec<Posting> {
        self.postings.get(word).map(|raw| decode_postings(raw)).unwrap_or_default()
    }

    pub fn topic(&self, doc_id: DocId) -> Option<TopicInfo> {
        self.file_info.get(doc_id as usize).map(|entry| TopicInfo::parse(entry))
    }

    /// Indexed words whose lowercase form starts with `prefix`.
    pub fn words_starting_with(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.postings.keys().filter(|w| w.to_lowercase().starts_with(&prefix)).cloned().collect()
    }

    /// Indexed words whose lowercase form contains `needle`.
    pub fn words_containing(&self, needle: &str) -> Vec<String> {
        let needle = needle.to_lowercase();
        self.postings.keys().filter(|w| w.to_lowercase().contains(&needle)).cloned().collect()
    }
}

/// Decode a comma-separated posting list. Entries without a `*` are skipped.
pub fn decode_postings(raw: &str) -> Vec<Posting> {
    let mut out = Vec::new();
    for entry in raw.split(',') {
        if entry.is_empty() { continue; }
        let Some((doc, rest)) = entry.split_once('*') else {
            tracing::warn!(entry, "unexpected posting format, '*' delimiter is missing");
            continue;
        };
        let Ok(doc_id) = doc.trim().parse::<DocId>() else {
            tracing::warn!(entry, "posting has a non numeric document id");
            continue;
        };
        let (score, positions) = match rest.split_once('*') {
            Some((score, positions)) => (score, decode_positions(positions)),
            None => (rest, Vec::new()),
        };
        let score = score.trim().parse::<u32>().unwrap_or(0);
        out.push(Posting { doc_id, score, positions });
    }
    out
}

/// Positions are base-32 integers joined by `$`; `-1` and garbage are dropped.
pub fn decode_positions(raw: &str) -> Vec<u32> {
    raw.split('$')
        .filter_map(|p| i64::from_str_radix(p.trim(), 32).ok())
        .filter_map(|p| u32::try_from(p).ok())
        .collect()
}
