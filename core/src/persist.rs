use crate::index::WebHelpIndex;
use crate::options::SearchOptions;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

const INDEX_PARTS: [&str; 3] = ["index-1", "index-2", "index-3"];

/// Layout of a WebHelp search index directory.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// `<name>.json`, or the `<name>.js` module WebHelp emits.
    fn locate(&self, name: &str) -> PathBuf {
        let json = self.root.join(format!("{name}.json"));
        if json.exists() { json } else { self.root.join(format!("{name}.js")) }
    }
    fn stop_words(&self) -> PathBuf { self.locate("stopwords") }
    fn file_info(&self) -> PathBuf { self.locate("htmlFileInfoList") }
    fn properties(&self) -> PathBuf { self.locate("properties") }
    fn index_part(&self, part: &str) -> PathBuf { self.locate(part) }
}

/// Cut the JSON literal out of a `define(...)` wrapper or variable assignment.
fn unwrap_module(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed);
    }
    let start = trimmed.find(&['{', '['][..]).ok_or_else(|| anyhow!("no JSON literal found"))?;
    let close = if trimmed[start..].starts_with('{') { '}' } else { ']' };
    let end = trimmed.rfind(close).ok_or_else(|| anyhow!("unterminated JSON literal"))?;
    Ok(&trimmed[start..=end])
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let body = unwrap_module(&text).with_context(|| format!("parsing {}", path.display()))?;
    let value = serde_json::from_str(body).with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

pub fn load_stop_words(paths: &IndexPaths) -> Result<HashSet<String>> {
    let words: Vec<String> = read_json(&paths.stop_words())?;
    Ok(words.into_iter().collect())
}

pub fn load_file_info(paths: &IndexPaths) -> Result<Vec<String>> { read_json(&paths.file_info()) }

/// Merge the index parts; a word present in a later part replaces the earlier entry.
pub fn load_postings(paths: &IndexPaths) -> Result<BTreeMap<String, String>> {
    let mut postings = BTreeMap::new();
    for part in INDEX_PARTS {
        let path = paths.index_part(part);
        if !path.exists() {
            if part == INDEX_PARTS[0] {
                return Err(anyhow!("missing index file {}", path.display()));
            }
            tracing::debug!(path = %path.display(), "optional index part not present");
            continue;
        }
        let words: BTreeMap<String, String> = read_json(&path)?;
        postings.extend(words);
    }
    Ok(postings)
}

/// Load the full index header needed to search: postings, stop words and file info.
pub fn load_index(paths: &IndexPaths) -> Result<WebHelpIndex> {
    let postings = load_postings(paths)?;
    let stop_words = load_stop_words(paths)?;
    let file_info = load_file_info(paths)?;
    tracing::info!(words = postings.len(), topics = file_info.len(), "loaded search index");
    Ok(WebHelpIndex::new(postings, stop_words, file_info))
}

/// Transformation properties as strings. A missing file yields an empty map.
pub fn load_properties(paths: &IndexPaths) -> Result<HashMap<String, String>> {
    let path = paths.properties();
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw: HashMap<String, Value> = read_json(&path)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, v)
        })
        .collect())
}

pub fn load_options(paths: &IndexPaths) -> Result<SearchOptions> {
    Ok(SearchOptions::from_properties(&load_properties(paths)?))
}

/// Write an index in the layout [`load_index`] reads, all postings in the first part.
pub fn save_index(paths: &IndexPaths, index: &WebHelpIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut stop_words: Vec<&String> = index.stop_words.iter().collect();
    stop_words.sort();
    fs::write(paths.root.join("stopwords.json"), serde_json::to_string_pretty(&stop_words)?)?;
    fs::write(paths.root.join("htmlFileInfoList.json"), serde_json::to_string_pretty(&index.file_info)?)?;
    fs::write(paths.root.join("index-1.json"), serde_json::to_string_pretty(&index.postings)?)?;
    Ok(())
}

pub fn save_properties(paths: &IndexPaths, props: &HashMap<String, String>) -> Result<()> {
    create_dir_all(&paths.root)?;
    fs::write(paths.root.join("properties.json"), serde_json::to_string_pretty(props)?)?;
    Ok(())
}
