use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use webhelp_search::options::indexer_language;
use webhelp_search::persist::{load_index, load_options, IndexPaths};
use webhelp_search::present::SearchResultItem;
use webhelp_search::{ResultStatus, SearchEngine, SearchOptions, SearchPresentation};

/// Command line settings that take precedence over the index properties.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub stemming: Option<bool>,
    pub ranking: Option<bool>,
    pub items_per_page: Option<usize>,
}

impl Overrides {
    fn apply(&self, options: &mut SearchOptions) {
        if let Some(lang) = &self.language {
            options.language = Some(indexer_language(lang));
        }
        if let Some(stemming) = self.stemming {
            options.use_stemming = stemming;
        }
        if let Some(ranking) = self.ranking {
            options.search_ranking = ranking;
        }
        if let Some(n) = self.items_per_page {
            options.enable_pagination = true;
            options.items_per_page = Some(n);
        }
    }
}

/// Load the index under `index_dir` together with its transformation properties.
pub fn open_engine(index_dir: &Path, overrides: &Overrides) -> Result<SearchEngine> {
    let paths = IndexPaths::new(index_dir);
    let index = load_index(&paths).with_context(|| format!("loading index from {}", index_dir.display()))?;
    let mut options = load_options(&paths)?;
    overrides.apply(&mut options);
    tracing::debug!(?options, "search options");
    Ok(SearchEngine::new(index, options))
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub status: ResultStatus,
    pub page: usize,
    pub total_pages: usize,
    pub excluded: Vec<String>,
    pub words_not_found: Vec<String>,
    pub results: Vec<SearchResultItem>,
}

/// Search and cut out the requested page of the presentation.
pub fn run_query(engine: &SearchEngine, query: &str, page: usize) -> SearchResponse {
    let start = std::time::Instant::now();
    let result = engine.perform_search(query);
    let presentation = SearchPresentation::from_result(&result, engine.options(), engine.is_cjk());
    let total_pages = presentation.total_pages();
    let page = if page == 0 || page > total_pages { 1 } else { page };
    let results = presentation.page(page).to_vec();
    let elapsed = start.elapsed();
    tracing::info!(%query, hits = presentation.items.len(), took_s = elapsed.as_secs_f64(), "search finished");
    SearchResponse {
        query: result.search_expression,
        took_s: elapsed.as_secs_f64(),
        status: presentation.status,
        page,
        total_pages,
        excluded: result.excluded,
        words_not_found: result.words_not_found,
        results,
    }
}

pub fn render_json(response: &SearchResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

pub fn render_text(response: &SearchResponse) -> String {
    let mut out = String::new();
    match &response.status {
        ResultStatus::Error(msg) => {
            let _ = writeln!(out, "{msg}");
            return out;
        }
        ResultStatus::OnlyStopWords => {
            let _ = writeln!(out, "Your search only contained stop words: {}", response.excluded.join(", "));
            return out;
        }
        ResultStatus::NoResults => {
            let _ = writeln!(out, "No results found for \"{}\"", response.query);
            return out;
        }
        ResultStatus::Found(n) => {
            let _ = writeln!(out, "{n} results for \"{}\" (page {}/{})", response.query, response.page, response.total_pages);
        }
    }
    if !response.excluded.is_empty() {
        let _ = writeln!(out, "Ignored: {}", response.excluded.join(", "));
    }
    for item in &response.results {
        write_item(&mut out, item, "");
        for similar in &item.similar_results {
            write_item(&mut out, similar, "    ");
        }
    }
    out
}

fn write_item(out: &mut String, item: &SearchResultItem, indent: &str) {
    let doc = &item.document;
    let _ = writeln!(out, "{indent}[{}] {} ({})", doc.score, doc.title, doc.relative_path);
    if !doc.short_description.is_empty() {
        let _ = writeln!(out, "{indent}    {}", doc.short_description);
    }
    if !item.missing_words.is_empty() {
        let _ = writeln!(out, "{indent}    missing: {}", item.missing_words.join(" "));
    }
}
