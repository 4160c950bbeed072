use crate::eval::{evaluate, filter_phrase};
use crate::expr::{normalize_query, rpn_to_string, to_rpn};
use crate::index::WebHelpIndex;
use crate::options::SearchOptions;
use crate::postings::DocumentResult;
use crate::query::{filter_original_expression, is_path_like, is_phrase_query, preprocess, strip_quotes, QueryMode};
use crate::rank::{resolve_documents, DocumentInfo, ResultCategories};
use crate::stemmer::{stemmer_for_language, Stem};
use crate::tokenizer::{expand_cjk_query, is_cjk_language, StemQueryMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Everything a search produces for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The query as searched, scrubbed for display.
    pub search_expression: String,
    /// Stop words and the operators dropped from a phrase.
    pub excluded: Vec<String>,
    #[serde(rename = "originalSearchExpression")]
    pub original_expression: String,
    pub documents: Vec<DocumentInfo>,
    pub words_not_found: Vec<String>,
    pub stem_map: StemQueryMap,
    pub mode: Option<QueryMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-call search state. A fresh one is built for every query.
pub struct SearchContext<'a> {
    pub index: &'a WebHelpIndex,
    stemmer: Option<&'a dyn Stem>,
    pub use_stemming: bool,
    pub cjk: bool,
    /// Expand terms to themselves only.
    pub single_word_exact: bool,
    /// Expand terms by substring instead of prefix.
    pub inside_file_path: bool,
    pub boolean_search: bool,
    pub stem_map: StemQueryMap,
    pub words_not_found: Vec<String>,
    /// Terms of the last evaluated expression, in RPN order.
    pub search_terms: Vec<String>,
}

impl<'a> SearchContext<'a> {
    pub fn new(index: &'a WebHelpIndex, stemmer: Option<&'a dyn Stem>, use_stemming: bool, cjk: bool) -> Self {
        Self {
            index,
            stemmer,
            use_stemming,
            cjk,
            single_word_exact: false,
            inside_file_path: false,
            boolean_search: false,
            stem_map: StemQueryMap::new(),
            words_not_found: Vec::new(),
            search_terms: Vec::new(),
        }
    }

    /// The stemmer, when stemming is switched on.
    pub fn active_stemmer(&self) -> Option<&'a dyn Stem> {
        if self.use_stemming { self.stemmer } else { None }
    }
}

/// Searches a loaded WebHelp index.
pub struct SearchEngine {
    index: WebHelpIndex,
    options: SearchOptions,
    stemmer: Option<Box<dyn Stem>>,
}

impl SearchEngine {
    /// Picks the stemmer matching the indexer language.
    pub fn new(index: WebHelpIndex, options: SearchOptions) -> Self {
        let stemmer = stemmer_for_language(options.indexer_language());
        Self { index, options, stemmer }
    }

    pub fn with_stemmer(index: WebHelpIndex, options: SearchOptions, stemmer: Option<Box<dyn Stem>>) -> Self {
        Self { index, options, stemmer }
    }

    pub fn index(&self) -> &WebHelpIndex { &self.index }

    pub fn options(&self) -> &SearchOptions { &self.options }

    pub fn is_cjk(&self) -> bool { is_cjk_language(self.options.indexer_language()) }

    /// Run a query. Parse errors are reported in `SearchResult::error`, never returned.
    pub fn perform_search(&self, query: &str) -> SearchResult {
        let original: String = query.nfc().collect();
        tracing::debug!(query = %original, "search");
        let cjk = self.is_cjk();

        let initial = if cjk && original.chars().count() > 1 { expand_cjk_query(&original) } else { original.clone() };
        let phrase = is_phrase_query(&original, cjk);

        let mut result = SearchResult {
            search_expression: filter_original_expression(&initial),
            original_expression: original.clone(),
            ..SearchResult::default()
        };

        let preprocessed = match preprocess(&strip_quotes(&initial), phrase, &self.index.stop_words) {
            Ok(p) => p,
            Err(err) => {
                tracing::debug!(error = %err, "query rejected");
                result.error = Some(err.to_string());
                return result;
            }
        };
        tracing::debug!(expression = %preprocessed.expression, "preprocessed query");
        result.excluded = preprocessed.excluded;
        if preprocessed.expression.is_empty() {
            return result;
        }

        let mut ctx = SearchContext::new(&self.index, self.stemmer.as_deref(), self.options.use_stemming, cjk);
        let (mode, ranked) = self.rank_expression(&mut ctx, &preprocessed.expression, phrase);
        result.documents = resolve_documents(&self.index, &ranked);
        result.mode = Some(mode);
        result.stem_map = ctx.stem_map;
        let mut seen = HashSet::new();
        result.words_not_found = ctx.words_not_found.into_iter().filter(|w| seen.insert(w.clone())).collect();
        result
    }

    fn rank_expression(&self, ctx: &mut SearchContext<'_>, expression: &str, phrase: bool) -> (QueryMode, Vec<DocumentResult>) {
        let normalized = normalize_query(expression, self.options.default_operator);
        ctx.boolean_search = normalized.boolean_search;

        let word_count = if ctx.cjk { 1 } else { normalized.word_count() };
        if !ctx.cjk {
            ctx.single_word_exact = phrase && word_count == 1;
            if !ctx.single_word_exact && !phrase {
                ctx.inside_file_path = is_path_like(expression);
            }
        }
        let mode = classify(phrase, ctx.inside_file_path, word_count, ctx.boolean_search);

        let rpn = to_rpn(&normalized.expression);
        tracing::debug!(rpn = %rpn_to_string(&rpn), ?mode, "evaluating");
        let found = evaluate(ctx, &rpn);

        let mut categories = ResultCategories::new();
        if word_count == 1 {
            if !ctx.single_word_exact && !ctx.use_stemming && !ctx.cjk {
                ctx.single_word_exact = true;
                categories.add_category(evaluate(ctx, &rpn));
            }
            categories.add_category(found);
        } else if phrase {
            categories.add_category(filter_phrase(&found, &ctx.search_terms, ctx.active_stemmer()));
        } else if ctx.boolean_search {
            categories.group_by_word_count(found);
        } else {
            categories.add_category(filter_phrase(&found, &ctx.search_terms, ctx.active_stemmer()));
            categories.group_by_word_count(found);
        }
        (mode, categories.into_ranked())
    }
}

fn classify(phrase: bool, path_like: bool, word_count: usize, boolean: bool) -> QueryMode {
    if phrase {
        QueryMode::Phrase
    } else if path_like {
        QueryMode::PathLike
    } else if word_count == 1 {
        QueryMode::SingleWord
    } else if boolean {
        QueryMode::Boolean
    } else {
        QueryMode::FreeTerms
    }
}
