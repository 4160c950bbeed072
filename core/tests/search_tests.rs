use std::collections::{BTreeMap, HashSet};
use webhelp_search::eval::evaluate;
use webhelp_search::expr::to_rpn;
use webhelp_search::search::SearchContext;
use webhelp_search::{Operator, QueryMode, ResultStatus, RpnToken, SearchEngine, SearchOptions, SearchPresentation, Stem, WebHelpIndex};

fn build_index(words: &[(&str, &str)], stop_words: &[&str], topics: usize) -> WebHelpIndex {
    let postings: BTreeMap<String, String> = words.iter().map(|(w, p)| (w.to_string(), p.to_string())).collect();
    let stop_words: HashSet<String> = stop_words.iter().map(|s| s.to_string()).collect();
    let file_info = (0..topics).map(|i| format!("topics/t{i}.html@@@Topic {i}@@@About topic {i}")).collect();
    WebHelpIndex::new(postings, stop_words, file_info)
}

fn engine(words: &[(&str, &str)]) -> SearchEngine {
    SearchEngine::new(build_index(words, &["the", "a"], 4), SearchOptions::default())
}

fn ids(engine: &SearchEngine, query: &str) -> Vec<u32> {
    engine.perform_search(query).documents.iter().map(|d| d.topic_id).collect()
}

const PETS: &[(&str, &str)] = &[("cat", "1*10,2*5"), ("dog", "2*8")];

#[test]
fn and_intersects_and_sums_scores() {
    let index = build_index(PETS, &[], 3);
    let mut ctx = SearchContext::new(&index, None, false, false);
    let docs = evaluate(&mut ctx, &to_rpn("cat and dog"));
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].doc_id, 2);
    assert_eq!(docs[0].score, 13);
    assert_eq!(ctx.search_terms, vec!["cat", "dog"]);

    let result = engine(PETS).perform_search("cat and dog");
    assert_eq!(result.documents.len(), 1);
    assert_eq!(result.documents[0].topic_id, 2);
    assert_eq!(result.documents[0].words, vec!["cat", "dog"]);
    assert_eq!(result.mode, Some(QueryMode::Boolean));
    assert!(result.error.is_none());
}

#[test]
fn operators_short_of_operands_leave_the_stack_intact() {
    let index = build_index(&[("cat", "0*5"), ("dog", "1*5")], &[], 2);
    let mut ctx = SearchContext::new(&index, None, false, false);
    let leading_not = vec![RpnToken::Op(Operator::Not), RpnToken::Term("cat".into())];
    let docs = evaluate(&mut ctx, &leading_not);
    assert_eq!(docs.iter().map(|d| d.doc_id).collect::<Vec<_>>(), vec![0]);

    let mut ctx = SearchContext::new(&index, None, false, false);
    let unbalanced = vec![
        RpnToken::Term("cat".into()),
        RpnToken::Op(Operator::Not),
        RpnToken::Term("dog".into()),
        RpnToken::Op(Operator::Or),
        RpnToken::Op(Operator::Or),
    ];
    let docs = evaluate(&mut ctx, &unbalanced);
    assert_eq!(docs.iter().map(|d| d.doc_id).collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn leading_operators_inside_parentheses_keep_results() {
    let e = engine(&[("cat", "0*5"), ("dog", "1*5")]);
    assert_eq!(ids(&e, "cat (or dog)"), vec![0, 1]);
    assert_eq!(ids(&e, "(and cat)"), vec![0]);
    let result = e.perform_search("cat (not dog)");
    assert!(result.error.is_none());
    assert!(result.documents.iter().any(|d| d.topic_id == 0));
}

#[test]
fn huge_posting_scores_saturate() {
    let e = engine(&[("flow", "0*4000000000"), ("flower", "0*4000000000")]);
    let result = e.perform_search("flow");
    assert_eq!(result.documents.iter().map(|d| d.topic_id).collect::<Vec<_>>(), vec![0]);
    assert_eq!(result.documents[0].score, 99);
}

#[test]
fn empty_query_searches_nothing() {
    let result = engine(PETS).perform_search("   ");
    assert!(result.documents.is_empty());
    assert!(result.error.is_none());
    assert!(result.mode.is_none());
}

#[test]
fn unbalanced_parentheses_report_an_error() {
    let result = engine(PETS).perform_search("(cat and dog");
    assert_eq!(result.error.as_deref(), Some("Invalid expression!"));
    assert!(result.documents.is_empty());
    assert_eq!(result.original_expression, "(cat and dog");
}

#[test]
fn parenthesised_expressions() {
    let e = engine(&[("cat", "1*10,2*5"), ("dog", "2*8"), ("bird", "3*2")]);
    assert_eq!(ids(&e, "(cat and dog) or bird"), vec![2, 3]);
    assert_eq!(ids(&e, "cat not dog"), vec![1]);
}

#[test]
fn free_terms_rank_documents_with_more_words_first() {
    let result = engine(PETS).perform_search("cat dog");
    let scored: Vec<(u32, u32)> = result.documents.iter().map(|d| (d.topic_id, d.score)).collect();
    assert_eq!(scored, vec![(2, 199), (1, 99)]);
    assert_eq!(result.mode, Some(QueryMode::FreeTerms));
}

#[test]
fn phrase_requires_adjacent_words() {
    let e = engine(&[("machine", "0*3*1$a,1*3*5"), ("learning", "0*2*2,1*4*9")]);
    let result = e.perform_search("\"machine learning\"");
    assert_eq!(result.mode, Some(QueryMode::Phrase));
    assert_eq!(result.documents.iter().map(|d| d.topic_id).collect::<Vec<_>>(), vec![0]);

    // Without quotes both documents match, the adjacent one first.
    assert_eq!(ids(&e, "machine learning"), vec![0, 1]);
}

#[test]
fn exact_single_word_matches_outrank_prefix_matches() {
    let e = engine(&[("flow", "0*1"), ("flower", "1*50"), ("flowering", "1*5")]);
    let result = e.perform_search("flow");
    let scored: Vec<(u32, u32)> = result.documents.iter().map(|d| (d.topic_id, d.score)).collect();
    assert_eq!(scored, vec![(0, 199), (1, 99)]);
    assert_eq!(result.documents[1].words, vec!["flow"]);
    assert_eq!(result.mode, Some(QueryMode::SingleWord));
}

#[test]
fn only_stop_words() {
    let result = engine(PETS).perform_search("the a");
    assert!(result.documents.is_empty());
    assert_eq!(result.excluded, vec!["the", "a"]);
    let page = SearchPresentation::from_result(&result, &SearchOptions::default(), false);
    assert_eq!(page.status, ResultStatus::OnlyStopWords);
}

#[test]
fn path_like_queries_match_inside_words() {
    let e = engine(&[("config.xml", "0*4"), ("myconfig", "1*2")]);
    let result = e.perform_search("fig.x");
    assert_eq!(result.mode, Some(QueryMode::PathLike));
    assert_eq!(result.documents.iter().map(|d| d.topic_id).collect::<Vec<_>>(), vec![0]);
}

#[test]
fn two_letter_terms_match_exactly() {
    let e = engine(&[("go", "0*1"), ("gopher", "1*1")]);
    let result = e.perform_search("go");
    assert_eq!(result.documents.iter().map(|d| d.topic_id).collect::<Vec<_>>(), vec![0]);
    assert!(e.perform_search("zz").words_not_found.contains(&"zz".to_string()));
}

struct Plural;

impl Stem for Plural {
    fn stem(&self, word: &str) -> String { word.trim_end_matches('s').to_string() }
}

#[test]
fn stemming_looks_up_roots_exactly() {
    let options = SearchOptions { use_stemming: true, ..SearchOptions::default() };
    let index = build_index(&[("flower", "0*5"), ("flowerbed", "1*5")], &[], 2);
    let e = SearchEngine::with_stemmer(index, options, Some(Box::new(Plural)));

    let result = e.perform_search("Flowers");
    assert_eq!(result.documents.iter().map(|d| d.topic_id).collect::<Vec<_>>(), vec![0]);
    assert_eq!(result.stem_map.get("flower").map(String::as_str), Some("flowers"));

    let missing = e.perform_search("trees");
    assert!(missing.documents.is_empty());
    assert_eq!(missing.words_not_found, vec!["tree"]);
}

#[test]
fn cjk_queries_use_bigrams() {
    let options = SearchOptions { language: Some("zh".into()), ..SearchOptions::default() };
    let index = build_index(&[("中文", "0*3"), ("文档", "1*2")], &[], 2);
    let e = SearchEngine::new(index, options);
    let result = e.perform_search("中文");
    assert_eq!(result.documents.iter().map(|d| d.topic_id).collect::<Vec<_>>(), vec![0]);
    assert_eq!(result.mode, Some(QueryMode::SingleWord));
}

#[test]
fn unknown_topics_are_skipped() {
    let e = engine(&[("ghost", "7*1,0*1")]);
    assert_eq!(ids(&e, "ghost"), vec![0]);
}

#[test]
fn resolves_topic_metadata() {
    let mut index = build_index(&[("bold", "0*1")], &[], 0);
    index.file_info.push("a.html@@@Use <b>bold</b>@@@Short text".into());
    let e = SearchEngine::new(index, SearchOptions::default());
    let result = e.perform_search("bold");
    let doc = &result.documents[0];
    assert_eq!(doc.relative_path, "a.html");
    assert_eq!(doc.title, "Use &lt;b&gt;bold&lt;/b&gt;");
    assert_eq!(doc.short_description, "Short text");
}

#[test]
fn echoed_expression_is_sanitized() {
    let result = engine(PETS).perform_search("cat<script>");
    assert!(!result.search_expression.contains('<'));
    assert_eq!(result.original_expression, "cat<script>");
}

#[test]
fn decomposed_input_is_normalized() {
    let e = engine(&[("caf\u{e9}", "0*1")]);
    assert_eq!(ids(&e, "cafe\u{301}"), vec![0]);
}
