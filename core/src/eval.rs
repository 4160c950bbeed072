//! RPN evaluation over per-document result sets, plus the phrase filter.

use crate::expr::{Operator, RpnToken};
use crate::postings::{search_term, DocumentResult};
use crate::search::SearchContext;
use crate::stemmer::Stem;
use std::collections::HashSet;

/// Documents present in both operands, in `a` order. Words are concatenated and scores summed.
pub fn intersect(a: &[DocumentResult], b: &[DocumentResult]) -> Vec<DocumentResult> {
    a.iter()
        .filter_map(|left| {
            b.iter().find(|right| right.doc_id == left.doc_id).map(|right| {
                let mut merged = left.clone();
                merged.words.extend(right.words.iter().cloned());
                merged.score = merged.score.saturating_add(right.score);
                merged
            })
        })
        .collect()
}

/// Documents from either operand, each once at its first position. Collisions accumulate.
pub fn union(a: &[DocumentResult], b: &[DocumentResult]) -> Vec<DocumentResult> {
    let mut out: Vec<DocumentResult> = Vec::with_capacity(a.len() + b.len());
    for doc in a.iter().chain(b) {
        match out.iter_mut().find(|d| d.doc_id == doc.doc_id) {
            Some(existing) => {
                existing.words.extend(doc.words.iter().cloned());
                existing.score = existing.score.saturating_add(doc.score);
            }
            None => out.push(doc.clone()),
        }
    }
    out
}

/// Documents of `a` that do not appear in `b`.
pub fn exclude(a: &[DocumentResult], b: &[DocumentResult]) -> Vec<DocumentResult> {
    let excluded: HashSet<_> = b.iter().map(|d| d.doc_id).collect();
    a.iter().filter(|d| !excluded.contains(&d.doc_id)).cloned().collect()
}

/// Run the RPN program. Terms push their lookup results, operators combine the top two entries.
///
/// The terms are recorded in RPN order on the context. An operator short of operands is logged
/// and skipped, leaving the stack as it was. The result is the bottom of the stack.
pub fn evaluate(ctx: &mut SearchContext<'_>, rpn: &[RpnToken]) -> Vec<DocumentResult> {
    let mut stack: Vec<Vec<DocumentResult>> = Vec::new();
    let mut terms = Vec::new();
    for token in rpn {
        match token {
            RpnToken::Term(term) => {
                let found = search_term(ctx, term);
                tracing::debug!(%term, hits = found.len(), "term lookup");
                terms.push(term.clone());
                stack.push(found);
            }
            RpnToken::Op(op) => {
                if stack.len() < 2 {
                    tracing::error!(operator = %op, "missing operand while evaluating search expression");
                    continue;
                }
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else { continue };
                stack.push(match op {
                    Operator::And => intersect(&left, &right),
                    Operator::Or => union(&left, &right),
                    Operator::Not => exclude(&left, &right),
                });
            }
        }
    }
    ctx.search_terms = terms;
    stack.into_iter().next().unwrap_or_default()
}

/// Keep documents whose words are exactly `terms`, in order, at consecutive positions.
pub fn filter_phrase(results: &[DocumentResult], terms: &[String], stemmer: Option<&dyn Stem>) -> Vec<DocumentResult> {
    let expected: Vec<String> = terms
        .iter()
        .map(|t| match stemmer {
            Some(s) => s.stem(t).to_lowercase(),
            None => t.to_lowercase(),
        })
        .collect();

    results
        .iter()
        .filter(|doc| {
            doc.words.len() == expected.len()
                && doc.words.iter().zip(&expected).all(|(m, e)| &m.word == e)
                && has_consecutive_chain(doc)
        })
        .cloned()
        .collect()
}

fn has_consecutive_chain(doc: &DocumentResult) -> bool {
    let Some((first, rest)) = doc.words.split_first() else { return false };
    first.positions.iter().any(|&start| {
        let mut current = start;
        rest.iter().all(|m| match m.positions.iter().find(|&&p| p.checked_sub(1) == Some(current)) {
            Some(&next) => {
                current = next;
                true
            }
            None => false,
        })
    })
}
