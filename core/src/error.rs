use thiserror::Error;

/// Errors raised while turning a user query into an evaluation plan.
///
/// These never escape `SearchEngine::perform_search`; they are folded into
/// `SearchResult::error` so the caller can show the message in place of results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Unbalanced or misordered parentheses.
    #[error("Invalid expression!")]
    InvalidExpression,
}

pub type Result<T> = std::result::Result<T, SearchError>;
