//! Full-text search over a WebHelp search index.
//!
//! Queries go through tokenization, stop word removal and boolean expression
//! compilation, are evaluated against the word postings of the index and come
//! back ranked in priority categories.

pub mod error;
pub mod eval;
pub mod expr;
pub mod history;
pub mod index;
pub mod options;
pub mod persist;
pub mod postings;
pub mod present;
pub mod query;
pub mod rank;
pub mod search;
pub mod stemmer;
pub mod tokenizer;

pub use error::SearchError;
pub use expr::{Operator, RpnToken};
pub use index::{DocId, Posting, TopicInfo, WebHelpIndex};
pub use options::SearchOptions;
pub use postings::{DocumentResult, TermMatch};
pub use present::{ResultStatus, SearchPresentation};
pub use query::QueryMode;
pub use rank::DocumentInfo;
pub use search::{SearchEngine, SearchResult};
pub use stemmer::Stem;
