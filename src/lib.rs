//! Fuzzy, typo-tolerant search over the Unicode character table.
//!
//! - [`matcher`] scores a query against one candidate string
//! - [`ranker`] keeps the best-scoring records of a store
//! - [`state::QueryService`] answers queries and keeps the table fresh
//! - [`sources`] loads the prepared table and builds it from the UCD

pub mod config;
pub mod entities;
pub mod error;
pub mod executor;
pub mod matcher;
pub mod model;
pub mod ranker;
pub mod refresh;
pub mod sources;
pub mod state;
pub mod ui;

pub use config::SearchConfig;
pub use error::{UnicharError, UnicharResult};
pub use matcher::{score, FuzzyMatcher, NO_MATCH};
pub use model::{CharacterRecord, RecordStore};
pub use ranker::{rank, rank_scored, ScoredCandidate};
pub use state::{QueryService, RefreshStatus};
