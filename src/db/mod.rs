pub mod corpus;
pub mod postgres;

pub use corpus::{CorpusQuery, CorpusStore, InMemoryCorpus};
pub use postgres::{create_pool, PgCorpusStore};
