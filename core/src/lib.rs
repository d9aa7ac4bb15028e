pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod shared;
pub mod store;
pub mod tokenizer;

pub use engine::{Document, EngineConfig, SearchEngine, SearchHit};
pub use error::{Result, SearchError};
pub use index::{Field, InvertedIndex};
pub use query::CombinePolicy;
pub use shared::SharedSearchEngine;
pub use store::{KeyValueStore, OpenAddressingMap, StoreConfig};

/// Internal 0-based document identifier, assigned in load order.
pub type DocId = u32;
