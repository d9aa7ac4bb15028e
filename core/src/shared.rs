use crate::engine::{SearchEngine, SearchHit};
use crate::error::Result;
use crate::index::Field;
use crate::DocId;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle for sharing one engine between threads.
///
/// The engine itself is single-threaded; this adds a read-write lock so
/// queries can run concurrently while writers get exclusive access. The
/// `docsearch` binary is single-threaded and does not use it.
#[derive(Clone)]
pub struct SharedSearchEngine {
    inner: Arc<RwLock<SearchEngine>>,
}

impl SharedSearchEngine {
    pub fn new(engine: SearchEngine) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    pub fn add_document(&self, title: impl Into<String>, body: impl Into<String>) -> DocId {
        self.inner.write().add_document(title, body)
    }

    pub fn search(&self, query: &str, field: Field) -> Vec<DocId> {
        self.inner.read().search(query, field)
    }

    /// Search and project in one read lock.
    pub fn search_hits(&self, query: &str, field: &str) -> Result<Vec<SearchHit>> {
        let engine = self.inner.read();
        let field: Field = field.parse()?;
        let ids = engine.search(query, field);
        Ok(engine.hits(&ids, field))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
