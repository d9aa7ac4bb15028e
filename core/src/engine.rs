use crate::error::Result;
use crate::index::{Field, InvertedIndex};
use crate::query::{evaluate, CombinePolicy};
use crate::store::{KeyValueStore, OpenAddressingMap, StoreConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::DocId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub body: String,
}

impl Document {
    /// Split raw file text into a title (first line) and body (the rest), both trimmed.
    pub fn split_raw(text: &str) -> (&str, &str) {
        let (title, body) = text.split_once('\n').unwrap_or((text, ""));
        (title.trim(), body.trim())
    }

    /// First `max_chars` characters of the body.
    pub fn snippet(&self, max_chars: usize) -> &str {
        match self.body.char_indices().nth(max_chars) {
            Some((end, _)) => &self.body[..end],
            None => &self.body,
        }
    }
}

/// Engine tunables. Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub initial_capacity: usize,
    pub load_factor: f64,
    pub policy: CombinePolicy,
    pub snippet_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            policy: CombinePolicy::default(),
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

impl EngineConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig { initial_capacity: self.initial_capacity, load_factor: self.load_factor }
    }
}

/// One result row as shown to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// 1-based id for display.
    pub display_id: u64,
    pub title: String,
    /// Leading characters of the body, present only for content searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

pub struct SearchEngine {
    config: EngineConfig,
    documents: OpenAddressingMap<DocId, Document>,
    index: InvertedIndex,
    next_id: DocId,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let store_config = config.store_config();
        Ok(Self {
            config,
            documents: OpenAddressingMap::with_config(store_config)?,
            index: InvertedIndex::with_config(store_config)?,
            next_id: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_policy(&mut self, policy: CombinePolicy) {
        self.config.policy = policy;
    }

    /// Store and index a document, returning its id.
    pub fn add_document(&mut self, title: impl Into<String>, body: impl Into<String>) -> DocId {
        let id = self.next_id;
        self.next_id += 1;
        let doc = Document { id, title: title.into(), body: body.into() };
        self.index.index_document(id, &doc.title, &doc.body);
        self.documents.set(id, doc);
        id
    }

    /// Add a document from the full text of a file.
    pub fn add_raw(&mut self, text: &str) -> DocId {
        let (title, body) = Document::split_raw(text);
        self.add_document(title, body)
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn search(&self, query: &str, field: Field) -> Vec<DocId> {
        evaluate(&self.index, query, field, self.config.policy)
    }

    /// Like [`search`](Self::search) with the field given by name; names other than
    /// `title` and `content` are rejected.
    pub fn search_by(&self, query: &str, field: &str) -> Result<Vec<DocId>> {
        Ok(self.search(query, field.parse()?))
    }

    /// Project result ids into display rows, skipping ids with no stored document.
    pub fn hits(&self, ids: &[DocId], field: Field) -> Vec<SearchHit> {
        ids.iter()
            .filter_map(|&id| self.document(id))
            .map(|doc| SearchHit {
                display_id: u64::from(doc.id) + 1,
                title: doc.title.clone(),
                snippet: (field == Field::Content)
                    .then(|| doc.snippet(self.config.snippet_chars).to_string()),
            })
            .collect()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            documents = self.len(),
            title_terms = self.index.vocabulary_size(Field::Title),
            content_terms = self.index.vocabulary_size(Field::Content),
            policy = %self.config.policy,
            "index ready"
        );
    }
}
