use crate::error::SearchError;
use crate::store::{KeyValueStore, OpenAddressingMap, StoreConfig};
use crate::tokenizer::analyze;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two per-document indexes a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Field::Title),
            "content" => Ok(Field::Content),
            other => Err(SearchError::invalid(format!(
                "unknown field `{other}`, expected `title` or `content`"
            ))),
        }
    }
}

pub type PostingStore = OpenAddressingMap<String, Vec<DocId>>;

/// Token -> posting list, kept separately for titles and bodies.
///
/// A posting list holds one entry per occurrence, so a token repeated within a
/// document lists that document more than once.
#[derive(Debug, Default)]
pub struct InvertedIndex<S = PostingStore> {
    title: S,
    content: S,
}

impl InvertedIndex<PostingStore> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> crate::Result<Self> {
        Ok(Self {
            title: OpenAddressingMap::with_config(config)?,
            content: OpenAddressingMap::with_config(config)?,
        })
    }
}

impl<S: KeyValueStore<String, Vec<DocId>>> InvertedIndex<S> {
    /// Build an index over caller-supplied stores.
    pub fn from_stores(title: S, content: S) -> Self {
        Self { title, content }
    }

    pub fn index_document(&mut self, id: DocId, title: &str, body: &str) {
        append_postings(&mut self.title, id, title);
        append_postings(&mut self.content, id, body);
    }

    pub fn postings(&self, field: Field, token: &str) -> Option<&[DocId]> {
        self.store(field).get(token).map(Vec::as_slice)
    }

    pub fn vocabulary_size(&self, field: Field) -> usize {
        self.store(field).len()
    }

    pub fn store(&self, field: Field) -> &S {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
        }
    }
}

fn append_postings<S: KeyValueStore<String, Vec<DocId>>>(store: &mut S, id: DocId, text: &str) {
    for token in analyze(text) {
        if !store.contains(token.as_str()) {
            store.set(token.clone(), Vec::new());
        }
        if let Some(list) = store.get_mut(token.as_str()) {
            list.push(id);
        }
    }
}
