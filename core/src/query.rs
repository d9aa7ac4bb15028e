//! Boolean keyword evaluation over an [`InvertedIndex`].

use crate::error::SearchError;
use crate::index::{Field, InvertedIndex};
use crate::store::KeyValueStore;
use crate::tokenizer::analyze;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How the posting lists of a multi-token query are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinePolicy {
    /// A document matches if it contains any query token.
    #[default]
    Union,
    /// A document matches only if it contains every query token.
    Intersection,
}

impl fmt::Display for CombinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CombinePolicy::Union => "union",
            CombinePolicy::Intersection => "intersection",
        })
    }
}

impl FromStr for CombinePolicy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" | "any" | "or" => Ok(CombinePolicy::Union),
            "intersection" | "all" | "and" => Ok(CombinePolicy::Intersection),
            other => Err(SearchError::invalid(format!(
                "unknown combine policy `{other}`, expected `union` or `intersection`"
            ))),
        }
    }
}

/// Run `query` against one field of `index`.
///
/// Returns matching document ids deduplicated and in ascending order. A query
/// with no tokens left after stopword removal matches nothing.
pub fn evaluate<S>(index: &InvertedIndex<S>, query: &str, field: Field, policy: CombinePolicy) -> Vec<DocId>
where
    S: KeyValueStore<String, Vec<DocId>>,
{
    let tokens = analyze(query);
    let Some((first, rest)) = tokens.split_first() else {
        return Vec::new();
    };

    let lookup = |token: &str| index.postings(field, token).unwrap_or(&[]);
    let mut result: BTreeSet<DocId> = lookup(first).iter().copied().collect();
    for token in rest {
        let postings = lookup(token);
        match policy {
            CombinePolicy::Union => result.extend(postings.iter().copied()),
            CombinePolicy::Intersection => {
                if result.is_empty() {
                    break;
                }
                let other: BTreeSet<DocId> = postings.iter().copied().collect();
                result.retain(|id| other.contains(id));
            }
        }
    }
    tracing::trace!(%field, %policy, tokens = tokens.len(), hits = result.len(), "query evaluated");
    result.into_iter().collect()
}
