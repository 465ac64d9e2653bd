//! In-memory reference implementation of the [`Store`] trait.
//!
//! Single-process and lock-per-commit, but it honors the full contract:
//! versioned documents, serializable preconditioned commits that apply
//! all-or-nothing, ordered/filtered/limited queries, and push subscriptions
//! refreshed after every commit. Integration tests run the whole engine
//! against it; it is also a usable backend for local play.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use crate::store::{
    CollectionPath, Direction, DocPath, Document, Precondition, Query, Store, StoreError,
    StoreResult, WriteOp,
};

/// In-memory versioned document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    docs: BTreeMap<DocPath, Document>,
    next_version: u64,
    doc_watchers: HashMap<DocPath, Vec<watch::Sender<Option<Document>>>>,
    query_watchers: Vec<(Query, watch::Sender<Vec<Document>>)>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored (test/diagnostic helper).
    pub async fn len(&self) -> usize {
        self.inner.lock().await.docs.len()
    }

    /// Returns `true` if the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.docs.is_empty()
    }

    #[cfg(test)]
    async fn doc_watcher_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .doc_watchers
            .values()
            .map(Vec::len)
            .sum()
    }
}

impl Inner {
    fn check(&self, preconditions: &[Precondition]) -> StoreResult<()> {
        for pre in preconditions {
            let current = self.docs.get(&pre.path).map(|d| d.version);
            if current != pre.expected {
                return Err(StoreError::Contention {
                    path: pre.path.clone(),
                });
            }
        }
        Ok(())
    }

    fn apply(&mut self, writes: &[WriteOp]) {
        for write in writes {
            match write {
                WriteOp::Set { path, value } => {
                    self.next_version += 1;
                    self.docs.insert(
                        path.clone(),
                        Document {
                            value: value.clone(),
                            version: self.next_version,
                        },
                    );
                }
                WriteOp::Delete { path } => {
                    self.docs.remove(path);
                }
            }
        }
    }

    fn notify(&mut self, writes: &[WriteOp]) {
        for write in writes {
            let path = write.path();
            if let Some(senders) = self.doc_watchers.get_mut(path) {
                let current = self.docs.get(path).cloned();
                for tx in senders.iter() {
                    tx.send_replace(current.clone());
                }
            }
        }
        // Dead senders are dropped on every commit, not just on writes to
        // their path, so watchers of never-rewritten documents don't pile up.
        self.doc_watchers.retain(|_, senders| {
            senders.retain(|tx| !tx.is_closed());
            !senders.is_empty()
        });
        if !self.query_watchers.is_empty() {
            let snapshots: Vec<Vec<Document>> = self
                .query_watchers
                .iter()
                .map(|(query, _)| evaluate(&self.docs, query))
                .collect();
            for ((_, tx), docs) in self.query_watchers.iter_mut().zip(snapshots) {
                tx.send_replace(docs);
            }
            self.query_watchers.retain(|(_, tx)| !tx.is_closed());
        }
    }
}

/// Returns `true` if `path` names a document directly inside `collection`.
fn in_collection(path: &DocPath, collection: &CollectionPath) -> bool {
    path.as_str()
        .strip_prefix(collection.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|leaf| !leaf.is_empty() && !leaf.contains('/'))
}

/// Numeric order key of a document under `field`; missing fields sort last.
fn order_key(doc: &Document, field: &str) -> Option<i64> {
    doc.value.get(field).and_then(|v| v.as_i64())
}

fn evaluate(docs: &BTreeMap<DocPath, Document>, query: &Query) -> Vec<Document> {
    let mut matched: Vec<&Document> = docs
        .iter()
        .filter(|(path, _)| in_collection(path, &query.collection))
        .map(|(_, doc)| doc)
        .filter(|doc| match &query.filter {
            Some(f) => doc.value.get(&f.field) == Some(&f.equals),
            None => true,
        })
        .collect();

    matched.sort_by(|a, b| {
        let (ka, kb) = (order_key(a, &query.order_field), order_key(b, &query.order_field));
        match (ka, kb) {
            (Some(a), Some(b)) => match query.direction {
                Direction::Ascending => a.cmp(&b),
                Direction::Descending => b.cmp(&a),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });

    let limit = query.limit.unwrap_or(usize::MAX);
    matched.into_iter().take(limit).cloned().collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Document>> {
        Ok(self.inner.lock().await.docs.get(path).cloned())
    }

    async fn commit(
        &self,
        preconditions: Vec<Precondition>,
        writes: Vec<WriteOp>,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.check(&preconditions)?;
        inner.apply(&writes);
        inner.notify(&writes);
        Ok(())
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>> {
        Ok(evaluate(&self.inner.lock().await.docs, query))
    }

    async fn watch_doc(&self, path: &DocPath) -> StoreResult<watch::Receiver<Option<Document>>> {
        let mut inner = self.inner.lock().await;
        let current = inner.docs.get(path).cloned();
        let (tx, rx) = watch::channel(current);
        inner.doc_watchers.entry(path.clone()).or_default().push(tx);
        Ok(rx)
    }

    async fn watch_query(&self, query: &Query) -> StoreResult<watch::Receiver<Vec<Document>>> {
        let mut inner = self.inner.lock().await;
        let current = evaluate(&inner.docs, query);
        let (tx, rx) = watch::channel(current);
        inner.query_watchers.push((query.clone(), tx));
        Ok(rx)
    }
}
