//! Store abstraction for the lobby coordination engine.
//!
//! The [`Store`] trait defines the only persistence seam the engine uses: a
//! transactional document store addressed by slash-separated paths, in the
//! style of a hosted document database. Every check-then-act sequence in this
//! crate is expressed as a set of version preconditions plus a set of writes
//! submitted to [`commit`](Store::commit) in one call, so correctness never
//! depends on an in-process lock — multiple engine instances may run against
//! the same store concurrently.
//!
//! # Connection Setup
//!
//! Connection setup is intentionally NOT part of this trait — different
//! backends have fundamentally different connection parameters. Construct a
//! connected store externally, then hand it to `LobbyClient::new`.
//!
//! # Implementing a Custom Store
//!
//! Implementations must guarantee:
//!
//! - **Serializable commits** — a commit whose preconditions no longer hold
//!   (a referenced document changed version or appeared/disappeared) fails
//!   with [`StoreError::Contention`] and applies nothing.
//! - **Atomicity** — a successful commit applies every write; a failed one
//!   applies none.
//! - **Push subscriptions** — watchers receive the current value after every
//!   committed change that affects them.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

// ── Paths ───────────────────────────────────────────────────────────

/// Slash-separated address of a single document, e.g. `rooms/3f2a…/players/u1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath(String);

impl DocPath {
    /// Create a document path from its string form.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slash-separated address of a collection of documents, e.g. `rooms` or
/// `rooms/3f2a…/players`. A document `{collection}/{leaf}` belongs to the
/// collection when `leaf` contains no further separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Create a collection path from its string form.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path of a document directly inside this collection.
    pub fn doc(&self, leaf: &str) -> DocPath {
        DocPath::new(format!("{}/{leaf}", self.0))
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Documents and writes ────────────────────────────────────────────

/// A stored document: its JSON value plus the store-assigned version that
/// changes on every committed write.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The document's JSON value.
    pub value: Value,
    /// Monotonic version used for commit preconditions.
    pub version: u64,
}

/// A commit precondition: the document at `path` must still be at `expected`
/// version (`None` = must still be absent) when the commit applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    /// Document the precondition guards.
    pub path: DocPath,
    /// Version observed when the transaction read the document, or `None`
    /// if the document was absent.
    pub expected: Option<u64>,
}

/// A single write inside a commit.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Create or replace the document at `path`.
    Set {
        /// Target document.
        path: DocPath,
        /// Full replacement value.
        value: Value,
    },
    /// Delete the document at `path` (no-op if absent).
    Delete {
        /// Target document.
        path: DocPath,
    },
}

impl WriteOp {
    /// The document this write touches.
    pub fn path(&self) -> &DocPath {
        match self {
            Self::Set { path, .. } | Self::Delete { path } => path,
        }
    }
}

// ── Queries ─────────────────────────────────────────────────────────

/// Sort direction for [`Query`] ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest order key first.
    Ascending,
    /// Largest order key first.
    Descending,
}

/// A field equality filter (`field == value`).
#[derive(Debug, Clone)]
pub struct FieldFilter {
    /// Top-level field name inside the document value.
    pub field: String,
    /// Value the field must equal.
    pub equals: Value,
}

/// An ordered, filtered, limited scan of one collection.
///
/// Ordering keys are numeric document fields (this crate only orders by
/// millisecond timestamps); documents missing the order field sort last.
#[derive(Debug, Clone)]
pub struct Query {
    /// Collection to scan.
    pub collection: CollectionPath,
    /// Optional equality filter.
    pub filter: Option<FieldFilter>,
    /// Field providing the numeric order key.
    pub order_field: String,
    /// Sort direction.
    pub direction: Direction,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// Start a query over `collection` ordered ascending by `order_field`.
    pub fn collection(collection: CollectionPath, order_field: impl Into<String>) -> Self {
        Self {
            collection,
            filter: None,
            order_field: order_field.into(),
            direction: Direction::Ascending,
            limit: None,
        }
    }

    /// Keep only documents whose `field` equals `value`.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filter = Some(FieldFilter {
            field: field.into(),
            equals: value,
        });
        self
    }

    /// Set the sort direction.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Cap the number of returned documents.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ── Errors ──────────────────────────────────────────────────────────

/// Errors reported by a [`Store`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A commit precondition no longer held; the commit applied nothing.
    #[error("transaction contention on {path}")]
    Contention {
        /// The first document whose precondition failed.
        path: DocPath,
    },

    /// The store could not be reached or answered with a transient failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A specialized [`Result`] type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ── Trait ───────────────────────────────────────────────────────────

/// A transactional document store.
///
/// # Object Safety
///
/// This trait is object-safe; the engine holds it as `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Point read of a single document.
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Document>>;

    /// Atomically verify `preconditions` and apply `writes`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Contention`] when any precondition fails; no
    /// write is applied in that case.
    async fn commit(
        &self,
        preconditions: Vec<Precondition>,
        writes: Vec<WriteOp>,
    ) -> StoreResult<()>;

    /// Ordered, filtered, limited scan of a collection.
    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>>;

    /// Subscribe to a single document.
    ///
    /// The receiver holds the current value immediately and is updated after
    /// every committed change to the document.
    async fn watch_doc(&self, path: &DocPath) -> StoreResult<watch::Receiver<Option<Document>>>;

    /// Subscribe to a query result.
    ///
    /// The receiver holds the current result immediately and is re-evaluated
    /// after every commit.
    async fn watch_query(&self, query: &Query) -> StoreResult<watch::Receiver<Vec<Document>>>;
}
