//! Read-validate-write transaction pattern.
//!
//! Every mutating operation in this crate follows the same discipline: begin
//! a [`Tx`], read every record the decision depends on (each read records a
//! version precondition), stage writes, then commit. The store rejects the
//! commit with [`StoreError::Contention`] if any read record changed in the
//! meantime, and [`TxRetry`] decides whether to go around again with fresh
//! reads. Nothing is ever cached across transactions and no lock is held
//! between the reads and the commit.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{LobbyError, Result};
use crate::store::{DocPath, Precondition, Store, StoreError, WriteOp};

/// Maximum commit attempts per operation before contention surfaces to the
/// caller as a store failure.
pub(crate) const MAX_COMMIT_ATTEMPTS: u32 = 5;

/// A single optimistic transaction attempt: a read set of version
/// preconditions plus a staged write set.
pub(crate) struct Tx<'s> {
    store: &'s dyn Store,
    preconditions: Vec<Precondition>,
    writes: Vec<WriteOp>,
}

impl<'s> Tx<'s> {
    /// Begin a fresh attempt against `store`.
    pub(crate) fn begin(store: &'s dyn Store) -> Self {
        Self {
            store,
            preconditions: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Read a document into the transaction.
    ///
    /// Records a precondition pinning the observed version (or the document's
    /// absence), so the commit fails if the document changes before it lands.
    pub(crate) async fn get<T: DeserializeOwned>(&mut self, path: &DocPath) -> Result<Option<T>> {
        match self.store.get(path).await? {
            Some(doc) => {
                self.preconditions.push(Precondition {
                    path: path.clone(),
                    expected: Some(doc.version),
                });
                Ok(Some(serde_json::from_value(doc.value)?))
            }
            None => {
                self.preconditions.push(Precondition {
                    path: path.clone(),
                    expected: None,
                });
                Ok(None)
            }
        }
    }

    /// Stage a full-document write.
    pub(crate) fn set<T: Serialize>(&mut self, path: &DocPath, value: &T) -> Result<()> {
        self.writes.push(WriteOp::Set {
            path: path.clone(),
            value: serde_json::to_value(value)?,
        });
        Ok(())
    }

    /// Stage a deletion.
    pub(crate) fn delete(&mut self, path: &DocPath) {
        self.writes.push(WriteOp::Delete { path: path.clone() });
    }

    /// Submit the attempt to the store.
    pub(crate) async fn commit(self) -> std::result::Result<(), StoreError> {
        self.store.commit(self.preconditions, self.writes).await
    }
}

/// Bounded retry budget shared by every mutating operation.
///
/// Contention consumes one attempt and the operation loops with fresh reads;
/// any other store failure, or an exhausted budget, surfaces immediately.
pub(crate) struct TxRetry {
    op: &'static str,
    attempts: u32,
}

impl TxRetry {
    pub(crate) fn new(op: &'static str) -> Self {
        Self { op, attempts: 0 }
    }

    /// Decide whether the operation should retry after a failed commit.
    ///
    /// Returns `Ok(())` to signal "go around again"; otherwise converts the
    /// store failure into the caller-facing error.
    pub(crate) fn check(&mut self, err: StoreError) -> Result<()> {
        match err {
            StoreError::Contention { ref path } if self.attempts + 1 < MAX_COMMIT_ATTEMPTS => {
                self.attempts += 1;
                debug!(
                    op = self.op,
                    attempt = self.attempts,
                    %path,
                    "commit contention, retrying with fresh reads"
                );
                Ok(())
            }
            other => Err(LobbyError::Store(other)),
        }
    }
}
