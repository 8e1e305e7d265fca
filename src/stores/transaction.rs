//! Defines the transaction store trait.

use std::future::Future;

use crate::transaction::{NewTransaction, Transaction, TransactionId};

/// A transport or server-side failure reported by a store.
///
/// The message is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RemoteError(pub String);

impl From<rusqlite::Error> for RemoteError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => {
                RemoteError("the requested transaction could not be found".to_owned())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                RemoteError(format!("an unexpected SQL error occurred: {error}"))
            }
        }
    }
}

/// The authoritative record of transactions.
///
/// The ledger never mutates its local copy of the transactions. After every
/// successful change it calls [TransactionStore::list] and replaces its copy
/// wholesale. Calls are not retried and cannot be cancelled.
pub trait TransactionStore {
    /// Retrieve every transaction.
    fn list(&self) -> impl Future<Output = Result<Vec<Transaction>, RemoteError>> + Send;

    /// Store a new transaction, returning it with its assigned ID.
    fn create(
        &self,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, RemoteError>> + Send;

    /// Replace the transaction with `id`.
    fn update(
        &self,
        id: TransactionId,
        transaction: Transaction,
    ) -> impl Future<Output = Result<Transaction, RemoteError>> + Send;

    /// Remove the transaction with `id`.
    fn delete(&self, id: TransactionId) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
