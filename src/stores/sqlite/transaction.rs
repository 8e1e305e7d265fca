//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Date;

use crate::{
    clock::Clock,
    stores::{RemoteError, TransactionStore, sqlite::lock},
    transaction::{
        NewTransaction, Transaction, TransactionId, TransactionKind, create_transaction,
        delete_transaction, list_transactions, update_transaction,
    },
};

/// The message returned when an expense is dated after today.
pub const FUTURE_EXPENSE_MESSAGE: &str = "Expenses cannot be added for future dates";

/// Stores transactions in a SQLite database.
///
/// The store is the final authority on what gets written: it refuses expenses
/// dated after today according to its own clock, whatever the caller checked.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore<C> {
    connection: Arc<Mutex<Connection>>,
    clock: C,
}

impl<C: Clock> SQLiteTransactionStore<C> {
    /// Create a new store for the SQLite `connection` that reads today's date from `clock`.
    ///
    /// The tables must already exist, see [crate::db::initialize].
    pub fn new(connection: Arc<Mutex<Connection>>, clock: C) -> Self {
        Self { connection, clock }
    }

    fn check_date(&self, kind: TransactionKind, date: Date) -> Result<(), RemoteError> {
        let today = self.clock.today();

        if kind == TransactionKind::Expense && date > today {
            tracing::warn!("Refused to store an expense dated {date}, today is {today}");
            return Err(RemoteError(FUTURE_EXPENSE_MESSAGE.to_owned()));
        }

        Ok(())
    }
}

impl<C> TransactionStore for SQLiteTransactionStore<C>
where
    C: Clock + Send + Sync,
{
    async fn list(&self) -> Result<Vec<Transaction>, RemoteError> {
        let connection = lock(&self.connection)?;
        list_transactions(&connection)
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, RemoteError> {
        self.check_date(transaction.kind, transaction.date)?;
        let connection = lock(&self.connection)?;
        create_transaction(transaction, &connection)
    }

    async fn update(
        &self,
        id: TransactionId,
        transaction: Transaction,
    ) -> Result<Transaction, RemoteError> {
        self.check_date(transaction.kind, transaction.date)?;
        let connection = lock(&self.connection)?;
        update_transaction(id, &transaction, &connection)
    }

    async fn delete(&self, id: TransactionId) -> Result<(), RemoteError> {
        let connection = lock(&self.connection)?;
        delete_transaction(id, &connection)
    }
}
