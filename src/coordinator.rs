//! Sequences a change through validation, the transaction store and a refresh
//! of the local transaction list.

use crate::{
    Error,
    clock::Clock,
    error::MessageFormat,
    metrics::{Metrics, derive_metrics},
    stores::{RemoteError, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionId},
    validation::{ValidationReport, validate_create, validate_delete, validate_update},
};

/// Holds the local copy of the transactions and applies changes to it.
///
/// A change is validated against the local copy first. If it is rejected the
/// store is never called. If it is accepted the store is called, and on
/// success the whole transaction list is fetched again and replaces the local
/// copy. A failed store call leaves the local copy exactly as it was.
///
/// Only one change should be in flight at a time. Calls take `&mut self`, so
/// the borrow checker enforces this within a session.
#[derive(Debug)]
pub struct ChangeCoordinator<S, C> {
    store: S,
    clock: C,
    format: MessageFormat,
    transactions: Vec<Transaction>,
    in_flight: bool,
    error: Option<String>,
}

impl<S, C> ChangeCoordinator<S, C>
where
    S: TransactionStore,
    C: Clock,
{
    /// Create a coordinator with an empty local copy. Call
    /// [ChangeCoordinator::load] to fetch the transactions.
    pub fn new(store: S, clock: C, format: MessageFormat) -> Self {
        Self {
            store,
            clock,
            format,
            transactions: Vec::new(),
            in_flight: false,
            error: None,
        }
    }

    /// The local copy of the transactions, in the order the store listed them.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The message from the last failed load or change, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a store call is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// The format used to render user-facing messages.
    pub fn message_format(&self) -> &MessageFormat {
        &self.format
    }

    /// Dashboard metrics for the local copy as of today.
    pub fn metrics(&self) -> Metrics {
        derive_metrics(&self.transactions, self.clock.today())
    }

    /// Fetch the transactions from the store, replacing the local copy.
    ///
    /// # Errors
    /// Returns [Error::RemoteFailure] if the store could not list the
    /// transactions. The local copy is left unchanged.
    pub async fn load(&mut self) -> Result<(), Error> {
        self.in_flight = true;
        let result = self.refresh().await;
        self.settle(result, "loaded transactions")
    }

    /// Validate and store a new transaction.
    ///
    /// # Errors
    /// Returns the validation error that blocked the change, or
    /// [Error::RemoteFailure] if the store call or the refresh failed.
    pub async fn create(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let today = self.clock.today();
        if let Err(error) = validate_create(&transaction, &self.transactions, today) {
            return Err(self.reject(error, "create"));
        }

        self.in_flight = true;
        let result = self.store.create(transaction).await;
        let result = self.refresh_after(result).await;
        self.settle(result, "created transaction")
    }

    /// Validate and store changes to an existing transaction.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no local transaction has the
    /// same ID, any other validation error that blocked the change, or
    /// [Error::RemoteFailure] if the store call or the refresh failed.
    pub async fn update(&mut self, transaction: Transaction) -> Result<Transaction, Error> {
        if let Err(error) = self.validate_update(&transaction) {
            return Err(self.reject(error, "update"));
        }

        self.in_flight = true;
        let result = self.store.update(transaction.id, transaction).await;
        let result = self.refresh_after(result).await;
        self.settle(result, "updated transaction")
    }

    /// Validate and remove the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no local transaction has `id`,
    /// [Error::CascadingDeleteInvalid] if later expenses depend on it, or
    /// [Error::RemoteFailure] if the store call or the refresh failed.
    pub async fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        if let Err(error) = self.validate_delete(id) {
            return Err(self.reject(error, "delete"));
        }

        self.in_flight = true;
        let result = self.store.delete(id).await;
        let result = self.refresh_after(result).await;
        self.settle(result, "deleted transaction")
    }

    /// Report whether [ChangeCoordinator::create] would accept `transaction`.
    pub fn check_create(&self, transaction: &NewTransaction) -> ValidationReport {
        let result = validate_create(transaction, &self.transactions, self.clock.today());
        ValidationReport::new(&result, &self.format)
    }

    /// Report whether [ChangeCoordinator::update] would accept `transaction`.
    pub fn check_update(&self, transaction: &Transaction) -> ValidationReport {
        ValidationReport::new(&self.validate_update(transaction), &self.format)
    }

    /// Report whether [ChangeCoordinator::delete] would accept `id`.
    pub fn check_delete(&self, id: TransactionId) -> ValidationReport {
        ValidationReport::new(&self.validate_delete(id), &self.format)
    }

    fn find(&self, id: TransactionId) -> Result<&Transaction, Error> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .ok_or(Error::TransactionNotFound(id))
    }

    fn validate_update(&self, transaction: &Transaction) -> Result<(), Error> {
        let original = self.find(transaction.id)?;
        validate_update(transaction, original, &self.transactions, self.clock.today())
    }

    fn validate_delete(&self, id: TransactionId) -> Result<(), Error> {
        let target = self.find(id)?;
        validate_delete(target, &self.transactions, self.clock.today())
    }

    async fn refresh(&mut self) -> Result<(), Error> {
        self.transactions = self.store.list().await?;
        Ok(())
    }

    async fn refresh_after<T>(&mut self, result: Result<T, RemoteError>) -> Result<T, Error> {
        let value = result?;
        self.refresh().await?;
        Ok(value)
    }

    fn reject(&mut self, error: Error, action: &str) -> Error {
        tracing::warn!("blocked {action}: {error}");
        self.error = Some(error.user_message(&self.format));
        error
    }

    fn settle<T>(&mut self, result: Result<T, Error>, success: &str) -> Result<T, Error> {
        self.in_flight = false;

        match &result {
            Ok(_) => {
                tracing::info!("{success}, {} transactions held", self.transactions.len());
                self.error = None;
            }
            Err(error) => {
                tracing::error!("transaction store call failed: {error}");
                self.error = Some(error.user_message(&self.format));
            }
        }

        result
    }
}
