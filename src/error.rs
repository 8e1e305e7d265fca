//! Defines the ledger error type, its flat kind taxonomy and user-facing messages.

use serde::Serialize;
use time::Date;

use crate::{stores::RemoteError, transaction::TransactionId};

/// The errors that may occur when changing the ledger.
///
/// Every variant other than [Error::RemoteFailure] is detected locally, before
/// any call to the transaction repository, and leaves local state untouched.
/// None of them are fatal: the caller may fix the input and try again.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount was zero, or not a finite number.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// An expense was dated after today.
    ///
    /// Only income may be scheduled for a future date.
    #[error("{0} is a date in the future, which is not allowed for expenses")]
    FutureExpenseNotAllowed(Date),

    /// The expense is larger than the running balance on its date.
    #[error("insufficient balance on {check_date}: {available:.2} available")]
    InsufficientBalance {
        /// The running balance on `check_date` that the expense was compared against.
        available: f64,
        /// The date the running balance was evaluated at.
        check_date: Date,
    },

    /// Removing an income would leave later expenses unfunded.
    #[error("deleting this income would make {affected_expenses} future expense(s) invalid")]
    CascadingDeleteInvalid {
        /// The number of expenses dated after the income.
        affected_expenses: usize,
    },

    /// The update or delete target is not in the local transaction collection.
    #[error("transaction {0} could not be found")]
    TransactionNotFound(TransactionId),

    /// The transaction repository failed to persist a change or list transactions.
    ///
    /// The message from the repository is kept verbatim so it can be shown to
    /// the user.
    #[error("{0}")]
    RemoteFailure(String),
}

/// The kind of an [Error], without its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// See [Error::InvalidAmount].
    InvalidAmount,
    /// See [Error::FutureExpenseNotAllowed].
    FutureExpenseNotAllowed,
    /// See [Error::InsufficientBalance].
    InsufficientBalance,
    /// See [Error::CascadingDeleteInvalid].
    CascadingDeleteInvalid,
    /// See [Error::TransactionNotFound].
    TransactionNotFound,
    /// See [Error::RemoteFailure].
    RemoteFailure,
}

/// Presentation settings used to render user-facing messages.
///
/// Formatting never affects how amounts are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
    /// The symbol placed in front of amounts, e.g. "$".
    pub currency_symbol: String,
}

impl MessageFormat {
    /// Create a message format with `currency_symbol`.
    pub fn new(currency_symbol: &str) -> Self {
        Self {
            currency_symbol: currency_symbol.to_owned(),
        }
    }

    /// Format `amount` with the currency symbol and two decimal places.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

impl Default for MessageFormat {
    fn default() -> Self {
        Self::new("$")
    }
}

impl Error {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidAmount => ErrorKind::InvalidAmount,
            Error::FutureExpenseNotAllowed(_) => ErrorKind::FutureExpenseNotAllowed,
            Error::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Error::CascadingDeleteInvalid { .. } => ErrorKind::CascadingDeleteInvalid,
            Error::TransactionNotFound(_) => ErrorKind::TransactionNotFound,
            Error::RemoteFailure(_) => ErrorKind::RemoteFailure,
        }
    }

    /// Whether the error was raised by a local check rather than the repository.
    pub fn is_validation(&self) -> bool {
        self.kind() != ErrorKind::RemoteFailure
    }

    /// The message to show the user for this error.
    pub fn user_message(&self, format: &MessageFormat) -> String {
        match self {
            Error::InvalidAmount => "Amount must be greater than zero".to_owned(),
            Error::FutureExpenseNotAllowed(_) => "Expenses cannot be added for a future date. \
                Only income can be scheduled for future dates."
                .to_owned(),
            Error::InsufficientBalance {
                available,
                check_date,
            } => format!(
                "Insufficient balance on {check_date}. Available: {}.",
                format.format_amount(*available)
            ),
            Error::CascadingDeleteInvalid { affected_expenses } => format!(
                "Cannot delete this income as it would make {affected_expenses} future expense(s) \
                invalid. Please delete or modify those expenses first."
            ),
            Error::TransactionNotFound(_) => "Transaction not found".to_owned(),
            Error::RemoteFailure(message) => message.clone(),
        }
    }
}

impl From<RemoteError> for Error {
    fn from(error: RemoteError) -> Self {
        Error::RemoteFailure(error.0)
    }
}
