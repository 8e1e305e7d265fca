//! Budget ledger keeps a list of income and expense transactions consistent
//! with one rule: money can only be spent once it has been earned.
//!
//! Changes go through a [ChangeCoordinator], which checks them against the
//! running balance, persists them through a [TransactionStore] and then
//! replaces its local copy with the store's list. [derive_metrics] turns that
//! list into the figures a budgeting dashboard shows.

#![warn(missing_docs)]

mod balance;
mod category;
mod clock;
mod config;
mod coordinator;
mod db;
mod error;
mod logging;
mod metrics;
mod transaction;
mod validation;

pub mod stores;

pub use balance::{
    DailyBalance, available_balance, cumulative_expense, cumulative_income,
    first_negative_balance, running_balances, to_cents, total_balance,
};
pub use category::{
    Category, CategoryId, CategoryName, EmptyCategoryName, create_category, get_all_categories,
};
pub use clock::{Clock, FixedClock, InvalidTimezone, LocalClock};
pub use config::{DEFAULT_CURRENCY_SYMBOL, DEFAULT_TIMEZONE, LedgerConfig};
pub use coordinator::ChangeCoordinator;
pub use db::initialize as initialize_db;
pub use error::{Error, ErrorKind, MessageFormat};
pub use logging::{DEFAULT_LOG_FILTER, setup_logging};
pub use metrics::{
    CategoryShare, Metrics, MonthOverMonth, MonthSummary, MonthlyTotal, TREND_MONTHS,
    derive_metrics,
};
pub use stores::{CategoryStore, RemoteError, TransactionStore};
pub use transaction::{
    NewTransaction, Transaction, TransactionId, TransactionKind, create_transaction,
    delete_transaction, list_transactions, update_transaction,
};
pub use validation::{
    ValidationContext, ValidationReport, validate_create, validate_delete, validate_update,
};
