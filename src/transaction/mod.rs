//! Transactions recorded in the ledger.
//!
//! This module contains:
//! - The `Transaction` model and `NewTransaction` builder for proposed transactions
//! - Database functions for storing and querying transactions in SQLite

mod core;

pub use core::{
    NewTransaction, Transaction, TransactionId, TransactionKind, create_transaction,
    create_transaction_table, delete_transaction, list_transactions, update_transaction,
};
