//! Contains the collaborator traits the ledger uses to persist transactions and
//! look up categories, plus SQLite implementations of them.

mod category;
mod transaction;

pub mod sqlite;

pub use category::{CategoryStore, categories_or_default, default_categories};
pub use transaction::{RemoteError, TransactionStore};
