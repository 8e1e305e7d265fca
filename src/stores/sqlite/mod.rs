//! Stores backed by a local SQLite database.

mod category;
mod transaction;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{clock::Clock, db::initialize, stores::RemoteError};

/// Creates the transaction and category stores that share `db_connection`.
///
/// The transaction store reads today's date from `clock`.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// # Errors
/// Returns a [RemoteError] if the database cannot be initialized.
pub fn create_stores<C: Clock>(
    db_connection: Connection,
    clock: C,
) -> Result<(SQLiteTransactionStore<C>, SQLiteCategoryStore), RemoteError> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok((
        SQLiteTransactionStore::new(connection.clone(), clock),
        SQLiteCategoryStore::new(connection),
    ))
}

fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, RemoteError> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire the database lock: {error}");
        RemoteError("could not acquire the database lock".to_owned())
    })
}
