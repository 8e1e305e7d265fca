//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    category::{Category, CategoryName, create_category, get_all_categories},
    stores::{CategoryStore, RemoteError, sqlite::lock},
};

/// Reads categories from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Add a category, or return the existing one with the same name.
    ///
    /// This is not part of [CategoryStore], the ledger itself only reads categories.
    ///
    /// # Errors
    /// Returns a [RemoteError] if there is an SQL error.
    pub fn add(&self, name: CategoryName) -> Result<Category, RemoteError> {
        let connection = lock(&self.connection)?;
        create_category(name, &connection)
    }
}

impl CategoryStore for SQLiteCategoryStore {
    async fn categories(&self) -> Result<Vec<Category>, RemoteError> {
        let connection = lock(&self.connection)?;
        get_all_categories(&connection)
    }
}
