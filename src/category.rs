//! Categories that transactions are filed under.
//!
//! Categories are owned by an external service, the ledger only reads them.

use std::{fmt::Display, str::FromStr};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::stores::RemoteError;

/// Identifier for a category.
pub type CategoryId = i64;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

/// The error returned when creating a [CategoryName] from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("category name cannot be empty")]
pub struct EmptyCategoryName;

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, EmptyCategoryName> {
        let name = name.trim();

        if name.is_empty() {
            Err(EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = EmptyCategoryName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label for grouping transactions, e.g. "Groceries".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: CategoryName,
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Add a category to the database.
///
/// Adding a name that already exists returns the existing category.
///
/// # Errors
/// Returns a [RemoteError] if there is an SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, RemoteError> {
    connection.execute(
        "INSERT OR IGNORE INTO category (name) VALUES (?1)",
        (name.as_ref(),),
    )?;

    let id = connection.query_row(
        "SELECT id FROM category WHERE name = ?1",
        (name.as_ref(),),
        |row| row.get(0),
    )?;

    Ok(Category { id, name })
}

/// Retrieve every category ordered by name.
///
/// # Errors
/// Returns a [RemoteError] if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, RemoteError> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC")?
        .query_map([], |row| {
            let id = row.get(0)?;
            let name: String = row.get(1)?;

            Ok(Category {
                id,
                name: CategoryName::new_unchecked(&name),
            })
        })?
        .collect::<Result<Vec<Category>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{CategoryName, EmptyCategoryName, create_category, get_all_categories};
    use crate::db::initialize;

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(EmptyCategoryName));
        assert_eq!(CategoryName::new("   "), Err(EmptyCategoryName));
    }

    #[test]
    fn new_trims_whitespace() {
        let name = CategoryName::new("  Food ").unwrap();

        assert_eq!(name.as_ref(), "Food");
    }

    #[test]
    fn create_category_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let first = create_category(CategoryName::new_unchecked("Food"), &conn).unwrap();
        let second = create_category(CategoryName::new_unchecked("Food"), &conn).unwrap();
        create_category(CategoryName::new_unchecked("Bills"), &conn).unwrap();

        assert_eq!(first, second);
        let names: Vec<_> = get_all_categories(&conn)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();
        assert_eq!(names, vec!["Bills", "Food"]);
    }
}
