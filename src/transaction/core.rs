//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::stores::RemoteError;

// ============================================================================
// MODELS
// ============================================================================

/// Server-assigned identifier for a transaction.
pub type TransactionId = i64;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned. Income may be dated in the future.
    Income,
    /// Money spent. Expenses may not be dated after today.
    Expense,
}

impl TransactionKind {
    /// The lowercase name used for storage and display.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("\"{other}\" is not a transaction kind")),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An expense or income that has been stored by the transaction repository.
///
/// To propose a new transaction, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money spent or earned.
    ///
    /// Use [Transaction::magnitude] rather than reading this field directly,
    /// stored values may carry a sign.
    pub amount: f64,
    /// The name of the category the transaction belongs to.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened, or is scheduled to happen for income.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction proposal.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(kind: TransactionKind, amount: f64, date: Date) -> NewTransaction {
        NewTransaction {
            kind,
            amount,
            category: String::new(),
            description: String::new(),
            date,
        }
    }

    /// The unsigned amount of the transaction.
    ///
    /// The sign of a transaction comes from its kind, never from the stored amount.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Whether the transaction is income.
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Whether the transaction is an expense.
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// A transaction that has not been stored yet and has no ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Whether this transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The name of the category the transaction belongs to.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

impl NewTransaction {
    /// Set the category name.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Attach a server-assigned `id`, producing a stored [Transaction].
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// No business rules are checked here, the caller is expected to have
/// validated the transaction.
///
/// # Errors
/// Returns a [RemoteError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, RemoteError> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (kind, amount, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, kind, amount, category, description, date",
        )?
        .query_row(
            (
                transaction.kind,
                transaction.amount,
                transaction.category,
                transaction.description,
                transaction.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Replace the stored fields of the transaction with `id`.
///
/// # Errors
/// This function will return a [RemoteError] if no transaction has the ID
/// `id`, or if there is an SQL error.
pub fn update_transaction(
    id: TransactionId,
    transaction: &Transaction,
    connection: &Connection,
) -> Result<Transaction, RemoteError> {
    let updated = connection
        .prepare(
            "UPDATE \"transaction\"
             SET kind = ?1, amount = ?2, category = ?3, description = ?4, date = ?5
             WHERE id = ?6
             RETURNING id, kind, amount, category, description, date",
        )?
        .query_row(
            (
                transaction.kind,
                transaction.amount,
                &transaction.category,
                &transaction.description,
                transaction.date,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => {
                RemoteError(format!("tried to update transaction {id} which does not exist"))
            }
            error => error.into(),
        })?;

    Ok(updated)
}

/// Delete the transaction with `id`.
///
/// # Errors
/// This function will return a [RemoteError] if no transaction has the ID
/// `id`, or if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), RemoteError> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(RemoteError(format!(
            "tried to delete transaction {id} which does not exist"
        )));
    }

    Ok(())
}

/// Retrieve every transaction, most recent first.
///
/// # Errors
/// Returns a [RemoteError] if there is an SQL error.
pub fn list_transactions(connection: &Connection) -> Result<Vec<Transaction>, RemoteError> {
    connection
        .prepare(
            "SELECT id, kind, amount, category, description, date
             FROM \"transaction\" ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let description = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        category,
        description,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use super::map_transaction_row;
    use crate::{
        db::initialize,
        stores::RemoteError,
        transaction::{
            Transaction, TransactionId, TransactionKind, create_transaction, delete_transaction,
            list_transactions, update_transaction,
        },
    };

    fn get_transaction(
        id: TransactionId,
        connection: &Connection,
    ) -> Result<Transaction, RemoteError> {
        let transaction = connection
            .prepare(
                "SELECT id, kind, amount, category, description, date
                 FROM \"transaction\" WHERE id = :id",
            )?
            .query_one(&[(":id", &id)], map_transaction_row)?;

        Ok(transaction)
    }

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(TransactionKind::Income, 12.3, date!(2025 - 10 - 05))
                .category("Salary"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, 12.3);
                assert_eq!(transaction.kind, TransactionKind::Income);
                assert_eq!(transaction.category, "Salary");
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn update_replaces_fields() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(TransactionKind::Expense, 20.0, date!(2025 - 10 - 05)),
            &conn,
        )
        .unwrap();
        let mut changed = created.clone();
        changed.amount = 25.0;
        changed.description = "Lunch".to_owned();

        let updated = update_transaction(created.id, &changed, &conn).unwrap();

        assert_eq!(updated, changed);
        assert_eq!(get_transaction(created.id, &conn).unwrap(), changed);
    }

    #[test]
    fn update_fails_on_missing_transaction() {
        let conn = get_test_connection();
        let missing = Transaction::build(TransactionKind::Expense, 20.0, date!(2025 - 10 - 05))
            .with_id(42);

        let result = update_transaction(42, &missing, &conn);

        assert!(result.is_err());
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(TransactionKind::Expense, 20.0, date!(2025 - 10 - 05)),
            &conn,
        )
        .unwrap();

        delete_transaction(created.id, &conn).unwrap();

        assert!(get_transaction(created.id, &conn).is_err());
        assert!(delete_transaction(created.id, &conn).is_err());
    }

    #[test]
    fn list_returns_most_recent_first() {
        let conn = get_test_connection();
        for day in [3, 1, 2] {
            let date = date!(2025 - 10 - 01).replace_day(day).unwrap();
            create_transaction(Transaction::build(TransactionKind::Income, 1.0, date), &conn)
                .unwrap();
        }

        let dates: Vec<_> = list_transactions(&conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.date)
            .collect();

        assert_eq!(
            dates,
            vec![
                date!(2025 - 10 - 03),
                date!(2025 - 10 - 02),
                date!(2025 - 10 - 01)
            ]
        );
    }
}
