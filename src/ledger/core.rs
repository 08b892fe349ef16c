//! Defines the core data models and database queries for ledger entries.
//!
//! Expenses and income share one shape and one code path: [LedgerKind]
//! selects the table and the sign of an entry's effect on its account.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, account::AccountId, database_id::DatabaseId};

// ============================================================================
// MODELS
// ============================================================================

/// The id for a ledger entry.
pub type EntryId = DatabaseId;

/// The two kinds of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    /// Money spent. Decreases the referenced account's balance.
    Expense,
    /// Money earned. Increases the referenced account's balance.
    Income,
}

impl LedgerKind {
    /// The database table that stores entries of this kind.
    pub(crate) fn table(self) -> &'static str {
        match self {
            LedgerKind::Expense => "expense",
            LedgerKind::Income => "income",
        }
    }

    /// The signed effect an entry of this kind and `amount` has on its
    /// account's balance: negative for expenses, positive for income.
    pub fn signed_effect(self, amount: f64) -> f64 {
        match self {
            LedgerKind::Expense => -amount,
            LedgerKind::Income => amount,
        }
    }
}

/// An expense or income entry, i.e. an event where money was spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The id of the entry.
    pub id: EntryId,
    /// When the money moved.
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    /// A free-form category, e.g. "Food", "Salary".
    pub category: String,
    /// The amount of money involved, always non-negative. The sign of the
    /// balance effect comes from the entry's kind.
    pub amount: f64,
    /// A text description of what the entry was for.
    pub description: Option<String>,
    /// The account the entry counts against, if any. An entry with no
    /// account reference has no balance effect.
    pub account_id: Option<AccountId>,
}

/// The fields needed to create a [LedgerEntry].
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// When the money moved.
    pub datetime: OffsetDateTime,
    /// A free-form category.
    pub category: String,
    /// The amount of money involved.
    pub amount: f64,
    /// A text description.
    pub description: Option<String>,
    /// The account the entry counts against, if any.
    pub account_id: Option<AccountId>,
}

/// A partial update to a [LedgerEntry]. `None` fields are left unchanged.
///
/// The inner options for `description` and `account_id` distinguish "set to
/// null" (detach) from "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    /// A new datetime.
    pub datetime: Option<OffsetDateTime>,
    /// A new category.
    pub category: Option<String>,
    /// A new amount.
    pub amount: Option<f64>,
    /// A new description, or `Some(None)` to clear it.
    pub description: Option<Option<String>>,
    /// A new account reference, or `Some(None)` to detach the entry.
    pub account_id: Option<Option<AccountId>>,
}

impl EntryPatch {
    /// Produce the entry as it would look with this patch applied.
    pub fn merged_into(&self, entry: &LedgerEntry) -> LedgerEntry {
        LedgerEntry {
            id: entry.id,
            datetime: self.datetime.unwrap_or(entry.datetime),
            category: self.category.clone().unwrap_or_else(|| entry.category.clone()),
            amount: self.amount.unwrap_or(entry.amount),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| entry.description.clone()),
            account_id: self.account_id.unwrap_or(entry.account_id),
        }
    }
}

/// Check that `amount` is usable as an entry amount.
///
/// Zero is a valid amount with zero balance effect.
///
/// # Errors
/// Returns [Error::ValidationFailure] if the amount is negative or not
/// finite.
pub fn validate_amount(amount: f64) -> Result<(), Error> {
    if !amount.is_finite() {
        return Err(Error::ValidationFailure(format!(
            "amount must be a finite number, got {amount}"
        )));
    }

    if amount < 0.0 {
        return Err(Error::ValidationFailure(format!(
            "amount must not be negative, got {amount}"
        )));
    }

    Ok(())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense and income tables in the database.
///
/// Both carry a foreign key that detaches their entries when the referenced
/// account is deleted, and an index to serve the dashboard's date-windowed
/// queries.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_ledger_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for table in [LedgerKind::Expense.table(), LedgerKind::Income.table()] {
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    datetime TEXT NOT NULL,
                    category TEXT NOT NULL,
                    amount REAL NOT NULL,
                    description TEXT,
                    account_id INTEGER,
                    FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE SET NULL
                    )"
            ),
            (),
        )?;

        connection.execute(
            &format!("CREATE INDEX IF NOT EXISTS idx_{table}_datetime ON {table}(datetime);"),
            (),
        )?;
    }

    Ok(())
}

/// Map a database row to a [LedgerEntry].
pub fn map_row_to_entry(row: &Row) -> Result<LedgerEntry, rusqlite::Error> {
    let id = row.get(0)?;
    let datetime = row.get(1)?;
    let category = row.get(2)?;
    let amount = row.get(3)?;
    let description = row.get(4)?;
    let account_id = row.get(5)?;

    Ok(LedgerEntry {
        id,
        datetime,
        category,
        amount,
        description,
        account_id,
    })
}

/// Retrieve a ledger entry by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_entry(kind: LedgerKind, id: EntryId, connection: &Connection) -> Result<LedgerEntry, Error> {
    let entry = connection.query_one(
        &format!(
            "SELECT id, datetime, category, amount, description, account_id
             FROM {} WHERE id = ?1",
            kind.table()
        ),
        params![id],
        map_row_to_entry,
    )?;

    Ok(entry)
}

/// Insert a ledger entry row. Does not touch any balance; callers go through
/// the entry service, which reconciles first.
///
/// Datetimes are normalized to UTC before storage so the text column orders
/// chronologically.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountNotFound] if the account reference is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_entry_row(
    kind: LedgerKind,
    new_entry: &NewEntry,
    connection: &Connection,
) -> Result<LedgerEntry, Error> {
    let entry = connection
        .prepare(&format!(
            "INSERT INTO {} (datetime, category, amount, description, account_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, datetime, category, amount, description, account_id",
            kind.table()
        ))?
        .query_row(
            params![
                new_entry.datetime.to_offset(UtcOffset::UTC),
                new_entry.category,
                new_entry.amount,
                new_entry.description,
                new_entry.account_id,
            ],
            map_row_to_entry,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::AccountNotFound(new_entry.account_id.unwrap_or_default()),
            error => error.into(),
        })?;

    Ok(entry)
}

/// Overwrite a ledger entry row with `entry`'s fields.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `entry.id` does not refer to a valid entry,
/// - [Error::AccountNotFound] if the account reference is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_entry_row(
    kind: LedgerKind,
    entry: &LedgerEntry,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            &format!(
                "UPDATE {} SET datetime = ?1, category = ?2, amount = ?3, description = ?4,
                 account_id = ?5 WHERE id = ?6",
                kind.table()
            ),
            params![
                entry.datetime.to_offset(UtcOffset::UTC),
                entry.category,
                entry.amount,
                entry.description,
                entry.account_id,
                entry.id,
            ],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::AccountNotFound(entry.account_id.unwrap_or_default()),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a ledger entry row.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_entry_row(
    kind: LedgerKind,
    id: EntryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
        params![id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// A ledger entry joined with the name of its referenced account, as shown in
/// entry listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedEntry {
    /// The id of the entry.
    pub id: EntryId,
    /// When the money moved.
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    /// A free-form category.
    pub category: String,
    /// The amount of money involved.
    pub amount: f64,
    /// A text description.
    pub description: Option<String>,
    /// The account the entry counts against, if any.
    pub account_id: Option<AccountId>,
    /// The name of the referenced account, if the entry has one and the
    /// account still exists.
    pub account_name: Option<String>,
}

fn map_row_to_listed_entry(row: &Row) -> Result<ListedEntry, rusqlite::Error> {
    Ok(ListedEntry {
        id: row.get(0)?,
        datetime: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        account_id: row.get(5)?,
        account_name: row.get(6)?,
    })
}

/// List entries newest first, with `skip`/`limit` pagination.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_entries(
    kind: LedgerKind,
    skip: u32,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<ListedEntry>, Error> {
    connection
        .prepare(&format!(
            "SELECT e.id, e.datetime, e.category, e.amount, e.description, e.account_id, a.name
             FROM {} e LEFT JOIN account a ON a.id = e.account_id
             ORDER BY e.datetime DESC, e.id DESC
             LIMIT ?1 OFFSET ?2",
            kind.table()
        ))?
        .query_map(params![limit, skip], map_row_to_listed_entry)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
