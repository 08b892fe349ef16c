//! Defines the core data model and database queries for accounts.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// The id for an account.
pub type AccountId = DatabaseId;

/// A place money is kept, e.g. a bank account, cash, or a credit card.
///
/// The balance is a running figure: it starts at the balance given when the
/// account was created and is adjusted incrementally by every expense or
/// income entry that references the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// A free-form category, e.g. "Cash", "Bank", "Credit Card".
    pub kind: String,
    /// The amount of money currently in the account.
    pub balance: f64,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            balance REAL NOT NULL DEFAULT 0.0
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let kind = row.get(2)?;
    let balance = row.get(3)?;

    Ok(Account {
        id,
        name,
        kind,
        balance,
    })
}

/// Create a new account in the database.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn insert_account(
    name: &str,
    kind: &str,
    balance: f64,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "INSERT INTO account (name, kind, balance)
             VALUES (?1, ?2, ?3)
             RETURNING id, name, kind, balance",
        )?
        .query_row(params![name, kind, balance], map_row_to_account)?;

    Ok(account)
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection.query_one(
        "SELECT id, name, kind, balance FROM account WHERE id = ?1",
        params![id],
        map_row_to_account,
    )?;

    Ok(account)
}

/// Retrieve all accounts, ordered by id.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, kind, balance FROM account ORDER BY id")?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Update an account's fields, leaving `None` fields unchanged.
///
/// Updating `balance` here overwrites the running figure directly; it does
/// not touch any ledger entries.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_account(
    id: AccountId,
    name: Option<&str>,
    kind: Option<&str>,
    balance: Option<f64>,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = get_account(id, connection)?;

    let name = name.unwrap_or(&account.name);
    let kind = kind.unwrap_or(&account.kind);
    let balance = balance.unwrap_or(account.balance);

    connection.execute(
        "UPDATE account SET name = ?1, kind = ?2, balance = ?3 WHERE id = ?4",
        params![name, kind, balance, id],
    )?;

    get_account(id, connection)
}

/// Delete an account.
///
/// Expense and income entries that referenced the account are detached (their
/// `account_id` becomes NULL via the foreign key), not deleted; a detached
/// entry has no balance effect.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM account WHERE id = ?1", params![id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Add `amount` to an account's balance and return the updated account.
///
/// Negative amounts subtract. This is the direct adjustment operation; it is
/// independent of the ledger and leaves no entry behind.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn adjust_account_balance(
    id: AccountId,
    amount: f64,
    connection: &Connection,
) -> Result<Account, Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
        params![amount, id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_account(id, connection)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, initialize_db};

    use super::{
        adjust_account_balance, delete_account, get_account, insert_account, list_accounts,
        update_account,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = get_test_connection();

        let inserted = insert_account("Wallet", "Cash", 25.0, &conn).unwrap();
        let got = get_account(inserted.id, &conn).unwrap();

        assert_eq!(inserted, got);
        assert_eq!(got.name, "Wallet");
        assert_eq!(got.kind, "Cash");
        assert_eq!(got.balance, 25.0);
    }

    #[test]
    fn get_fails_on_missing_account() {
        let conn = get_test_connection();

        assert_eq!(get_account(1337, &conn), Err(Error::NotFound));
    }

    #[test]
    fn list_returns_accounts_in_id_order() {
        let conn = get_test_connection();
        let first = insert_account("Checking", "Bank", 100.0, &conn).unwrap();
        let second = insert_account("Wallet", "Cash", 5.0, &conn).unwrap();

        let accounts = list_accounts(&conn).unwrap();

        assert_eq!(accounts, vec![first, second]);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();

        let updated = update_account(account.id, Some("Joint"), None, None, &conn).unwrap();

        assert_eq!(updated.name, "Joint");
        assert_eq!(updated.kind, "Bank");
        assert_eq!(updated.balance, 100.0);
    }

    #[test]
    fn update_fails_on_missing_account() {
        let conn = get_test_connection();

        let result = update_account(42, Some("Ghost"), None, None, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_account() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();

        delete_account(account.id, &conn).unwrap();

        assert_eq!(get_account(account.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_missing_account() {
        let conn = get_test_connection();

        assert_eq!(delete_account(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn adjust_balance_is_additive() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();

        let updated = adjust_account_balance(account.id, -40.5, &conn).unwrap();

        assert_eq!(updated.balance, 59.5);
    }
}
