//! Defines the core data models and database queries for investments.
//!
//! Investment accounts and their transactions are tracked standalone: they
//! have no effect on ledger account balances. Unlike ledger accounts,
//! deleting an investment account takes its transactions with it.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior, params};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::DatabaseId};

/// The id for an investment account.
pub type InvestmentAccountId = DatabaseId;

/// The id for an investment transaction.
pub type InvestmentTransactionId = DatabaseId;

/// An account held with an investment company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAccount {
    /// The id of the investment account.
    pub id: InvestmentAccountId,
    /// The company the money is invested with.
    pub company_name: String,
    /// The agent managing the investment.
    pub agent_name: String,
    /// A free-form status, e.g. "ACTIVE", "CLOSED".
    pub status: String,
}

/// Money moved into or out of an investment account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentTransaction {
    /// The id of the transaction.
    pub id: InvestmentTransactionId,
    /// The investment account the money moved through.
    pub account_id: InvestmentAccountId,
    /// When the money moved.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// How much money moved.
    pub amount: f64,
    /// The profit realised, if the caller computed one.
    pub profit: Option<f64>,
}

/// Create the investment account and transaction tables in the database.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_investment_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS investment_account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_name TEXT NOT NULL,
            agent_name TEXT NOT NULL,
            status TEXT NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS investment_transaction (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            profit REAL,
            FOREIGN KEY(account_id) REFERENCES investment_account(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
        (),
    )?;

    Ok(())
}

fn map_row_to_investment_account(row: &Row) -> Result<InvestmentAccount, rusqlite::Error> {
    Ok(InvestmentAccount {
        id: row.get(0)?,
        company_name: row.get(1)?,
        agent_name: row.get(2)?,
        status: row.get(3)?,
    })
}

fn map_row_to_investment_transaction(row: &Row) -> Result<InvestmentTransaction, rusqlite::Error> {
    Ok(InvestmentTransaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        date: row.get(2)?,
        amount: row.get(3)?,
        profit: row.get(4)?,
    })
}

/// Create a new investment account in the database.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn insert_investment_account(
    company_name: &str,
    agent_name: &str,
    status: &str,
    connection: &Connection,
) -> Result<InvestmentAccount, Error> {
    let account = connection
        .prepare(
            "INSERT INTO investment_account (company_name, agent_name, status)
             VALUES (?1, ?2, ?3)
             RETURNING id, company_name, agent_name, status",
        )?
        .query_row(
            params![company_name, agent_name, status],
            map_row_to_investment_account,
        )?;

    Ok(account)
}

/// Retrieve an investment account by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid investment account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_investment_account(
    id: InvestmentAccountId,
    connection: &Connection,
) -> Result<InvestmentAccount, Error> {
    let account = connection.query_one(
        "SELECT id, company_name, agent_name, status FROM investment_account WHERE id = ?1",
        params![id],
        map_row_to_investment_account,
    )?;

    Ok(account)
}

/// Retrieve all investment accounts, ordered by id.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_investment_accounts(connection: &Connection) -> Result<Vec<InvestmentAccount>, Error> {
    connection
        .prepare("SELECT id, company_name, agent_name, status FROM investment_account ORDER BY id")?
        .query_map([], map_row_to_investment_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Overwrite an investment account's fields.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid investment account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_investment_account(
    id: InvestmentAccountId,
    company_name: &str,
    agent_name: &str,
    status: &str,
    connection: &Connection,
) -> Result<InvestmentAccount, Error> {
    let rows_affected = connection.execute(
        "UPDATE investment_account SET company_name = ?1, agent_name = ?2, status = ?3
         WHERE id = ?4",
        params![company_name, agent_name, status, id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_investment_account(id, connection)
}

/// Delete an investment account and all transactions referencing it, in one
/// transaction.
///
/// The child delete is explicit so the cascade holds even on connections
/// without foreign-key enforcement.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid investment account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_investment_account(
    id: InvestmentAccountId,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    transaction.execute(
        "DELETE FROM investment_transaction WHERE account_id = ?1",
        params![id],
    )?;
    let rows_affected =
        transaction.execute("DELETE FROM investment_account WHERE id = ?1", params![id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    transaction.commit()?;

    Ok(())
}

/// Create a new investment transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `account_id` does not refer to a valid investment
///   account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_investment_transaction(
    account_id: InvestmentAccountId,
    date: OffsetDateTime,
    amount: f64,
    profit: Option<f64>,
    connection: &Connection,
) -> Result<InvestmentTransaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO investment_transaction (account_id, date, amount, profit)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, account_id, date, amount, profit",
        )?
        .query_row(
            params![account_id, date.to_offset(UtcOffset::UTC), amount, profit],
            map_row_to_investment_transaction,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve all investment transactions, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_investment_transactions(
    connection: &Connection,
) -> Result<Vec<InvestmentTransaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, date, amount, profit
             FROM investment_transaction ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_row_to_investment_transaction)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Delete an investment transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid investment
///   transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_investment_transaction(
    id: InvestmentTransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM investment_transaction WHERE id = ?1",
        params![id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{Error, initialize_db};

    use super::{
        delete_investment_account, get_investment_account, insert_investment_account,
        insert_investment_transaction, list_investment_transactions, update_investment_account,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = get_test_connection();

        let inserted =
            insert_investment_account("Vanguard", "J. Smith", "ACTIVE", &conn).unwrap();
        let got = get_investment_account(inserted.id, &conn).unwrap();

        assert_eq!(inserted, got);
    }

    #[test]
    fn update_overwrites_all_fields() {
        let conn = get_test_connection();
        let account = insert_investment_account("Vanguard", "J. Smith", "ACTIVE", &conn).unwrap();

        let updated =
            update_investment_account(account.id, "Vanguard", "J. Smith", "CLOSED", &conn)
                .unwrap();

        assert_eq!(updated.status, "CLOSED");
    }

    #[test]
    fn transaction_requires_existing_account() {
        let conn = get_test_connection();

        let result = insert_investment_transaction(
            42,
            datetime!(2026-02-01 9:00 UTC),
            1000.0,
            None,
            &conn,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn deleting_account_cascades_to_transactions() {
        let conn = get_test_connection();
        let account = insert_investment_account("Vanguard", "J. Smith", "ACTIVE", &conn).unwrap();
        let other = insert_investment_account("Fidelity", "K. Jones", "ACTIVE", &conn).unwrap();
        let date = datetime!(2026-02-01 9:00 UTC);
        insert_investment_transaction(account.id, date, 1000.0, None, &conn).unwrap();
        insert_investment_transaction(account.id, date, 500.0, Some(25.0), &conn).unwrap();
        insert_investment_transaction(other.id, date, 750.0, None, &conn).unwrap();

        delete_investment_account(account.id, &conn).unwrap();

        let remaining = list_investment_transactions(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].account_id, other.id);
    }

    #[test]
    fn delete_missing_account_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(delete_investment_account(42, &conn), Err(Error::NotFound));
    }
}
