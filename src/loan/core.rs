//! Defines the core data model and database queries for loans.
//!
//! Loans are tracked standalone for net-position reporting: they are not
//! linked to an account and have no balance side effects.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::DatabaseId};

/// The id for a loan.
pub type LoanId = DatabaseId;

/// Which way the money went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanDirection {
    /// Money lent to someone else.
    Given,
    /// Money borrowed from someone else.
    Taken,
}

impl LoanDirection {
    fn as_text(self) -> &'static str {
        match self {
            LoanDirection::Given => "GIVEN",
            LoanDirection::Taken => "TAKEN",
        }
    }

    fn from_text(text: &str) -> Option<Self> {
        match text {
            "GIVEN" => Some(LoanDirection::Given),
            "TAKEN" => Some(LoanDirection::Taken),
            _ => None,
        }
    }
}

/// Money lent to or borrowed from a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// The id of the loan.
    pub id: LoanId,
    /// Who the money went to or came from.
    pub person_name: String,
    /// Which way the money went.
    pub direction: LoanDirection,
    /// How much money.
    pub amount: f64,
    /// When the loan was made.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// A text description.
    pub description: Option<String>,
}

/// All-time loan totals by direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanStats {
    /// The sum of all loans given.
    pub total_given: f64,
    /// The sum of all loans taken.
    pub total_taken: f64,
    /// `total_given - total_taken`.
    pub net_position: f64,
}

pub fn create_loan_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS loan (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            person_name TEXT NOT NULL,
            direction TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            description TEXT
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Loan].
pub fn map_row_to_loan(row: &Row) -> Result<Loan, rusqlite::Error> {
    let direction_text: String = row.get(2)?;
    let direction = LoanDirection::from_text(&direction_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown loan direction {direction_text:?}").into(),
        )
    })?;

    Ok(Loan {
        id: row.get(0)?,
        person_name: row.get(1)?,
        direction,
        amount: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
    })
}

/// Create a new loan in the database.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn insert_loan(
    person_name: &str,
    direction: LoanDirection,
    amount: f64,
    date: OffsetDateTime,
    description: Option<&str>,
    connection: &Connection,
) -> Result<Loan, Error> {
    let loan = connection
        .prepare(
            "INSERT INTO loan (person_name, direction, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, person_name, direction, amount, date, description",
        )?
        .query_row(
            params![
                person_name,
                direction.as_text(),
                amount,
                date.to_offset(UtcOffset::UTC),
                description,
            ],
            map_row_to_loan,
        )?;

    Ok(loan)
}

/// Retrieve a loan by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid loan,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_loan(id: LoanId, connection: &Connection) -> Result<Loan, Error> {
    let loan = connection.query_one(
        "SELECT id, person_name, direction, amount, date, description FROM loan WHERE id = ?1",
        params![id],
        map_row_to_loan,
    )?;

    Ok(loan)
}

/// Retrieve all loans, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_loans(connection: &Connection) -> Result<Vec<Loan>, Error> {
    connection
        .prepare(
            "SELECT id, person_name, direction, amount, date, description
             FROM loan ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_row_to_loan)?
        .map(|maybe_loan| maybe_loan.map_err(Error::from))
        .collect()
}

/// Update a loan's fields, leaving `None` fields unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid loan,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_loan(
    id: LoanId,
    person_name: Option<&str>,
    direction: Option<LoanDirection>,
    amount: Option<f64>,
    date: Option<OffsetDateTime>,
    description: Option<&str>,
    connection: &Connection,
) -> Result<Loan, Error> {
    let loan = get_loan(id, connection)?;

    connection.execute(
        "UPDATE loan SET person_name = ?1, direction = ?2, amount = ?3, date = ?4,
         description = ?5 WHERE id = ?6",
        params![
            person_name.unwrap_or(&loan.person_name),
            direction.unwrap_or(loan.direction).as_text(),
            amount.unwrap_or(loan.amount),
            date.unwrap_or(loan.date).to_offset(UtcOffset::UTC),
            description.or(loan.description.as_deref()),
            id,
        ],
    )?;

    get_loan(id, connection)
}

/// Delete a loan.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid loan,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_loan(id: LoanId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM loan WHERE id = ?1", params![id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Compute all-time loan totals by direction and the net position.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_loan_stats(connection: &Connection) -> Result<LoanStats, Error> {
    let (total_given, total_taken) = connection.query_one(
        "SELECT
            COALESCE(SUM(CASE WHEN direction = 'GIVEN' THEN amount ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN direction = 'TAKEN' THEN amount ELSE 0 END), 0)
         FROM loan",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(LoanStats {
        total_given,
        total_taken,
        net_position: total_given - total_taken,
    })
}
