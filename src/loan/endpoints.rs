//! JSON route handlers for loans.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    loan::core::{
        Loan, LoanDirection, LoanId, LoanStats, delete_loan, get_loan_stats, insert_loan,
        list_loans, update_loan,
    },
};

/// The request body for creating a loan.
#[derive(Debug, Deserialize)]
pub struct NewLoan {
    /// Who the money went to or came from.
    pub person_name: String,
    /// Which way the money went.
    pub direction: LoanDirection,
    /// How much money.
    pub amount: f64,
    /// When the loan was made, as an RFC 3339 string.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// A text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// The request body for a partial loan update. Absent fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct LoanPatch {
    /// A new person name.
    #[serde(default)]
    pub person_name: Option<String>,
    /// A new direction.
    #[serde(default)]
    pub direction: Option<LoanDirection>,
    /// A new amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// A new date, as an RFC 3339 string.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// A new description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for creating a new loan.
pub async fn create_loan_endpoint(
    State(state): State<AppState>,
    Json(new_loan): Json<NewLoan>,
) -> Result<Json<Loan>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let loan = insert_loan(
        &new_loan.person_name,
        new_loan.direction,
        new_loan.amount,
        new_loan.date,
        new_loan.description.as_deref(),
        &connection,
    )?;

    Ok(Json(loan))
}

/// A route handler for listing all loans, newest first.
pub async fn get_loans_endpoint(State(state): State<AppState>) -> Result<Json<Vec<Loan>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let loans = list_loans(&connection)?;

    Ok(Json(loans))
}

/// A route handler for the all-time loan totals and net position.
pub async fn get_loan_dashboard_endpoint(
    State(state): State<AppState>,
) -> Result<Json<LoanStats>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let stats = get_loan_stats(&connection)?;

    Ok(Json(stats))
}

/// A route handler for partially updating a loan.
pub async fn update_loan_endpoint(
    State(state): State<AppState>,
    Path(loan_id): Path<LoanId>,
    Json(patch): Json<LoanPatch>,
) -> Result<Json<Loan>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let loan = update_loan(
        loan_id,
        patch.person_name.as_deref(),
        patch.direction,
        patch.amount,
        patch.date,
        patch.description.as_deref(),
        &connection,
    )?;

    Ok(Json(loan))
}

/// A route handler for deleting a loan.
pub async fn delete_loan_endpoint(
    State(state): State<AppState>,
    Path(loan_id): Path<LoanId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_loan(loan_id, &connection)?;

    Ok(Json(json!({ "ok": true })))
}
