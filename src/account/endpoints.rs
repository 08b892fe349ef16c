//! JSON route handlers for account CRUD and direct balance adjustment.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    account::core::{
        Account, AccountId, adjust_account_balance, delete_account, get_account, insert_account,
        list_accounts, update_account,
    },
};

/// The request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// A free-form category, e.g. "Cash", "Bank", "Credit Card".
    pub kind: String,
    /// The starting balance. Defaults to zero.
    #[serde(default)]
    pub balance: f64,
}

/// The request body for a partial account update. Absent fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct AccountPatch {
    /// A new display name.
    #[serde(default)]
    pub name: Option<String>,
    /// A new category.
    #[serde(default)]
    pub kind: Option<String>,
    /// A new balance, overwriting the running figure.
    #[serde(default)]
    pub balance: Option<f64>,
}

/// The query parameters for a direct balance adjustment.
#[derive(Debug, Deserialize)]
pub struct BalanceAdjustment {
    /// The amount to add to the balance; negative amounts subtract.
    pub amount: f64,
}

/// A route handler for creating a new account.
pub async fn create_account_endpoint(
    State(state): State<AppState>,
    Json(new_account): Json<NewAccount>,
) -> Result<Json<Account>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = insert_account(
        &new_account.name,
        &new_account.kind,
        new_account.balance,
        &connection,
    )?;

    Ok(Json(account))
}

/// A route handler for listing all accounts.
pub async fn get_accounts_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = list_accounts(&connection)?;

    Ok(Json(accounts))
}

/// A route handler for getting a single account by its id.
pub async fn get_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Account>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)?;

    Ok(Json(account))
}

/// A route handler for partially updating an account.
pub async fn update_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Json(patch): Json<AccountPatch>,
) -> Result<Json<Account>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = update_account(
        account_id,
        patch.name.as_deref(),
        patch.kind.as_deref(),
        patch.balance,
        &connection,
    )?;

    Ok(Json(account))
}

/// A route handler for deleting an account.
///
/// Ledger entries that referenced the account are detached, not deleted.
pub async fn delete_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_account(account_id, &connection)?;

    Ok(Json(json!({ "ok": true })))
}

/// A route handler for adding to (or subtracting from) an account's balance
/// directly, without recording a ledger entry.
pub async fn adjust_balance_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Query(adjustment): Query<BalanceAdjustment>,
) -> Result<Json<Account>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = adjust_account_balance(account_id, adjustment.amount, &connection)?;

    Ok(Json(account))
}
