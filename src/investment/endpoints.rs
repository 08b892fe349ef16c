//! JSON route handlers for investment accounts and transactions.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    investment::core::{
        InvestmentAccount, InvestmentAccountId, InvestmentTransaction, InvestmentTransactionId,
        delete_investment_account, delete_investment_transaction, insert_investment_account,
        insert_investment_transaction, list_investment_accounts, list_investment_transactions,
        update_investment_account,
    },
};

/// The request body for creating or overwriting an investment account.
#[derive(Debug, Deserialize)]
pub struct InvestmentAccountForm {
    /// The company the money is invested with.
    pub company_name: String,
    /// The agent managing the investment.
    pub agent_name: String,
    /// A free-form status, e.g. "ACTIVE", "CLOSED".
    pub status: String,
}

/// The request body for creating an investment transaction.
#[derive(Debug, Deserialize)]
pub struct NewInvestmentTransaction {
    /// The investment account the money moved through.
    pub account_id: InvestmentAccountId,
    /// When the money moved, as an RFC 3339 string.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// How much money moved.
    pub amount: f64,
    /// The profit realised, if known.
    #[serde(default)]
    pub profit: Option<f64>,
}

/// A route handler for creating a new investment account.
pub async fn create_investment_account_endpoint(
    State(state): State<AppState>,
    Json(form): Json<InvestmentAccountForm>,
) -> Result<Json<InvestmentAccount>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = insert_investment_account(
        &form.company_name,
        &form.agent_name,
        &form.status,
        &connection,
    )?;

    Ok(Json(account))
}

/// A route handler for listing all investment accounts.
pub async fn get_investment_accounts_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvestmentAccount>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = list_investment_accounts(&connection)?;

    Ok(Json(accounts))
}

/// A route handler for overwriting an investment account's fields.
pub async fn update_investment_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<InvestmentAccountId>,
    Json(form): Json<InvestmentAccountForm>,
) -> Result<Json<InvestmentAccount>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = update_investment_account(
        account_id,
        &form.company_name,
        &form.agent_name,
        &form.status,
        &connection,
    )?;

    Ok(Json(account))
}

/// A route handler for deleting an investment account together with its
/// transactions.
pub async fn delete_investment_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<InvestmentAccountId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_investment_account(account_id, &connection)?;

    Ok(Json(json!({ "ok": true })))
}

/// A route handler for recording a new investment transaction.
pub async fn create_investment_transaction_endpoint(
    State(state): State<AppState>,
    Json(new_transaction): Json<NewInvestmentTransaction>,
) -> Result<Json<InvestmentTransaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = insert_investment_transaction(
        new_transaction.account_id,
        new_transaction.date,
        new_transaction.amount,
        new_transaction.profit,
        &connection,
    )?;

    Ok(Json(transaction))
}

/// A route handler for listing all investment transactions, newest first.
pub async fn get_investment_transactions_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvestmentTransaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = list_investment_transactions(&connection)?;

    Ok(Json(transactions))
}

/// A route handler for deleting an investment transaction.
pub async fn delete_investment_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<InvestmentTransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_investment_transaction(transaction_id, &connection)?;

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::AppState;

    use super::{
        InvestmentAccountForm, NewInvestmentTransaction, create_investment_account_endpoint,
        create_investment_transaction_endpoint, delete_investment_account_endpoint,
        get_investment_transactions_endpoint,
    };

    fn get_test_state() -> AppState {
        let conn = Connection::open_in_memory().unwrap();
        AppState::new(conn, "UTC").unwrap()
    }

    #[tokio::test]
    async fn deleting_account_removes_its_transactions() {
        let state = get_test_state();
        let Json(account) = create_investment_account_endpoint(
            State(state.clone()),
            Json(InvestmentAccountForm {
                company_name: "Vanguard".to_owned(),
                agent_name: "J. Smith".to_owned(),
                status: "ACTIVE".to_owned(),
            }),
        )
        .await
        .unwrap();
        create_investment_transaction_endpoint(
            State(state.clone()),
            Json(NewInvestmentTransaction {
                account_id: account.id,
                date: datetime!(2026-02-01 9:00 UTC),
                amount: 1000.0,
                profit: None,
            }),
        )
        .await
        .unwrap();

        delete_investment_account_endpoint(State(state.clone()), Path(account.id))
            .await
            .unwrap();

        let Json(transactions) = get_investment_transactions_endpoint(State(state))
            .await
            .unwrap();
        assert_eq!(transactions, vec![]);
    }
}
