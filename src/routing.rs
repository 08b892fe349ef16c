//! Application router configuration.

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    account::{
        adjust_balance_endpoint, create_account_endpoint, delete_account_endpoint,
        get_account_endpoint, get_accounts_endpoint, update_account_endpoint,
    },
    endpoints,
    investment::{
        create_investment_account_endpoint, create_investment_transaction_endpoint,
        delete_investment_account_endpoint, delete_investment_transaction_endpoint,
        get_investment_accounts_endpoint, get_investment_transactions_endpoint,
        update_investment_account_endpoint,
    },
    ledger::{
        create_expense_endpoint, create_income_endpoint, delete_expense_endpoint,
        delete_income_endpoint, get_expense_dashboard_endpoint, get_expenses_endpoint,
        get_income_dashboard_endpoint, get_income_endpoint, update_expense_endpoint,
        update_income_endpoint,
    },
    loan::{
        create_loan_endpoint, delete_loan_endpoint, get_loan_dashboard_endpoint,
        get_loans_endpoint, update_loan_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// CORS is wide open: the API is expected to be called from a browser
/// frontend served from a different origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(
            endpoints::ACCOUNTS,
            post(create_account_endpoint).get(get_accounts_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .put(update_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(endpoints::ACCOUNT_BALANCE, put(adjust_balance_endpoint))
        .route(
            endpoints::EXPENSES,
            post(create_expense_endpoint).get(get_expenses_endpoint),
        )
        .route(
            endpoints::EXPENSE_DASHBOARD,
            get(get_expense_dashboard_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::INCOME,
            post(create_income_endpoint).get(get_income_endpoint),
        )
        .route(
            endpoints::INCOME_DASHBOARD,
            get(get_income_dashboard_endpoint),
        )
        .route(
            endpoints::INCOME_ENTRY,
            put(update_income_endpoint).delete(delete_income_endpoint),
        )
        .route(
            endpoints::LOANS,
            post(create_loan_endpoint).get(get_loans_endpoint),
        )
        .route(endpoints::LOAN_DASHBOARD, get(get_loan_dashboard_endpoint))
        .route(
            endpoints::LOAN,
            put(update_loan_endpoint).delete(delete_loan_endpoint),
        )
        .route(
            endpoints::INVESTMENT_ACCOUNTS,
            post(create_investment_account_endpoint).get(get_investment_accounts_endpoint),
        )
        .route(
            endpoints::INVESTMENT_ACCOUNT,
            put(update_investment_account_endpoint).delete(delete_investment_account_endpoint),
        )
        .route(
            endpoints::INVESTMENT_TRANSACTIONS,
            post(create_investment_transaction_endpoint)
                .get(get_investment_transactions_endpoint),
        )
        .route(
            endpoints::INVESTMENT_TRANSACTION,
            delete(delete_investment_transaction_endpoint),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_root() -> Json<Value> {
    Json(json!({ "message": "Tallybook API is running" }))
}
