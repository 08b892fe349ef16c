//! JSON route handlers for expense and income entries.
//!
//! The `amount` and `account_id` payload fields are accepted as loosely-typed
//! JSON values (numbers, formatted strings, null) and routed through the
//! coercion boundary before they reach the entry service.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    coercion::{parse_account_reference, parse_amount},
    ledger::{
        core::{EntryId, EntryPatch, LedgerEntry, LedgerKind, ListedEntry, NewEntry, list_entries},
        dashboard::{DashboardSummary, get_dashboard},
        service::{create_entry, delete_entry, update_entry},
    },
};

/// Deserialize a present-but-possibly-null field as `Some`, so that an
/// absent field (`None`) can be told apart from an explicit null
/// (`Some(Value::Null)` / `Some(None)`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// The request body for creating a ledger entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryPayload {
    /// When the money moved, as an RFC 3339 string.
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    /// A free-form category, e.g. "Food", "Salary".
    pub category: String,
    /// The amount, as a number or a formatted string like `"$1,234.50"`.
    pub amount: Value,
    /// A text description.
    #[serde(default)]
    pub description: Option<String>,
    /// The account to count the entry against: a number, a numeric string,
    /// or null/absent for no account.
    #[serde(default)]
    pub account_id: Option<Value>,
}

/// The request body for a partial entry update. Absent fields are left
/// unchanged; an explicit null detaches (`account_id`) or clears
/// (`description`) the field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEntryPayload {
    /// A new datetime, as an RFC 3339 string.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub datetime: Option<OffsetDateTime>,
    /// A new category.
    #[serde(default)]
    pub category: Option<String>,
    /// A new amount, as a number or a formatted string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// A new description, or null to clear it.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    /// A new account reference, or null to detach the entry.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub account_id: Option<Value>,
}

/// The query parameters for entry listings.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    /// How many entries to skip.
    #[serde(default)]
    pub skip: u32,
    /// How many entries to return at most.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

async fn create_entry_endpoint(
    kind: LedgerKind,
    state: AppState,
    payload: CreateEntryPayload,
) -> Result<Json<LedgerEntry>, Error> {
    let amount = parse_amount(&payload.amount)?;
    let account_id = match &payload.account_id {
        Some(value) => parse_account_reference(value)?,
        None => None,
    };

    let new_entry = NewEntry {
        datetime: payload.datetime,
        category: payload.category,
        amount,
        description: payload.description,
        account_id,
    };

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = create_entry(kind, new_entry, &connection)?;

    Ok(Json(entry))
}

async fn update_entry_endpoint(
    kind: LedgerKind,
    state: AppState,
    id: EntryId,
    payload: UpdateEntryPayload,
) -> Result<Json<LedgerEntry>, Error> {
    let amount = payload.amount.as_ref().map(parse_amount).transpose()?;
    let account_id = payload
        .account_id
        .as_ref()
        .map(parse_account_reference)
        .transpose()?;

    let patch = EntryPatch {
        datetime: payload.datetime,
        category: payload.category,
        amount,
        description: payload.description,
        account_id,
    };

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = update_entry(kind, id, patch, &connection)?;

    Ok(Json(entry))
}

async fn delete_entry_endpoint(
    kind: LedgerKind,
    state: AppState,
    id: EntryId,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_entry(kind, id, &connection)?;

    Ok(Json(json!({ "ok": true })))
}

async fn list_entries_endpoint(
    kind: LedgerKind,
    state: AppState,
    pagination: Pagination,
) -> Result<Json<Vec<ListedEntry>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = list_entries(kind, pagination.skip, pagination.limit, &connection)?;

    Ok(Json(entries))
}

async fn dashboard_endpoint(
    kind: LedgerKind,
    state: AppState,
) -> Result<Json<DashboardSummary>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = get_dashboard(kind, &state.local_timezone, &connection)?;

    Ok(Json(summary))
}

/// A route handler for creating a new expense.
pub async fn create_expense_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<Json<LedgerEntry>, Error> {
    create_entry_endpoint(LedgerKind::Expense, state, payload).await
}

/// A route handler for creating a new income entry.
pub async fn create_income_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<Json<LedgerEntry>, Error> {
    create_entry_endpoint(LedgerKind::Income, state, payload).await
}

/// A route handler for partially updating an expense.
pub async fn update_expense_endpoint(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
    Json(payload): Json<UpdateEntryPayload>,
) -> Result<Json<LedgerEntry>, Error> {
    update_entry_endpoint(LedgerKind::Expense, state, id, payload).await
}

/// A route handler for partially updating an income entry.
pub async fn update_income_endpoint(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
    Json(payload): Json<UpdateEntryPayload>,
) -> Result<Json<LedgerEntry>, Error> {
    update_entry_endpoint(LedgerKind::Income, state, id, payload).await
}

/// A route handler for deleting an expense.
pub async fn delete_expense_endpoint(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> Result<Json<Value>, Error> {
    delete_entry_endpoint(LedgerKind::Expense, state, id).await
}

/// A route handler for deleting an income entry.
pub async fn delete_income_endpoint(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> Result<Json<Value>, Error> {
    delete_entry_endpoint(LedgerKind::Income, state, id).await
}

/// A route handler for listing expenses, newest first.
pub async fn get_expenses_endpoint(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ListedEntry>>, Error> {
    list_entries_endpoint(LedgerKind::Expense, state, pagination).await
}

/// A route handler for listing income entries, newest first.
pub async fn get_income_endpoint(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ListedEntry>>, Error> {
    list_entries_endpoint(LedgerKind::Income, state, pagination).await
}

/// A route handler for the expense dashboard summary.
pub async fn get_expense_dashboard_endpoint(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, Error> {
    dashboard_endpoint(LedgerKind::Expense, state).await
}

/// A route handler for the income dashboard summary.
pub async fn get_income_dashboard_endpoint(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, Error> {
    dashboard_endpoint(LedgerKind::Income, state).await
}
