//! The ledger: expense and income entries and the balance reconciliation
//! that keeps account balances consistent with them.

mod core;
mod dashboard;
mod endpoints;
mod reconcile;
mod service;

pub use core::{
    EntryId, EntryPatch, LedgerEntry, LedgerKind, ListedEntry, NewEntry, create_ledger_tables,
    get_entry, list_entries, map_row_to_entry, validate_amount,
};
pub use dashboard::{DashboardSummary, get_dashboard};
pub use endpoints::{
    CreateEntryPayload, Pagination, UpdateEntryPayload, create_expense_endpoint,
    create_income_endpoint, delete_expense_endpoint, delete_income_endpoint,
    get_expense_dashboard_endpoint, get_expenses_endpoint, get_income_dashboard_endpoint,
    get_income_endpoint, update_expense_endpoint, update_income_endpoint,
};
pub use reconcile::{EntryEffect, reconcile};
pub use service::{create_entry, delete_entry, update_entry};
