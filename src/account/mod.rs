mod core;
mod endpoints;

pub use core::{
    Account, AccountId, adjust_account_balance, create_account_table, delete_account, get_account,
    insert_account, list_accounts, map_row_to_account, update_account,
};
pub use endpoints::{
    AccountPatch, NewAccount, adjust_balance_endpoint, create_account_endpoint,
    delete_account_endpoint, get_account_endpoint, get_accounts_endpoint, update_account_endpoint,
};
