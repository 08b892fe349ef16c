mod core;
mod endpoints;

pub use core::{
    InvestmentAccount, InvestmentAccountId, InvestmentTransaction, InvestmentTransactionId,
    create_investment_tables, delete_investment_account, delete_investment_transaction,
    get_investment_account, insert_investment_account, insert_investment_transaction,
    list_investment_accounts, list_investment_transactions, update_investment_account,
};
pub use endpoints::{
    InvestmentAccountForm, NewInvestmentTransaction, create_investment_account_endpoint,
    create_investment_transaction_endpoint, delete_investment_account_endpoint,
    delete_investment_transaction_endpoint, get_investment_accounts_endpoint,
    get_investment_transactions_endpoint, update_investment_account_endpoint,
};
