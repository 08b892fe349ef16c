//! The API endpoint URIs.

/// The root route, which reports that the API is up.
pub const ROOT: &str = "/";
/// The route to create or list accounts.
pub const ACCOUNTS: &str = "/accounts";
/// The route to get, update, or delete a single account.
pub const ACCOUNT: &str = "/accounts/{account_id}";
/// The route to adjust an account's balance directly.
pub const ACCOUNT_BALANCE: &str = "/accounts/{account_id}/balance";
/// The route to create or list expenses.
pub const EXPENSES: &str = "/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/expenses/{id}";
/// The route for the expense month-to-date summary.
pub const EXPENSE_DASHBOARD: &str = "/expenses/dashboard";
/// The route to create or list income entries.
pub const INCOME: &str = "/income";
/// The route to update or delete a single income entry.
pub const INCOME_ENTRY: &str = "/income/{id}";
/// The route for the income month-to-date summary.
pub const INCOME_DASHBOARD: &str = "/income/dashboard";
/// The route to create or list loans.
pub const LOANS: &str = "/loans";
/// The route to update or delete a single loan.
pub const LOAN: &str = "/loans/{loan_id}";
/// The route for the all-time loan totals and net position.
pub const LOAN_DASHBOARD: &str = "/loans/dashboard";
/// The route to create or list investment accounts.
pub const INVESTMENT_ACCOUNTS: &str = "/investments/accounts";
/// The route to update or delete a single investment account.
pub const INVESTMENT_ACCOUNT: &str = "/investments/accounts/{account_id}";
/// The route to create or list investment transactions.
pub const INVESTMENT_TRANSACTIONS: &str = "/investments/transactions";
/// The route to delete a single investment transaction.
pub const INVESTMENT_TRANSACTION: &str = "/investments/transactions/{transaction_id}";
