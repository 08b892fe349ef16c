mod core;
mod endpoints;

pub use core::{
    Loan, LoanDirection, LoanId, LoanStats, create_loan_table, delete_loan, get_loan,
    get_loan_stats, insert_loan, list_loans, map_row_to_loan, update_loan,
};
pub use endpoints::{
    LoanPatch, NewLoan, create_loan_endpoint, delete_loan_endpoint, get_loan_dashboard_endpoint,
    get_loans_endpoint, update_loan_endpoint,
};
