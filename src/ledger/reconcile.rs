//! The balance reconciliation engine.
//!
//! Every mutation of a ledger entry funnels through [reconcile], which keeps
//! the referenced account's running balance equal to the sum of signed
//! effects of the entries that reference it. The contract is enforced here,
//! once, rather than per endpoint.

use rusqlite::{Connection, params};

use crate::{Error, account::AccountId, ledger::core::{LedgerEntry, LedgerKind, NewEntry}};

/// The part of a ledger entry that matters to an account balance: which
/// account it counts against and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryEffect {
    /// The referenced account, if any.
    pub account_id: Option<AccountId>,
    /// The entry's amount. The sign of the balance change comes from the
    /// entry's kind.
    pub amount: f64,
}

impl From<&LedgerEntry> for EntryEffect {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            account_id: entry.account_id,
            amount: entry.amount,
        }
    }
}

impl From<&NewEntry> for EntryEffect {
    fn from(entry: &NewEntry) -> Self {
        Self {
            account_id: entry.account_id,
            amount: entry.amount,
        }
    }
}

/// Move an entry's balance effect from its pre-mutation state to its
/// post-mutation state.
///
/// `before` is the entry's effect before the mutation (`None` on create) and
/// `after` its effect once the mutation lands (`None` on delete). Three
/// transitions run in order:
///
/// 1. Revert: undo `before`'s effect on the old account. An old account
///    that no longer exists is skipped; it may have been deleted
///    independently, taking the effect with it.
/// 2. Rebind/validate: the new reference must point at a real account.
/// 3. Apply: apply `after`'s effect to the new account.
///
/// The caller must run this inside the same database transaction as the
/// entry row write so a failure leaves every balance untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountNotFound] if `after` references an account that does not
///   exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn reconcile(
    kind: LedgerKind,
    before: Option<EntryEffect>,
    after: Option<EntryEffect>,
    connection: &Connection,
) -> Result<(), Error> {
    if let Some(EntryEffect {
        account_id: Some(account_id),
        amount,
    }) = before
    {
        let rows_affected = connection.execute(
            "UPDATE account SET balance = balance - ?1 WHERE id = ?2",
            params![kind.signed_effect(amount), account_id],
        )?;

        if rows_affected == 0 {
            tracing::debug!(
                "skipping revert against account {account_id}: the account no longer exists"
            );
        }
    }

    if let Some(EntryEffect {
        account_id: Some(account_id),
        amount,
    }) = after
    {
        let rows_affected = connection.execute(
            "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
            params![kind.signed_effect(amount), account_id],
        )?;

        if rows_affected == 0 {
            return Err(Error::AccountNotFound(account_id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{Account, get_account, insert_account},
        initialize_db,
        ledger::core::LedgerKind,
    };

    use super::{EntryEffect, reconcile};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn
    }

    fn account_with_balance(balance: f64, connection: &Connection) -> Account {
        insert_account("Checking", "Bank", balance, connection).unwrap()
    }

    fn effect(account_id: Option<i64>, amount: f64) -> Option<EntryEffect> {
        Some(EntryEffect { account_id, amount })
    }

    #[test]
    fn creating_expense_decreases_balance() {
        let conn = get_test_connection();
        let account = account_with_balance(100.0, &conn);

        reconcile(LedgerKind::Expense, None, effect(Some(account.id), 50.0), &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 50.0);
    }

    #[test]
    fn creating_income_increases_balance() {
        let conn = get_test_connection();
        let account = account_with_balance(100.0, &conn);

        reconcile(LedgerKind::Income, None, effect(Some(account.id), 50.0), &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 150.0);
    }

    #[test]
    fn deleting_income_reverts_its_effect() {
        let conn = get_test_connection();
        let account = account_with_balance(130.0, &conn);

        reconcile(LedgerKind::Income, effect(Some(account.id), 30.0), None, &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 100.0);
    }

    #[test]
    fn rebinding_moves_effect_between_accounts() {
        let conn = get_test_connection();
        let old_account = account_with_balance(100.0, &conn);
        let new_account = account_with_balance(100.0, &conn);

        reconcile(
            LedgerKind::Expense,
            effect(Some(old_account.id), 25.0),
            effect(Some(new_account.id), 25.0),
            &conn,
        )
        .unwrap();

        assert_eq!(get_account(old_account.id, &conn).unwrap().balance, 125.0);
        assert_eq!(get_account(new_account.id, &conn).unwrap().balance, 75.0);
    }

    #[test]
    fn amount_change_adjusts_magnitude() {
        let conn = get_test_connection();
        let account = account_with_balance(100.0, &conn);
        // Entry of 20 already applied.
        reconcile(LedgerKind::Expense, None, effect(Some(account.id), 20.0), &conn).unwrap();

        reconcile(
            LedgerKind::Expense,
            effect(Some(account.id), 20.0),
            effect(Some(account.id), 45.0),
            &conn,
        )
        .unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 55.0);
    }

    #[test]
    fn detaching_reverts_without_applying() {
        let conn = get_test_connection();
        let account = account_with_balance(70.0, &conn);

        reconcile(
            LedgerKind::Expense,
            effect(Some(account.id), 30.0),
            effect(None, 30.0),
            &conn,
        )
        .unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 100.0);
    }

    #[test]
    fn entry_without_reference_has_no_effect() {
        let conn = get_test_connection();
        let account = account_with_balance(100.0, &conn);

        reconcile(LedgerKind::Expense, None, effect(None, 50.0), &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 100.0);
    }

    #[test]
    fn zero_amount_has_zero_effect() {
        let conn = get_test_connection();
        let account = account_with_balance(100.0, &conn);

        reconcile(LedgerKind::Income, None, effect(Some(account.id), 0.0), &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 100.0);
    }

    #[test]
    fn applying_to_missing_account_fails() {
        let conn = get_test_connection();

        let result = reconcile(LedgerKind::Expense, None, effect(Some(42), 50.0), &conn);

        assert_eq!(result, Err(Error::AccountNotFound(42)));
    }

    #[test]
    fn reverting_against_missing_account_is_tolerated() {
        let conn = get_test_connection();

        let result = reconcile(LedgerKind::Income, effect(Some(42), 50.0), None, &conn);

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn failed_apply_after_revert_leaves_no_partial_change_when_run_in_transaction() {
        let conn = get_test_connection();
        let account = account_with_balance(100.0, &conn);

        let transaction = rusqlite::Transaction::new_unchecked(
            &conn,
            rusqlite::TransactionBehavior::Immediate,
        )
        .unwrap();
        let result = reconcile(
            LedgerKind::Expense,
            effect(Some(account.id), 25.0),
            effect(Some(9000), 25.0),
            &transaction,
        );
        assert_eq!(result, Err(Error::AccountNotFound(9000)));
        drop(transaction); // Rolls back the revert.

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 100.0);
    }
}
