//! The entry-mutation service: create, update, and delete ledger entries.
//!
//! Each mutation runs as one SQLite transaction covering both the balance
//! reconciliation and the entry row write, so a failure at any step leaves
//! the database exactly as it was.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    ledger::{
        core::{
            EntryId, EntryPatch, LedgerEntry, LedgerKind, NewEntry, delete_entry_row, get_entry,
            insert_entry_row, update_entry_row, validate_amount,
        },
        reconcile::{EntryEffect, reconcile},
    },
};

/// Create a ledger entry and apply its balance effect.
///
/// # Errors
/// This function will return a:
/// - [Error::ValidationFailure] if the amount is negative or not finite,
/// - [Error::AccountNotFound] if the entry references an account that does
///   not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_entry(
    kind: LedgerKind,
    new_entry: NewEntry,
    connection: &Connection,
) -> Result<LedgerEntry, Error> {
    validate_amount(new_entry.amount)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    reconcile(kind, None, Some(EntryEffect::from(&new_entry)), &transaction)?;
    let entry = insert_entry_row(kind, &new_entry, &transaction)?;

    transaction.commit()?;

    Ok(entry)
}

/// Apply a partial update to a ledger entry, moving its balance effect from
/// the old state to the new one.
///
/// A changed account reference moves the effect between accounts; a changed
/// amount adjusts the magnitude; a reference patched to null detaches the
/// entry, reverting its effect without applying a new one.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid entry,
/// - [Error::ValidationFailure] if the patched amount is negative or not
///   finite,
/// - [Error::AccountNotFound] if the new reference points at an account that
///   does not exist (the entry and all balances are left untouched),
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_entry(
    kind: LedgerKind,
    id: EntryId,
    patch: EntryPatch,
    connection: &Connection,
) -> Result<LedgerEntry, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let before = get_entry(kind, id, &transaction)?;
    let after = patch.merged_into(&before);
    validate_amount(after.amount)?;

    reconcile(
        kind,
        Some(EntryEffect::from(&before)),
        Some(EntryEffect::from(&after)),
        &transaction,
    )?;
    update_entry_row(kind, &after, &transaction)?;

    transaction.commit()?;

    Ok(after)
}

/// Delete a ledger entry and revert its balance effect.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_entry(kind: LedgerKind, id: EntryId, connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let entry = get_entry(kind, id, &transaction)?;

    reconcile(kind, Some(EntryEffect::from(&entry)), None, &transaction)?;
    delete_entry_row(kind, id, &transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        account::{get_account, insert_account},
        initialize_db,
        ledger::core::{EntryPatch, LedgerKind, NewEntry, get_entry},
    };

    use super::{create_entry, delete_entry, update_entry};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn
    }

    fn new_entry(amount: f64, account_id: Option<i64>) -> NewEntry {
        NewEntry {
            datetime: datetime!(2026-03-14 12:00 UTC),
            category: "Food".to_owned(),
            amount,
            description: Some("lunch".to_owned()),
            account_id,
        }
    }

    #[test]
    fn create_expense_decreases_balance() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();

        create_entry(LedgerKind::Expense, new_entry(50.0, Some(account.id)), &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 50.0);
    }

    #[test]
    fn create_income_increases_balance() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();

        create_entry(LedgerKind::Income, new_entry(50.0, Some(account.id)), &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 150.0);
    }

    #[test]
    fn create_with_missing_account_persists_nothing() {
        let conn = get_test_connection();

        let result = create_entry(LedgerKind::Expense, new_entry(50.0, Some(42)), &conn);

        assert_eq!(result, Err(Error::AccountNotFound(42)));
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM expense", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn create_rejects_negative_amount() {
        let conn = get_test_connection();

        let result = create_entry(LedgerKind::Expense, new_entry(-5.0, None), &conn);

        assert!(matches!(result, Err(Error::ValidationFailure(_))));
    }

    #[test]
    fn update_amount_adjusts_balance() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();
        let entry =
            create_entry(LedgerKind::Expense, new_entry(20.0, Some(account.id)), &conn).unwrap();

        let updated = update_entry(
            LedgerKind::Expense,
            entry.id,
            EntryPatch {
                amount: Some(45.0),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.amount, 45.0);
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 55.0);
    }

    #[test]
    fn update_moves_effect_between_accounts() {
        let conn = get_test_connection();
        let account_a = insert_account("A", "Bank", 100.0, &conn).unwrap();
        let account_b = insert_account("B", "Bank", 100.0, &conn).unwrap();
        let entry =
            create_entry(LedgerKind::Expense, new_entry(25.0, Some(account_a.id)), &conn).unwrap();
        assert_eq!(get_account(account_a.id, &conn).unwrap().balance, 75.0);

        let updated = update_entry(
            LedgerKind::Expense,
            entry.id,
            EntryPatch {
                account_id: Some(Some(account_b.id)),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.amount, 25.0);
        assert_eq!(get_account(account_a.id, &conn).unwrap().balance, 100.0);
        assert_eq!(get_account(account_b.id, &conn).unwrap().balance, 75.0);
    }

    #[test]
    fn update_to_missing_account_changes_nothing() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();
        let entry =
            create_entry(LedgerKind::Expense, new_entry(25.0, Some(account.id)), &conn).unwrap();

        let result = update_entry(
            LedgerKind::Expense,
            entry.id,
            EntryPatch {
                account_id: Some(Some(9000)),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::AccountNotFound(9000)));
        // The revert against the old account was rolled back with the rest.
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 75.0);
        assert_eq!(get_entry(LedgerKind::Expense, entry.id, &conn).unwrap(), entry);
    }

    #[test]
    fn update_detaches_entry_with_null_reference() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();
        let entry =
            create_entry(LedgerKind::Income, new_entry(30.0, Some(account.id)), &conn).unwrap();
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 130.0);

        let updated = update_entry(
            LedgerKind::Income,
            entry.id,
            EntryPatch {
                account_id: Some(None),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.account_id, None);
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 100.0);
    }

    #[test]
    fn delete_income_reverts_balance() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();
        let entry =
            create_entry(LedgerKind::Income, new_entry(30.0, Some(account.id)), &conn).unwrap();
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 130.0);

        delete_entry(LedgerKind::Income, entry.id, &conn).unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, 100.0);
        assert_eq!(
            get_entry(LedgerKind::Income, entry.id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_entry_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(
            delete_entry(LedgerKind::Expense, 42, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_survives_independently_deleted_account() {
        let conn = get_test_connection();
        let account = insert_account("Checking", "Bank", 100.0, &conn).unwrap();
        let entry =
            create_entry(LedgerKind::Expense, new_entry(25.0, Some(account.id)), &conn).unwrap();
        // The account goes away; the foreign key detaches the entry.
        crate::account::delete_account(account.id, &conn).unwrap();

        let result = delete_entry(LedgerKind::Expense, entry.id, &conn);

        assert_eq!(result, Ok(()));
    }

    /// The invariant from the balance contract: after any sequence of
    /// mutations, each balance equals its starting value plus the signed
    /// effects of the entries that currently reference it.
    #[test]
    fn balances_match_algebraic_sum_after_mixed_operations() {
        let conn = get_test_connection();
        let account_a = insert_account("A", "Bank", 0.0, &conn).unwrap();
        let account_b = insert_account("B", "Bank", 50.0, &conn).unwrap();

        let salary =
            create_entry(LedgerKind::Income, new_entry(1000.0, Some(account_a.id)), &conn).unwrap();
        let rent =
            create_entry(LedgerKind::Expense, new_entry(400.0, Some(account_a.id)), &conn).unwrap();
        let groceries =
            create_entry(LedgerKind::Expense, new_entry(60.0, Some(account_b.id)), &conn).unwrap();
        create_entry(LedgerKind::Expense, new_entry(15.0, None), &conn).unwrap();

        // Rent was actually 450 and paid from B; groceries get deleted;
        // salary is detached.
        update_entry(
            LedgerKind::Expense,
            rent.id,
            EntryPatch {
                amount: Some(450.0),
                account_id: Some(Some(account_b.id)),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();
        delete_entry(LedgerKind::Expense, groceries.id, &conn).unwrap();
        update_entry(
            LedgerKind::Income,
            salary.id,
            EntryPatch {
                account_id: Some(None),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        // A: 0 (salary detached, rent moved away). B: 50 - 450.
        assert_eq!(get_account(account_a.id, &conn).unwrap().balance, 0.0);
        assert_eq!(get_account(account_b.id, &conn).unwrap().balance, -400.0);
    }
}
