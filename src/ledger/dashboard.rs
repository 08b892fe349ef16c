//! Month-to-date summaries for the expense and income dashboards.

use rusqlite::{Connection, params};
use serde::Serialize;
use time::{OffsetDateTime, Time, UtcOffset};

use crate::{
    Error,
    ledger::core::{LedgerEntry, LedgerKind, map_row_to_entry},
    timezone::get_local_offset,
};

/// How many of the newest entries the dashboard shows.
const RECENT_ENTRY_COUNT: u32 = 5;

/// A month-to-date summary for one ledger kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// The sum of amounts dated within the current calendar month.
    pub month_total: f64,
    /// The newest entries in the current month, capped at five, ordered by
    /// datetime then id descending so equal timestamps are deterministic.
    pub recent_entries: Vec<LedgerEntry>,
}

/// The current calendar month so far, in UTC: from the first of the month in
/// the given timezone through now.
fn current_month_window(local_timezone: &str) -> Result<(OffsetDateTime, OffsetDateTime), Error> {
    let offset = get_local_offset(local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(local_timezone.to_owned()))?;

    let now = OffsetDateTime::now_utc();
    let start_of_month = now
        .to_offset(offset)
        .replace_day(1)
        .unwrap()
        .replace_time(Time::MIDNIGHT);

    Ok((start_of_month.to_offset(UtcOffset::UTC), now))
}

/// Compute the month-to-date summary for one ledger kind.
///
/// Read-only: never touches balances.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTimezone] if `local_timezone` is not a known timezone
///   name,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_dashboard(
    kind: LedgerKind,
    local_timezone: &str,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    let (since, until) = current_month_window(local_timezone)?;

    let month_total = connection.query_one(
        &format!(
            "SELECT COALESCE(SUM(amount), 0) FROM {} WHERE datetime >= ?1 AND datetime <= ?2",
            kind.table()
        ),
        params![since, until],
        |row| row.get(0),
    )?;

    let recent_entries = connection
        .prepare(&format!(
            "SELECT id, datetime, category, amount, description, account_id
             FROM {} WHERE datetime >= ?1 AND datetime <= ?2
             ORDER BY datetime DESC, id DESC
             LIMIT ?3",
            kind.table()
        ))?
        .query_map(params![since, until, RECENT_ENTRY_COUNT], map_row_to_entry)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DashboardSummary {
        month_total,
        recent_entries,
    })
}
