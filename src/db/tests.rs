#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use tempfile::TempDir;

use super::*;

fn open_store() -> (TempDir, LedgerStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(LedgerConfig::new(dir.path().join("expenses.db")));
    store.init().unwrap();
    (dir, store)
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_init_is_idempotent_and_keeps_data() {
    let (_dir, store) = open_store();
    store.record(5.0, "Food", "Snack").unwrap();
    store.init().unwrap();
    store.init().unwrap();
    assert_eq!(store.recent(10).unwrap().len(), 1);
}

#[test]
fn test_init_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger").join("expenses.db");
    let store = LedgerStore::new(LedgerConfig::new(&path));
    store.init().unwrap();
    assert!(path.exists());
}

#[test]
fn test_reopen_sees_previous_records() {
    let (dir, store) = open_store();
    store.record(1.0, "A", "").unwrap();
    drop(store);

    let reopened = LedgerStore::new(LedgerConfig::new(dir.path().join("expenses.db")));
    reopened.init().unwrap();
    let rows = reopened.recent(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "A");
}

// ── Record ────────────────────────────────────────────────────

#[test]
fn test_record_then_recent_returns_same_values() {
    let (_dir, store) = open_store();
    let before = Local::now().naive_local().format(DATE_FORMAT).to_string();
    let added = store.record(12.5, "Food", "Lunch").unwrap();
    let after = Local::now().naive_local().format(DATE_FORMAT).to_string();

    let rows = store.recent(1).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], added);
    assert_eq!(rows[0].amount, 12.5);
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].description, "Lunch");
    assert!(rows[0].date >= before && rows[0].date <= after);
}

#[test]
fn test_record_accepts_zero_negative_and_empty_values() {
    let (_dir, store) = open_store();
    store.record(0.0, "", "").unwrap();
    store.record(-3.25, "Refund", "").unwrap();
    let rows = store.recent(10).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|e| e.amount == -3.25));
    assert!(rows.iter().any(|e| e.category.is_empty()));
}

#[test]
fn test_ids_strictly_increasing_without_gaps() {
    let (_dir, store) = open_store();
    let ids: Vec<i64> = (0..25u32)
        .map(|i| store.record(f64::from(i), "X", "").unwrap().id)
        .collect();
    for pair in ids.windows(2) {
        assert_eq!(pair[1], pair[0] + 1);
    }
}

#[test]
fn test_identical_records_are_not_deduplicated() {
    let (_dir, store) = open_store();
    let a = store.record(4.0, "Coffee", "Latte").unwrap();
    let b = store.record(4.0, "Coffee", "Latte").unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.recent(10).unwrap().len(), 2);
}

#[test]
fn test_record_fails_when_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let store = LedgerStore::new(LedgerConfig::new(blocker.join("expenses.db")));

    let err = store.record(1.0, "Food", "").unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert!(store.init().is_err());
}

#[test]
fn test_locked_write_fails_and_does_not_persist() {
    let (dir, store) = open_store();
    let store = LedgerStore::new(
        store
            .config()
            .clone()
            .with_busy_timeout(Duration::from_millis(50)),
    );

    let holder = Connection::open(dir.path().join("expenses.db")).unwrap();
    holder.execute_batch("BEGIN IMMEDIATE;").unwrap();

    let err = store.record(9.99, "Food", "").unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    // readers still see the last committed state while the writer holds the lock
    assert!(store.recent(10).unwrap().is_empty());

    holder.execute_batch("ROLLBACK;").unwrap();
    assert!(store.recent(10).unwrap().is_empty());
    store.record(9.99, "Food", "").unwrap();
    assert_eq!(store.recent(10).unwrap().len(), 1);
}

// ── Recent ────────────────────────────────────────────────────

#[test]
fn test_recent_empty_store() {
    let (_dir, store) = open_store();
    assert!(store.recent(10).unwrap().is_empty());
}

#[test]
fn test_recent_orders_by_date_desc() {
    let (_dir, store) = open_store();
    store.record_at(1.0, "A", "", at(2024, 1, 10, 9, 0, 0)).unwrap();
    store.record_at(2.0, "B", "", at(2024, 3, 1, 9, 0, 0)).unwrap();
    store.record_at(3.0, "C", "", at(2024, 2, 15, 9, 0, 0)).unwrap();

    let cats: Vec<String> = store
        .recent(10)
        .unwrap()
        .into_iter()
        .map(|e| e.category)
        .collect();
    assert_eq!(cats, vec!["B", "C", "A"]);
}

#[test]
fn test_recent_tie_break_is_id_desc() {
    let (_dir, store) = open_store();
    let ts = at(2024, 5, 5, 12, 0, 0);
    let first = store.record_at(1.0, "A", "", ts).unwrap();
    let second = store.record_at(2.0, "B", "", ts).unwrap();
    let third = store.record_at(3.0, "C", "", ts).unwrap();

    let ids: Vec<i64> = store.recent(10).unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn test_recent_limit_returns_most_recent_k() {
    let (_dir, store) = open_store();
    for day in 1..=9 {
        store
            .record_at(f64::from(day), "X", "", at(2024, 4, day, 8, 0, 0))
            .unwrap();
    }
    let rows = store.recent(3).unwrap();
    let days: Vec<f64> = rows.iter().map(|e| e.amount).collect();
    assert_eq!(days, vec![9.0, 8.0, 7.0]);

    assert_eq!(store.recent(100).unwrap().len(), 9);
    assert!(store.recent(0).unwrap().is_empty());
}

#[test]
fn test_recent_null_description_reads_as_empty() {
    let (dir, store) = open_store();
    let conn = Connection::open(dir.path().join("expenses.db")).unwrap();
    conn.execute(
        "INSERT INTO expenses (amount, category, description, date) VALUES (2.0, 'Old', NULL, '2023-01-01 00:00:00')",
        [],
    )
    .unwrap();
    let rows = store.recent(1).unwrap();
    assert_eq!(rows[0].description, "");
}

// ── Monthly summary ───────────────────────────────────────────

#[test]
fn test_summary_groups_and_sums_current_month() {
    let (_dir, store) = open_store();
    store.record(12.50, "Food", "Lunch").unwrap();
    store.record(7.00, "Food", "").unwrap();
    store.record(20.00, "Transport", "Taxi").unwrap();

    let summary = store.monthly_summary().unwrap();
    assert_eq!(summary.month, Local::now().format(MONTH_FORMAT).to_string());
    assert_eq!(summary.categories.len(), 2);
    assert!(close(summary.get("Food").unwrap(), 19.5));
    assert!(close(summary.get("Transport").unwrap(), 20.0));
    assert!(close(summary.total(), 39.5));
}

#[test]
fn test_summary_excludes_other_months_but_listing_keeps_them() {
    let (_dir, store) = open_store();
    let now = Local::now().naive_local();
    let last_year = at(now.year() - 1, now.month(), 1, 0, 0, 0);
    store.record_at(100.0, "Rent", "", last_year).unwrap();
    store.record(5.0, "Food", "").unwrap();

    let summary = store.monthly_summary().unwrap();
    assert_eq!(summary.get("Rent"), None);
    assert!(close(summary.total(), 5.0));
    assert_eq!(store.recent(10).unwrap().len(), 2);
}

#[test]
fn test_summary_empty_month() {
    let (_dir, store) = open_store();
    store.record_at(1.0, "A", "", at(2020, 1, 1, 0, 0, 0)).unwrap();
    assert!(store.monthly_summary().unwrap().is_empty());
    assert!(store.summary_for_month("2020-02").unwrap().is_empty());
}

#[test]
fn test_summary_for_explicit_month_sorted_by_category() {
    let (_dir, store) = open_store();
    store.record_at(3.0, "Zoo", "", at(2024, 2, 1, 0, 0, 0)).unwrap();
    store.record_at(1.0, "Apple", "", at(2024, 2, 28, 23, 59, 59)).unwrap();
    store.record_at(2.0, "Apple", "", at(2024, 2, 14, 0, 0, 0)).unwrap();
    store.record_at(50.0, "Apple", "", at(2024, 3, 1, 0, 0, 0)).unwrap();

    let summary = store.summary_for_month("2024-02").unwrap();
    let cats: Vec<&str> = summary
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(cats, vec!["Apple", "Zoo"]);
    assert!(close(summary.get("Apple").unwrap(), 3.0));
    assert!(close(summary.total(), 6.0));
}

#[test]
fn test_summary_category_grouping_is_case_sensitive() {
    let (_dir, store) = open_store();
    store.record(1.0, "food", "").unwrap();
    store.record(2.0, "Food", "").unwrap();
    let summary = store.monthly_summary().unwrap();
    assert_eq!(summary.categories.len(), 2);
}

#[test]
fn test_summary_rejects_malformed_month() {
    let (_dir, store) = open_store();
    for bad in ["2024", "2024-13", "2024-1", "24-01", "2024-01%", ""] {
        let err = store.summary_for_month(bad).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)), "{bad}");
    }
}
