// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};

use fintrack::aggregate::FinancialHealth;
use fintrack::errors::LedgerError;
use fintrack::models::{ReportType, TxKind};
use fintrack::report;
use fintrack::store::DateRange;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    fintrack::db::init_schema(&conn).unwrap();
    conn
}

fn add_user(conn: &Connection, name: &str) -> i64 {
    conn.execute("INSERT INTO users(name) VALUES (?1)", params![name])
        .unwrap();
    conn.last_insert_rowid()
}

fn add_category(conn: &Connection, user_id: i64, name: &str, kind: &str) -> i64 {
    conn.execute(
        "INSERT INTO categories(user_id, name, kind) VALUES (?1, ?2, ?3)",
        params![user_id, name, kind],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn add_tx(
    conn: &Connection,
    user_id: i64,
    date: &str,
    merchant: &str,
    amount: &str,
    cat_id: i64,
    kind: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO transactions(user_id, date, merchant, amount, category_id, kind)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![user_id, date, merchant, amount, cat_id, kind],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn january() -> DateRange {
    DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap()
}

/// Seeds the canonical January ledger: one salary, two food expenses.
fn seed_january(conn: &Connection, user: i64) -> (i64, i64) {
    let food = add_category(conn, user, "Food", "expense");
    let salary = add_category(conn, user, "Salary", "income");
    add_tx(conn, user, "2024-01-05", "Cafe", "20.00", food, "expense");
    add_tx(conn, user, "2024-01-10", "Employer", "500.00", salary, "income");
    add_tx(conn, user, "2024-01-15", "Grocer", "30.00", food, "expense");
    (food, salary)
}

#[test]
fn full_month_report_matches_expected_figures() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    seed_january(&conn, user);

    let r = report::generate(&conn, user, &january(), ReportType::All).unwrap();
    assert_eq!(r.summary.total_income.to_string(), "500.00");
    assert_eq!(r.summary.total_expenses.to_string(), "50.00");
    assert_eq!(r.summary.net_amount.to_string(), "450.00");
    assert_eq!(r.summary.total_transactions, 3);
    assert_eq!(r.insights.spending_ratio, 10.0);
    assert_eq!(r.insights.days_in_period, 31);
    assert_eq!(r.insights.avg_transactions_per_day, 0.1);
    assert_eq!(r.insights.financial_health, FinancialHealth::Positive);

    let b = report::category_breakdown(&conn, user, &january()).unwrap();
    assert_eq!(b.expense.len(), 1);
    assert_eq!(b.expense[0].category, "Food");
    assert_eq!(b.expense[0].total.to_string(), "50.00");
    assert_eq!(b.expense[0].count, 2);
    assert_eq!(b.income[0].category, "Salary");
    assert_eq!(b.income[0].total.to_string(), "500.00");
}

#[test]
fn report_type_narrows_the_set_before_aggregation() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    seed_january(&conn, user);

    let r = report::generate(&conn, user, &january(), ReportType::Expense).unwrap();
    assert_eq!(r.summary.total_transactions, 2);
    assert_eq!(r.summary.total_income.to_string(), "0.00");
    assert_eq!(r.summary.total_expenses.to_string(), "50.00");
    assert!(r.transactions.iter().all(|t| t.kind == TxKind::Expense));

    let r = report::generate(&conn, user, &january(), ReportType::Income).unwrap();
    assert_eq!(r.summary.total_transactions, 1);
    // No expenses in scope, so the ratio denominator policy still applies
    assert_eq!(r.insights.spending_ratio, 0.0);
}

#[test]
fn transactions_come_back_newest_first_with_creation_tiebreak() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    let food = add_category(&conn, user, "Food", "expense");
    let first = add_tx(&conn, user, "2024-01-10", "A", "1.00", food, "expense");
    let second = add_tx(&conn, user, "2024-01-10", "B", "2.00", food, "expense");
    let newest = add_tx(&conn, user, "2024-01-20", "C", "3.00", food, "expense");

    let r = report::generate(&conn, user, &january(), ReportType::All).unwrap();
    let ids: Vec<i64> = r.transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![newest, second, first]);
}

#[test]
fn identical_inputs_produce_identical_reports() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    seed_january(&conn, user);

    let a = report::generate(&conn, user, &january(), ReportType::All).unwrap();
    let b = report::generate(&conn, user, &january(), ReportType::All).unwrap();
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

#[test]
fn inverted_range_is_rejected_up_front() {
    let err = DateRange::new(date("2024-02-01"), date("2024-01-01")).unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "end_date", .. }));

    let err = fintrack::utils::parse_range("2024-01-xx", "2024-01-31").unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "start_date", .. }));
}

#[test]
fn other_users_never_leak_into_a_report() {
    let conn = setup();
    let alice = add_user(&conn, "alice");
    let bob = add_user(&conn, "bob");
    seed_january(&conn, alice);
    let bob_cat = add_category(&conn, bob, "Food", "expense");
    add_tx(&conn, bob, "2024-01-07", "Diner", "999.00", bob_cat, "expense");

    let r = report::generate(&conn, alice, &january(), ReportType::All).unwrap();
    assert_eq!(r.summary.total_transactions, 3);
    assert_eq!(r.summary.total_expenses.to_string(), "50.00");
}

#[test]
fn saved_snapshot_keeps_its_figures_when_the_ledger_moves_on() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    let (food, _) = seed_january(&conn, user);

    let saved = report::save(&conn, user, "January", &january(), ReportType::All).unwrap();
    assert_eq!(saved.net_amount.to_string(), "450.00");
    assert_eq!(saved.total_transactions, 3);
    assert_eq!(saved.spending_ratio, 10.0);

    // A later transaction must not rewrite the snapshot
    add_tx(&conn, user, "2024-01-20", "Bar", "100.00", food, "expense");
    let reloaded = report::get_saved(&conn, user, saved.id).unwrap();
    assert_eq!(reloaded.net_amount.to_string(), "450.00");
    assert_eq!(reloaded.total_transactions, 3);

    // while a fresh run sees the new state
    let fresh = report::generate(&conn, user, &january(), ReportType::All).unwrap();
    assert_eq!(fresh.summary.net_amount.to_string(), "350.00");
}

#[test]
fn stats_count_snapshots_and_active_schedules() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    seed_january(&conn, user);

    report::save(&conn, user, "one", &january(), ReportType::All).unwrap();
    report::save(&conn, user, "two", &january(), ReportType::Expense).unwrap();
    report::schedule_create(
        &conn,
        user,
        "monthly recap",
        fintrack::models::Frequency::Monthly,
        ReportType::All,
        date("2024-02-01"),
    )
    .unwrap();

    let stats = report::stats(&conn, user).unwrap();
    assert_eq!(stats.total_reports, 2);
    assert_eq!(stats.total_scheduled, 1);
    assert_eq!(stats.recent_reports.len(), 2);
}

#[test]
fn export_rows_mirror_the_filtered_set() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    seed_january(&conn, user);

    let rows = report::export_rows(&conn, user, &january(), ReportType::Expense).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].merchant, "Grocer");
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].kind, "expense");
    assert_eq!(rows[0].amount.to_string(), "30.00");
    assert_eq!(rows[1].merchant, "Cafe");
}
