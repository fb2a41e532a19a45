// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};

use fintrack::models::TxKind;
use fintrack::store::{self, DateRange, TxFilter};

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

fn add_tx(conn: &Connection, user_id: i64, date: &str, amount: &str, cat_id: Option<i64>, kind: &str) {
    conn.execute(
        "INSERT INTO transactions(user_id, date, merchant, amount, category_id, kind)
         VALUES (?1, ?2, 'Shop', ?3, ?4, ?5)",
        params![user_id, date, amount, cat_id, kind],
    )
    .unwrap();
}

fn range(start: &str, end: &str) -> DateRange {
    DateRange::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
}

#[test]
fn list_joins_category_names_and_orders_newest_first() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    let food = add_category(&conn, user, "Food", "expense");
    add_tx(&conn, user, "2024-01-05", "20.00", Some(food), "expense");
    add_tx(&conn, user, "2024-01-10", "30.00", None, "expense");

    let txs = store::list_transactions(&conn, &TxFilter::for_user(user)).unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].date.to_string(), "2024-01-10");
    assert_eq!(txs[0].category, None);
    assert_eq!(txs[1].category.as_deref(), Some("Food"));
    assert_eq!(txs[1].amount.to_string(), "20.00");
}

#[test]
fn filters_compose() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    let food = add_category(&conn, user, "Food", "expense");
    let fuel = add_category(&conn, user, "Fuel", "expense");
    add_tx(&conn, user, "2024-01-05", "20.00", Some(food), "expense");
    add_tx(&conn, user, "2024-01-06", "25.00", Some(fuel), "expense");
    add_tx(&conn, user, "2024-02-05", "99.00", Some(food), "expense");
    add_tx(&conn, user, "2024-01-07", "500.00", None, "income");

    let filter = TxFilter::for_user(user)
        .kind(TxKind::Expense)
        .category(food)
        .range(range("2024-01-01", "2024-01-31"));
    let txs = store::list_transactions(&conn, &filter).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount.to_string(), "20.00");

    assert_eq!(store::count_transactions(&conn, &filter).unwrap(), 1);
    assert_eq!(store::sum_amount(&conn, &filter).unwrap().to_string(), "20.00");
}

#[test]
fn limit_truncates_after_ordering() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    add_tx(&conn, user, "2024-01-05", "1.00", None, "expense");
    add_tx(&conn, user, "2024-01-09", "2.00", None, "expense");
    add_tx(&conn, user, "2024-01-07", "3.00", None, "expense");

    let txs = store::list_transactions(&conn, &TxFilter::for_user(user).limit(2)).unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].date.to_string(), "2024-01-09");
    assert_eq!(txs[1].date.to_string(), "2024-01-07");
}

#[test]
fn sum_is_exact_over_cent_amounts() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    // Classic float-drift amounts
    for _ in 0..10 {
        add_tx(&conn, user, "2024-01-05", "0.10", None, "expense");
    }
    add_tx(&conn, user, "2024-01-06", "0.01", None, "expense");

    let filter = TxFilter::for_user(user).kind(TxKind::Expense);
    assert_eq!(store::sum_amount(&conn, &filter).unwrap().to_string(), "1.01");
}

#[test]
fn group_by_category_sorts_by_total_descending() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    let food = add_category(&conn, user, "Food", "expense");
    let fuel = add_category(&conn, user, "Fuel", "expense");
    add_tx(&conn, user, "2024-01-05", "10.00", Some(food), "expense");
    add_tx(&conn, user, "2024-01-06", "15.00", Some(fuel), "expense");
    add_tx(&conn, user, "2024-01-07", "2.00", Some(food), "expense");
    add_tx(&conn, user, "2024-01-08", "5.00", None, "expense");

    let groups = store::group_by_category(
        &conn,
        user,
        TxKind::Expense,
        &range("2024-01-01", "2024-01-31"),
    )
    .unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(names, vec!["Fuel", "Food", "(uncategorized)"]);
    assert_eq!(groups[1].total.to_string(), "12.00");
    assert_eq!(groups[1].count, 2);
}

#[test]
fn empty_filter_sums_to_zero_money() {
    let conn = setup();
    let user = add_user(&conn, "alice");
    let filter = TxFilter::for_user(user);
    assert_eq!(store::sum_amount(&conn, &filter).unwrap().to_string(), "0.00");
    assert_eq!(store::count_transactions(&conn, &filter).unwrap(), 0);
}
