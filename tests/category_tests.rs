// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};

use fintrack::{cli, commands::categories};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    fintrack::db::init_schema(&conn).unwrap();
    conn
}

fn run_category(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("category", sub)) => categories::handle(conn, sub),
        _ => panic!("no category subcommand"),
    }
}

fn count_categories(conn: &Connection, user: i64, name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM categories WHERE user_id=?1 AND name=?2",
        params![user, name],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn unreferenced_category_can_be_removed() {
    let conn = setup();
    conn.execute("INSERT INTO users(name) VALUES ('alice')", [])
        .unwrap();
    run_category(
        &conn,
        &[
            "fintrack", "category", "add", "--user", "alice", "--name", "Food", "--type", "expense",
        ],
    )
    .unwrap();
    assert_eq!(count_categories(&conn, 1, "Food"), 1);

    run_category(
        &conn,
        &["fintrack", "category", "rm", "--user", "alice", "--name", "Food"],
    )
    .unwrap();
    assert_eq!(count_categories(&conn, 1, "Food"), 0);
}

#[test]
fn referenced_category_stays() {
    let conn = setup();
    conn.execute("INSERT INTO users(name) VALUES ('alice')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO categories(user_id, name, kind) VALUES (1, 'Food', 'expense')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id, date, merchant, amount, category_id, kind)
         VALUES (1, '2024-01-05', 'Cafe', '20.00', 1, 'expense')",
        [],
    )
    .unwrap();

    let err = run_category(
        &conn,
        &["fintrack", "category", "rm", "--user", "alice", "--name", "Food"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("referenced by 1 transactions"));
    assert_eq!(count_categories(&conn, 1, "Food"), 1);
}

#[test]
fn lookups_are_owner_scoped() {
    let conn = setup();
    conn.execute("INSERT INTO users(name) VALUES ('alice')", [])
        .unwrap();
    conn.execute("INSERT INTO users(name) VALUES ('bob')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO categories(user_id, name, kind) VALUES (1, 'Food', 'expense')",
        [],
    )
    .unwrap();

    // Bob cannot remove Alice's category; it resolves as missing for him
    let err = run_category(
        &conn,
        &["fintrack", "category", "rm", "--user", "bob", "--name", "Food"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
    assert_eq!(count_categories(&conn, 1, "Food"), 1);
}
