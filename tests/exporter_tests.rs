// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use tempfile::tempdir;

use fintrack::{cli, commands::exporter};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    fintrack::db::init_schema(&conn).unwrap();
    conn
}

fn seed(conn: &Connection) {
    conn.execute("INSERT INTO users(name) VALUES ('alice')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO categories(user_id, name, kind) VALUES (1, 'Food', 'expense')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id, date, merchant, amount, category_id, kind, notes)
         VALUES (1, '2024-01-05', 'Corner Shop', '12.34', 1, 'expense', 'Weekly run')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id, date, merchant, amount, category_id, kind)
         VALUES (1, '2024-01-10', 'Employer', '500.00', NULL, 'income')",
        [],
    )
    .unwrap();
}

fn run_export(conn: &Connection, args: &[&str]) {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn csv_export_carries_bom_header_and_rows() {
    let conn = setup();
    seed(&conn);

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &conn,
        &[
            "fintrack",
            "export",
            "transactions",
            "--user",
            "alice",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--out",
            &out_str,
        ],
    );

    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(&bytes[..3], "\u{feff}".as_bytes());

    let contents = String::from_utf8(bytes).unwrap();
    let mut lines = contents.trim_start_matches('\u{feff}').lines();
    assert_eq!(
        lines.next().unwrap(),
        "Date,Merchant,Category,Type,Amount,Notes"
    );
    // Newest first; missing category and notes render empty
    assert_eq!(lines.next().unwrap(), "2024-01-10,Employer,,income,500.00,");
    assert_eq!(
        lines.next().unwrap(),
        "2024-01-05,Corner Shop,Food,expense,12.34,Weekly run"
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn csv_export_respects_the_type_filter() {
    let conn = setup();
    seed(&conn);

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("expenses.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &conn,
        &[
            "fintrack",
            "export",
            "transactions",
            "--user",
            "alice",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--type",
            "expense",
            "--out",
            &out_str,
        ],
    );

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.contains("Corner Shop"));
    assert!(!contents.contains("Employer"));
}
