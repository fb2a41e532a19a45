// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("dev.fintrack", "Fintrack", "fintrack"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        UNIQUE(user_id, name),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    -- Categories referenced by transactions cannot be deleted (restrict
    -- policy); amounts are stored as exact decimal strings.
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        merchant TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_id INTEGER,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_user_kind ON transactions(user_id, kind);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        period TEXT NOT NULL CHECK(period IN ('weekly','monthly','yearly')),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, category_id, start_date, end_date),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS reports(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        report_type TEXT NOT NULL CHECK(report_type IN ('all','income','expense')),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        total_transactions INTEGER NOT NULL DEFAULT 0,
        total_income TEXT NOT NULL DEFAULT '0.00',
        total_expenses TEXT NOT NULL DEFAULT '0.00',
        net_amount TEXT NOT NULL DEFAULT '0.00',
        spending_ratio REAL NOT NULL DEFAULT 0,
        avg_transactions_per_day REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_reports_user_range ON reports(user_id, start_date, end_date);

    CREATE TABLE IF NOT EXISTS report_schedules(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        frequency TEXT NOT NULL CHECK(frequency IN ('daily','weekly','monthly','quarterly')),
        report_type TEXT NOT NULL CHECK(report_type IN ('all','income','expense')),
        is_active INTEGER NOT NULL DEFAULT 1,
        last_generated TEXT,
        next_generation TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

/// Starter categories seeded for each new user. Invoked synchronously by the
/// user-creation workflow, never as an implicit lifecycle hook.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Salary", "income"),
    ("Freelance", "income"),
    ("Investment", "income"),
    ("Other Income", "income"),
    ("Food & Dining", "expense"),
    ("Transportation", "expense"),
    ("Shopping", "expense"),
    ("Utilities", "expense"),
    ("Entertainment", "expense"),
    ("Healthcare", "expense"),
    ("Education", "expense"),
    ("Housing", "expense"),
    ("Personal Care", "expense"),
    ("Travel", "expense"),
    ("Other Expense", "expense"),
];

pub fn provision_default_categories(conn: &Connection, user_id: i64) -> Result<()> {
    for (name, kind) in DEFAULT_CATEGORIES {
        conn.execute(
            "INSERT OR IGNORE INTO categories(user_id, name, kind) VALUES (?1, ?2, ?3)",
            params![user_id, name, kind],
        )?;
    }
    Ok(())
}
