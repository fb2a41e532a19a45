// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use crate::models::{Category, TxKind};
use crate::utils::{id_for_category, id_for_user, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let kind = TxKind::from_str(sub.get_one::<String>("type").unwrap())?;
    conn.execute(
        "INSERT INTO categories(user_id, name, kind) VALUES (?1, ?2, ?3)",
        params![user_id, name, kind.as_str()],
    )?;
    println!("Added {} category '{}'", kind, name);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, kind FROM categories WHERE user_id=?1 ORDER BY kind, name",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        let kind_s: String = r.get(3)?;
        let kind = TxKind::from_str(&kind_s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Category {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            kind,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| vec![c.name.clone(), c.kind.to_string()])
            .collect();
        println!("{}", pretty_table(&["Category", "Type"], rows));
    }
    Ok(())
}

/// Restrict-delete: a category still referenced by transactions stays.
fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let cat_id = id_for_category(conn, user_id, name)?;
    let referenced: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![cat_id],
        |r| r.get(0),
    )?;
    if referenced > 0 {
        return Err(LedgerError::validation(
            "category",
            format!("'{}' is referenced by {} transactions", name, referenced),
        )
        .into());
    }
    conn.execute("DELETE FROM categories WHERE id=?1", params![cat_id])?;
    println!("Removed category '{}'", name);
    Ok(())
}
