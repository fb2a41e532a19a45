// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use crate::models::TxKind;
use crate::store::{self, TxFilter};
use crate::utils::{
    id_for_category, id_for_user, maybe_print_json, parse_amount, parse_date, parse_range,
    pretty_table,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap(), "date")?;
    let merchant = sub.get_one::<String>("merchant").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let kind = TxKind::from_str(sub.get_one::<String>("type").unwrap())?;
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());

    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => Some(id_for_category(conn, user_id, cat)?),
        None => None,
    };

    conn.execute(
        "INSERT INTO transactions(user_id, date, merchant, amount, category_id, kind, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            date.to_string(),
            merchant,
            amount.to_string(),
            category_id,
            kind.as_str(),
            notes
        ],
    )?;
    println!("Recorded {} {} on {} at '{}'", kind, amount, date, merchant);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;

    let mut filter = TxFilter::for_user(user_id);
    match (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        (Some(from), Some(to)) => filter = filter.range(parse_range(from, to)?),
        (None, None) => {}
        _ => {
            return Err(LedgerError::validation(
                "date_range",
                "--from and --to must be given together",
            )
            .into());
        }
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        filter = filter.kind(TxKind::from_str(kind)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        filter = filter.category(id_for_category(conn, user_id, cat)?);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        filter = filter.limit(*limit);
    }

    let data = store::list_transactions(conn, &filter)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.merchant.clone(),
                    t.category.clone().unwrap_or_default(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.notes.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Merchant", "Category", "Type", "Amount", "Notes"],
                rows,
            )
        );
    }
    Ok(())
}
