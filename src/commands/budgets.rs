// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget;
use crate::models::Period;
use crate::utils::{id_for_category, id_for_user, maybe_print_json, parse_amount, parse_range, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let cat = sub.get_one::<String>("category").unwrap();
    let cat_id = id_for_category(conn, user_id, cat)?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let period = Period::from_str(sub.get_one::<String>("period").unwrap())?;
    let range = parse_range(
        sub.get_one::<String>("start").unwrap(),
        sub.get_one::<String>("end").unwrap(),
    )?;

    let b = budget::create(conn, user_id, cat_id, amount, period, range.start, range.end)?;
    println!(
        "Budget set: {} {} for '{}' ({} to {})",
        b.amount,
        period.as_str(),
        cat,
        b.start_date,
        b.end_date
    );
    Ok(())
}

/// One budget joined with its derived figures, as surfaced to the caller.
#[derive(Serialize)]
struct BudgetRow {
    id: i64,
    category: String,
    amount: Decimal,
    period: Period,
    start_date: NaiveDate,
    end_date: NaiveDate,
    spent_amount: Decimal,
    remaining_amount: Decimal,
    percentage_used: Decimal,
}

fn evaluate_rows(conn: &Connection, user_id: i64) -> Result<Vec<BudgetRow>> {
    let mut data = Vec::new();
    for b in budget::list(conn, user_id)? {
        let category: String = conn.query_row(
            "SELECT name FROM categories WHERE id=?1",
            params![b.category_id],
            |r| r.get(0),
        )?;
        let status = budget::evaluate(conn, &b)?;
        data.push(BudgetRow {
            id: b.id,
            category,
            amount: b.amount,
            period: b.period,
            start_date: b.start_date,
            end_date: b.end_date,
            spent_amount: status.spent_amount,
            remaining_amount: status.remaining_amount,
            percentage_used: status.percentage_used,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let data = evaluate_rows(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.category.clone(),
                    r.period.as_str().to_string(),
                    format!("{} to {}", r.start_date, r.end_date),
                    r.amount.to_string(),
                    r.spent_amount.to_string(),
                    r.remaining_amount.to_string(),
                    format!("{}%", r.percentage_used),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Category", "Period", "Window", "Amount", "Spent", "Remaining", "Used"],
                rows,
            )
        );
    }
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let id = *sub.get_one::<i64>("id").unwrap();

    let b = budget::get(conn, user_id, id)?;
    let status = budget::evaluate(conn, &b)?;
    if !maybe_print_json(json_flag, jsonl_flag, &status)? {
        let rows = vec![vec![
            b.amount.to_string(),
            status.spent_amount.to_string(),
            status.remaining_amount.to_string(),
            format!("{}%", status.percentage_used),
        ]];
        println!(
            "{}",
            pretty_table(&["Amount", "Spent", "Remaining", "Used"], rows)
        );
    }
    Ok(())
}
