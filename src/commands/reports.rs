// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{Breakdown, CategoryTotal};
use crate::models::{Report, ReportType};
use crate::report;
use crate::utils::{id_for_user, maybe_print_json, parse_range, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("generate", sub)) => generate(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        Some(("save", sub)) => save(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn generate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let range = parse_range(
        sub.get_one::<String>("start").unwrap(),
        sub.get_one::<String>("end").unwrap(),
    )?;
    let report_type = ReportType::from_str(sub.get_one::<String>("type").unwrap())?;

    let report = report::generate(conn, user_id, &range, report_type)?;
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        let s = &report.summary;
        println!(
            "{}",
            pretty_table(
                &["Transactions", "Income", "Expenses", "Net"],
                vec![vec![
                    s.total_transactions.to_string(),
                    s.total_income.to_string(),
                    s.total_expenses.to_string(),
                    s.net_amount.to_string(),
                ]],
            )
        );
        let i = &report.insights;
        println!(
            "{}",
            pretty_table(
                &["Days", "Avg tx/day", "Spending ratio", "Health"],
                vec![vec![
                    i.days_in_period.to_string(),
                    format!("{}", i.avg_transactions_per_day),
                    format!("{}%", i.spending_ratio),
                    i.financial_health.as_str().to_string(),
                ]],
            )
        );
        let rows: Vec<Vec<String>> = report
            .transactions
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.merchant.clone(),
                    t.category.clone().unwrap_or_default(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Merchant", "Category", "Type", "Amount"], rows)
        );
    }
    Ok(())
}

fn breakdown_rows(b: &Breakdown) -> Vec<Vec<String>> {
    fn side(kind: &str, items: &[CategoryTotal], rows: &mut Vec<Vec<String>>) {
        for item in items {
            rows.push(vec![
                kind.to_string(),
                item.category.clone(),
                item.total.to_string(),
                item.count.to_string(),
            ]);
        }
    }
    let mut rows = Vec::new();
    side("income", &b.income, &mut rows);
    side("expense", &b.expense, &mut rows);
    rows
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let range = parse_range(
        sub.get_one::<String>("start").unwrap(),
        sub.get_one::<String>("end").unwrap(),
    )?;

    let b = report::category_breakdown(conn, user_id, &range)?;
    if !maybe_print_json(json_flag, jsonl_flag, &b)? {
        println!(
            "{}",
            pretty_table(&["Type", "Category", "Total", "Count"], breakdown_rows(&b))
        );
    }
    Ok(())
}

fn save(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let title = sub.get_one::<String>("title").unwrap();
    let range = parse_range(
        sub.get_one::<String>("start").unwrap(),
        sub.get_one::<String>("end").unwrap(),
    )?;
    let report_type = ReportType::from_str(sub.get_one::<String>("type").unwrap())?;

    let saved = report::save(conn, user_id, title, &range, report_type)?;
    println!("Saved report '{}' (id {})", saved.title, saved.id);
    Ok(())
}

fn report_rows(data: &[Report]) -> Vec<Vec<String>> {
    data.iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.title.clone(),
                r.report_type.as_str().to_string(),
                format!("{} to {}", r.start_date, r.end_date),
                r.net_amount.to_string(),
                r.created_at.clone(),
            ]
        })
        .collect()
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let data = report::list_saved(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Id", "Title", "Type", "Window", "Net", "Created"],
                report_rows(&data),
            )
        );
    }
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let stats = report::stats(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &stats)? {
        println!(
            "Reports: {} saved, {} active schedules",
            stats.total_reports, stats.total_scheduled
        );
        println!(
            "{}",
            pretty_table(
                &["Id", "Title", "Type", "Window", "Net", "Created"],
                report_rows(&stats.recent_reports),
            )
        );
    }
    Ok(())
}
