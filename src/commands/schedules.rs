// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Frequency, ReportType};
use crate::report;
use crate::utils::{id_for_user, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("run-due", sub)) => run_due(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let frequency = Frequency::from_str(sub.get_one::<String>("frequency").unwrap())?;
    let report_type = ReportType::from_str(sub.get_one::<String>("type").unwrap())?;
    let next = parse_date(sub.get_one::<String>("next").unwrap(), "next_generation")?;

    let s = report::schedule_create(conn, user_id, name, frequency, report_type, next)?;
    println!(
        "Scheduled '{}' ({}) starting {}",
        s.name,
        s.frequency.as_str(),
        s.next_generation
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let data = report::schedule_list(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.name.clone(),
                    s.frequency.as_str().to_string(),
                    s.report_type.as_str().to_string(),
                    if s.is_active { "yes" } else { "no" }.to_string(),
                    s.next_generation.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Frequency", "Type", "Active", "Next"],
                rows,
            )
        );
    }
    Ok(())
}

fn run_due(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let today = chrono::Utc::now().date_naive();
    let saved = report::run_due_schedules(conn, user_id, today)?;
    if saved.is_empty() {
        println!("No schedules due");
    } else {
        for r in &saved {
            println!("Saved report '{}' (id {})", r.title, r.id);
        }
    }
    Ok(())
}
