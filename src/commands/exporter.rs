// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ReportType;
use crate::report;
use crate::utils::{id_for_user, parse_range};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs::File;
use std::io::Write;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// CSV contract: UTF-8 with byte-order mark for spreadsheet compatibility,
/// comma-delimited, fixed header row, one row per transaction, newest first.
fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let range = parse_range(
        sub.get_one::<String>("start").unwrap(),
        sub.get_one::<String>("end").unwrap(),
    )?;
    let report_type = ReportType::from_str(sub.get_one::<String>("type").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap();

    let rows = report::export_rows(conn, user_id, &range, report_type)?;

    let mut file = File::create(out).with_context(|| format!("Create {}", out))?;
    file.write_all("\u{feff}".as_bytes())?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["Date", "Merchant", "Category", "Type", "Amount", "Notes"])?;
    for row in &rows {
        wtr.write_record([
            row.date.to_string(),
            row.merchant.clone(),
            row.category.clone(),
            row.kind.clone(),
            row.amount.to_string(),
            row.notes.clone(),
        ])?;
    }
    wtr.flush()?;
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
