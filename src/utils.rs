// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::errors::{LedgerError, Result};

pub fn parse_date(s: &str, field: &'static str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        LedgerError::validation(field, format!("'{}' is not a YYYY-MM-DD date", s))
    })
}

/// Parse a positive currency amount with at most two fractional digits.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = s
        .parse::<Decimal>()
        .map_err(|_| LedgerError::validation("amount", format!("'{}' is not a decimal", s)))?;
    if d <= Decimal::ZERO {
        return Err(LedgerError::validation(
            "amount",
            format!("'{}' must be greater than zero", s),
        ));
    }
    if d.scale() > 2 {
        return Err(LedgerError::validation(
            "amount",
            format!("'{}' has more than 2 decimal places", s),
        ));
    }
    Ok(d)
}

/// Parse and order-check an inclusive date range.
pub fn parse_range(start: &str, end: &str) -> Result<crate::store::DateRange> {
    let start = parse_date(start, "start_date")?;
    let end = parse_date(end, "end_date")?;
    crate::store::DateRange::new(start, end)
}

/// Round to one decimal place before surfacing a ratio or average.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Normalize a monetary figure to currency scale: banker-free half-up
/// rounding to 2 dp and exactly two fractional digits on the wire
/// (`0` becomes `0.00`).
pub fn money(d: Decimal) -> Decimal {
    let mut d = d.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    d.rescale(2);
    d
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_user(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM users WHERE name=?1", params![name], |r| {
        r.get(0)
    })
    .optional()?
    .ok_or_else(|| LedgerError::not_found(format!("User '{}'", name)))
}

/// Category lookup scoped to the owner; categories of other users resolve the
/// same as missing ones.
pub fn id_for_category(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM categories WHERE user_id=?1 AND name=?2",
        params![user_id, name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found(format!("Category '{}'", name)))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
