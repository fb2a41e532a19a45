// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger Store: owner-scoped, filtered queries over recorded transactions.
//!
//! Every query takes the owner explicitly. Ownership is enforced by scoping,
//! never by a separate authorization check, so another user's rows are simply
//! invisible here.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, ToSql, params_from_iter};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::aggregate::CategoryTotal;
use crate::errors::{LedgerError, Result};
use crate::models::{Transaction, TxKind};
use crate::utils::money;

/// Inclusive calendar-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(LedgerError::validation(
                "end_date",
                format!("{} is before start_date {}", end, start),
            ));
        }
        Ok(DateRange { start, end })
    }

    /// Number of days in the window, inclusive of both endpoints.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Narrowing criteria for store queries. `user_id` is mandatory; everything
/// else is opt-in.
#[derive(Debug, Clone, Copy)]
pub struct TxFilter {
    pub user_id: i64,
    pub kind: Option<TxKind>,
    pub category_id: Option<i64>,
    pub range: Option<DateRange>,
    pub limit: Option<usize>,
}

impl TxFilter {
    pub fn for_user(user_id: i64) -> Self {
        TxFilter {
            user_id,
            kind: None,
            category_id: None,
            range: None,
            limit: None,
        }
    }

    pub fn kind(mut self, kind: TxKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn where_clause(&self, sql: &mut String, params: &mut Vec<Box<dyn ToSql>>) {
        sql.push_str(" WHERE t.user_id=?");
        params.push(Box::new(self.user_id));
        if let Some(kind) = self.kind {
            sql.push_str(" AND t.kind=?");
            params.push(Box::new(kind.as_str()));
        }
        if let Some(cat) = self.category_id {
            sql.push_str(" AND t.category_id=?");
            params.push(Box::new(cat));
        }
        if let Some(range) = self.range {
            sql.push_str(" AND t.date>=? AND t.date<=?");
            params.push(Box::new(range.start.to_string()));
            params.push(Box::new(range.end.to_string()));
        }
    }
}

fn decimal_col(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    Decimal::from_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn kind_col(r: &Row<'_>, idx: usize) -> rusqlite::Result<TxKind> {
    let s: String = r.get(idx)?;
    TxKind::from_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Transactions matching the filter, newest first; ties within a day break by
/// creation order, also newest first.
pub fn list_transactions(conn: &Connection, filter: &TxFilter) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT t.id, t.user_id, t.date, t.merchant, t.amount, t.category_id, c.name, t.kind, t.notes
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id",
    );
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.where_clause(&mut sql, &mut params);
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params.push(Box::new(limit as i64));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter().map(|p| p.as_ref())), |r| {
        Ok(Transaction {
            id: r.get(0)?,
            user_id: r.get(1)?,
            date: r.get(2)?,
            merchant: r.get(3)?,
            amount: decimal_col(r, 4)?,
            category_id: r.get(5)?,
            category: r.get(6)?,
            kind: kind_col(r, 7)?,
            notes: r.get(8)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Exact decimal sum of matching amounts; `0.00` when nothing matches.
/// Amounts are folded through `Decimal` rather than SQL SUM so TEXT-stored
/// values never pass through binary floating point.
pub fn sum_amount(conn: &Connection, filter: &TxFilter) -> Result<Decimal> {
    let mut sql = String::from("SELECT t.amount FROM transactions t");
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.where_clause(&mut sql, &mut params);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter().map(|p| p.as_ref())), |r| {
        decimal_col(r, 0)
    })?;
    let mut total = Decimal::ZERO;
    for row in rows {
        total += row?;
    }
    Ok(money(total))
}

pub fn count_transactions(conn: &Connection, filter: &TxFilter) -> Result<u64> {
    let mut sql = String::from("SELECT COUNT(*) FROM transactions t");
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.where_clause(&mut sql, &mut params);

    let mut stmt = conn.prepare(&sql)?;
    let n: i64 = stmt.query_row(params_from_iter(params.iter().map(|p| p.as_ref())), |r| {
        r.get(0)
    })?;
    Ok(n as u64)
}

/// Per-category `{total, count}` for one kind in a window, largest total
/// first. Transactions whose category was never set group under
/// `(uncategorized)`.
pub fn group_by_category(
    conn: &Connection,
    user_id: i64,
    kind: TxKind,
    range: &DateRange,
) -> Result<Vec<CategoryTotal>> {
    let mut stmt = conn.prepare(
        "SELECT c.name, t.amount
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1 AND t.kind=?2 AND t.date>=?3 AND t.date<=?4",
    )?;
    let rows = stmt.query_map(
        rusqlite::params![
            user_id,
            kind.as_str(),
            range.start.to_string(),
            range.end.to_string()
        ],
        |r| {
            let name: Option<String> = r.get(0)?;
            Ok((name, decimal_col(r, 1)?))
        },
    )?;

    use std::collections::HashMap;
    let mut agg: HashMap<String, (Decimal, u64)> = HashMap::new();
    for row in rows {
        let (name, amount) = row?;
        let entry = agg
            .entry(name.unwrap_or_else(|| "(uncategorized)".into()))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += amount;
        entry.1 += 1;
    }

    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total: money(total),
            count,
        })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    Ok(items)
}
