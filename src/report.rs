// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report Generator: turns a user's date-ranged transaction set into a
//! summary, insights, and a category breakdown, optionally persisted as a
//! write-once snapshot.

use chrono::{Days, Months, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::aggregate::{self, Breakdown, Insights, Summary};
use crate::errors::{LedgerError, Result};
use crate::models::{Frequency, Report, ReportSchedule, ReportType, Transaction};
use crate::store::{self, DateRange, TxFilter};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub summary: Summary,
    pub insights: Insights,
    pub transactions: Vec<Transaction>,
}

/// Tabular row for CSV-style serialization: a formatting transform of the
/// report's transaction set, not a new computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub merchant: String,
    pub category: String,
    pub kind: String,
    pub amount: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_reports: u64,
    pub total_scheduled: u64,
    pub recent_reports: Vec<Report>,
}

/// Full report over the owner's transactions in the window. Transactions
/// come back newest first; a non-`all` type narrows the set before any
/// aggregation. Same inputs over an unchanged store give the same output.
pub fn generate(
    conn: &Connection,
    user_id: i64,
    range: &DateRange,
    report_type: ReportType,
) -> Result<GeneratedReport> {
    let mut filter = TxFilter::for_user(user_id).range(*range);
    if let Some(kind) = report_type.kind() {
        filter = filter.kind(kind);
    }
    let transactions = store::list_transactions(conn, &filter)?;
    let summary = aggregate::summarize(&transactions, range, report_type);
    let insights = aggregate::derive_insights(&summary, range);
    Ok(GeneratedReport {
        summary,
        insights,
        transactions,
    })
}

/// Per-kind category breakdown, independent of any report type filter.
pub fn category_breakdown(conn: &Connection, user_id: i64, range: &DateRange) -> Result<Breakdown> {
    Ok(Breakdown {
        income: store::group_by_category(conn, user_id, crate::models::TxKind::Income, range)?,
        expense: store::group_by_category(conn, user_id, crate::models::TxKind::Expense, range)?,
    })
}

/// Row-per-transaction view of the same filtered, date-descending set.
pub fn export_rows(
    conn: &Connection,
    user_id: i64,
    range: &DateRange,
    report_type: ReportType,
) -> Result<Vec<ExportRow>> {
    let report = generate(conn, user_id, range, report_type)?;
    Ok(report
        .transactions
        .into_iter()
        .map(|tx| ExportRow {
            date: tx.date,
            merchant: tx.merchant,
            category: tx.category.unwrap_or_default(),
            kind: tx.kind.as_str().to_string(),
            amount: tx.amount,
            notes: tx.notes.unwrap_or_default(),
        })
        .collect())
}

/// Persist a snapshot of one report run under a caller-supplied title. Only
/// the summary and insight figures are stored, never the transaction list,
/// and the row is an insert: later ledger changes do not touch it.
pub fn save(
    conn: &Connection,
    user_id: i64,
    title: &str,
    range: &DateRange,
    report_type: ReportType,
) -> Result<Report> {
    let report = generate(conn, user_id, range, report_type)?;
    conn.execute(
        "INSERT INTO reports(user_id, title, report_type, start_date, end_date,
                             total_transactions, total_income, total_expenses, net_amount,
                             spending_ratio, avg_transactions_per_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            user_id,
            title,
            report_type.as_str(),
            range.start.to_string(),
            range.end.to_string(),
            report.summary.total_transactions as i64,
            report.summary.total_income.to_string(),
            report.summary.total_expenses.to_string(),
            report.summary.net_amount.to_string(),
            report.insights.spending_ratio,
            report.insights.avg_transactions_per_day,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_saved(conn, user_id, id)
}

pub fn get_saved(conn: &Connection, user_id: i64, id: i64) -> Result<Report> {
    conn.query_row(
        "SELECT id, user_id, title, report_type, start_date, end_date,
                total_transactions, total_income, total_expenses, net_amount,
                spending_ratio, avg_transactions_per_day, created_at
         FROM reports WHERE id=?1 AND user_id=?2",
        params![id, user_id],
        report_from_row,
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found(format!("Report {}", id)))
}

pub fn list_saved(conn: &Connection, user_id: i64) -> Result<Vec<Report>> {
    query_reports(
        conn,
        user_id,
        "SELECT id, user_id, title, report_type, start_date, end_date,
                total_transactions, total_income, total_expenses, net_amount,
                spending_ratio, avg_transactions_per_day, created_at
         FROM reports WHERE user_id=?1 ORDER BY created_at DESC, id DESC",
    )
}

/// Saved-report counters plus the five most recent snapshots.
pub fn stats(conn: &Connection, user_id: i64) -> Result<ReportStats> {
    let total_reports: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reports WHERE user_id=?1",
        params![user_id],
        |r| r.get(0),
    )?;
    let total_scheduled: i64 = conn.query_row(
        "SELECT COUNT(*) FROM report_schedules WHERE user_id=?1 AND is_active=1",
        params![user_id],
        |r| r.get(0),
    )?;
    let recent_reports = query_reports(
        conn,
        user_id,
        "SELECT id, user_id, title, report_type, start_date, end_date,
                total_transactions, total_income, total_expenses, net_amount,
                spending_ratio, avg_transactions_per_day, created_at
         FROM reports WHERE user_id=?1 ORDER BY created_at DESC, id DESC LIMIT 5",
    )?;
    Ok(ReportStats {
        total_reports: total_reports as u64,
        total_scheduled: total_scheduled as u64,
        recent_reports,
    })
}

fn query_reports(conn: &Connection, user_id: i64, sql: &str) -> Result<Vec<Report>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![user_id], report_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn report_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Report> {
    fn dec(r: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
        let s: String = r.get(idx)?;
        Decimal::from_str(&s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }
    let type_s: String = r.get(3)?;
    let report_type = ReportType::from_str(&type_s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Report {
        id: r.get(0)?,
        user_id: r.get(1)?,
        title: r.get(2)?,
        report_type,
        start_date: r.get(4)?,
        end_date: r.get(5)?,
        total_transactions: r.get::<_, i64>(6)? as u64,
        total_income: dec(r, 7)?,
        total_expenses: dec(r, 8)?,
        net_amount: dec(r, 9)?,
        spending_ratio: r.get(10)?,
        avg_transactions_per_day: r.get(11)?,
        created_at: r.get(12)?,
    })
}

// Schedules

pub fn schedule_create(
    conn: &Connection,
    user_id: i64,
    name: &str,
    frequency: Frequency,
    report_type: ReportType,
    next_generation: NaiveDate,
) -> Result<ReportSchedule> {
    conn.execute(
        "INSERT INTO report_schedules(user_id, name, frequency, report_type, next_generation)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            name,
            frequency.as_str(),
            report_type.as_str(),
            next_generation.to_string()
        ],
    )?;
    Ok(ReportSchedule {
        id: conn.last_insert_rowid(),
        user_id,
        name: name.to_string(),
        frequency,
        report_type,
        is_active: true,
        last_generated: None,
        next_generation,
    })
}

pub fn schedule_list(conn: &Connection, user_id: i64) -> Result<Vec<ReportSchedule>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, frequency, report_type, is_active, last_generated, next_generation
         FROM report_schedules WHERE user_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user_id], schedule_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Run every active schedule whose `next_generation` is on or before `today`:
/// save a snapshot for the period ending today and advance the schedule by
/// its frequency. Returns the snapshots that were written.
pub fn run_due_schedules(conn: &Connection, user_id: i64, today: NaiveDate) -> Result<Vec<Report>> {
    let due: Vec<ReportSchedule> = schedule_list(conn, user_id)?
        .into_iter()
        .filter(|s| s.is_active && s.next_generation <= today)
        .collect();

    let mut saved = Vec::new();
    for schedule in due {
        let range = DateRange::new(period_start(schedule.frequency, today)?, today)?;
        let title = format!("{} {}", schedule.name, today);
        let report = save(conn, user_id, &title, &range, schedule.report_type)?;
        conn.execute(
            "UPDATE report_schedules SET last_generated=?1, next_generation=?2 WHERE id=?3",
            params![
                today.to_string(),
                advance(schedule.frequency, today)?.to_string(),
                schedule.id
            ],
        )?;
        saved.push(report);
    }
    Ok(saved)
}

/// First day of the period of the given frequency that ends on `end`.
fn period_start(frequency: Frequency, end: NaiveDate) -> Result<NaiveDate> {
    let start = match frequency {
        Frequency::Daily => Some(end),
        Frequency::Weekly => end.checked_sub_days(Days::new(6)),
        Frequency::Monthly => end
            .checked_sub_months(Months::new(1))
            .and_then(|d| d.checked_add_days(Days::new(1))),
        Frequency::Quarterly => end
            .checked_sub_months(Months::new(3))
            .and_then(|d| d.checked_add_days(Days::new(1))),
    };
    start.ok_or_else(|| LedgerError::validation("date", format!("{} is out of range", end)))
}

fn advance(frequency: Frequency, from: NaiveDate) -> Result<NaiveDate> {
    let next = match frequency {
        Frequency::Daily => from.checked_add_days(Days::new(1)),
        Frequency::Weekly => from.checked_add_days(Days::new(7)),
        Frequency::Monthly => from.checked_add_months(Months::new(1)),
        Frequency::Quarterly => from.checked_add_months(Months::new(3)),
    };
    next.ok_or_else(|| LedgerError::validation("date", format!("{} is out of range", from)))
}

fn schedule_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<ReportSchedule> {
    let freq_s: String = r.get(3)?;
    let type_s: String = r.get(4)?;
    let frequency = Frequency::from_str(&freq_s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let report_type = ReportType::from_str(&type_s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ReportSchedule {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        frequency,
        report_type,
        is_active: r.get(5)?,
        last_generated: r.get(6)?,
        next_generation: r.get(7)?,
    })
}
