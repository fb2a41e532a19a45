// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget Evaluator: derives spent/remaining/percentage figures for one
//! budget window. Read-only and uncached; every call re-queries the store.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{LedgerError, Result};
use crate::models::{Budget, Period, TxKind};
use crate::store::{self, DateRange, TxFilter};
use crate::utils::money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub spent_amount: Decimal,
    pub remaining_amount: Decimal,
    pub percentage_used: Decimal,
}

/// Evaluate one budget against recorded expenses in its window.
///
/// Remaining is clamped at zero; overspend shows up only through a
/// percentage above 100. Callers wanting the signed overage compute
/// `amount - spent` themselves.
pub fn evaluate(conn: &Connection, budget: &Budget) -> Result<BudgetStatus> {
    let range = DateRange::new(budget.start_date, budget.end_date)?;
    let filter = TxFilter::for_user(budget.user_id)
        .kind(TxKind::Expense)
        .category(budget.category_id)
        .range(range);
    let spent_amount = store::sum_amount(conn, &filter)?;

    let remaining_amount = money((budget.amount - spent_amount).max(Decimal::ZERO));
    let percentage_used = if budget.amount.is_zero() {
        money(Decimal::ZERO)
    } else {
        money(spent_amount / budget.amount * Decimal::from(100))
    };

    Ok(BudgetStatus {
        spent_amount,
        remaining_amount,
        percentage_used,
    })
}

/// Record a new budget. The window must be strictly ordered; one budget per
/// `(user, category, window)`.
pub fn create(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
    amount: Decimal,
    period: Period,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
) -> Result<Budget> {
    if end_date <= start_date {
        return Err(LedgerError::validation(
            "end_date",
            format!("{} must be after start_date {}", end_date, start_date),
        ));
    }
    conn.execute(
        "INSERT INTO budgets(user_id, category_id, amount, period, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            category_id,
            amount.to_string(),
            period.as_str(),
            start_date.to_string(),
            end_date.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    Ok(Budget {
        id,
        user_id,
        category_id,
        amount,
        period,
        start_date,
        end_date,
    })
}

/// Fetch a budget by id, scoped to the owner. A budget belonging to another
/// user resolves the same as a missing one.
pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Budget> {
    conn.query_row(
        "SELECT id, user_id, category_id, amount, period, start_date, end_date
         FROM budgets WHERE id=?1 AND user_id=?2",
        params![id, user_id],
        budget_from_row,
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found(format!("Budget {}", id)))
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, category_id, amount, period, start_date, end_date
         FROM budgets WHERE user_id=?1 ORDER BY start_date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], budget_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn budget_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    let amount_s: String = r.get(3)?;
    let period_s: String = r.get(4)?;
    let amount = Decimal::from_str(&amount_s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let period = Period::from_str(&period_s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Budget {
        id: r.get(0)?,
        user_id: r.get(1)?,
        category_id: r.get(2)?,
        amount,
        period,
        start_date: r.get(5)?,
        end_date: r.get(6)?,
    })
}
