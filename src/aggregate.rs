// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregation Engine: stateless computation over an already-filtered
//! transaction set.
//!
//! Monetary figures stay in [`Decimal`] end to end; only ratios and averages
//! go through floating point, and those are rounded before they surface.
//! Every zero denominator (no income, zero-day window) yields `0` by policy.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ReportType, Transaction, TxKind};
use crate::store::DateRange;
use crate::utils::{money, round1};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_transactions: u64,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub report_type: ReportType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialHealth {
    Positive,
    Negative,
}

impl FinancialHealth {
    pub fn as_str(self) -> &'static str {
        match self {
            FinancialHealth::Positive => "positive",
            FinancialHealth::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub spending_ratio: f64,
    pub avg_transactions_per_day: f64,
    pub days_in_period: i64,
    pub financial_health: FinancialHealth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdown {
    pub income: Vec<CategoryTotal>,
    pub expense: Vec<CategoryTotal>,
}

/// Sum and count one pass over the filtered set. Totals are `0.00` when a
/// kind has no transactions; `net = income - expenses` holds exactly.
pub fn summarize(
    transactions: &[Transaction],
    range: &DateRange,
    report_type: ReportType,
) -> Summary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    for tx in transactions {
        match tx.kind {
            TxKind::Income => total_income += tx.amount,
            TxKind::Expense => total_expenses += tx.amount,
        }
    }
    let total_income = money(total_income);
    let total_expenses = money(total_expenses);
    Summary {
        total_transactions: transactions.len() as u64,
        total_income,
        total_expenses,
        net_amount: total_income - total_expenses,
        start_date: range.start,
        end_date: range.end,
        report_type,
    }
}

/// Derived metrics over a summary. The caller has already rejected inverted
/// date ranges, so `days` is at least 1 here; the zero guard stays anyway
/// because the policy is "zero, not an error".
pub fn derive_insights(summary: &Summary, range: &DateRange) -> Insights {
    let days = range.days();

    let avg_transactions_per_day = if days > 0 {
        round1(summary.total_transactions as f64 / days as f64)
    } else {
        0.0
    };

    let spending_ratio = if summary.total_income > Decimal::ZERO {
        let ratio = summary.total_expenses / summary.total_income * Decimal::from(100);
        round1(ratio.to_f64().unwrap_or(0.0))
    } else {
        0.0
    };

    let financial_health = if summary.net_amount >= Decimal::ZERO {
        FinancialHealth::Positive
    } else {
        FinancialHealth::Negative
    };

    Insights {
        spending_ratio,
        avg_transactions_per_day,
        days_in_period: days,
        financial_health,
    }
}

/// Per-(kind, category) `{total, count}`, each kind sorted by total
/// descending. The union of both sides partitions the input set.
pub fn breakdown(transactions: &[Transaction]) -> Breakdown {
    let mut income: HashMap<String, (Decimal, u64)> = HashMap::new();
    let mut expense: HashMap<String, (Decimal, u64)> = HashMap::new();
    for tx in transactions {
        let key = tx
            .category
            .clone()
            .unwrap_or_else(|| "(uncategorized)".into());
        let side = match tx.kind {
            TxKind::Income => &mut income,
            TxKind::Expense => &mut expense,
        };
        let entry = side.entry(key).or_insert((Decimal::ZERO, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }
    Breakdown {
        income: sorted_totals(income),
        expense: sorted_totals(expense),
    }
}

fn sorted_totals(agg: HashMap<String, (Decimal, u64)>) -> Vec<CategoryTotal> {
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total: money(total),
            count,
        })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    items
}
