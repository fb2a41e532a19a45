// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LedgerError;

/// Transaction direction. Closed enumeration checked at the boundary; a
/// transaction is exactly one of the two, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(LedgerError::validation(
                "type",
                format!("'{}' is not one of income, expense", other),
            )),
        }
    }
}

/// Report scope: everything, or narrowed to one transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    All,
    Income,
    Expense,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::All => "all",
            ReportType::Income => "income",
            ReportType::Expense => "expense",
        }
    }

    /// The kind filter this scope implies, if any.
    pub fn kind(self) -> Option<TxKind> {
        match self {
            ReportType::All => None,
            ReportType::Income => Some(TxKind::Income),
            ReportType::Expense => Some(TxKind::Expense),
        }
    }
}

impl FromStr for ReportType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ReportType::All),
            "income" => Ok(ReportType::Income),
            "expense" => Ok(ReportType::Expense),
            other => Err(LedgerError::validation(
                "type",
                format!("'{}' is not one of all, income, expense", other),
            )),
        }
    }
}

/// Budget period label. The evaluated window is always the budget's explicit
/// start/end dates; the period is descriptive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            other => Err(LedgerError::validation(
                "period",
                format!("'{}' is not one of weekly, monthly, yearly", other),
            )),
        }
    }
}

/// Recurrence of a report schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }
}

impl FromStr for Frequency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            other => Err(LedgerError::validation(
                "frequency",
                format!("'{}' is not one of daily, weekly, monthly, quarterly", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub kind: TxKind,
}

/// Immutable-once-recorded financial event. The amount is always positive;
/// direction lives in `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub merchant: String,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub kind: TxKind,
    pub notes: Option<String>,
}

/// A pledge that spend in one category within a date window stays under
/// `amount`. Spent/remaining/percentage figures are derived on every read,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub period: Period,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Persisted snapshot of one report run. Write-once: the stored figures are
/// not recomputed if transactions change afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub report_type: ReportType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_transactions: u64,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_amount: Decimal,
    pub spending_ratio: f64,
    pub avg_transactions_per_day: f64,
    pub created_at: String,
}

/// Recurring-generation directive. `run-due` saves a snapshot for every
/// active schedule whose `next_generation` has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSchedule {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub frequency: Frequency,
    pub report_type: ReportType,
    pub is_active: bool,
    pub last_generated: Option<NaiveDate>,
    pub next_generation: NaiveDate,
}
