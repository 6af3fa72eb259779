use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{CategorySum, DailySum, NewTransaction, Transaction, TransactionKind};
use crate::error::AppError;

const DEFAULT_CATEGORY: &str = "general";
const MAX_AMOUNT: i64 = 10_000_000_000;

#[derive(Debug, Deserialize)]
pub struct TransactionCreate {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub occurred_at: Option<OffsetDateTime>,
}

impl TransactionCreate {
    pub fn validate(self) -> Result<NewTransaction, AppError> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation("amount must be greater than 0"));
        }
        if self.amount.normalize().scale() > 2 {
            return Err(AppError::validation("amount must have at most 2 decimal places"));
        }
        if self.amount >= Decimal::from(MAX_AMOUNT) {
            return Err(AppError::validation("amount is too large"));
        }

        let category = match self.category {
            None => DEFAULT_CATEGORY.to_string(),
            Some(c) => {
                let c = c.trim().to_string();
                if c.is_empty() || c.chars().count() > 64 {
                    return Err(AppError::validation(
                        "category must be between 1 and 64 characters",
                    ));
                }
                c
            }
        };

        Ok(NewTransaction {
            kind: self.kind,
            amount: self.amount,
            category,
            description: self.description,
            occurred_at: self.occurred_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl ListQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=100).contains(&self.limit) {
            return Err(AppError::validation("limit must be between 1 and 100"));
        }
        if self.offset < 0 {
            return Err(AppError::validation("offset must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionsList {
    pub items: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl Summary {
    pub fn new(total_income: Decimal, total_expense: Decimal) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CategoryStats {
    pub income: BTreeMap<String, Decimal>,
    pub expense: BTreeMap<String, Decimal>,
}

impl FromIterator<CategorySum> for CategoryStats {
    fn from_iter<I: IntoIterator<Item = CategorySum>>(rows: I) -> Self {
        let mut stats = CategoryStats::default();
        for row in rows {
            let bucket = match TransactionKind::try_from(row.kind) {
                Ok(TransactionKind::Income) => &mut stats.income,
                Ok(TransactionKind::Expense) => &mut stats.expense,
                Err(_) => continue,
            };
            *bucket.entry(row.category).or_default() += row.total;
        }
        stats
    }
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    30
}

impl DaysQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=365).contains(&self.days) {
            return Err(AppError::validation("days must be between 1 and 365"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DayStatsItem {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub income: Decimal,
    pub expense: Decimal,
}

impl From<DailySum> for DayStatsItem {
    fn from(row: DailySum) -> Self {
        Self {
            date: row.day.midnight().assume_utc(),
            income: row.income,
            expense: row.expense,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayStats {
    pub items: Vec<DayStatsItem>,
}
