use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown transaction type '{0}'")]
pub struct UnknownKind(String);

impl TryFrom<String> for TransactionKind {
    type Error = UnknownKind;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(UnknownKind(s)),
        }
    }
}

/// Transaction row. `amount` is always > 0; the kind carries the sign.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime, // business time
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime, // record time
}

/// Validated input for a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub occurred_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategorySum {
    pub kind: String,
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct DailySum {
    pub day: Date,
    pub income: Decimal,
    pub expense: Decimal,
}
