use serde_json::json;
use tracing::info;

use super::repo_types::{NewTransaction, Transaction};
use crate::{
    auth::claims::Identity,
    error::AppError,
    notify::client::{NotificationEvent, Notifier},
};

pub const TRANSACTION_CREATED: &str = "finance.transaction_created";

/// Persists the transaction, then hands a notification to the sink.
/// The write is already committed when the notifier runs, so delivery
/// problems never reach the caller.
pub async fn record_transaction(
    db: &sqlx::PgPool,
    notifier: &Notifier,
    identity: &Identity,
    new: NewTransaction,
) -> Result<Transaction, AppError> {
    let tx = Transaction::insert(db, identity.user_id, &new).await?;
    info!(transaction_id = %tx.id, kind = tx.kind.as_str(), "transaction recorded");

    notifier.notify(created_event(&tx));
    Ok(tx)
}

fn created_event(tx: &Transaction) -> NotificationEvent {
    NotificationEvent {
        user_id: Some(tx.user_id),
        event_type: TRANSACTION_CREATED.into(),
        message: format!("New {} transaction of {} ({})", tx.kind.as_str(), tx.amount, tx.category),
        payload: Some(json!({
            "transaction_id": tx.id,
            "type": tx.kind,
            "amount": tx.amount,
            "category": tx.category,
        })),
    }
}
