use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use crate::entities::transaction::TransactionKind;

/// Events emitted by the settlement core after a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    TransactionSettled {
        kind: TransactionKind,
        transaction_id: i64,
        transaction_no: String,
        total_amount: Decimal,
    },
    TransactionDeleted {
        kind: TransactionKind,
        transaction_id: i64,
    },
    TransactionRecovered {
        kind: TransactionKind,
        transaction_id: i64,
    },
    OrderLinked {
        order_id: i64,
        sale_id: i64,
    },
    OrderUnlinked {
        order_id: i64,
        sale_id: i64,
    },
    AccountingPosted {
        voucher_id: i64,
        reference_id: i64,
        posted_at: DateTime<Utc>,
    },
}

/// Channel-backed event publisher shared by the services.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is gone.
    /// Settlement must not be failed by a lagging consumer.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!(error = %e, "failed to publish settlement event");
        }
    }
}

/// Convenience constructor returning the sender plus its receiving end.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}
