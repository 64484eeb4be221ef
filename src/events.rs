use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::services::notifications::{NotificationService, Recipient};

/// Domain events raised by the core after a transaction commits. Consumers
/// (the notification loop today) must tolerate losing events on crash; the
/// database state is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    RequestSubmitted {
        request_id: Uuid,
        request_number: String,
        supplier_id: Uuid,
    },
    RequestApproved {
        request_id: Uuid,
        request_number: String,
        requester_id: Uuid,
    },
    RequestRejected {
        request_id: Uuid,
        request_number: String,
        requester_id: Uuid,
        reason: String,
    },
    RequestReceived {
        request_id: Uuid,
        request_number: String,
        requester_id: Uuid,
        lot_id: Uuid,
        lot_number: String,
    },
    RequestDeleted(Uuid),
    LotMoved {
        lot_id: Uuid,
        lot_number: String,
        origin: String,
        destination: String,
        performed_by: Uuid,
    },
    LotStatusChanged {
        lot_id: Uuid,
        old_status: String,
        new_status: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Processes incoming events and turns lifecycle transitions into
/// notifications. Delivery is fire-and-forget: a failed notification is
/// logged and dropped, never propagated back to the transaction that raised
/// the event.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, notifier: Arc<NotificationService>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        info!("Received event: {:?}", event);

        let outcome = match &event {
            Event::RequestSubmitted {
                request_number,
                supplier_id,
                ..
            } => {
                notifier
                    .notify(
                        Recipient::Administrators,
                        "Purchase request awaiting approval",
                        &format!(
                            "Request {} from supplier {} is awaiting an approval decision",
                            request_number, supplier_id
                        ),
                    )
                    .await
            }
            Event::RequestApproved {
                request_number,
                requester_id,
                ..
            } => {
                notifier
                    .notify(
                        Recipient::User(*requester_id),
                        "Purchase request approved",
                        &format!("Your request {} was approved", request_number),
                    )
                    .await
            }
            Event::RequestRejected {
                request_number,
                requester_id,
                reason,
                ..
            } => {
                notifier
                    .notify(
                        Recipient::User(*requester_id),
                        "Purchase request rejected",
                        &format!("Your request {} was rejected: {}", request_number, reason),
                    )
                    .await
            }
            Event::RequestReceived {
                request_number,
                requester_id,
                lot_number,
                ..
            } => {
                notifier
                    .notify(
                        Recipient::User(*requester_id),
                        "Purchase request received",
                        &format!(
                            "Request {} was received into inventory as lot {}",
                            request_number, lot_number
                        ),
                    )
                    .await
            }
            // Movements and deletions are audited in the ledger/log only
            Event::RequestDeleted(_) | Event::LotMoved { .. } | Event::LotStatusChanged { .. } => {
                Ok(())
            }
        };

        if let Err(e) = outcome {
            error!("Failed to deliver notification for {:?}: {}", event, e);
        }
    }

    info!("Event processing loop stopped");
}
