use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Who a notification is addressed to. Resolution of "administrators" to
/// concrete users happens on the delivery side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Administrators,
    User(Uuid),
}

/// Delivery channel boundary. The real channel (e-mail, in-app inbox, chat
/// webhook) is owned by the surrounding platform; the core only raises
/// notifications against this trait.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, recipient: &Recipient, title: &str, body: &str) -> Result<(), String>;
}

/// Sink used when no external channel is wired up: notifications land in the
/// structured log.
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn deliver(&self, recipient: &Recipient, title: &str, body: &str) -> Result<(), String> {
        info!(?recipient, title, body, "notification");
        Ok(())
    }
}

/// Service for raising user-facing notifications
#[derive(Clone)]
pub struct NotificationService {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Log-only service for development and tests
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    pub async fn notify(
        &self,
        recipient: Recipient,
        title: &str,
        body: &str,
    ) -> Result<(), String> {
        self.sink.deliver(&recipient, title, body).await
    }
}
