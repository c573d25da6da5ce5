use chrono::Local;

use super::ApiClient;
use crate::domain::{Id, Message};

impl ApiClient {
    /// Messages held by this client, newest last
    pub async fn messages(&self) -> Vec<Message> {
        self.inbox.lock().await.clone()
    }

    /// Appends an outgoing message from the signed-in user
    pub async fn send_message(&self, text: &str) -> Message {
        let from = self
            .session()
            .user()
            .await
            .map(|u| u.full_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Me".to_string());

        let mut inbox = self.inbox.lock().await;
        let message = Message {
            id: inbox.len() as Id + 1,
            from,
            text: text.to_string(),
            time: Local::now().format("%I:%M %p").to_string(),
            unread: false,
        };
        inbox.push(message.clone());
        tracing::debug!(id = message.id, "Message queued");
        message
    }
}
