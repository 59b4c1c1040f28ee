use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::RelationError;
use crate::models::{Match, Message};
use crate::store::RelationshipStore;

/// Append-only ordered message log scoped to an existing match.
pub struct MessageChannel<S> {
    store: Arc<S>,
}

impl<S> Clone for MessageChannel<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RelationshipStore> MessageChannel<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Append a message from `actor` to the match's log.
    pub async fn send(
        &self,
        actor: &str,
        match_id: Uuid,
        content: &str,
    ) -> Result<Message, RelationError> {
        self.member_match(actor, match_id).await?;
        let message = self.store.insert_message(match_id, actor, content).await?;
        tracing::debug!("Message {} appended to match {}", message.id, match_id);
        Ok(message)
    }

    /// Mark a message read on behalf of `actor`.
    ///
    /// Only the non-sender member may do this; the flag never reverts, and
    /// repeated calls are no-ops.
    pub async fn mark_read(&self, actor: &str, message_id: Uuid) -> Result<Message, RelationError> {
        let message = self
            .store
            .message_by_id(message_id)
            .await?
            .ok_or_else(|| RelationError::NotFound(format!("Message {}", message_id)))?;
        if message.sender == actor {
            return Err(RelationError::SelfRead);
        }
        self.member_match(actor, message.match_id).await?;

        self.store
            .mark_message_read(message_id)
            .await?
            .ok_or_else(|| RelationError::NotFound(format!("Message {}", message_id)))
    }

    /// The match's messages in send order, oldest first.
    pub async fn history(&self, actor: &str, match_id: Uuid) -> Result<Vec<Message>, RelationError> {
        self.member_match(actor, match_id).await?;
        Ok(self.store.messages_in_match(match_id).await?)
    }

    async fn member_match(&self, actor: &str, match_id: Uuid) -> Result<Match, RelationError> {
        let record = self
            .store
            .match_by_id(match_id)
            .await?
            .ok_or_else(|| RelationError::NotFound(format!("Match {}", match_id)))?;
        if !record.has_member(actor) {
            return Err(RelationError::Forbidden);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pair::CanonicalPair;
    use crate::store::MemoryStore;

    async fn matched_channel() -> (Arc<MemoryStore>, MessageChannel<MemoryStore>, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let pair = CanonicalPair::new("alice", "bob");
        let (record, _) = store.insert_match(&pair).await.unwrap();
        let channel = MessageChannel::new(Arc::clone(&store));
        (store, channel, record.id)
    }

    #[tokio::test]
    async fn test_send_and_history_ordering() {
        let (_, channel, match_id) = matched_channel().await;
        channel.send("alice", match_id, "hi").await.unwrap();
        channel.send("bob", match_id, "hey").await.unwrap();
        channel.send("alice", match_id, "how are you?").await.unwrap();

        let history = channel.history("bob", match_id).await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hey", "how are you?"]);
        assert!(history.iter().all(|m| !m.is_read));
    }

    #[tokio::test]
    async fn test_send_requires_membership() {
        let (_, channel, match_id) = matched_channel().await;
        let err = channel.send("carol", match_id, "hi").await.unwrap_err();
        assert!(matches!(err, RelationError::Forbidden));
    }

    #[tokio::test]
    async fn test_send_missing_match() {
        let (_, channel, _) = matched_channel().await;
        let err = channel.send("alice", Uuid::new_v4(), "hi").await.unwrap_err();
        assert!(matches!(err, RelationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_read_by_sender_rejected() {
        let (_, channel, match_id) = matched_channel().await;
        let message = channel.send("alice", match_id, "hi").await.unwrap();
        let err = channel.mark_read("alice", message.id).await.unwrap_err();
        assert!(matches!(err, RelationError::SelfRead));
    }

    #[tokio::test]
    async fn test_mark_read_idempotent_for_recipient() {
        let (_, channel, match_id) = matched_channel().await;
        let message = channel.send("alice", match_id, "hi").await.unwrap();

        let first = channel.mark_read("bob", message.id).await.unwrap();
        assert!(first.is_read);
        let second = channel.mark_read("bob", message.id).await.unwrap();
        assert!(second.is_read);
    }

    #[tokio::test]
    async fn test_mark_read_by_outsider_rejected() {
        let (_, channel, match_id) = matched_channel().await;
        let message = channel.send("alice", match_id, "hi").await.unwrap();
        let err = channel.mark_read("carol", message.id).await.unwrap_err();
        assert!(matches!(err, RelationError::Forbidden));
    }
}
