use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::core::pair::CanonicalPair;
use crate::models::{Block, Like, Match, Message};
use crate::store::{IdentityDirectory, RelationshipStore, StoreError};

/// In-memory relationship store.
///
/// All tables live behind one mutex, so every store operation (including the
/// cross-entity purges) runs as a single critical section. This is the
/// backend for tests and benchmarks; the service binary runs on
/// [`PostgresStore`](crate::store::PostgresStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashSet<String>,
    likes: Vec<Like>,
    matches: Vec<Match>,
    blocks: Vec<Block>,
    messages: Vec<Message>,
    next_seq: i64,
}

impl Inner {
    fn purge_pair(&mut self, pair: &CanonicalPair) {
        let purged: Vec<Uuid> = self
            .matches
            .iter()
            .filter(|m| m.pair() == *pair)
            .map(|m| m.id)
            .collect();
        self.messages.retain(|msg| !purged.contains(&msg.match_id));
        self.matches.retain(|m| m.pair() != *pair);
        self.likes
            .retain(|l| !(pair.contains(&l.from_user) && pair.contains(&l.to_user)));
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user id so the directory recognizes it.
    pub fn register_user(&self, user: &str) -> Result<(), StoreError> {
        self.lock()?.users.insert(user.to_string());
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl IdentityDirectory for MemoryStore {
    async fn user_exists(&self, user: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.users.contains(user))
    }
}

impl RelationshipStore for MemoryStore {
    async fn insert_like(
        &self,
        from_user: &str,
        to_user: &str,
    ) -> Result<(Like, bool), StoreError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner
            .likes
            .iter()
            .find(|l| l.from_user == from_user && l.to_user == to_user)
        {
            return Ok((existing.clone(), false));
        }
        let like = Like {
            id: Uuid::new_v4(),
            from_user: from_user.to_string(),
            to_user: to_user.to_string(),
            created_at: Utc::now(),
        };
        inner.likes.push(like.clone());
        Ok((like, true))
    }

    async fn like_by_id(&self, id: Uuid) -> Result<Option<Like>, StoreError> {
        Ok(self.lock()?.likes.iter().find(|l| l.id == id).cloned())
    }

    async fn like_between(
        &self,
        from_user: &str,
        to_user: &str,
    ) -> Result<Option<Like>, StoreError> {
        Ok(self
            .lock()?
            .likes
            .iter()
            .find(|l| l.from_user == from_user && l.to_user == to_user)
            .cloned())
    }

    async fn delete_like(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let before = inner.likes.len();
        inner.likes.retain(|l| l.id != id);
        Ok(inner.likes.len() < before)
    }

    async fn likes_sent(&self, user: &str) -> Result<Vec<Like>, StoreError> {
        Ok(self
            .lock()?
            .likes
            .iter()
            .rev()
            .filter(|l| l.from_user == user)
            .cloned()
            .collect())
    }

    async fn likes_received(&self, user: &str) -> Result<Vec<Like>, StoreError> {
        Ok(self
            .lock()?
            .likes
            .iter()
            .rev()
            .filter(|l| l.to_user == user)
            .cloned()
            .collect())
    }

    async fn insert_match(&self, pair: &CanonicalPair) -> Result<(Match, bool), StoreError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner.matches.iter().find(|m| m.pair() == *pair) {
            return Ok((existing.clone(), false));
        }
        let record = Match {
            id: Uuid::new_v4(),
            user_low: pair.low().to_string(),
            user_high: pair.high().to_string(),
            created_at: Utc::now(),
        };
        inner.matches.push(record.clone());
        Ok((record, true))
    }

    async fn match_by_id(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(self.lock()?.matches.iter().find(|m| m.id == id).cloned())
    }

    async fn match_between(&self, pair: &CanonicalPair) -> Result<Option<Match>, StoreError> {
        Ok(self
            .lock()?
            .matches
            .iter()
            .find(|m| m.pair() == *pair)
            .cloned())
    }

    async fn matches_for(&self, user: &str) -> Result<Vec<Match>, StoreError> {
        Ok(self
            .lock()?
            .matches
            .iter()
            .rev()
            .filter(|m| m.has_member(user))
            .cloned()
            .collect())
    }

    async fn purge_pair(&self, pair: &CanonicalPair) -> Result<(), StoreError> {
        self.lock()?.purge_pair(pair);
        Ok(())
    }

    async fn insert_block(
        &self,
        blocker: &str,
        blocked: &str,
        reason: &str,
    ) -> Result<(Block, bool), StoreError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner
            .blocks
            .iter()
            .find(|b| b.blocker == blocker && b.blocked == blocked)
        {
            return Ok((existing.clone(), false));
        }
        let block = Block {
            id: Uuid::new_v4(),
            blocker: blocker.to_string(),
            blocked: blocked.to_string(),
            reason: reason.to_string(),
            created_at: Utc::now(),
        };
        inner.blocks.push(block.clone());
        // Purge under the same lock as the insert
        inner.purge_pair(&CanonicalPair::new(blocker, blocked));
        Ok((block, true))
    }

    async fn block_by_id(&self, id: Uuid) -> Result<Option<Block>, StoreError> {
        Ok(self.lock()?.blocks.iter().find(|b| b.id == id).cloned())
    }

    async fn block_exists_between(&self, a: &str, b: &str) -> Result<bool, StoreError> {
        Ok(self
            .lock()?
            .blocks
            .iter()
            .any(|blk| {
                (blk.blocker == a && blk.blocked == b) || (blk.blocker == b && blk.blocked == a)
            }))
    }

    async fn delete_block(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let before = inner.blocks.len();
        inner.blocks.retain(|b| b.id != id);
        Ok(inner.blocks.len() < before)
    }

    async fn blocks_by(&self, user: &str) -> Result<Vec<Block>, StoreError> {
        Ok(self
            .lock()?
            .blocks
            .iter()
            .rev()
            .filter(|b| b.blocker == user)
            .cloned()
            .collect())
    }

    async fn insert_message(
        &self,
        match_id: Uuid,
        sender: &str,
        content: &str,
    ) -> Result<Message, StoreError> {
        let mut inner = self.lock()?;
        if !inner.matches.iter().any(|m| m.id == match_id) {
            return Err(StoreError::MissingParent("match"));
        }
        inner.next_seq += 1;
        let message = Message {
            id: Uuid::new_v4(),
            match_id,
            sender: sender.to_string(),
            content: content.to_string(),
            is_read: false,
            seq: inner.next_seq,
            created_at: Utc::now(),
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn message_by_id(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        Ok(self.lock()?.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn mark_message_read(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        let mut inner = self.lock()?;
        match inner.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.is_read = true;
                Ok(Some(message.clone()))
            }
            None => Ok(None),
        }
    }

    async fn messages_in_match(&self, match_id: Uuid) -> Result<Vec<Message>, StoreError> {
        let mut messages: Vec<Message> = self
            .lock()?
            .messages
            .iter()
            .filter(|m| m.match_id == match_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_like_is_create_or_get() {
        let store = MemoryStore::new();
        let (first, created) = store.insert_like("alice", "bob").await.unwrap();
        assert!(created);

        let (second, created) = store.insert_like("alice", "bob").await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_insert_block_purges_pair() {
        let store = MemoryStore::new();
        store.insert_like("alice", "bob").await.unwrap();
        store.insert_like("bob", "alice").await.unwrap();
        let pair = CanonicalPair::new("alice", "bob");
        let (record, _) = store.insert_match(&pair).await.unwrap();
        store.insert_message(record.id, "alice", "hi").await.unwrap();

        store.insert_block("alice", "bob", "").await.unwrap();

        assert!(store.match_between(&pair).await.unwrap().is_none());
        assert!(store.like_between("alice", "bob").await.unwrap().is_none());
        assert!(store.like_between("bob", "alice").await.unwrap().is_none());
        assert!(store
            .messages_in_match(record.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_message_sequence_is_monotonic() {
        let store = MemoryStore::new();
        let pair = CanonicalPair::new("alice", "bob");
        let (record, _) = store.insert_match(&pair).await.unwrap();

        let first = store.insert_message(record.id, "alice", "one").await.unwrap();
        let second = store.insert_message(record.id, "bob", "two").await.unwrap();
        assert!(second.seq > first.seq);

        let log = store.messages_in_match(record.id).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].content, "one");
        assert_eq!(log[1].content, "two");
    }

    #[tokio::test]
    async fn test_insert_message_requires_match() {
        let store = MemoryStore::new();
        let err = store
            .insert_message(Uuid::new_v4(), "alice", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingParent("match")));
    }
}
