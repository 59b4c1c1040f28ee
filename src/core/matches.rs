use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::RelationError;
use crate::core::pair::CanonicalPair;
use crate::models::Match;
use crate::store::RelationshipStore;

/// Result of a canonical create-or-get
#[derive(Debug, Clone)]
pub struct MatchCreation {
    pub record: Match,
    pub created: bool,
}

/// Creates symmetric match records keyed by canonical pair and tears them
/// down again on unmatch.
pub struct MatchEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for MatchEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RelationshipStore> MatchEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create-or-get the match for two users.
    ///
    /// The pair is canonicalized before the insert, so concurrent callers in
    /// either argument order land on the same row; the store's uniqueness
    /// constraint settles the race.
    pub async fn canonical_create(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<MatchCreation, RelationError> {
        if user_a == user_b {
            return Err(RelationError::SelfTarget);
        }
        let pair = CanonicalPair::new(user_a, user_b);
        let (record, created) = self.store.insert_match(&pair).await?;
        if created {
            tracing::info!("Match created for pair {}", pair);
        }
        Ok(MatchCreation { record, created })
    }

    /// Dissolve a match `actor` is a member of.
    ///
    /// Atomically removes both like directions, the match, and its messages,
    /// so the pair starts from a clean slate.
    pub async fn unmatch(&self, actor: &str, match_id: Uuid) -> Result<(), RelationError> {
        let record = self
            .store
            .match_by_id(match_id)
            .await?
            .ok_or_else(|| RelationError::NotFound(format!("Match {}", match_id)))?;
        if !record.has_member(actor) {
            return Err(RelationError::Forbidden);
        }
        self.store.purge_pair(&record.pair()).await?;
        tracing::info!("Match {} dissolved by {}", match_id, actor);
        Ok(())
    }

    /// Matches `user` is a member of, most recent first.
    pub async fn list_for_user(&self, user: &str) -> Result<Vec<Match>, RelationError> {
        Ok(self.store.matches_for(user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn engine() -> (Arc<MemoryStore>, MatchEngine<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let engine = MatchEngine::new(Arc::clone(&store));
        (store, engine)
    }

    #[tokio::test]
    async fn test_canonical_create_collides_across_orders() {
        let (_, engine) = engine();
        let first = engine.canonical_create("bob", "alice").await.unwrap();
        assert!(first.created);
        assert_eq!(first.record.user_low, "alice");

        let second = engine.canonical_create("alice", "bob").await.unwrap();
        assert!(!second.created);
        assert_eq!(first.record.id, second.record.id);
    }

    #[tokio::test]
    async fn test_canonical_create_rejects_self_pair() {
        let (_, engine) = engine();
        let err = engine.canonical_create("alice", "alice").await.unwrap_err();
        assert!(matches!(err, RelationError::SelfTarget));
    }

    #[tokio::test]
    async fn test_unmatch_purges_likes_and_messages() {
        let (store, engine) = engine();
        store.insert_like("alice", "bob").await.unwrap();
        store.insert_like("bob", "alice").await.unwrap();
        let creation = engine.canonical_create("alice", "bob").await.unwrap();
        store
            .insert_message(creation.record.id, "alice", "hi")
            .await
            .unwrap();

        engine.unmatch("bob", creation.record.id).await.unwrap();

        assert!(store
            .match_by_id(creation.record.id)
            .await
            .unwrap()
            .is_none());
        assert!(store.like_between("alice", "bob").await.unwrap().is_none());
        assert!(store.like_between("bob", "alice").await.unwrap().is_none());
        assert!(store
            .messages_in_match(creation.record.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unmatch_requires_membership() {
        let (_, engine) = engine();
        let creation = engine.canonical_create("alice", "bob").await.unwrap();
        let err = engine.unmatch("carol", creation.record.id).await.unwrap_err();
        assert!(matches!(err, RelationError::Forbidden));
    }

    #[tokio::test]
    async fn test_unmatch_missing_match() {
        let (_, engine) = engine();
        let err = engine.unmatch("alice", Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RelationError::NotFound(_)));
    }
}
