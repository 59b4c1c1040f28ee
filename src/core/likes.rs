use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::RelationError;
use crate::core::matches::MatchEngine;
use crate::core::pair::CanonicalPair;
use crate::models::{Like, Match};
use crate::store::{IdentityDirectory, RelationshipStore};

/// Result of a send-like action
#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub like: Like,
    pub created: bool,
    pub mutual: bool,
    pub match_id: Option<Uuid>,
}

/// Result of accepting a pending like
#[derive(Debug, Clone)]
pub struct AcceptOutcome {
    pub record: Match,
    pub already_matched: bool,
}

/// A like annotated with its current mutuality, for listings
#[derive(Debug, Clone)]
pub struct LikeView {
    pub like: Like,
    pub mutual: bool,
}

/// Creates and removes directional like edges, detects mutuality, and hands
/// mutual pairs to the match engine.
pub struct LikeEngine<S> {
    store: Arc<S>,
    matches: MatchEngine<S>,
}

impl<S> Clone for LikeEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            matches: self.matches.clone(),
        }
    }
}

impl<S: RelationshipStore + IdentityDirectory> LikeEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            matches: MatchEngine::new(Arc::clone(&store)),
            store,
        }
    }

    /// Send a like from `actor` to `target`.
    ///
    /// Re-liking is an idempotent no-op reporting the current mutuality. A
    /// block between the pair, in either direction, rejects the action before
    /// anything is written.
    pub async fn send_like(&self, actor: &str, target: &str) -> Result<LikeOutcome, RelationError> {
        if actor == target {
            return Err(RelationError::SelfTarget);
        }
        if !self.store.user_exists(target).await? {
            return Err(RelationError::NotFound(format!("User {}", target)));
        }
        if self.store.block_exists_between(actor, target).await? {
            tracing::debug!("Like {} -> {} rejected: pair is blocked", actor, target);
            return Err(RelationError::Blocked);
        }

        let pair = CanonicalPair::new(actor, target);
        let (like, created) = self.store.insert_like(actor, target).await?;

        if !created {
            let mutual = self.store.like_between(target, actor).await?.is_some();
            let match_id = if mutual {
                self.store.match_between(&pair).await?.map(|m| m.id)
            } else {
                None
            };
            return Ok(LikeOutcome {
                like,
                created: false,
                mutual,
                match_id,
            });
        }

        tracing::debug!("Like created: {} -> {}", actor, target);

        // Reverse edge present means the pair is now mutual
        if self.store.like_between(target, actor).await?.is_some() {
            let creation = self.matches.canonical_create(actor, target).await?;
            return Ok(LikeOutcome {
                like,
                created: true,
                mutual: true,
                match_id: Some(creation.record.id),
            });
        }

        Ok(LikeOutcome {
            like,
            created: true,
            mutual: false,
            match_id: None,
        })
    }

    /// Accept a like received by `actor`, promoting the pair to a match.
    ///
    /// Synthesizes the reverse like edge if needed; an already-matched pair
    /// is reported idempotently.
    pub async fn accept_like(
        &self,
        actor: &str,
        like_id: Uuid,
    ) -> Result<AcceptOutcome, RelationError> {
        let like = self
            .store
            .like_by_id(like_id)
            .await?
            .ok_or_else(|| RelationError::NotFound(format!("Like {}", like_id)))?;
        if like.to_user != actor {
            return Err(RelationError::Forbidden);
        }

        let pair = CanonicalPair::new(&like.from_user, &like.to_user);
        if let Some(existing) = self.store.match_between(&pair).await? {
            return Ok(AcceptOutcome {
                record: existing,
                already_matched: true,
            });
        }

        self.store.insert_like(actor, &like.from_user).await?;
        let creation = self
            .matches
            .canonical_create(&like.from_user, &like.to_user)
            .await?;
        Ok(AcceptOutcome {
            record: creation.record,
            already_matched: !creation.created,
        })
    }

    /// Reject a like received by `actor`.
    ///
    /// Deletes the edge only; an existing match is untouched. Rejecting is
    /// only meaningful for un-reciprocated likes.
    pub async fn reject_like(&self, actor: &str, like_id: Uuid) -> Result<(), RelationError> {
        let like = self
            .store
            .like_by_id(like_id)
            .await?
            .ok_or_else(|| RelationError::NotFound(format!("Like {}", like_id)))?;
        if like.to_user != actor {
            return Err(RelationError::Forbidden);
        }
        self.store.delete_like(like_id).await?;
        tracing::debug!("Like {} -> {} rejected by target", like.from_user, actor);
        Ok(())
    }

    /// Likes sent by `user`, most recent first, with mutuality annotations.
    pub async fn list_sent(&self, user: &str) -> Result<Vec<LikeView>, RelationError> {
        let likes = self.store.likes_sent(user).await?;
        self.annotate(likes).await
    }

    /// Likes received by `user`, most recent first, with mutuality annotations.
    pub async fn list_received(&self, user: &str) -> Result<Vec<LikeView>, RelationError> {
        let likes = self.store.likes_received(user).await?;
        self.annotate(likes).await
    }

    async fn annotate(&self, likes: Vec<Like>) -> Result<Vec<LikeView>, RelationError> {
        let mut views = Vec::with_capacity(likes.len());
        for like in likes {
            let mutual = self
                .store
                .like_between(&like.to_user, &like.from_user)
                .await?
                .is_some();
            views.push(LikeView { like, mutual });
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn engine() -> (Arc<MemoryStore>, LikeEngine<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        for user in ["alice", "bob", "carol"] {
            store.register_user(user).unwrap();
        }
        let engine = LikeEngine::new(Arc::clone(&store));
        (store, engine)
    }

    #[tokio::test]
    async fn test_send_like_no_match_yet() {
        let (_, engine) = engine();
        let outcome = engine.send_like("alice", "bob").await.unwrap();
        assert!(outcome.created);
        assert!(!outcome.mutual);
        assert!(outcome.match_id.is_none());
    }

    #[tokio::test]
    async fn test_send_like_self_target() {
        let (_, engine) = engine();
        let err = engine.send_like("alice", "alice").await.unwrap_err();
        assert!(matches!(err, RelationError::SelfTarget));
    }

    #[tokio::test]
    async fn test_send_like_unknown_target() {
        let (_, engine) = engine();
        let err = engine.send_like("alice", "nobody").await.unwrap_err();
        assert!(matches!(err, RelationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_send_like_blocked_pair() {
        let (store, engine) = engine();
        store.insert_block("bob", "alice", "").await.unwrap();
        let err = engine.send_like("alice", "bob").await.unwrap_err();
        assert!(matches!(err, RelationError::Blocked));
    }

    #[tokio::test]
    async fn test_send_like_idempotent_repeat() {
        let (_, engine) = engine();
        let first = engine.send_like("alice", "bob").await.unwrap();
        let second = engine.send_like("alice", "bob").await.unwrap();
        assert!(!second.created);
        assert_eq!(first.like.id, second.like.id);
    }

    #[tokio::test]
    async fn test_mutual_like_creates_match() {
        let (store, engine) = engine();
        engine.send_like("alice", "bob").await.unwrap();
        let outcome = engine.send_like("bob", "alice").await.unwrap();
        assert!(outcome.mutual);

        let matches = store.matches_for("alice").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].user_low, "alice");
        assert_eq!(matches[0].user_high, "bob");
        assert_eq!(outcome.match_id, Some(matches[0].id));
    }

    #[tokio::test]
    async fn test_accept_like_promotes_to_match() {
        let (store, engine) = engine();
        engine.send_like("alice", "bob").await.unwrap();
        let pending = store.like_between("alice", "bob").await.unwrap().unwrap();

        let outcome = engine.accept_like("bob", pending.id).await.unwrap();
        assert!(!outcome.already_matched);
        assert!(outcome.record.has_member("alice"));
        // Reverse edge was synthesized
        assert!(store.like_between("bob", "alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_accept_like_wrong_actor() {
        let (store, engine) = engine();
        engine.send_like("alice", "bob").await.unwrap();
        let pending = store.like_between("alice", "bob").await.unwrap().unwrap();

        let err = engine.accept_like("carol", pending.id).await.unwrap_err();
        assert!(matches!(err, RelationError::Forbidden));
    }

    #[tokio::test]
    async fn test_accept_like_already_matched() {
        let (store, engine) = engine();
        engine.send_like("alice", "bob").await.unwrap();
        engine.send_like("bob", "alice").await.unwrap();
        let like = store.like_between("alice", "bob").await.unwrap().unwrap();

        let outcome = engine.accept_like("bob", like.id).await.unwrap();
        assert!(outcome.already_matched);
    }

    #[tokio::test]
    async fn test_reject_like_removes_edge_only() {
        let (store, engine) = engine();
        engine.send_like("alice", "bob").await.unwrap();
        let pending = store.like_between("alice", "bob").await.unwrap().unwrap();

        engine.reject_like("bob", pending.id).await.unwrap();
        assert!(store.like_between("alice", "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listings_annotate_mutuality() {
        let (_, engine) = engine();
        engine.send_like("alice", "bob").await.unwrap();
        engine.send_like("bob", "alice").await.unwrap();
        engine.send_like("alice", "carol").await.unwrap();

        let sent = engine.list_sent("alice").await.unwrap();
        assert_eq!(sent.len(), 2);
        // Most recent first: carol, then bob
        assert_eq!(sent[0].like.to_user, "carol");
        assert!(!sent[0].mutual);
        assert_eq!(sent[1].like.to_user, "bob");
        assert!(sent[1].mutual);

        let received = engine.list_received("carol").await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].like.from_user, "alice");
    }
}
