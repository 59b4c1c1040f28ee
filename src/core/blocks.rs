use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::RelationError;
use crate::models::Block;
use crate::store::{IdentityDirectory, RelationshipStore};

/// Result of a block action
#[derive(Debug, Clone)]
pub struct BlockOutcome {
    pub block: Block,
    pub created: bool,
}

/// Creates block edges and enforces that a new block purges any like or
/// match between the two parties.
pub struct BlockEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for BlockEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RelationshipStore + IdentityDirectory> BlockEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Block `target` on behalf of `actor`.
    ///
    /// Idempotent on repeat. On actual creation the store purges the pair's
    /// match (messages included) and both like directions in the same
    /// transaction as the insert.
    pub async fn block(
        &self,
        actor: &str,
        target: &str,
        reason: &str,
    ) -> Result<BlockOutcome, RelationError> {
        if actor == target {
            return Err(RelationError::SelfTarget);
        }
        if !self.store.user_exists(target).await? {
            return Err(RelationError::NotFound(format!("User {}", target)));
        }

        let (block, created) = self.store.insert_block(actor, target, reason).await?;
        if created {
            tracing::info!("User {} blocked {}", actor, target);
        }
        Ok(BlockOutcome { block, created })
    }

    /// Remove a block `actor` created.
    ///
    /// Deletes the edge only; likes and matches purged when the block was
    /// created are not restored.
    pub async fn unblock(&self, actor: &str, block_id: Uuid) -> Result<(), RelationError> {
        let block = self
            .store
            .block_by_id(block_id)
            .await?
            .ok_or_else(|| RelationError::NotFound(format!("Block {}", block_id)))?;
        if block.blocker != actor {
            return Err(RelationError::Forbidden);
        }
        self.store.delete_block(block_id).await?;
        tracing::info!("User {} unblocked {}", actor, block.blocked);
        Ok(())
    }

    /// Blocks created by `user`, most recent first.
    pub async fn list_blocked(&self, user: &str) -> Result<Vec<Block>, RelationError> {
        Ok(self.store.blocks_by(user).await?)
    }
}
