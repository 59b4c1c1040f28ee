// Storage backends for relationship state
pub mod memory;
pub mod postgres;

use thiserror::Error;
use uuid::Uuid;

use crate::core::pair::CanonicalPair;
use crate::models::{Block, Like, Match, Message};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors that can occur in a relationship store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Referenced {0} no longer exists")]
    MissingParent(&'static str),
}

/// Resolves opaque user identifiers to existence.
///
/// The surrounding account service owns users; the relationship core only
/// needs to know whether a target id is real before creating an edge to it.
#[allow(async_fn_in_trait)]
pub trait IdentityDirectory: Send + Sync {
    async fn user_exists(&self, user: &str) -> Result<bool, StoreError>;
}

/// Durable storage for Like, Match, Block, and Message records.
///
/// Every method is a single atomic store operation. The `insert_*` methods
/// are transactional create-or-get: a caller losing a race for the same
/// unique key observes the existing row and a `created = false` flag, never
/// a constraint error. Cross-entity teardown (`purge_pair`, the purge inside
/// `insert_block`) deletes children before parents inside one transaction.
#[allow(async_fn_in_trait)]
pub trait RelationshipStore: Send + Sync {
    // Likes

    /// Create-or-get the like edge `from_user -> to_user`.
    async fn insert_like(&self, from_user: &str, to_user: &str)
        -> Result<(Like, bool), StoreError>;

    async fn like_by_id(&self, id: Uuid) -> Result<Option<Like>, StoreError>;

    async fn like_between(
        &self,
        from_user: &str,
        to_user: &str,
    ) -> Result<Option<Like>, StoreError>;

    /// Delete a like edge by id; returns whether a row was removed.
    async fn delete_like(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Likes sent by `user`, most recent first.
    async fn likes_sent(&self, user: &str) -> Result<Vec<Like>, StoreError>;

    /// Likes received by `user`, most recent first.
    async fn likes_received(&self, user: &str) -> Result<Vec<Like>, StoreError>;

    // Matches

    /// Create-or-get the match for a canonical pair.
    async fn insert_match(&self, pair: &CanonicalPair) -> Result<(Match, bool), StoreError>;

    async fn match_by_id(&self, id: Uuid) -> Result<Option<Match>, StoreError>;

    async fn match_between(&self, pair: &CanonicalPair) -> Result<Option<Match>, StoreError>;

    /// Matches `user` is a member of, most recent first.
    async fn matches_for(&self, user: &str) -> Result<Vec<Match>, StoreError>;

    /// Tear down everything between a pair in one transaction: messages of
    /// their match, the match itself, and both like directions.
    async fn purge_pair(&self, pair: &CanonicalPair) -> Result<(), StoreError>;

    // Blocks

    /// Create-or-get the block edge `blocker -> blocked`.
    ///
    /// When the row is actually created, the match and likes between the pair
    /// are purged inside the same transaction as the insert; an existing
    /// block leaves the store untouched.
    async fn insert_block(
        &self,
        blocker: &str,
        blocked: &str,
        reason: &str,
    ) -> Result<(Block, bool), StoreError>;

    async fn block_by_id(&self, id: Uuid) -> Result<Option<Block>, StoreError>;

    /// Whether a block exists between two users in either direction.
    async fn block_exists_between(&self, a: &str, b: &str) -> Result<bool, StoreError>;

    /// Delete a block edge by id; returns whether a row was removed.
    async fn delete_block(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Blocks where `user` is the blocker, most recent first.
    async fn blocks_by(&self, user: &str) -> Result<Vec<Block>, StoreError>;

    // Messages

    /// Append a message to a match's log with a fresh sequence number.
    async fn insert_message(
        &self,
        match_id: Uuid,
        sender: &str,
        content: &str,
    ) -> Result<Message, StoreError>;

    async fn message_by_id(&self, id: Uuid) -> Result<Option<Message>, StoreError>;

    /// Set `is_read` on a message; a no-op when already read. Returns the
    /// updated row, or None when the message is gone.
    async fn mark_message_read(&self, id: Uuid) -> Result<Option<Message>, StoreError>;

    /// Messages of a match in (created_at, seq) ascending order.
    async fn messages_in_match(&self, match_id: Uuid) -> Result<Vec<Message>, StoreError>;
}
