use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::pair::CanonicalPair;

/// Directional like edge from one user to another
///
/// Unique per ordered (from_user, to_user) pair; a user cannot like
/// themselves. Deleted on reject, unmatch, or a block between the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub from_user: String,
    pub to_user: String,
    pub created_at: DateTime<Utc>,
}

/// Symmetric match between two users, stored in canonical order
///
/// `user_low < user_high` always holds, so (A,B) and (B,A) collide to the
/// same row. Created only from reciprocal likes; deleted on unmatch or on a
/// block between its members, taking its messages with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub user_low: String,
    pub user_high: String,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn has_member(&self, user: &str) -> bool {
        self.user_low == user || self.user_high == user
    }

    /// The canonical pair this match is keyed by
    pub fn pair(&self) -> CanonicalPair {
        CanonicalPair::new(&self.user_low, &self.user_high)
    }
}

/// Directional block edge
///
/// Only the blocker is shielded from the blocked party's future actions, but
/// creating the block purges likes and the match between the pair in both
/// directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: Uuid,
    pub blocker: String,
    pub blocked: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Message inside a match's append-only log
///
/// `seq` is a store-assigned monotonic sequence number; the log's total order
/// is (created_at, seq) ascending. `is_read` flips false -> true once, only
/// by the non-sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender: String,
    pub content: String,
    pub is_read: bool,
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}
