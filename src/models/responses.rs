use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::likes::LikeView;
use crate::models::domain::{Block, Like, Match, Message};

/// Response for the send-like endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendLikeResponse {
    pub like: Like,
    pub created: bool,
    pub matched: bool,
    pub match_id: Option<Uuid>,
}

/// Response for the accept-like endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptLikeResponse {
    #[serde(rename = "match")]
    pub record: Match,
    pub already_matched: bool,
}

/// A like in a listing, annotated with its current mutuality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEntry {
    pub id: Uuid,
    pub from_user: String,
    pub to_user: String,
    pub is_mutual: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LikeView> for LikeEntry {
    fn from(view: LikeView) -> Self {
        Self {
            id: view.like.id,
            from_user: view.like.from_user,
            to_user: view.like.to_user,
            is_mutual: view.mutual,
            created_at: view.like.created_at,
        }
    }
}

/// Response for like listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeListResponse {
    pub likes: Vec<LikeEntry>,
    pub count: usize,
}

/// Response for the match listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<Match>,
    pub count: usize,
}

/// Response for the block endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResponse {
    pub block: Block,
    pub created: bool,
}

/// Response for the block listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockListResponse {
    pub blocks: Vec<Block>,
    pub count: usize,
}

/// Response for the message history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
