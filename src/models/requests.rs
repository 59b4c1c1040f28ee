use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to send a like
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendLikeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Request carrying only the acting user (accept/reject/unmatch/unblock/read)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActorRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to block a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BlockRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    #[serde(default)]
    pub reason: String,
}

/// Request to send a message in a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "match_id", rename = "matchId")]
    pub match_id: Uuid,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Query identifying the requesting user (list endpoints)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Query for a match's message history
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HistoryQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "match_id", rename = "matchId")]
    pub match_id: Uuid,
}
