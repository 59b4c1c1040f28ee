// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Block, Like, Match, Message};
pub use requests::{
    ActorRequest, BlockRequest, HistoryQuery, SendLikeRequest, SendMessageRequest, UserQuery,
};
pub use responses::{
    AcceptLikeResponse, BlockListResponse, BlockResponse, ErrorResponse, HealthResponse,
    HistoryResponse, LikeEntry, LikeListResponse, MatchListResponse, SendLikeResponse,
};
