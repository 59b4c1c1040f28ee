// Relationship engine exports
pub mod blocks;
pub mod error;
pub mod likes;
pub mod matches;
pub mod messages;
pub mod pair;

pub use blocks::{BlockEngine, BlockOutcome};
pub use error::RelationError;
pub use likes::{AcceptOutcome, LikeEngine, LikeOutcome, LikeView};
pub use matches::{MatchCreation, MatchEngine};
pub use messages::MessageChannel;
pub use pair::CanonicalPair;
