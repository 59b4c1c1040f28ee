//! Kizuna Relations - Relationship state service for the Kizuna dating app
//!
//! This library implements the relationship state machine behind the app:
//! directional likes that promote to symmetric matches when reciprocated,
//! blocks that purge any existing relationship between a pair, and ordered
//! message logs scoped to matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    BlockEngine, CanonicalPair, LikeEngine, MatchEngine, MessageChannel, RelationError,
};
pub use crate::store::{IdentityDirectory, MemoryStore, PostgresStore, RelationshipStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let pair = CanonicalPair::new("bob", "alice");
        assert_eq!(pair.low(), "alice");
    }
}
