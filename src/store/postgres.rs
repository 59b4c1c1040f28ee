use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::time::Duration;
use uuid::Uuid;

use crate::core::pair::CanonicalPair;
use crate::models::{Block, Like, Match, Message};
use crate::store::{IdentityDirectory, RelationshipStore, StoreError};

/// PostgreSQL relationship store.
///
/// Uniqueness constraints on the likes/matches/blocks tables are the final
/// arbiter for concurrent create-or-get: the insert runs with
/// `ON CONFLICT DO NOTHING` and the losing side fetches the existing row.
/// Cross-entity purges run inside one transaction, deleting messages before
/// their match; the schema carries no `ON DELETE CASCADE`, so teardown order
/// is owned here.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL with URL: {}", url);

        Self::new(url, max_connections.unwrap_or(10), min_connections.unwrap_or(1)).await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    async fn purge_pair_tx(
        tx: &mut Transaction<'_, Postgres>,
        pair: &CanonicalPair,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM messages
            WHERE match_id IN (
                SELECT id FROM matches WHERE user_low = $1 AND user_high = $2
            )
            "#,
        )
        .bind(pair.low())
        .bind(pair.high())
        .execute(&mut **tx)
        .await?;

        sqlx::query("DELETE FROM matches WHERE user_low = $1 AND user_high = $2")
            .bind(pair.low())
            .bind(pair.high())
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM likes
            WHERE (from_user = $1 AND to_user = $2)
               OR (from_user = $2 AND to_user = $1)
            "#,
        )
        .bind(pair.low())
        .bind(pair.high())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

const LIKE_COLUMNS: &str = "id, from_user, to_user, created_at";
const MATCH_COLUMNS: &str = "id, user_low, user_high, created_at";
const BLOCK_COLUMNS: &str = "id, blocker, blocked, reason, created_at";
const MESSAGE_COLUMNS: &str = "id, match_id, sender, content, is_read, seq, created_at";

fn like_from_row(row: &PgRow) -> Result<Like, StoreError> {
    Ok(Like {
        id: row.try_get("id")?,
        from_user: row.try_get("from_user")?,
        to_user: row.try_get("to_user")?,
        created_at: row.try_get("created_at")?,
    })
}

fn match_from_row(row: &PgRow) -> Result<Match, StoreError> {
    Ok(Match {
        id: row.try_get("id")?,
        user_low: row.try_get("user_low")?,
        user_high: row.try_get("user_high")?,
        created_at: row.try_get("created_at")?,
    })
}

fn block_from_row(row: &PgRow) -> Result<Block, StoreError> {
    Ok(Block {
        id: row.try_get("id")?,
        blocker: row.try_get("blocker")?,
        blocked: row.try_get("blocked")?,
        reason: row.try_get("reason")?,
        created_at: row.try_get("created_at")?,
    })
}

fn message_from_row(row: &PgRow) -> Result<Message, StoreError> {
    Ok(Message {
        id: row.try_get("id")?,
        match_id: row.try_get("match_id")?,
        sender: row.try_get("sender")?,
        content: row.try_get("content")?,
        is_read: row.try_get("is_read")?,
        seq: row.try_get("seq")?,
        created_at: row.try_get("created_at")?,
    })
}

impl IdentityDirectory for PostgresStore {
    async fn user_exists(&self, user: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1) AS present")
            .bind(user)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("present")?)
    }
}

impl RelationshipStore for PostgresStore {
    async fn insert_like(
        &self,
        from_user: &str,
        to_user: &str,
    ) -> Result<(Like, bool), StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO likes (id, from_user, to_user)
            VALUES ($1, $2, $3)
            ON CONFLICT (from_user, to_user) DO NOTHING
            RETURNING {LIKE_COLUMNS}
            "#
        );
        let inserted = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(from_user)
            .bind(to_user)
            .fetch_optional(&mut *tx)
            .await?;

        let result = match inserted {
            Some(row) => (like_from_row(&row)?, true),
            None => {
                // Lost the race or the edge already existed; fetch it
                let query =
                    format!("SELECT {LIKE_COLUMNS} FROM likes WHERE from_user = $1 AND to_user = $2");
                let row = sqlx::query(&query)
                    .bind(from_user)
                    .bind(to_user)
                    .fetch_one(&mut *tx)
                    .await?;
                (like_from_row(&row)?, false)
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    async fn like_by_id(&self, id: Uuid) -> Result<Option<Like>, StoreError> {
        let query = format!("SELECT {LIKE_COLUMNS} FROM likes WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(like_from_row).transpose()
    }

    async fn like_between(
        &self,
        from_user: &str,
        to_user: &str,
    ) -> Result<Option<Like>, StoreError> {
        let query = format!("SELECT {LIKE_COLUMNS} FROM likes WHERE from_user = $1 AND to_user = $2");
        let row = sqlx::query(&query)
            .bind(from_user)
            .bind(to_user)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(like_from_row).transpose()
    }

    async fn delete_like(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn likes_sent(&self, user: &str) -> Result<Vec<Like>, StoreError> {
        let query =
            format!("SELECT {LIKE_COLUMNS} FROM likes WHERE from_user = $1 ORDER BY created_at DESC");
        let rows = sqlx::query(&query).bind(user).fetch_all(&self.pool).await?;
        rows.iter().map(like_from_row).collect()
    }

    async fn likes_received(&self, user: &str) -> Result<Vec<Like>, StoreError> {
        let query =
            format!("SELECT {LIKE_COLUMNS} FROM likes WHERE to_user = $1 ORDER BY created_at DESC");
        let rows = sqlx::query(&query).bind(user).fetch_all(&self.pool).await?;
        rows.iter().map(like_from_row).collect()
    }

    async fn insert_match(&self, pair: &CanonicalPair) -> Result<(Match, bool), StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO matches (id, user_low, user_high)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_low, user_high) DO NOTHING
            RETURNING {MATCH_COLUMNS}
            "#
        );
        let inserted = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&mut *tx)
            .await?;

        let result = match inserted {
            Some(row) => (match_from_row(&row)?, true),
            None => {
                let query = format!(
                    "SELECT {MATCH_COLUMNS} FROM matches WHERE user_low = $1 AND user_high = $2"
                );
                let row = sqlx::query(&query)
                    .bind(pair.low())
                    .bind(pair.high())
                    .fetch_one(&mut *tx)
                    .await?;
                (match_from_row(&row)?, false)
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    async fn match_by_id(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(match_from_row).transpose()
    }

    async fn match_between(&self, pair: &CanonicalPair) -> Result<Option<Match>, StoreError> {
        let query =
            format!("SELECT {MATCH_COLUMNS} FROM matches WHERE user_low = $1 AND user_high = $2");
        let row = sqlx::query(&query)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(match_from_row).transpose()
    }

    async fn matches_for(&self, user: &str) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {MATCH_COLUMNS} FROM matches
            WHERE user_low = $1 OR user_high = $1
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query(&query).bind(user).fetch_all(&self.pool).await?;
        rows.iter().map(match_from_row).collect()
    }

    async fn purge_pair(&self, pair: &CanonicalPair) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::purge_pair_tx(&mut tx, pair).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_block(
        &self,
        blocker: &str,
        blocked: &str,
        reason: &str,
    ) -> Result<(Block, bool), StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO blocks (id, blocker, blocked, reason)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (blocker, blocked) DO NOTHING
            RETURNING {BLOCK_COLUMNS}
            "#
        );
        let inserted = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(blocker)
            .bind(blocked)
            .bind(reason)
            .fetch_optional(&mut *tx)
            .await?;

        let result = match inserted {
            Some(row) => {
                // Purge in the same transaction as the block insert
                Self::purge_pair_tx(&mut tx, &CanonicalPair::new(blocker, blocked)).await?;
                (block_from_row(&row)?, true)
            }
            None => {
                let query =
                    format!("SELECT {BLOCK_COLUMNS} FROM blocks WHERE blocker = $1 AND blocked = $2");
                let row = sqlx::query(&query)
                    .bind(blocker)
                    .bind(blocked)
                    .fetch_one(&mut *tx)
                    .await?;
                (block_from_row(&row)?, false)
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    async fn block_by_id(&self, id: Uuid) -> Result<Option<Block>, StoreError> {
        let query = format!("SELECT {BLOCK_COLUMNS} FROM blocks WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(block_from_row).transpose()
    }

    async fn block_exists_between(&self, a: &str, b: &str) -> Result<bool, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM blocks
                WHERE (blocker = $1 AND blocked = $2)
                   OR (blocker = $2 AND blocked = $1)
            ) AS present
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("present")?)
    }

    async fn delete_block(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM blocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn blocks_by(&self, user: &str) -> Result<Vec<Block>, StoreError> {
        let query =
            format!("SELECT {BLOCK_COLUMNS} FROM blocks WHERE blocker = $1 ORDER BY created_at DESC");
        let rows = sqlx::query(&query).bind(user).fetch_all(&self.pool).await?;
        rows.iter().map(block_from_row).collect()
    }

    async fn insert_message(
        &self,
        match_id: Uuid,
        sender: &str,
        content: &str,
    ) -> Result<Message, StoreError> {
        let query = format!(
            r#"
            INSERT INTO messages (id, match_id, sender, content)
            VALUES ($1, $2, $3, $4)
            RETURNING {MESSAGE_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(match_id)
            .bind(sender)
            .bind(content)
            .fetch_one(&self.pool)
            .await?;
        message_from_row(&row)
    }

    async fn message_by_id(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(message_from_row).transpose()
    }

    async fn mark_message_read(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        let query = format!(
            r#"
            UPDATE messages SET is_read = TRUE
            WHERE id = $1
            RETURNING {MESSAGE_COLUMNS}
            "#
        );
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(message_from_row).transpose()
    }

    async fn messages_in_match(&self, match_id: Uuid) -> Result<Vec<Message>, StoreError> {
        let query = format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE match_id = $1
            ORDER BY created_at ASC, seq ASC
            "#
        );
        let rows = sqlx::query(&query)
            .bind(match_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(message_from_row).collect()
    }
}
