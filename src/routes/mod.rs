// Route exports
pub mod blocks;
pub mod likes;
pub mod matches;
pub mod messages;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{BlockEngine, LikeEngine, MatchEngine, MessageChannel, RelationError};
use crate::models::{ErrorResponse, HealthResponse};
use crate::store::PostgresStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub likes: LikeEngine<PostgresStore>,
    pub matches: MatchEngine<PostgresStore>,
    pub blocks: BlockEngine<PostgresStore>,
    pub messages: MessageChannel<PostgresStore>,
    pub store: Arc<PostgresStore>,
}

impl AppState {
    pub fn new(store: Arc<PostgresStore>) -> Self {
        Self {
            likes: LikeEngine::new(Arc::clone(&store)),
            matches: MatchEngine::new(Arc::clone(&store)),
            blocks: BlockEngine::new(Arc::clone(&store)),
            messages: MessageChannel::new(Arc::clone(&store)),
            store,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(likes::configure)
            .configure(matches::configure)
            .configure(blocks::configure)
            .configure(messages::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map an engine error to its transport response
pub(crate) fn error_response(err: &RelationError) -> HttpResponse {
    let (status, code) = match err {
        RelationError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        RelationError::SelfTarget => (StatusCode::BAD_REQUEST, "self_target"),
        RelationError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        RelationError::SelfRead => (StatusCode::BAD_REQUEST, "self_read"),
        RelationError::Blocked => (StatusCode::FORBIDDEN, "blocked"),
        RelationError::Store(e) => {
            tracing::error!("Store failure: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "store_error")
        }
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: code.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn validation_failed(errors: &validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                RelationError::NotFound("Match x".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (RelationError::SelfTarget, StatusCode::BAD_REQUEST),
            (RelationError::Forbidden, StatusCode::FORBIDDEN),
            (RelationError::SelfRead, StatusCode::BAD_REQUEST),
            (RelationError::Blocked, StatusCode::FORBIDDEN),
        ];

        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected);
        }
    }

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
