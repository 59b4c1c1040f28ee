use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ActorRequest, HistoryQuery, HistoryResponse, SendMessageRequest};
use crate::routes::{error_response, validation_failed, AppState};

/// Configure all message-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/messages", web::post().to(send_message))
        .route("/messages/by_match", web::get().to(history))
        .route("/messages/{id}/read", web::post().to(mark_read));
}

/// Send a message in a match
///
/// POST /api/v1/messages
async fn send_message(
    state: web::Data<AppState>,
    req: web::Json<SendMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state
        .messages
        .send(&req.user_id, req.match_id, &req.content)
        .await
    {
        Ok(message) => HttpResponse::Created().json(message),
        Err(err) => error_response(&err),
    }
}

/// Message history for a match, oldest first
///
/// GET /api/v1/messages/by_match?matchId={matchId}&userId={userId}
async fn history(state: web::Data<AppState>, query: web::Query<HistoryQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(&errors);
    }

    match state.messages.history(&query.user_id, query.match_id).await {
        Ok(messages) => {
            let count = messages.len();
            HttpResponse::Ok().json(HistoryResponse { messages, count })
        }
        Err(err) => error_response(&err),
    }
}

/// Mark a received message as read
///
/// POST /api/v1/messages/{id}/read
async fn mark_read(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state.messages.mark_read(&req.user_id, path.into_inner()).await {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(err) => error_response(&err),
    }
}
