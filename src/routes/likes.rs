use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    AcceptLikeResponse, ActorRequest, LikeListResponse, SendLikeRequest, SendLikeResponse,
    UserQuery,
};
use crate::routes::{error_response, validation_failed, AppState};

/// Configure all like-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/likes", web::post().to(send_like))
        .route("/likes/sent", web::get().to(list_sent))
        .route("/likes/received", web::get().to(list_received))
        .route("/likes/{id}/accept", web::post().to(accept_like))
        .route("/likes/{id}/reject", web::post().to(reject_like));
}

/// Send a like
///
/// POST /api/v1/likes
async fn send_like(
    state: web::Data<AppState>,
    req: web::Json<SendLikeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state.likes.send_like(&req.user_id, &req.target_user_id).await {
        Ok(outcome) => {
            let created = outcome.created;
            let body = SendLikeResponse {
                like: outcome.like,
                created,
                matched: outcome.mutual,
                match_id: outcome.match_id,
            };
            if created {
                HttpResponse::Created().json(body)
            } else {
                HttpResponse::Ok().json(body)
            }
        }
        Err(err) => error_response(&err),
    }
}

/// Accept a received like, promoting the pair to a match
///
/// POST /api/v1/likes/{id}/accept
async fn accept_like(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state.likes.accept_like(&req.user_id, path.into_inner()).await {
        Ok(outcome) => HttpResponse::Ok().json(AcceptLikeResponse {
            record: outcome.record,
            already_matched: outcome.already_matched,
        }),
        Err(err) => error_response(&err),
    }
}

/// Reject a received like
///
/// POST /api/v1/likes/{id}/reject
async fn reject_like(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state.likes.reject_like(&req.user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}

/// Likes the user has sent
///
/// GET /api/v1/likes/sent?userId={userId}
async fn list_sent(state: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(&errors);
    }

    match state.likes.list_sent(&query.user_id).await {
        Ok(views) => {
            let likes: Vec<_> = views.into_iter().map(Into::into).collect();
            let count = likes.len();
            HttpResponse::Ok().json(LikeListResponse { likes, count })
        }
        Err(err) => error_response(&err),
    }
}

/// Likes the user has received
///
/// GET /api/v1/likes/received?userId={userId}
async fn list_received(state: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(&errors);
    }

    match state.likes.list_received(&query.user_id).await {
        Ok(views) => {
            let likes: Vec<_> = views.into_iter().map(Into::into).collect();
            let count = likes.len();
            HttpResponse::Ok().json(LikeListResponse { likes, count })
        }
        Err(err) => error_response(&err),
    }
}
