use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ActorRequest, MatchListResponse, UserQuery};
use crate::routes::{error_response, validation_failed, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::get().to(list_matches))
        .route("/matches/{id}/unmatch", web::post().to(unmatch));
}

/// Matches the user is a member of
///
/// GET /api/v1/matches?userId={userId}
async fn list_matches(state: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(&errors);
    }

    match state.matches.list_for_user(&query.user_id).await {
        Ok(matches) => {
            let count = matches.len();
            HttpResponse::Ok().json(MatchListResponse { matches, count })
        }
        Err(err) => error_response(&err),
    }
}

/// Dissolve a match, removing its likes and messages with it
///
/// POST /api/v1/matches/{id}/unmatch
async fn unmatch(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state.matches.unmatch(&req.user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}
