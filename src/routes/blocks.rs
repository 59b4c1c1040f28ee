use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ActorRequest, BlockListResponse, BlockRequest, BlockResponse, UserQuery};
use crate::routes::{error_response, validation_failed, AppState};

/// Configure all block-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/blocks", web::post().to(block))
        .route("/blocks", web::get().to(list_blocked))
        .route("/blocks/{id}/unblock", web::post().to(unblock));
}

/// Block a user, purging any like or match with them
///
/// POST /api/v1/blocks
async fn block(state: web::Data<AppState>, req: web::Json<BlockRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state
        .blocks
        .block(&req.user_id, &req.target_user_id, &req.reason)
        .await
    {
        Ok(outcome) => {
            let created = outcome.created;
            let body = BlockResponse {
                block: outcome.block,
                created,
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

/// Remove a block the user created
///
/// POST /api/v1/blocks/{id}/unblock
async fn unblock(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state.blocks.unblock(&req.user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}

/// Blocks the user has created
///
/// GET /api/v1/blocks?userId={userId}
async fn list_blocked(state: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(&errors);
    }

    match state.blocks.list_blocked(&query.user_id).await {
        Ok(blocks) => {
            let count = blocks.len();
            HttpResponse::Ok().json(BlockListResponse { blocks, count })
        }
        Err(err) => error_response(&err),
    }
}
