use crate::models::{ErrorResponse, PlayersResponse};
use crate::routes::prediction::AppState;
use actix_web::{web, HttpResponse, Responder};

/// Configure player directory routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/players", web::get().to(get_all_players));
}

/// List all players
///
/// GET /api/v1/players
///
/// Served through the read-through cache; only the public projection
/// (id, names, country code) is exposed.
async fn get_all_players(state: web::Data<AppState>) -> impl Responder {
    match state.cache.get_all().await {
        Ok(snapshot) => HttpResponse::Ok().json(PlayersResponse {
            count: snapshot.players.len(),
            players: snapshot.players.clone(),
            fetched_at: snapshot.fetched_at,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch players: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch players".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
