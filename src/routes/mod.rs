// Route exports
pub mod players;
pub mod prediction;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(prediction::configure)
            .configure(players::configure),
    );
}
