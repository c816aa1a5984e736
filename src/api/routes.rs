// src/api/routes.rs
use actix_web::web;

use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Legacy probe path, kept for existing deployments.
    cfg.route("/healthz", web::get().to(handlers::health_check));
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/translate", web::post().to(handlers::translate))
            .route("/feedback", web::post().to(handlers::submit_feedback)),
    );
}
