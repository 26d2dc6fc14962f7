use std::io;

use actix_cors::Cors;
use actix_web::middleware::{from_fn, NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpServer};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::handlers::{categories, health};
use crate::middleware::trace_requests;
use crate::state::AppState;

/// Registers the category routes. Paths carry a trailing slash; `run` wraps
/// the app in `NormalizePath` so clients may leave it off.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidBody(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::InvalidPath(err.to_string()).into()),
    )
    .service(
        web::resource("/categories/")
            .route(web::post().to(categories::create))
            .default_service(web::to(categories::method_not_allowed)),
    )
    .service(
        web::resource("/categories/{id}/")
            .route(web::get().to(categories::retrieve))
            .default_service(web::to(categories::method_not_allowed)),
    )
    .service(web::resource("/health/").route(web::get().to(health::handler)));
}

pub async fn run(config: ServerConfig) -> io::Result<()> {
    tracing::info!("Starting category service...");

    let state = AppState::from_config(&config)
        .await
        .map_err(|e| io::Error::other(format!("Failed to initialize storage: {e}")))?;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(NormalizePath::new(TrailingSlash::Always))
            .wrap(from_fn(trace_requests))
            .configure(app_config)
    })
    .workers(config.workers)
    .bind(config.bind_address())?
    .run();

    tracing::info!(
        "Category service listening on http://{}",
        config.bind_address()
    );

    if let Err(e) = server.await {
        tracing::error!("Web server error: {}", e);
        return Err(e);
    }

    Ok(())
}
