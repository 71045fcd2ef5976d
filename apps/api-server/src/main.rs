//! # Posts API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, middleware::NormalizePath, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting posts API on {}:{}", config.host, config.port);

    let state = AppState::new(config.database.as_ref()).await?;
    let app_state = web::Data::new(state.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(middleware::cors::cors_layer())
            .wrap(TracingLogger::default())
            .app_data(app_state.clone())
            .configure(handlers::configure_routes)
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped");
    state.shutdown().await;

    Ok(())
}
