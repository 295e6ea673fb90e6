//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use quill_core::ports::{PasswordService, ResetTokenService, SessionTokenService};
use quill_infra::auth::{Argon2PasswordService, JwtResetTokenService, JwtSessionService};

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API server on {}:{}",
        config.host,
        config.port
    );

    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    let sessions: Arc<dyn SessionTokenService> = Arc::new(JwtSessionService::from_env());
    let reset_tokens: Arc<dyn ResetTokenService> = Arc::new(JwtResetTokenService::from_env());

    let state = AppState::new(&config).await;
    state.bootstrap_admin(&config, passwords.as_ref()).await;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(passwords.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(reset_tokens.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
