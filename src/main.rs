use std::sync::Arc;

use anyhow::Context;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod finance;
mod gateway;
mod health;
mod notify;
mod profile;
mod state;

use crate::{
    config::{AppConfig, Service, DEFAULT_JWT_SECRET},
    gateway::GatewayState,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "pocketledger=debug,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let service: Service = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("APP_SERVICE").ok())
        .context("usage: pocketledger <auth|profile|finance|notification|gateway>")?
        .parse()?;
    let config = AppConfig::from_env(service)?;

    if let Some(jwt) = &config.jwt {
        if jwt.secret == DEFAULT_JWT_SECRET {
            tracing::warn!("JWT_SECRET is unset, using the built-in development secret");
        }
    }

    let app = if service.uses_database() {
        let db = db::connect(&config).await?;
        if config.run_migrations {
            db::migrate(&db).await?;
            tracing::info!("migrations applied");
        }
        let state = AppState::from_parts(db, Arc::new(config.clone()))?;
        app::build_app(service, state)
    } else {
        app::build_gateway(GatewayState::new(config.gateway.clone())?)
    };

    app::serve(app, service, &config).await
}
