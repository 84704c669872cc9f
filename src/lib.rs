//! Storefront API Library
//!
//! Catalog browsing, session-scoped carts and order placement over a relational store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod seed;
pub mod services;
pub mod session;
pub mod tracing;

use anyhow::bail;
use axum::Router;
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Applies migrations and the starter catalog according to config
pub async fn prepare_database(
    db: &DatabaseConnection,
    cfg: &config::AppConfig,
) -> Result<(), errors::ServiceError> {
    if cfg.auto_migrate {
        db::run_migrations(db).await?;
    }
    if cfg.seed_catalog {
        seed::seed_catalog(db).await?;
    }
    Ok(())
}

/// Build CORS layer from config
pub fn build_cors_layer(cfg: &config::AppConfig) -> anyhow::Result<CorsLayer> {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(cfg.cors_allow_credentials))
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        Ok(CorsLayer::permissive())
    } else {
        bail!("Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true")
    }
}

/// Full application router: `/api`, health, OpenAPI docs and the shared layers
pub fn app_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = build_cors_layer(&state.config)?;
    let db = state.db.clone();

    Ok(Router::new()
        .nest("/api", handlers::api_routes())
        .with_state(state)
        .merge(health::health_routes(db))
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        )))
}

#[cfg(test)]
mod cors_tests {
    use super::*;

    fn cfg(environment: &str) -> config::AppConfig {
        config::AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            environment.into(),
        )
    }

    #[test]
    fn production_without_origins_is_refused() {
        assert!(build_cors_layer(&cfg("production")).is_err());
    }

    #[test]
    fn explicit_origins_or_development_are_accepted() {
        let mut prod = cfg("production");
        prod.cors_allowed_origins = Some("https://shop.example.com, ".into());
        assert!(build_cors_layer(&prod).is_ok());
        assert!(build_cors_layer(&cfg("development")).is_ok());
    }
}
