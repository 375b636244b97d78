//! Storage gateway: a small HTTP file-exchange service.
//!
//! Clients upload files with a multipart `POST /upload`, browse them on the
//! `GET /download` page and fetch one with `GET /download/:filename`. Files
//! live flat in a single directory; see [`storage`] for the naming rules.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use handlebars::Handlebars;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod storage;

use config::Config;
use models::GatewayError;
use storage::FileStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FileStore>,
    pub templates: Arc<Handlebars<'static>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the store named in `config` and register page templates.
    pub async fn new(config: Config) -> Result<Self, GatewayError> {
        let store = FileStore::open(&config.storage.root).await?;
        let templates = pages::build_templates()?;

        Ok(AppState {
            store: Arc::new(store),
            templates: Arc::new(templates),
            config: Arc::new(config),
        })
    }
}

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/upload", post(handlers::file_upload::upload_files))
        .route("/download", get(handlers::file_download::list_files))
        .route(
            "/download/:filename",
            get(handlers::file_download::download_file),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
