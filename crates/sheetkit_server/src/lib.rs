//! `sheetkit_server` v1:
//! HTTP composition root for the spreadsheet generator and page reader.
//!
//! Module layout:
//! - `conf`    : CLI/env configuration and named constants
//! - `error`   : response envelope and error mapping
//! - `routes`  : request handlers
//! - `sweeper` : scheduled retention sweep

// Needed by the OpenAPI `json!` literal.
#![recursion_limit = "256"]

pub mod conf;
pub mod error;
pub mod routes;
pub mod sweeper;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sheetkit_web_reader::ArticleReader;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::conf::{ROUTE_DOWNLOADS, ROUTE_GENERATE, ROUTE_GET_CONTENT, ROUTE_HEALTH, ROUTE_OPENAPI};

/// Shared, read-only request state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Directory receiving generated workbooks.
    pub dir_output: PathBuf,
    /// Absolute base of download links, without trailing slash.
    pub base_url: String,
    /// Shared page reader and its HTTP client.
    pub reader: Arc<ArticleReader>,
}

impl AppState {
    pub fn new(dir_output: impl Into<PathBuf>, base_url: impl Into<String>, reader: ArticleReader) -> Self {
        Self {
            dir_output: dir_output.into(),
            base_url: base_url.into(),
            reader: Arc::new(reader),
        }
    }

    /// Absolute link under which `file_name` is served.
    pub fn derive_download_url(&self, file_name: &str) -> String {
        format!(
            "{}{ROUTE_DOWNLOADS}/{file_name}",
            self.base_url.trim_end_matches('/')
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    let serve_downloads = ServeDir::new(&state.dir_output);
    Router::new()
        .route(ROUTE_GENERATE, post(routes::excel::generate))
        .route(ROUTE_GET_CONTENT, get(routes::reader::get_content))
        .route(ROUTE_HEALTH, get(routes::meta::health))
        .route(ROUTE_OPENAPI, get(routes::meta::openapi))
        .nest_service(ROUTE_DOWNLOADS, serve_downloads)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
