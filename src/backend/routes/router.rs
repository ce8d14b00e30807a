/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers (outermost first)
 *
 * 1. `TraceLayer` - one span per request
 * 2. `CorsLayer` - the configured frontend origin, with credentials
 * 3. `Content-Language` - set from `APP_LANG` unless a handler set it
 *
 * Unmatched paths fall through to a JSON 404.
 */

use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_LANGUAGE, CONTENT_TYPE, ORIGIN},
        Method,
    },
    Router,
};
use tower_http::{
    cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Preflight responses may be cached this long
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

fn cors_layer(app_state: &AppState) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

async fn not_found() -> BackendError {
    BackendError::not_found("Not found")
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let content_language = SetResponseHeaderLayer::if_not_present(
        CONTENT_LANGUAGE,
        app_state.config.app_lang.clone(),
    );
    let cors = cors_layer(&app_state);

    configure_api_routes(app_state.clone())
        .fallback(not_found)
        .layer(content_language)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
