use axum::{Router, extract::DefaultBodyLimit};
use http::{HeaderValue, Method, header};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    routes,
    store::SharedStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

pub fn build(config: &AppConfig, store: SharedStore) -> Result<Router> {
    let state = AppState { store };
    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(allowed_origins)
        .allow_credentials(true);

    let app = routes::create_router()
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}
