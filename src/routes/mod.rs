pub mod alerts;
pub mod cme_detection;
pub mod health;
pub mod solar_data;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .merge(health::router())
        .nest(
            "/api",
            Router::new()
                .merge(solar_data::router())
                .merge(alerts::router())
                .merge(cme_detection::router())
                .merge(crate::openapi::router()),
        )
        .layer(cors)
        .with_state(state)
}
