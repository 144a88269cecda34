use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::services::donki::CmeHistory;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/cme-detection",
    tag = "cme",
    responses((status = 200, description = "Recent CMEs from the DONKI catalog", body = CmeHistory))
)]
pub(crate) async fn cme_detection(State(state): State<AppState>) -> Json<CmeHistory> {
    Json(state.processor.fetch_cme_history().await)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/cme-detection", get(cme_detection))
}
