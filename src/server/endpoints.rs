use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};

use crate::error::Error;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse};
use crate::types::EndpointDoc;

pub fn endpoints_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/endpoints", get(list_endpoints))
        .route(
            "/endpoints/{key}",
            get(get_endpoint).put(save_endpoint).delete(delete_endpoint),
        )
        .route("/import", post(import_endpoints))
        .route("/export", get(export_endpoints))
}

pub async fn list_endpoints(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summaries = state
        .engine
        .get_summary_list()
        .map_err(ApiError::from)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(summaries)))
}

pub async fn get_endpoint(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let doc = state
        .engine
        .get_one(&key)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Endpoint not found"))?;

    Ok::<_, ApiError>(Json(ApiResponse::success(doc)))
}

pub async fn save_endpoint(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(doc): Json<EndpointDoc>,
) -> impl IntoResponse {
    state.engine.save_one(&key, &doc).map_err(ApiError::from)?;

    // Echo back the composed document so callers see exactly what a
    // subsequent GET will return.
    let saved = state
        .engine
        .get_one(&key)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::internal("Saved endpoint vanished"))?;

    Ok::<_, ApiError>(Json(ApiResponse::success(saved)))
}

pub async fn delete_endpoint(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let deleted = state.engine.delete_one(&key).map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::from(Error::NotFound));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(())))
}

pub async fn import_endpoints(
    State(state): State<Arc<AppState>>,
    Json(docs): Json<BTreeMap<String, EndpointDoc>>,
) -> impl IntoResponse {
    let report = state.engine.import_all(&docs);
    Json(ApiResponse::success(report))
}

pub async fn export_endpoints(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let docs = state.engine.export_all().map_err(ApiError::from)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(docs)))
}
