use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use std::sync::Arc;

use super::serve;
use crate::error::ApiError;
use crate::models::SearchFilter;
use crate::queries::CrashQuery;
use crate::state::AppState;

// The cache holds the row list; the detail page wants the record itself
pub async fn crash_record(
    State(state): State<Arc<AppState>>,
    Path(crash_record_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rows = serve(
        &state,
        CrashQuery::CrashRecord {
            crash_record_id: crash_record_id.clone(),
        },
    )
    .await?;

    match rows {
        Value::Array(mut rows) if !rows.is_empty() => Ok(Json(rows.swap_remove(0))),
        _ => Err(ApiError::NotFound(format!("crash {}", crash_record_id))),
    }
}

pub async fn vehicles_in_crash(
    State(state): State<Arc<AppState>>,
    Path(crash_record_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    serve(&state, CrashQuery::VehiclesInCrash { crash_record_id })
        .await
        .map(Json)
}

pub async fn search_crashes(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SearchFilter>,
) -> Result<Json<Value>, ApiError> {
    serve(&state, CrashQuery::SearchCrashes(filter.normalized()))
        .await
        .map(Json)
}
