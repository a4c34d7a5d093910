use axum::{Json, extract::State};
use serde_json::Value;
use std::sync::Arc;

use super::serve;
use crate::error::ApiError;
use crate::queries::CrashQuery;
use crate::state::AppState;

type Rows = Result<Json<Value>, ApiError>;

pub async fn years(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::Years).await.map(Json)
}

pub async fn vehicle_types(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::VehicleTypes).await.map(Json)
}

pub async fn safety_equipment(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::SafetyEquipment).await.map(Json)
}

pub async fn weather_condition_types(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::WeatherConditionTypes).await.map(Json)
}

pub async fn lighting_condition_types(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::LightingConditionTypes).await.map(Json)
}

pub async fn first_crash_types(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::FirstCrashTypes).await.map(Json)
}

pub async fn roadway_types(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::RoadwayTypes).await.map(Json)
}

pub async fn surface_condition_types(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::SurfaceConditionTypes).await.map(Json)
}

pub async fn damage_values(State(state): State<Arc<AppState>>) -> Rows {
    serve(&state, CrashQuery::DamageValues).await.map(Json)
}
