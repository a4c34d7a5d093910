use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;
use std::sync::Arc;

use super::serve;
use crate::error::ApiError;
use crate::queries::CrashQuery;
use crate::state::AppState;

type Rows = Result<Json<Value>, ApiError>;

// Cities ranked by fatalities relative to crash volume
pub async fn crash_severity_index_per_city(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Rows {
    serve(&state, CrashQuery::CrashSeverityIndexPerCity { year }).await.map(Json)
}

pub async fn top_vehicle_types_in_fatal_crashes_with_avg_age(
    State(state): State<Arc<AppState>>,
    Path(vehicle_type): Path<String>,
) -> Rows {
    serve(&state, CrashQuery::TopVehicleTypesInFatalCrashes { vehicle_type })
        .await
        .map(Json)
}

// Driver fatalities per age group for one kind of safety equipment
pub async fn driver_age_groups_and_safety_equipment_effectiveness(
    State(state): State<Arc<AppState>>,
    Path(safety_equipment): Path<String>,
) -> Rows {
    serve(&state, CrashQuery::DriverAgeGroupsSafetyEquipment { safety_equipment })
        .await
        .map(Json)
}

pub async fn safety_equipment_vs_injury_outcomes(
    State(state): State<Arc<AppState>>,
    Path(safety_equipment): Path<String>,
) -> Rows {
    serve(&state, CrashQuery::SafetyEquipmentVsInjuryOutcomes { safety_equipment })
        .await
        .map(Json)
}

pub async fn crashes_by_travel_direction(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Rows {
    serve(&state, CrashQuery::CrashesByTravelDirection { year }).await.map(Json)
}

pub async fn crashes_per_vehicle_type(
    State(state): State<Arc<AppState>>,
    Path(vehicle_type): Path<String>,
) -> Rows {
    serve(&state, CrashQuery::CrashesPerVehicleType { vehicle_type }).await.map(Json)
}

// Fatalities and fatality rate by vehicle age
pub async fn average_age_of_vehicle(
    State(state): State<Arc<AppState>>,
    Path(vehicle_type): Path<String>,
) -> Rows {
    serve(&state, CrashQuery::AverageAgeOfVehicle { vehicle_type }).await.map(Json)
}

pub async fn total_crashes_and_fatalities(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Rows {
    serve(&state, CrashQuery::TotalCrashesAndFatalities { year }).await.map(Json)
}

pub async fn top_primary_contributory_causes(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Rows {
    serve(&state, CrashQuery::TopPrimaryContributoryCauses { year }).await.map(Json)
}

pub async fn weather_conditions(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Rows {
    serve(&state, CrashQuery::WeatherConditions { year }).await.map(Json)
}
