mod crashes;
mod health;
mod lookups;
mod metrics;
mod stats;

pub use crashes::{crash_record, search_crashes, vehicles_in_crash};
pub use health::health_handler;
pub use lookups::{
    damage_values, first_crash_types, lighting_condition_types, roadway_types, safety_equipment,
    surface_condition_types, vehicle_types, weather_condition_types, years,
};
pub use metrics::metrics_handler;
pub use stats::{
    average_age_of_vehicle, crash_severity_index_per_city, crashes_by_travel_direction,
    crashes_per_vehicle_type, driver_age_groups_and_safety_equipment_effectiveness,
    safety_equipment_vs_injury_outcomes, top_primary_contributory_causes,
    top_vehicle_types_in_fatal_crashes_with_avg_age, total_crashes_and_fatalities,
    weather_conditions,
};

use serde_json::Value;
use std::time::Instant;

use crate::error::ApiError;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::queries::CrashQuery;
use crate::state::AppState;

// Every read endpoint goes through here: key, cache, then database on a miss
async fn serve(state: &AppState, query: CrashQuery) -> Result<Value, ApiError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let key = query.cache_key();
    let source = state.source.clone();
    let result = state
        .read_through
        .get_or_populate(&key, move || async move { source.query(&query).await })
        .await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    result.map_err(ApiError::from)
}
