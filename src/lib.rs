pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod key;
pub mod metrics;
pub mod models;
pub mod queries;
pub mod read_through;
pub mod source;
pub mod state;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use cache::{CacheConfig, Clock, ManualClock, QueryCache, SystemClock};
pub use error::{ApiError, QueryError};
pub use key::CacheKey;
pub use queries::CrashQuery;
pub use read_through::ReadThrough;
pub use source::{DataSource, PgDataSource};
pub use state::AppState;

// creating the router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route(
            "/crash_severity_index_per_city/{year}",
            get(handlers::crash_severity_index_per_city),
        )
        .route(
            "/top_vehicle_types_in_fatal_crashes_with_avg_age/{vehicle_type}",
            get(handlers::top_vehicle_types_in_fatal_crashes_with_avg_age),
        )
        .route(
            "/driver_age_groups_and_safety_equipment_effectiveness/{safety_equipment}",
            get(handlers::driver_age_groups_and_safety_equipment_effectiveness),
        )
        .route(
            "/safety_equipment_vs_injury_outcomes/{safety_equipment}",
            get(handlers::safety_equipment_vs_injury_outcomes),
        )
        .route(
            "/crashes_by_travel_direction/{year}",
            get(handlers::crashes_by_travel_direction),
        )
        .route(
            "/crashes_per_vehicle_type/{vehicle_type}",
            get(handlers::crashes_per_vehicle_type),
        )
        .route(
            "/average_age_of_vehicle/{vehicle_type}",
            get(handlers::average_age_of_vehicle),
        )
        .route(
            "/total_crashes_and_fatalities/{year}",
            get(handlers::total_crashes_and_fatalities),
        )
        .route(
            "/top_primary_contributory_causes/{year}",
            get(handlers::top_primary_contributory_causes),
        )
        .route("/weather_conditions/{year}", get(handlers::weather_conditions))
        .route("/crash_record_id/{crash_record_id}", get(handlers::crash_record))
        .route("/vehicles/{crash_record_id}", get(handlers::vehicles_in_crash))
        .route("/search_crashes", get(handlers::search_crashes))
        .route("/years", get(handlers::years))
        .route("/vehicle_types", get(handlers::vehicle_types))
        .route("/safety_equipment", get(handlers::safety_equipment))
        .route(
            "/types_of_weather_conditions",
            get(handlers::weather_condition_types),
        )
        .route(
            "/types_of_lighting_conditions",
            get(handlers::lighting_condition_types),
        )
        .route("/types_of_first_crash_types", get(handlers::first_crash_types))
        .route("/types_of_roadway", get(handlers::roadway_types))
        .route(
            "/types_of_surface_conditions",
            get(handlers::surface_condition_types),
        )
        .route("/types_of_damage_value", get(handlers::damage_values))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
