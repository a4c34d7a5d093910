use crate::key::CacheKey;
use crate::models::SearchFilter;

// Value bound to a `$n` placeholder; user input never goes into SQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrashQuery {
    CrashSeverityIndexPerCity { year: i32 },
    TopVehicleTypesInFatalCrashes { vehicle_type: String },
    DriverAgeGroupsSafetyEquipment { safety_equipment: String },
    SafetyEquipmentVsInjuryOutcomes { safety_equipment: String },
    CrashesByTravelDirection { year: i32 },
    CrashesPerVehicleType { vehicle_type: String },
    AverageAgeOfVehicle { vehicle_type: String },
    TotalCrashesAndFatalities { year: i32 },
    TopPrimaryContributoryCauses { year: i32 },
    WeatherConditions { year: i32 },
    CrashRecord { crash_record_id: String },
    VehiclesInCrash { crash_record_id: String },
    SearchCrashes(SearchFilter),
    Years,
    VehicleTypes,
    SafetyEquipment,
    WeatherConditionTypes,
    LightingConditionTypes,
    FirstCrashTypes,
    RoadwayTypes,
    SurfaceConditionTypes,
    DamageValues,
}

impl CrashQuery {
    // cache-key namespace, same as the route name
    pub fn endpoint(&self) -> &'static str {
        match self {
            CrashQuery::CrashSeverityIndexPerCity { .. } => "crash_severity_index_per_city",
            CrashQuery::TopVehicleTypesInFatalCrashes { .. } => {
                "top_vehicle_types_in_fatal_crashes_with_avg_age"
            }
            CrashQuery::DriverAgeGroupsSafetyEquipment { .. } => {
                "driver_age_groups_and_safety_equipment_effectiveness"
            }
            CrashQuery::SafetyEquipmentVsInjuryOutcomes { .. } => {
                "safety_equipment_vs_injury_outcomes"
            }
            CrashQuery::CrashesByTravelDirection { .. } => "crashes_by_travel_direction",
            CrashQuery::CrashesPerVehicleType { .. } => "crashes_per_vehicle_type",
            CrashQuery::AverageAgeOfVehicle { .. } => "average_age_of_vehicle",
            CrashQuery::TotalCrashesAndFatalities { .. } => "total_crashes_and_fatalities",
            CrashQuery::TopPrimaryContributoryCauses { .. } => "top_primary_contributory_causes",
            CrashQuery::WeatherConditions { .. } => "weather_conditions",
            CrashQuery::CrashRecord { .. } => "crash_record_id",
            CrashQuery::VehiclesInCrash { .. } => "vehicles_in_crash",
            CrashQuery::SearchCrashes(_) => "search_crashes",
            CrashQuery::Years => "years",
            CrashQuery::VehicleTypes => "vehicle_types",
            CrashQuery::SafetyEquipment => "safety_equipment",
            CrashQuery::WeatherConditionTypes => "types_of_weather_conditions",
            CrashQuery::LightingConditionTypes => "types_of_lighting_conditions",
            CrashQuery::FirstCrashTypes => "types_of_first_crash_types",
            CrashQuery::RoadwayTypes => "types_of_roadway",
            CrashQuery::SurfaceConditionTypes => "types_of_surface_conditions",
            CrashQuery::DamageValues => "types_of_damage_value",
        }
    }

    // (name, value) pairs that change the result set
    fn key_params(&self) -> Vec<(&'static str, String)> {
        match self {
            CrashQuery::CrashSeverityIndexPerCity { year }
            | CrashQuery::CrashesByTravelDirection { year }
            | CrashQuery::TotalCrashesAndFatalities { year }
            | CrashQuery::TopPrimaryContributoryCauses { year }
            | CrashQuery::WeatherConditions { year } => vec![("year", year.to_string())],
            CrashQuery::TopVehicleTypesInFatalCrashes { vehicle_type }
            | CrashQuery::CrashesPerVehicleType { vehicle_type }
            | CrashQuery::AverageAgeOfVehicle { vehicle_type } => {
                vec![("vehicle_type", vehicle_type.clone())]
            }
            CrashQuery::DriverAgeGroupsSafetyEquipment { safety_equipment }
            | CrashQuery::SafetyEquipmentVsInjuryOutcomes { safety_equipment } => {
                vec![("safety_equipment", safety_equipment.clone())]
            }
            CrashQuery::CrashRecord { crash_record_id }
            | CrashQuery::VehiclesInCrash { crash_record_id } => {
                vec![("crash_record_id", crash_record_id.clone())]
            }
            CrashQuery::SearchCrashes(f) => vec![
                ("crash_id", f.crash_id.clone()),
                ("speed_limit_low", f.speed_limit_low.to_string()),
                ("speed_limit_high", f.speed_limit_high.to_string()),
                ("injuries_low", f.injuries_low.to_string()),
                ("injuries_high", f.injuries_high.to_string()),
                ("crash_hour_low", f.crash_hour_low.to_string()),
                ("crash_hour_high", f.crash_hour_high.to_string()),
                ("weather_condition", f.weather_condition.clone()),
                ("lighting_condition", f.lighting_condition.clone()),
                ("first_crash_type", f.first_crash_type.clone()),
                ("roadway_type", f.roadway_type.clone()),
                ("surface_condition", f.surface_condition.clone()),
                ("damage_value", f.damage_value.clone()),
                ("page", f.page.to_string()),
                ("page_size", f.page_size.to_string()),
            ],
            _ => Vec::new(),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        let params = self.key_params();
        let borrowed: Vec<(&str, &str)> = params.iter().map(|(n, v)| (*n, v.as_str())).collect();
        CacheKey::new(self.endpoint(), &borrowed)
    }

    pub fn binds(&self) -> Vec<Bind> {
        match self {
            CrashQuery::CrashSeverityIndexPerCity { year }
            | CrashQuery::CrashesByTravelDirection { year }
            | CrashQuery::TotalCrashesAndFatalities { year }
            | CrashQuery::TopPrimaryContributoryCauses { year }
            | CrashQuery::WeatherConditions { year } => vec![Bind::Text(year.to_string())],
            CrashQuery::TopVehicleTypesInFatalCrashes { vehicle_type }
            | CrashQuery::CrashesPerVehicleType { vehicle_type }
            | CrashQuery::AverageAgeOfVehicle { vehicle_type } => {
                vec![Bind::Text(vehicle_type.clone())]
            }
            CrashQuery::DriverAgeGroupsSafetyEquipment { safety_equipment }
            | CrashQuery::SafetyEquipmentVsInjuryOutcomes { safety_equipment } => {
                vec![Bind::Text(safety_equipment.clone())]
            }
            CrashQuery::CrashRecord { crash_record_id }
            | CrashQuery::VehiclesInCrash { crash_record_id } => {
                vec![Bind::Text(crash_record_id.clone())]
            }
            CrashQuery::SearchCrashes(f) => vec![
                Bind::Text(f.weather_condition.clone()),
                Bind::Text(f.lighting_condition.clone()),
                Bind::Text(f.first_crash_type.clone()),
                Bind::Text(f.roadway_type.clone()),
                Bind::Text(f.surface_condition.clone()),
                Bind::Text(f.damage_value.clone()),
                Bind::Text(f.crash_id.clone()),
                Bind::Int(f.speed_limit_low),
                Bind::Int(f.speed_limit_high),
                Bind::Int(f.injuries_low),
                Bind::Int(f.injuries_high),
                Bind::Int(f.crash_hour_low),
                Bind::Int(f.crash_hour_high),
                Bind::Int(f.page_size),
                Bind::Int(f.offset()),
            ],
            _ => Vec::new(),
        }
    }

    // row SQL; the data source wraps it in json_agg
    pub fn sql(&self) -> &'static str {
        match self {
            CrashQuery::CrashSeverityIndexPerCity { .. } => {
                "SELECT city_name, total_crashes, total_fatalities, severity_index
                 FROM mv_city_crash_severity
                 WHERE crash_year::text = $1
                 ORDER BY severity_index DESC
                 LIMIT 5"
            }
            CrashQuery::TopVehicleTypesInFatalCrashes { .. } => {
                "SELECT vehicle_type, fatal_crash_count, avg_driver_age
                 FROM mv_vehicle_type_fatal_driver_stats
                 WHERE vehicle_type = $1
                 ORDER BY fatal_crash_count DESC"
            }
            CrashQuery::DriverAgeGroupsSafetyEquipment { .. } => {
                "WITH drivers AS (
                     SELECT p.*, se.name AS safety_equipment, ic.name AS injury_level
                     FROM person p
                     JOIN person_type pt ON p.person_type_id = pt.id
                     JOIN safety_equipment se ON p.safety_equipment_id = se.id
                     JOIN injury_classification ic ON p.injury_classification_id = ic.id
                     WHERE pt.name = 'DRIVER' AND se.name = $1
                 )
                 SELECT
                     CASE
                         WHEN age < 25 THEN 'Under 25'
                         WHEN age BETWEEN 25 AND 64 THEN '25-64'
                         ELSE '65+' END AS age_group,
                     COUNT(*) AS driver_count,
                     SUM(CASE WHEN injury_level = 'FATAL' THEN 1 ELSE 0 END) AS fatalities
                 FROM drivers
                 GROUP BY age_group
                 ORDER BY fatalities DESC"
            }
            CrashQuery::SafetyEquipmentVsInjuryOutcomes { .. } => {
                "SELECT * FROM mv_safety_equipment_driver_stats
                 WHERE safety_equipment = $1"
            }
            CrashQuery::CrashesByTravelDirection { .. } => {
                "SELECT travel_direction, vehicle_count, total_fatalities
                 FROM mv_travel_direction_stats
                 WHERE crash_year::text = $1
                 ORDER BY vehicle_count DESC"
            }
            CrashQuery::CrashesPerVehicleType { .. } => {
                "SELECT * FROM mv_vehicle_fatality_stats
                 WHERE v = $1
                 ORDER BY fatal_rate_pct DESC"
            }
            CrashQuery::AverageAgeOfVehicle { .. } => {
                "SELECT vehicle_age, vehicle_count, total_fatalities, fatal_rate_pct
                 FROM mv_vehicle_age_stats
                 WHERE vehicle_type = $1
                 ORDER BY total_fatalities DESC"
            }
            CrashQuery::TotalCrashesAndFatalities { .. } => {
                "SELECT crash_type, total_crashes, total_fatalities, fatality_rate_pct
                 FROM mv_crash_type_fatality_stats
                 WHERE crash_year::text = $1
                 ORDER BY fatality_rate_pct DESC
                 LIMIT 5"
            }
            CrashQuery::TopPrimaryContributoryCauses { .. } => {
                "SELECT primary_cause, fatal_crashes
                 FROM mv_primary_cause_fatal_stats
                 WHERE crash_year::text = $1
                 ORDER BY fatal_crashes DESC
                 LIMIT 5"
            }
            CrashQuery::WeatherConditions { .. } => {
                "SELECT weather_condition, total_crashes, fatal_crashes
                 FROM mv_weather_condition_stats
                 WHERE crash_year::text = $1
                 ORDER BY total_crashes DESC
                 LIMIT 5"
            }
            CrashQuery::CrashRecord { .. } => {
                "SELECT c.crash_record_id,
                     c.crash_date,
                     c.posted_speed_limit,
                     c.street_no,
                     c.street_name,
                     c.street_direction,
                     c.injuries_total,
                     c.injuries_fatal,
                     c.injuries_incapacitating,
                     c.injuries_unknown,
                     tcd.name AS traffic_control_device,
                     wc.name AS weather_condition,
                     lc.name AS lighting_condition,
                     rsc.name AS roadway_surface_condition,
                     rd.name AS road_defect,
                     ct.name AS crash_type,
                     d.name AS damage,
                     pcc.name AS prim_contributory_cause,
                     scc.name AS sec_contributory_cause,
                     it.name AS injury_type,
                     fct.name AS first_crash_type,
                     c.latitude,
                     c.longitude
                 FROM crash c
                     JOIN public.traffic_control_device tcd ON tcd.id = c.traffic_control_device_id
                     JOIN public.weather_condition wc ON c.weather_condition_id = wc.id
                     JOIN public.lighting_condition lc ON c.lighting_condition_id = lc.id
                     JOIN public.roadway_surface_condition rsc ON c.roadway_surface_cond_id = rsc.id
                     JOIN public.road_defect rd ON rd.id = c.road_defect_id
                     JOIN public.crash_type ct ON ct.id = c.crash_type_id
                     JOIN public.damage d ON d.id = c.damage_id
                     JOIN public.prim_contributory_cause pcc ON pcc.id = c.prim_contributory_cause_id
                     JOIN public.sec_contributory_cause scc ON scc.id = c.sec_contributory_cause_id
                     JOIN public.injury_type it ON it.id = c.most_severe_injury_id
                     JOIN public.first_crash_type fct ON fct.id = c.first_crash_type_id
                 WHERE c.crash_record_id = $1"
            }
            CrashQuery::VehiclesInCrash { .. } => {
                "SELECT unit_no, vehicle_year, occupant_cnt, vt.name AS vehicle_type, m.name AS make,
                     ut.name AS unit_type, s.name AS license_plate_state, vu.name AS vehicle_use,
                     td.name AS travel_direction, ma.name AS maneuver, fcp.name AS first_contact_point
                 FROM vehicle v
                     JOIN vehicle_type vt ON vt.id = v.vehicle_type_id
                     JOIN make m ON m.id = v.make_id
                     JOIN unit_type ut ON v.unit_type_id = ut.id
                     JOIN state s ON s.id = v.lic_plate_state_id
                     JOIN vehicle_defect vd ON vd.id = v.vehicle_defect_id
                     JOIN vehicle_use vu ON vu.id = v.vehicle_use_id
                     JOIN travel_direction td ON td.id = v.travel_direction_id
                     JOIN maneuver ma ON ma.id = v.maneuver_id
                     JOIN first_contact_point fcp ON v.first_contact_point_id = fcp.id
                 WHERE v.crash_record_id = $1"
            }
            CrashQuery::SearchCrashes(_) => {
                "WITH weather AS (
                     SELECT * FROM weather_condition WHERE name LIKE '%' || $1 || '%'),
                 light AS (
                     SELECT * FROM lighting_condition WHERE name LIKE '%' || $2 || '%'),
                 type_of_crash AS (
                     SELECT * FROM first_crash_type WHERE name LIKE '%' || $3 || '%'),
                 road_type AS (
                     SELECT * FROM trafficway_type WHERE name LIKE '%' || $4 || '%'),
                 surface AS (
                     SELECT * FROM roadway_surface_condition WHERE name LIKE '%' || $5 || '%'),
                 damage_value AS (
                     SELECT * FROM damage WHERE name LIKE '%' || $6 || '%')
                 SELECT posted_speed_limit, injuries_total, crash_hour,
                     weather.name AS weather_condition, light.name AS lighting_condition,
                     tc.name AS first_crash_type, rt.name AS roadway_type,
                     surface.name AS surface_condition, dv.name AS damage_value,
                     crash_month, c.crash_record_id AS crash_id
                 FROM crash c
                     JOIN weather ON c.weather_condition_id = weather.id
                     JOIN light ON c.lighting_condition_id = light.id
                     JOIN type_of_crash tc ON c.first_crash_type_id = tc.id
                     JOIN road_type rt ON c.trafficway_type_id = rt.id
                     JOIN surface ON c.roadway_surface_cond_id = surface.id
                     JOIN damage_value dv ON c.damage_id = dv.id
                 WHERE c.crash_record_id LIKE '%' || $7 || '%'
                     AND $8 <= posted_speed_limit AND posted_speed_limit <= $9
                     AND $10 <= injuries_total AND injuries_total <= $11
                     AND $12 <= crash_hour AND crash_hour <= $13
                 ORDER BY c.crash_record_id
                 LIMIT $14 OFFSET $15"
            }
            CrashQuery::Years => {
                "SELECT DISTINCT c.crash_year
                 FROM public.crash c
                 ORDER BY c.crash_year DESC"
            }
            CrashQuery::VehicleTypes => "SELECT vt.name FROM public.vehicle_type vt",
            CrashQuery::SafetyEquipment => "SELECT se.name FROM public.safety_equipment se",
            CrashQuery::WeatherConditionTypes => {
                "SELECT DISTINCT * FROM weather_condition ORDER BY name"
            }
            CrashQuery::LightingConditionTypes => {
                "SELECT DISTINCT * FROM lighting_condition ORDER BY name"
            }
            CrashQuery::FirstCrashTypes => "SELECT DISTINCT * FROM first_crash_type ORDER BY name",
            CrashQuery::RoadwayTypes => "SELECT DISTINCT * FROM trafficway_type ORDER BY name",
            CrashQuery::SurfaceConditionTypes => {
                "SELECT DISTINCT * FROM roadway_surface_condition ORDER BY name"
            }
            CrashQuery::DamageValues => "SELECT DISTINCT * FROM damage",
        }
    }
}
