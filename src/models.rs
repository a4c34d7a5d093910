use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: i64 = 100;

// Crash search filters from the query string. Missing fields fall back to
// the defaults the search page has always used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchFilter {
    pub crash_id: String,
    pub speed_limit_low: i64,
    pub speed_limit_high: i64,
    pub injuries_low: i64,
    pub injuries_high: i64,
    pub crash_hour_low: i64,
    pub crash_hour_high: i64,
    pub weather_condition: String,
    pub lighting_condition: String,
    pub first_crash_type: String,
    pub roadway_type: String,
    pub surface_condition: String,
    pub damage_value: String,
    pub page: i64,
    pub page_size: i64,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            crash_id: String::new(),
            speed_limit_low: 0,
            speed_limit_high: 25,
            injuries_low: 5,
            injuries_high: 21,
            crash_hour_low: 0,
            crash_hour_high: 12,
            weather_condition: String::new(),
            lighting_condition: String::new(),
            first_crash_type: String::new(),
            roadway_type: String::new(),
            surface_condition: String::new(),
            damage_value: String::new(),
            page: 1,
            page_size: 10,
        }
    }
}

impl SearchFilter {
    // page >= 1, 1 <= page_size <= MAX_PAGE_SIZE
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

// Health endpoint body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub cache_entries: usize,
}
