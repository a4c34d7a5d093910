use sha2::{Digest, Sha256};
use std::fmt;

// Keys longer than this keep the endpoint and hash the parameter part
pub const MAX_KEY_LEN: usize = 256;

// endpoint[:name=value...], pairs sorted, separators escaped, case kept
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(endpoint: &str, params: &[(&str, &str)]) -> Self {
        if params.is_empty() {
            return Self(endpoint.to_string());
        }

        let mut pairs: Vec<(&str, &str)> = params.to_vec();
        pairs.sort_unstable();

        let mut tail = String::new();
        for (name, value) in pairs {
            tail.push(':');
            escape_into(&mut tail, name);
            tail.push('=');
            escape_into(&mut tail, value);
        }

        if endpoint.len() + tail.len() > MAX_KEY_LEN {
            return Self(format!("{}#{}", endpoint, digest(&tail)));
        }

        Self(format!("{}{}", endpoint, tail))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        if matches!(c, '\\' | ':' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
}

// Same hashing the long keys always used: hex sha256
fn digest(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_without_params_is_bare_name() {
        assert_eq!(CacheKey::new("vehicle_types", &[]).as_str(), "vehicle_types");
    }

    #[test]
    fn test_single_param() {
        let key = CacheKey::new("weather_conditions", &[("year", "2020")]);
        assert_eq!(key.as_str(), "weather_conditions:year=2020");
    }

    #[test]
    fn test_param_order_does_not_matter() {
        let a = CacheKey::new("search_crashes", &[("page", "1"), ("crash_id", "abc")]);
        let b = CacheKey::new("search_crashes", &[("crash_id", "abc"), ("page", "1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_values_give_different_keys() {
        let a = CacheKey::new("crashes_per_vehicle_type", &[("vehicle_type", "BUS")]);
        let b = CacheKey::new("crashes_per_vehicle_type", &[("vehicle_type", "VAN")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_value_different_endpoint() {
        let a = CacheKey::new("weather_conditions", &[("year", "2020")]);
        let b = CacheKey::new("crashes_by_travel_direction", &[("year", "2020")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_case_is_preserved() {
        let a = CacheKey::new("safety_equipment_vs_injury_outcomes", &[("safety_equipment", "HELMET")]);
        let b = CacheKey::new("safety_equipment_vs_injury_outcomes", &[("safety_equipment", "helmet")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_separators_in_values_cannot_collide() {
        // a=x:b=y as one value vs two real params
        let smuggled = CacheKey::new("e", &[("a", "x:b=y")]);
        let real = CacheKey::new("e", &[("a", "x"), ("b", "y")]);
        assert_ne!(smuggled, real);
        assert_eq!(smuggled.as_str(), r"e:a=x\:b\=y");
    }

    #[test]
    fn test_long_keys_are_digested() {
        let long = "x".repeat(400);
        let key = CacheKey::new("search_crashes", &[("crash_id", &long)]);

        assert!(key.as_str().starts_with("search_crashes#"));
        assert_eq!(key.as_str().len(), "search_crashes#".len() + 64);
        assert_eq!(key, CacheKey::new("search_crashes", &[("crash_id", &long)]));

        let other = CacheKey::new("search_crashes", &[("crash_id", &"y".repeat(400))]);
        assert_ne!(key, other);
    }
}
