use clap::Parser;
use std::time::Duration;
use crate::cache::{CacheConfig, DEFAULT_TTL_SECONDS};

// CLI argument structure; every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "crash-stats-api")]
#[command(about = "Cached JSON API over the traffic crash database")]
pub struct Args {
    // Address to bind
    #[arg(long, env = "CRASH_API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "CRASH_API_PORT", default_value_t = 8080)]
    pub port: u16,

    // Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    // Max pooled database connections
    #[arg(long, env = "CRASH_API_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    // Cache TTL in seconds
    #[arg(short, long, env = "CRASH_API_CACHE_TTL", default_value_t = DEFAULT_TTL_SECONDS)]
    pub cache_ttl: u64,

    // Share one database fetch between concurrent misses on the same key
    #[arg(long, env = "CRASH_API_COALESCE")]
    pub coalesce: bool,

    // Seconds between sweeps of expired entries, 0 disables the sweeper
    #[arg(long, env = "CRASH_API_SWEEP_INTERVAL", default_value_t = 0)]
    pub sweep_interval: u64,
}

impl Args {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl_seconds: self.cache_ttl,
        }
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["crash-stats-api", "--database-url", "postgres://localhost/crashes"])
            .unwrap();

        assert_eq!(args.port, 8080);
        assert_eq!(args.cache_config(), CacheConfig { ttl_seconds: 3600 });
        assert!(!args.coalesce);
        assert_eq!(args.sweep_interval(), None);
        assert_eq!(args.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "crash-stats-api",
            "--database-url",
            "postgres://db/crashes",
            "--port",
            "9000",
            "--cache-ttl",
            "60",
            "--coalesce",
            "--sweep-interval",
            "300",
        ])
        .unwrap();

        assert_eq!(args.port, 9000);
        assert_eq!(args.cache_config().ttl(), Duration::from_secs(60));
        assert!(args.coalesce);
        assert_eq!(args.sweep_interval(), Some(Duration::from_secs(300)));
    }
}
