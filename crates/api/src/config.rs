//! Environment-driven configuration for the binary edge.
//!
//! The library layer never reads the environment itself: everything is an
//! explicit value on [`AppConfig`], constructed once and passed down.

use std::time::Duration;

use taskdeck_jobs::JobTimings;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    /// Number of job-worker threads.
    pub workers: usize,
    /// Simulated durations for the delay-test and report jobs.
    pub timings: JobTimings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret".to_string(),
            workers: 2,
            timings: JobTimings::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment, warning on insecure or
    /// missing values and falling back to dev defaults.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let workers = env_parse("WORKER_COUNT", 2usize);
        let timings = JobTimings {
            delay_test: Duration::from_secs(env_parse("DELAY_TEST_SECS", 5u64)),
            report: Duration::from_secs(env_parse("REPORT_SECS", 15u64)),
        };

        Self {
            jwt_secret,
            workers,
            timings,
        }
    }
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(%key, %raw, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}
