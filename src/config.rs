use std::str::FromStr;
use std::time::Duration;

use crate::types::climb::DetectionConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_body_size: usize,
    pub cache_ttl: Duration,
    pub max_profile_points: usize,
    /// Server-wide detection defaults; requests may override individual fields.
    pub detection: DetectionConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_or("PORT", 3000);
        let max_body_size_mb: usize = env_or("MAX_BODY_SIZE_MB", 10);
        let cache_ttl_seconds = env_or("CACHE_TTL_SECONDS", 3600);
        let max_profile_points = env_or("MAX_PROFILE_POINTS", 1000);

        let defaults = DetectionConfig::default();
        let detection = DetectionConfig {
            min_gradient: env_or("CLIMB_MIN_GRADIENT", defaults.min_gradient),
            min_length_m: env_or("CLIMB_MIN_LENGTH_M", defaults.min_length_m),
            smoothing_window: env_or("CLIMB_SMOOTHING_WINDOW", defaults.smoothing_window),
            merge_gap_m: env_or("CLIMB_MERGE_GAP_M", defaults.merge_gap_m),
            lookahead_distance_m: env_or("CLIMB_LOOKAHEAD_M", defaults.lookahead_distance_m),
            final_min_gradient: env_or("CLIMB_FINAL_MIN_GRADIENT", defaults.final_min_gradient),
            ..defaults
        };

        let detection = match detection.validate() {
            Ok(()) => detection,
            Err(e) => {
                tracing::warn!("Ignoring climb detection overrides: {}", e);
                DetectionConfig::default()
            }
        };

        Self {
            port,
            max_body_size: max_body_size_mb * 1024 * 1024,
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
            max_profile_points,
            detection,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
