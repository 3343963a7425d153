use crate::config::Config;
use crate::types::profile::AnalyzedProfile;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct AppState {
    cache: Arc<DashMap<String, CachedAnalysis>>,
    config: Arc<Config>,
}

struct CachedAnalysis {
    analysis: AnalyzedProfile,
    inserted_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn insert(&self, profile_id: String, analysis: AnalyzedProfile) {
        self.cache.insert(
            profile_id,
            CachedAnalysis {
                analysis,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, profile_id: &str) -> Option<AnalyzedProfile> {
        self.cache
            .get(profile_id)
            .map(|entry| entry.analysis.clone())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.cache.retain(|_, cached| {
            now.duration_since(cached.inserted_at) < ttl
        });
        tracing::info!("Cache eviction complete. Current size: {}", self.cache.len());
    }
}
