//! Session cache for generated datasets.
//!
//! Generation is deterministic for a given seed, so the dataset is built
//! once and shared until the entry expires. Entries are keyed by seed; all
//! other parameters come from the cache's [`GeneratorConfig`].

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use pest_map_dataset_models::Observation;

use crate::{GenerateError, GeneratorConfig, generate_seeded};

/// How long a generated dataset is reused before it is rebuilt.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Maximum number of distinct seeds kept at once.
const MAX_DATASETS: u64 = 16;

/// Time-bounded cache of generated datasets.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone)]
pub struct DatasetCache {
    config: GeneratorConfig,
    datasets: Cache<u64, Arc<[Observation]>>,
}

impl DatasetCache {
    /// Creates an empty cache. The configuration is validated lazily on
    /// the first miss.
    #[must_use]
    pub fn new(config: GeneratorConfig, ttl: Duration) -> Self {
        let datasets = Cache::builder()
            .max_capacity(MAX_DATASETS)
            .time_to_live(ttl)
            .build();
        Self { config, datasets }
    }

    /// Configuration used on a cache miss.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the dataset for the configured seed.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the configuration is invalid.
    pub fn get(&self) -> Result<Arc<[Observation]>, GenerateError> {
        self.get_for_seed(self.config.seed)
    }

    /// Returns the dataset for `seed`, generating it on a miss.
    ///
    /// Concurrent misses for the same seed wait for a single generation.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the configuration is invalid.
    pub fn get_for_seed(&self, seed: u64) -> Result<Arc<[Observation]>, GenerateError> {
        self.datasets
            .try_get_with(seed, || {
                log::info!("Generating dataset for seed {seed}...");
                let dataset: Arc<[Observation]> =
                    generate_seeded(&self.config.with_seed(seed))?.into();
                log::info!("Generated {} observations", dataset.len());
                Ok(dataset)
            })
            .map_err(Arc::unwrap_or_clone)
    }

    /// Drops every cached dataset.
    pub fn invalidate_all(&self) {
        self.datasets.invalidate_all();
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(GeneratorConfig::default(), DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    #[test]
    fn repeated_requests_share_one_dataset() {
        let cache = DatasetCache::default();
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn clones_share_entries() {
        let cache = DatasetCache::default();
        let first = cache.get().unwrap();
        let second = cache.clone().get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cached_dataset_matches_fresh_generation() {
        let cache = DatasetCache::default();
        let cached = cache.get_for_seed(11).unwrap();
        let fresh = generate_seeded(&GeneratorConfig::default().with_seed(11)).unwrap();
        assert_eq!(cached.as_ref(), fresh.as_slice());
    }

    #[test]
    fn invalidation_forces_regeneration() {
        let cache = DatasetCache::default();
        let first = cache.get().unwrap();
        cache.invalidate_all();
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_misses_share_one_generation() {
        const THREADS: usize = 8;

        for round in 0..20 {
            let cache = DatasetCache::default();
            let barrier = Arc::new(Barrier::new(THREADS));

            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let cache = cache.clone();
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        cache.get().unwrap()
                    })
                })
                .collect();

            let datasets: Vec<Arc<[Observation]>> =
                handles.into_iter().map(|h| h.join().unwrap()).collect();
            for dataset in &datasets[1..] {
                assert!(
                    Arc::ptr_eq(&datasets[0], dataset),
                    "round {round}: dataset generated more than once"
                );
            }
        }
    }

    #[test]
    fn invalid_config_surfaces_on_first_use() {
        let config = GeneratorConfig {
            horizon_months: 0,
            ..GeneratorConfig::default()
        };
        let cache = DatasetCache::new(config, DEFAULT_TTL);
        assert!(matches!(cache.get(), Err(GenerateError::EmptyHorizon)));
    }
}
