//! Weighted random selection between the cache and generation paths

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ABTestConfig;

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource: Send + Sync + Debug {
    fn next_f64(&self) -> f64;
}

/// Thread-local RNG, used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

/// Seeded RNG for reproducible routing
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0.0..1.0),
            Err(poisoned) => poisoned.into_inner().gen_range(0.0..1.0),
        }
    }
}

/// Path a request is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Cache,
    Generation,
    LocalLlm,
}

/// Map one uniform sample onto a route by cumulative weight.
///
/// Returns `Route::Generation` when every weight is zero.
pub fn select_route(config: &ABTestConfig, sample: f64) -> Route {
    let total = config.total_weight();

    if total <= 0.0 {
        return Route::Generation;
    }

    let point = sample.clamp(0.0, 1.0) * total;
    let mut upper = config.cache_weight;

    if point < upper {
        return Route::Cache;
    }

    upper += config.generation_weight;

    if point < upper || config.local_llm_weight <= 0.0 {
        return Route::Generation;
    }

    Route::LocalLlm
}

/// Decide whether to attempt the cache path, drawing one sample.
///
/// Zero total weight is a deterministic `false` without a draw.
pub fn should_use_cache(config: &ABTestConfig, random: &dyn RandomSource) -> bool {
    if config.total_weight() <= 0.0 {
        return false;
    }

    select_route(config, random.next_f64()) == Route::Cache
}

/// Routing policy bound to its config and random source
#[derive(Debug, Clone)]
pub struct AbRouter {
    config: ABTestConfig,
    random: Arc<dyn RandomSource>,
}

impl AbRouter {
    pub fn new(config: ABTestConfig, random: Arc<dyn RandomSource>) -> Self {
        Self { config, random }
    }

    /// Router over the thread-local RNG
    pub fn with_thread_rng(config: ABTestConfig) -> Self {
        Self::new(config, Arc::new(ThreadRandom))
    }

    pub fn config(&self) -> &ABTestConfig {
        &self.config
    }

    /// Fresh decision for one request
    pub fn should_use_cache(&self) -> bool {
        should_use_cache(&self.config, self.random.as_ref())
    }

    /// Fresh route for one request
    pub fn route(&self) -> Route {
        if self.config.total_weight() <= 0.0 {
            return Route::Generation;
        }

        select_route(&self.config, self.random.next_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedRandom(f64);

    impl RandomSource for FixedRandom {
        fn next_f64(&self) -> f64 {
            self.0
        }
    }

    fn config(generation: f64, cache: f64) -> ABTestConfig {
        ABTestConfig::new(generation, cache).unwrap()
    }

    #[test]
    fn test_cache_only_always_true() {
        let router = AbRouter::new(config(0.0, 100.0), Arc::new(SeededRandom::new(7)));
        assert!((0..1000).all(|_| router.should_use_cache()));
    }

    #[test]
    fn test_generation_only_always_false() {
        let router = AbRouter::new(config(100.0, 0.0), Arc::new(SeededRandom::new(7)));
        assert!((0..1000).all(|_| !router.should_use_cache()));
    }

    #[test]
    fn test_zero_weights_always_false() {
        let router = AbRouter::new(config(0.0, 0.0), Arc::new(FixedRandom(0.0)));
        assert!(!router.should_use_cache());
        assert_eq!(router.route(), Route::Generation);
    }

    #[test]
    fn test_sample_boundaries() {
        let config = config(50.0, 50.0);

        assert_eq!(select_route(&config, 0.0), Route::Cache);
        assert_eq!(select_route(&config, 0.4999), Route::Cache);
        assert_eq!(select_route(&config, 0.5), Route::Generation);
        assert_eq!(select_route(&config, 0.9999), Route::Generation);
    }

    #[test]
    fn test_local_llm_route() {
        let config = config(50.0, 25.0).with_local_llm_weight(25.0).unwrap();

        assert_eq!(select_route(&config, 0.1), Route::Cache);
        assert_eq!(select_route(&config, 0.5), Route::Generation);
        assert_eq!(select_route(&config, 0.9), Route::LocalLlm);
    }

    #[test]
    fn test_seeded_router_is_reproducible() {
        let config = config(50.0, 50.0);
        let first = AbRouter::new(config.clone(), Arc::new(SeededRandom::new(42)));
        let second = AbRouter::new(config, Arc::new(SeededRandom::new(42)));

        let a: Vec<bool> = (0..50).map(|_| first.should_use_cache()).collect();
        let b: Vec<bool> = (0..50).map(|_| second.should_use_cache()).collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_decisions_are_not_sticky() {
        let router = AbRouter::new(config(50.0, 50.0), Arc::new(SeededRandom::new(1)));
        let decisions: Vec<bool> = (0..200).map(|_| router.should_use_cache()).collect();

        assert!(decisions.iter().any(|d| *d));
        assert!(decisions.iter().any(|d| !*d));
    }

    #[test]
    fn test_split_is_roughly_proportional() {
        let router = AbRouter::new(config(75.0, 25.0), Arc::new(SeededRandom::new(99)));
        let hits = (0..4000).filter(|_| router.should_use_cache()).count();

        // Expect ~1000
        assert!(hits > 850 && hits < 1150, "cache routed {} times", hits);
    }
}
