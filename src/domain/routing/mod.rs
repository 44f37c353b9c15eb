//! A/B routing between the cache and generation paths

mod config;
mod router;

pub use config::ABTestConfig;
pub use router::{
    select_route, should_use_cache, AbRouter, RandomSource, Route, SeededRandom, ThreadRandom,
};
