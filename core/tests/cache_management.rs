// core/tests/cache_management.rs
//
// Engine composer cache: hit/miss tracking, LRU eviction and clearing.

mod common;

use common::registry;
use libreading_core::Engine;

#[test]
fn repeated_dialect_hits_the_cache() {
    let engine = Engine::new(registry());
    let alpha = engine.registry().default_options("Alpha").unwrap();

    let first = engine.composer(&alpha).unwrap();
    let second = engine.composer(&alpha).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(engine.cache_stats(), (1, 1));
    assert_eq!(engine.cache_size(), 1);
}

#[test]
fn lru_evicts_least_recent_dialect() {
    let engine = Engine::with_cache_capacity(registry(), 1);
    let alpha = engine.registry().default_options("Alpha").unwrap();
    let beta = engine.registry().default_options("Beta").unwrap();

    engine.composer(&alpha).unwrap();
    engine.composer(&beta).unwrap();
    assert_eq!(engine.cache_size(), 1);

    engine.composer(&alpha).unwrap();
    assert_eq!(engine.cache_stats(), (0, 3));
}

#[test]
fn clear_cache_empties_it() {
    let engine = Engine::new(registry());
    let alpha = engine.registry().default_options("Alpha").unwrap();
    engine.composer(&alpha).unwrap();
    engine.clear_cache();
    assert_eq!(engine.cache_size(), 0);
}

#[test]
fn conversions_share_cached_composers() {
    let engine = Engine::new(registry());
    let alpha = engine.registry().default_options("Alpha").unwrap();
    let beta = engine.registry().default_options("Beta").unwrap();
    let options = Default::default();

    engine.convert("ba1", &alpha, &beta, &options).unwrap();
    engine.convert("ban2", &alpha, &beta, &options).unwrap();
    let (hits, misses) = engine.cache_stats();
    assert_eq!(misses, 2);
    assert_eq!(hits, 2);
}
