//! # libzhuyin
//!
//! Zhuyin/Bopomofo reading for the libreading conversion engine, with the
//! tables connecting it to Pinyin.

pub mod bopomofo;
pub mod config;

use std::sync::Arc;

use libreading_core::{ConfigError, RegistryBuilder};

pub use bopomofo::Bopomofo;
pub use config::ZhuyinDialect;

/// Registers Bopomofo and the Pinyin ↔ Bopomofo tables. Pinyin itself must be
/// registered too (see `libmandarin::register`) before the registry is built.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), ConfigError> {
    builder.register_reading(Arc::new(Bopomofo::new()))?;
    let (to_bopomofo, from_bopomofo) = bopomofo::mappers();
    builder
        .register_mapper(Arc::new(to_bopomofo))?
        .register_mapper(Arc::new(from_bopomofo))?;
    Ok(())
}
