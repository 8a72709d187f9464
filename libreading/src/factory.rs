//! Reading factory
//!
//! High-level entry point over the core `Engine`: readings are named by
//! string, options are given as `(name, value)` pairs and validated against
//! the reading's schema before anything else runs.
//!
//! The inner engine is wrapped in `Arc`, so clones share the registry and the
//! composer cache.

use std::collections::BTreeSet;
use std::sync::Arc;

use libreading_core::{
    ConfigError, ConversionDirection, ConversionOptions, ConversionRegistry, DialectConfig, DialectOptions, Engine,
    MappingTableData, OptionValue, ReadingError, Segment,
};
use tracing::debug;

/// Option overrides keyed by option name.
pub type Options<'a> = [(&'a str, OptionValue)];

#[derive(Clone)]
pub struct ReadingFactory {
    inner: Arc<Engine>,
}

impl ReadingFactory {
    /// Factory over [`crate::standard_registry`].
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_tables(&[])
    }

    /// Standard registry plus extra mapping tables, e.g. loaded with
    /// [`MappingTableData::from_toml_str`]. Pivot paths are resolved with the
    /// extra tables in place.
    pub fn with_tables(tables: &[MappingTableData]) -> Result<Self, ConfigError> {
        let mut builder = crate::standard_builder()?;
        for table in tables {
            debug!(direction = %table.direction(), "registering mapping table");
            builder.register_table(table)?;
        }
        Ok(Self::from_registry(builder.build()?))
    }

    pub fn from_registry(registry: ConversionRegistry) -> Self {
        Self {
            inner: Arc::new(Engine::new(registry)),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.inner
    }

    pub fn registry(&self) -> &ConversionRegistry {
        self.inner.registry()
    }

    /// Converts `text` from reading `from` to reading `to`.
    ///
    /// `source_options` and `target_options` override the readings' default
    /// options. Ambiguous results fail; see [`ReadingFactory::convert_with`].
    pub fn convert(
        &self,
        text: &str,
        from: &str,
        to: &str,
        source_options: &Options<'_>,
        target_options: &Options<'_>,
    ) -> Result<String, ReadingError> {
        self.convert_with(text, from, to, source_options, target_options, &ConversionOptions::default())
    }

    pub fn convert_with(
        &self,
        text: &str,
        from: &str,
        to: &str,
        source_options: &Options<'_>,
        target_options: &Options<'_>,
        options: &ConversionOptions,
    ) -> Result<String, ReadingError> {
        let source = self.dialect(from, source_options)?;
        let target = self.dialect(to, target_options)?;
        self.inner.convert(text, &source, &target, options)
    }

    /// Converts between typed dialects, e.g. a `PinyinDialect` and a
    /// `YaleDialect`.
    pub fn convert_dialects<S, T>(&self, text: &str, source: &S, target: &T) -> Result<String, ReadingError>
    where
        S: DialectOptions,
        T: DialectOptions,
    {
        let source = self.dialect_from(source)?;
        let target = self.dialect_from(target)?;
        self.inner.convert(text, &source, &target, &ConversionOptions::default())
    }

    /// Converts single entities, each one on its own. Every item must be
    /// exactly one entity of the source reading.
    pub fn convert_entities(
        &self,
        entities: &[&str],
        from: &str,
        to: &str,
        source_options: &Options<'_>,
        target_options: &Options<'_>,
    ) -> Result<Vec<String>, ReadingError> {
        let source = self.dialect(from, source_options)?;
        let target = self.dialect(to, target_options)?;
        self.inner
            .convert_entities(entities, &source, &target, &ConversionOptions::default())
    }

    pub fn default_options(&self, reading: &str) -> Result<DialectConfig, ReadingError> {
        Ok(self.registry().default_options(reading)?)
    }

    /// Validated dialect of `reading` with `options` applied over its defaults.
    pub fn dialect(&self, reading: &str, options: &Options<'_>) -> Result<DialectConfig, ReadingError> {
        Ok(self.registry().dialect(reading, options.iter().cloned())?)
    }

    pub fn dialect_from<T: DialectOptions>(&self, options: &T) -> Result<DialectConfig, ReadingError> {
        Ok(self.registry().dialect(T::READING, options.overrides())?)
    }

    /// Typed options of `reading` read from `options` over the defaults.
    pub fn typed_dialect<T: DialectOptions>(&self, options: &Options<'_>) -> Result<T, ReadingError> {
        Ok(T::from_dialect(&self.dialect(T::READING, options)?)?)
    }

    pub fn decompose(&self, text: &str, reading: &str, options: &Options<'_>) -> Result<Vec<Segment>, ReadingError> {
        let dialect = self.dialect(reading, options)?;
        self.inner.decompose(text, &dialect)
    }

    /// Every way `text` splits into entities of `reading`, best first.
    pub fn decompositions(
        &self,
        text: &str,
        reading: &str,
        options: &Options<'_>,
    ) -> Result<Vec<Vec<Segment>>, ReadingError> {
        let dialect = self.dialect(reading, options)?;
        self.inner.decompositions(text, &dialect)
    }

    pub fn compose(&self, segments: &[Segment], reading: &str, options: &Options<'_>) -> Result<String, ReadingError> {
        let dialect = self.dialect(reading, options)?;
        self.inner.compose(segments, &dialect)
    }

    pub fn is_reading_entity(&self, surface: &str, reading: &str, options: &Options<'_>) -> Result<bool, ReadingError> {
        let dialect = self.dialect(reading, options)?;
        self.inner.is_reading_entity(surface, &dialect)
    }

    pub fn supported_directions(&self) -> BTreeSet<ConversionDirection> {
        self.registry().supported_directions()
    }

    pub fn is_conversion_supported(&self, from: &str, to: &str) -> bool {
        self.registry().is_conversion_supported(from, to)
    }

    /// Dialect of `reading` guessed from how `text` is written.
    pub fn guess_dialect(&self, text: &str, reading: &str) -> Result<DialectConfig, ReadingError> {
        self.inner.guess_dialect(text, reading)
    }

    pub fn readings(&self) -> Vec<&str> {
        self.registry().readings().collect()
    }
}
