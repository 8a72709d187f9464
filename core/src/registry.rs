//! Registry of readings, mappers and resolved conversion paths.
//!
//! Built once at initialization through [`RegistryBuilder`] and shared
//! read-only afterwards.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

use crate::bridge::{BridgeChain, MappingPath};
use crate::data::MappingTableData;
use crate::dialect::{DialectConfig, OptionValue};
use crate::entity::ConversionDirection;
use crate::error::{ConfigError, UnsupportedError};
use crate::mapper::{DialectMapper, EntityMapper};
use crate::reading::Reading;

#[derive(Default)]
pub struct RegistryBuilder {
    readings: Vec<Arc<dyn Reading>>,
    mappers: AHashMap<ConversionDirection, Arc<dyn EntityMapper>>,
    pivots: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_reading(&mut self, reading: Arc<dyn Reading>) -> Result<&mut Self, ConfigError> {
        if self.readings.iter().any(|r| r.name() == reading.name()) {
            return Err(ConfigError::DuplicateReading(reading.name().to_owned()));
        }
        self.readings.push(reading);
        Ok(self)
    }

    pub fn register_mapper(&mut self, mapper: Arc<dyn EntityMapper>) -> Result<&mut Self, ConfigError> {
        let direction = mapper.direction().clone();
        if self.mappers.contains_key(&direction) {
            return Err(ConfigError::DuplicateMapper(direction));
        }
        self.mappers.insert(direction, mapper);
        Ok(self)
    }

    /// Builds a table mapper from data and registers it. Both readings must
    /// already be registered.
    pub fn register_table(&mut self, data: &MappingTableData) -> Result<&mut Self, ConfigError> {
        let source = self.find(&data.source, data)?;
        let target = self.find(&data.target, data)?;
        let mapper = data.build(source.as_ref(), target.as_ref())?;
        self.register_mapper(Arc::new(mapper))
    }

    /// Pivot readings tried, in order, for directions without a direct mapper.
    pub fn pivot_priority<I, S>(&mut self, pivots: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pivots = pivots.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<ConversionRegistry, ConfigError> {
        let mut readings = AHashMap::new();
        let mut defaults = AHashMap::new();
        let mut order = Vec::new();
        for reading in self.readings {
            let name = reading.name().to_owned();
            reading
                .option_schema()
                .validate()
                .map_err(|message| ConfigError::InvalidSchema {
                    reading: name.clone(),
                    message,
                })?;
            defaults.insert(name.clone(), reading.default_options());
            order.push(name.clone());
            readings.insert(name, reading);
        }

        let mut mappers = self.mappers;
        for direction in mappers.keys() {
            for name in [&direction.source, &direction.target] {
                if !readings.contains_key(name) {
                    return Err(ConfigError::UnknownReading {
                        direction: direction.clone(),
                        reading: name.clone(),
                    });
                }
            }
        }
        for name in &order {
            mappers
                .entry(ConversionDirection::new(name, name))
                .or_insert_with(|| Arc::new(DialectMapper::new(name)));
        }
        for pivot in &self.pivots {
            if !readings.contains_key(pivot) {
                return Err(ConfigError::UnknownPivot(pivot.clone()));
            }
        }

        let mut paths = AHashMap::new();
        let chain = BridgeChain::new(&mappers, &self.pivots);
        for source in &order {
            for target in &order {
                let direction = ConversionDirection::new(source, target);
                if let Ok(path) = chain.resolve(&direction) {
                    paths.insert(direction, path);
                }
            }
        }
        debug!(
            readings = order.len(),
            mappers = mappers.len(),
            paths = paths.len(),
            "conversion registry built"
        );

        Ok(ConversionRegistry {
            readings,
            order,
            defaults,
            paths,
            pivots: self.pivots,
        })
    }

    fn find(&self, name: &str, data: &MappingTableData) -> Result<Arc<dyn Reading>, ConfigError> {
        self.readings
            .iter()
            .find(|r| r.name() == name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownReading {
                direction: data.direction(),
                reading: name.to_owned(),
            })
    }
}

pub struct ConversionRegistry {
    readings: AHashMap<String, Arc<dyn Reading>>,
    order: Vec<String>,
    defaults: AHashMap<String, DialectConfig>,
    paths: AHashMap<ConversionDirection, MappingPath>,
    pivots: Vec<String>,
}

impl ConversionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn reading(&self, name: &str) -> Result<&Arc<dyn Reading>, UnsupportedError> {
        self.readings
            .get(name)
            .ok_or_else(|| UnsupportedError::Reading(name.to_owned()))
    }

    /// Reading names in registration order.
    pub fn readings(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn pivots(&self) -> &[String] {
        &self.pivots
    }

    pub fn default_options(&self, reading: &str) -> Result<DialectConfig, UnsupportedError> {
        self.defaults
            .get(reading)
            .cloned()
            .ok_or_else(|| UnsupportedError::Reading(reading.to_owned()))
    }

    /// The reading's defaults with `overrides` applied.
    pub fn dialect<I, K, V>(&self, reading: &str, overrides: I) -> Result<DialectConfig, UnsupportedError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        let schema = self.reading(reading)?.option_schema();
        self.default_options(reading)?.with(schema, overrides)
    }

    pub fn resolve(&self, direction: &ConversionDirection) -> Result<&MappingPath, UnsupportedError> {
        self.reading(&direction.source)?;
        self.reading(&direction.target)?;
        self.paths.get(direction).ok_or_else(|| UnsupportedError::Direction {
            from: direction.source.clone(),
            to: direction.target.clone(),
        })
    }

    pub fn supported_directions(&self) -> BTreeSet<ConversionDirection> {
        self.paths.keys().cloned().collect()
    }

    pub fn is_conversion_supported(&self, source: &str, target: &str) -> bool {
        self.paths.contains_key(&ConversionDirection::new(source, target))
    }
}
