//! Mapping paths: direct mappers or one-hop bridges through a pivot reading.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::entity::ConversionDirection;
use crate::error::UnsupportedError;
use crate::mapper::EntityMapper;

/// How one direction is converted.
#[derive(Clone)]
pub enum MappingPath {
    Direct(Arc<dyn EntityMapper>),
    /// `source → pivot` then `pivot → target`, the pivot in its default
    /// dialect.
    Bridged {
        first: Arc<dyn EntityMapper>,
        pivot: String,
        second: Arc<dyn EntityMapper>,
    },
}

impl MappingPath {
    pub fn pivot(&self) -> Option<&str> {
        match self {
            MappingPath::Direct(_) => None,
            MappingPath::Bridged { pivot, .. } => Some(pivot),
        }
    }

    /// Mappers in application order.
    pub fn stages(&self) -> Vec<&Arc<dyn EntityMapper>> {
        match self {
            MappingPath::Direct(mapper) => vec![mapper],
            MappingPath::Bridged { first, second, .. } => vec![first, second],
        }
    }
}

impl fmt::Debug for MappingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingPath::Direct(mapper) => f.debug_tuple("Direct").field(mapper.direction()).finish(),
            MappingPath::Bridged { first, pivot, second } => f
                .debug_struct("Bridged")
                .field("first", first.direction())
                .field("pivot", pivot)
                .field("second", second.direction())
                .finish(),
        }
    }
}

/// Resolves directions against a set of direct mappers and a pivot priority
/// list.
pub struct BridgeChain<'a> {
    direct: &'a AHashMap<ConversionDirection, Arc<dyn EntityMapper>>,
    pivots: &'a [String],
}

impl<'a> BridgeChain<'a> {
    pub fn new(direct: &'a AHashMap<ConversionDirection, Arc<dyn EntityMapper>>, pivots: &'a [String]) -> Self {
        Self { direct, pivots }
    }

    /// A direct mapper wins; otherwise the first pivot, in priority order,
    /// with mappers on both legs. Bridges are never longer than one hop.
    pub fn resolve(&self, direction: &ConversionDirection) -> Result<MappingPath, UnsupportedError> {
        if let Some(mapper) = self.direct.get(direction) {
            return Ok(MappingPath::Direct(mapper.clone()));
        }
        for pivot in self.pivots {
            if *pivot == direction.source || *pivot == direction.target {
                continue;
            }
            let first = self.direct.get(&ConversionDirection::new(&direction.source, pivot));
            let second = self.direct.get(&ConversionDirection::new(pivot, &direction.target));
            if let (Some(first), Some(second)) = (first, second) {
                return Ok(MappingPath::Bridged {
                    first: first.clone(),
                    pivot: pivot.clone(),
                    second: second.clone(),
                });
            }
        }
        Err(UnsupportedError::Direction {
            from: direction.source.clone(),
            to: direction.target.clone(),
        })
    }
}
