//! The conversion pipeline.
//!
//! `Start → Decomposed → ToneNormalized → Mapped → Composed → Done`; any
//! stage may end in `Failed`. Requests share no mutable state except the
//! composer cache, whose entries are immutable once built.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use tracing::{debug, trace};

use crate::bridge::MappingPath;
use crate::composer::Composer;
use crate::dialect::DialectConfig;
use crate::entity::{ConversionDirection, Entity, Segment};
use crate::error::{
    AmbiguousConversionError, ConversionError, DecompositionError, DecompositionFailure, ErrorKind, ReadingError,
};
use crate::hooks::{HookStage, PhonologicalHook};
use crate::mapper::{EntityMapper, MappingContext};
use crate::reading::Reading;
use crate::registry::ConversionRegistry;
use crate::tone::ToneCodec;

const DEFAULT_CACHE_CAPACITY: usize = 64;

/// What to do when an entity maps to several candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disambiguation {
    /// Fail with `AmbiguousConversionError`.
    #[default]
    Strict,
    /// Keep the highest-priority candidate at every mapping stage.
    PreferFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionOptions {
    pub disambiguation: Disambiguation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Start,
    Decomposed,
    ToneNormalized,
    Mapped,
    Composed,
    Done,
    Failed(ErrorKind),
}

/// Entity position carried through mapping stages.
#[derive(Debug, Clone)]
enum Slot {
    Entity { origin: Entity, candidates: Vec<Entity> },
    Passthrough(String),
}

/// Conversion engine over a [`ConversionRegistry`].
///
/// Decomposers and composers are built lazily per dialect and kept in an LRU
/// cache.
pub struct Engine {
    registry: Arc<ConversionRegistry>,
    cache: Mutex<LruCache<DialectConfig, Arc<Composer>>>,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

impl Engine {
    pub fn new(registry: ConversionRegistry) -> Self {
        Self::with_cache_capacity(registry, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(registry: ConversionRegistry, capacity: usize) -> Self {
        Self {
            registry: Arc::new(registry),
            cache: Mutex::new(LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN))),
            cache_hits: AtomicUsize::new(0),
            cache_misses: AtomicUsize::new(0),
        }
    }

    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    /// Convert `text` from the `source` dialect to the `target` dialect.
    pub fn convert(
        &self,
        text: &str,
        source: &DialectConfig,
        target: &DialectConfig,
        options: &ConversionOptions,
    ) -> Result<String, ReadingError> {
        self.convert_traced(text, source, target, options).1
    }

    /// Like [`Engine::convert`], also returning the state the request ended in.
    pub fn convert_traced(
        &self,
        text: &str,
        source: &DialectConfig,
        target: &DialectConfig,
        options: &ConversionOptions,
    ) -> (ConversionState, Result<String, ReadingError>) {
        let direction = ConversionDirection::new(source.reading(), target.reading());
        let mut state = ConversionState::Start;
        let result = self.run(text, &direction, source, target, options, &mut state);
        match &result {
            Ok(_) => debug!(%direction, "conversion done"),
            Err(err) => {
                debug!(%direction, ?state, error = %err, "conversion failed");
                state = ConversionState::Failed(err.kind());
            }
        }
        (state, result)
    }

    /// Convert a list of single entities, each on its own.
    pub fn convert_entities(
        &self,
        entities: &[&str],
        source: &DialectConfig,
        target: &DialectConfig,
        options: &ConversionOptions,
    ) -> Result<Vec<String>, ReadingError> {
        let decomposer = self.composer(source)?;
        entities
            .iter()
            .map(|surface| {
                if !decomposer.decomposer().is_reading_entity(surface) {
                    return Err(DecompositionError {
                        reading: source.reading().to_owned(),
                        chunk: (*surface).to_owned(),
                        offset: 0,
                        failure: DecompositionFailure::Unsegmentable,
                    }
                    .into());
                }
                self.convert(surface, source, target, options)
            })
            .collect()
    }

    pub fn decompose(&self, text: &str, dialect: &DialectConfig) -> Result<Vec<Segment>, ReadingError> {
        Ok(self.composer(dialect)?.decomposer().decompose(text)?)
    }

    /// Every decomposition of `text`; see [`crate::Decomposer::decompositions`].
    pub fn decompositions(&self, text: &str, dialect: &DialectConfig) -> Result<Vec<Vec<Segment>>, ReadingError> {
        Ok(self.composer(dialect)?.decomposer().decompositions(text))
    }

    pub fn compose(&self, segments: &[Segment], dialect: &DialectConfig) -> Result<String, ReadingError> {
        Ok(self.composer(dialect)?.compose(segments)?)
    }

    pub fn is_reading_entity(&self, surface: &str, dialect: &DialectConfig) -> Result<bool, ReadingError> {
        Ok(self.composer(dialect)?.decomposer().is_reading_entity(surface))
    }

    /// Default options of `reading` adjusted to what `text` looks like.
    pub fn guess_dialect(&self, text: &str, reading: &str) -> Result<DialectConfig, ReadingError> {
        let overrides = self.registry.reading(reading)?.guess_dialect(text);
        Ok(self.registry.dialect(reading, overrides)?)
    }

    /// Cached composer (and decomposer) for `dialect`.
    pub fn composer(&self, dialect: &DialectConfig) -> Result<Arc<Composer>, ReadingError> {
        if let Some(hit) = self.lock_cache().get(dialect) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit.clone());
        }
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        let reading = self.registry.reading(dialect.reading())?.clone();
        let composer = Arc::new(Composer::new(reading, dialect)?);
        self.lock_cache().put(dialect.clone(), composer.clone());
        Ok(composer)
    }

    /// `(hits, misses)` of the composer cache.
    pub fn cache_stats(&self) -> (usize, usize) {
        (
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_misses.load(Ordering::Relaxed),
        )
    }

    pub fn cache_size(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<DialectConfig, Arc<Composer>>> {
        // Entries are immutable, so a poisoned lock still holds a usable cache.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn run(
        &self,
        text: &str,
        direction: &ConversionDirection,
        source: &DialectConfig,
        target: &DialectConfig,
        options: &ConversionOptions,
        state: &mut ConversionState,
    ) -> Result<String, ReadingError> {
        let path = self.registry.resolve(direction)?;
        let source_reading = self.registry.reading(source.reading())?;
        let target_reading = self.registry.reading(target.reading())?;
        let source_composer = self.composer(source)?;
        let target_composer = self.composer(target)?;

        let segments = source_composer.decomposer().decompose(text)?;
        advance(state, ConversionState::Decomposed);

        let segments: Vec<Segment> = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::ReadingEntity(e) => Segment::ReadingEntity(source_reading.normalize_tone(e, source)),
                other => other,
            })
            .collect();
        advance(state, ConversionState::ToneNormalized);

        let segments = retarget_separators(
            segments,
            source_reading.as_ref(),
            source,
            target_reading.as_ref(),
            target,
        );
        let mut slots: Vec<Slot> = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::ReadingEntity(e) => Slot::Entity {
                    origin: e.clone(),
                    candidates: vec![e],
                },
                Segment::Passthrough(t) => Slot::Passthrough(t),
            })
            .collect();

        match path {
            MappingPath::Direct(mapper) => {
                slots = self.map_stage(mapper.as_ref(), slots, source, target, options)?;
            }
            MappingPath::Bridged { first, pivot, second } => {
                let pivot_dialect = self.registry.default_options(pivot)?;
                trace!(%direction, pivot = pivot.as_str(), "bridging");
                slots = self.map_stage(first.as_ref(), slots, source, &pivot_dialect, options)?;
                slots = self.map_stage(second.as_ref(), slots, &pivot_dialect, target, options)?;
            }
        }
        advance(state, ConversionState::Mapped);

        let mut segments = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Passthrough(t) => segments.push(Segment::Passthrough(t)),
                Slot::Entity { origin, mut candidates } => match candidates.len() {
                    0 => return Err(ConversionError::no_mapping(direction, &origin).into()),
                    1 => segments.extend(candidates.pop().map(Segment::ReadingEntity)),
                    _ => {
                        return Err(AmbiguousConversionError {
                            direction: direction.clone(),
                            entity: origin.to_string(),
                            candidates: candidates
                                .iter()
                                .map(|c| target_composer.spell_entity(c).unwrap_or_else(|_| c.to_string()))
                                .collect(),
                        }
                        .into())
                    }
                },
            }
        }

        let output = target_composer.compose(&segments)?;
        advance(state, ConversionState::Composed);
        advance(state, ConversionState::Done);
        Ok(output)
    }

    fn map_stage(
        &self,
        mapper: &dyn EntityMapper,
        slots: Vec<Slot>,
        from: &DialectConfig,
        to: &DialectConfig,
        options: &ConversionOptions,
    ) -> Result<Vec<Slot>, ReadingError> {
        let source_reading = self.registry.reading(from.reading())?;
        let target_reading = self.registry.reading(to.reading())?;
        let ctx = MappingContext {
            source_reading: source_reading.as_ref(),
            source: from,
            target_reading: target_reading.as_ref(),
            target: to,
        };

        let mut slots = slots;
        for binding in mapper.hooks(HookStage::BeforeMapping, to) {
            slots = apply_hook_to_slots(binding.hook.as_ref(), slots);
        }

        let mut mapped = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Passthrough(text) => mapped.push(Slot::Passthrough(mapper.map_passthrough(&text))),
                Slot::Entity { origin, candidates } => {
                    let mut next: Vec<Entity> = Vec::new();
                    for candidate in &candidates {
                        for entity in mapper.map_entity(candidate, &ctx)? {
                            if !next.contains(&entity) {
                                next.push(entity);
                            }
                        }
                    }
                    if options.disambiguation == Disambiguation::PreferFirst {
                        next.truncate(1);
                    }
                    mapped.push(Slot::Entity {
                        origin,
                        candidates: next,
                    });
                }
            }
        }

        for binding in mapper.hooks(HookStage::AfterMapping, to) {
            mapped = apply_hook_to_slots(binding.hook.as_ref(), mapped);
        }
        Ok(mapped)
    }
}

fn advance(state: &mut ConversionState, next: ConversionState) {
    trace!(from = ?*state, to = ?next, "conversion state");
    *state = next;
}

/// Runs a hook over the entity slots.
///
/// Neighbors are read from each slot's first candidate, the one
/// `PreferFirst` would keep. Every candidate of an ambiguous slot is adjusted
/// on its own; a candidate the hook would split or drop stays as it was.
fn apply_hook_to_slots(hook: &dyn PhonologicalHook, slots: Vec<Slot>) -> Vec<Slot> {
    let sequence: Option<Vec<Entity>> = slots
        .iter()
        .filter_map(|slot| match slot {
            Slot::Entity { candidates, .. } => Some(candidates.first().cloned()),
            Slot::Passthrough(_) => None,
        })
        .collect();
    let Some(mut sequence) = sequence else {
        return slots;
    };

    let mut out = Vec::with_capacity(slots.len());
    let mut position = 0;
    for slot in slots {
        match slot {
            Slot::Entity { origin, candidates } if candidates.len() == 1 => {
                for entity in hook.adjust(&sequence, position) {
                    out.push(Slot::Entity {
                        origin: origin.clone(),
                        candidates: vec![entity],
                    });
                }
                position += 1;
            }
            Slot::Entity { origin, candidates } => {
                let first = sequence[position].clone();
                let mut adjusted: Vec<Entity> = Vec::with_capacity(candidates.len());
                for candidate in candidates {
                    sequence[position] = candidate.clone();
                    let mut replacement = hook.adjust(&sequence, position);
                    let entity = match (replacement.pop(), replacement.is_empty()) {
                        (Some(entity), true) => entity,
                        _ => {
                            trace!(hook = hook.name(), %candidate, "kept unadjusted");
                            candidate
                        }
                    };
                    if !adjusted.contains(&entity) {
                        adjusted.push(entity);
                    }
                }
                sequence[position] = first;
                out.push(Slot::Entity {
                    origin,
                    candidates: adjusted,
                });
                position += 1;
            }
            passthrough => out.push(passthrough),
        }
    }
    out
}

/// Separators between two entities follow the target's convention within one
/// reading and are left to the composer across readings, or when the target
/// does not keep them. Whitespace is never touched.
fn retarget_separators(
    segments: Vec<Segment>,
    source_reading: &dyn Reading,
    source: &DialectConfig,
    target_reading: &dyn Reading,
    target: &DialectConfig,
) -> Vec<Segment> {
    let separators = source_reading.separators(source);
    if separators.is_empty() {
        return segments;
    }
    let keep = source_reading.name() == target_reading.name() && target_reading.keeps_separators(target);

    let mut out = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let next = segments.get(i + 1).and_then(Segment::entity);
        match (segment, next) {
            (Segment::Passthrough(text), Some(next))
                if i > 0
                    && segments[i - 1].is_entity()
                    && !text.trim().is_empty()
                    && separators.iter().any(|s| s == text) =>
            {
                if keep {
                    out.extend(target_reading.separator_before(next, target).map(Segment::Passthrough));
                }
            }
            (other, _) => out.push(other.clone()),
        }
    }
    out
}
