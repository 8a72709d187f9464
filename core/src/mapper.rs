//! Entity mappers: translate entities of one reading into candidates of
//! another.

use std::fmt;

use ahash::AHashMap;

use crate::dialect::DialectConfig;
use crate::entity::{ConversionDirection, Entity, LetterCase, Tone};
use crate::error::ConversionError;
use crate::hooks::{HookBinding, HookStage};
use crate::reading::Reading;
use crate::tone::{MissingToneMark, ToneCodec};

/// Readings and dialects on both sides of one mapping stage.
pub struct MappingContext<'a> {
    pub source_reading: &'a dyn Reading,
    pub source: &'a DialectConfig,
    pub target_reading: &'a dyn Reading,
    pub target: &'a DialectConfig,
}

/// Maps single entities between two readings.
pub trait EntityMapper: Send + Sync {
    fn direction(&self) -> &ConversionDirection;

    /// Candidates for `entity`, in priority order. Never empty on success.
    fn map_entity(&self, entity: &Entity, ctx: &MappingContext<'_>) -> Result<Vec<Entity>, ConversionError>;

    /// Hooks active for the given target dialect, in application order.
    fn hooks(&self, _stage: HookStage, _target: &DialectConfig) -> Vec<HookBinding> {
        Vec::new()
    }

    /// Translation of passthrough text (punctuation conventions).
    fn map_passthrough(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// Mapper between two dialects of one reading: entities pass unchanged and
/// only the composer's tone rendering differs, apart from optional hooks.
#[derive(Debug, Clone)]
pub struct DialectMapper {
    direction: ConversionDirection,
    hooks: Vec<HookBinding>,
}

impl DialectMapper {
    pub fn new(reading: &str) -> Self {
        Self {
            direction: ConversionDirection::new(reading, reading),
            hooks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, binding: HookBinding) -> Self {
        self.hooks.push(binding);
        self
    }
}

impl EntityMapper for DialectMapper {
    fn direction(&self) -> &ConversionDirection {
        &self.direction
    }

    fn map_entity(&self, entity: &Entity, _ctx: &MappingContext<'_>) -> Result<Vec<Entity>, ConversionError> {
        Ok(vec![entity.clone()])
    }

    fn hooks(&self, stage: HookStage, target: &DialectConfig) -> Vec<HookBinding> {
        self.hooks
            .iter()
            .filter(|b| b.stage == stage && b.is_active(target))
            .cloned()
            .collect()
    }
}

/// Table-driven mapper: syllable entries, a tone table, a punctuation table
/// and optional hooks.
#[derive(Clone)]
pub struct TableMapper {
    direction: ConversionDirection,
    entries: AHashMap<String, Vec<String>>,
    tones: AHashMap<Tone, Vec<Tone>>,
    /// Longest source first.
    punctuation: Vec<(String, String)>,
    hooks: Vec<HookBinding>,
}

impl fmt::Debug for TableMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableMapper")
            .field("direction", &self.direction)
            .field("entries", &self.entries.len())
            .field("tones", &self.tones.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl TableMapper {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            direction: ConversionDirection::new(source, target),
            entries: AHashMap::new(),
            tones: AHashMap::new(),
            punctuation: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Appends `candidate` to the entry of `syllable` unless already present.
    pub fn insert(&mut self, syllable: &str, candidate: &str) {
        let entry = self.entries.entry(syllable.to_owned()).or_default();
        if !entry.iter().any(|c| c == candidate) {
            entry.push(candidate.to_owned());
        }
    }

    pub fn insert_tone(&mut self, from: Tone, to: Tone) {
        let entry = self.tones.entry(from).or_default();
        if !entry.contains(&to) {
            entry.push(to);
        }
    }

    pub fn insert_punctuation(&mut self, from: &str, to: &str) {
        if self.punctuation.iter().any(|(f, _)| f == from) {
            return;
        }
        self.punctuation.push((from.to_owned(), to.to_owned()));
        self.punctuation
            .sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    }

    pub fn with_hook(mut self, binding: HookBinding) -> Self {
        self.hooks.push(binding);
        self
    }

    pub fn entry(&self, syllable: &str) -> Option<&[String]> {
        self.entries.get(syllable).map(Vec::as_slice)
    }

    pub fn tone_entry(&self, tone: Tone) -> Option<&[Tone]> {
        self.tones.get(&tone).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The reverse table. Several source syllables sharing a target become
    /// one entry with several candidates. Hooks are not carried over.
    ///
    /// Candidate order follows `source_order`, normally the source reading's
    /// syllable list, so the result does not depend on hash order.
    pub fn inverted(&self, source_order: &[String]) -> TableMapper {
        let mut inverse = TableMapper::new(&self.direction.target, &self.direction.source);
        for syllable in source_order {
            if let Some(candidates) = self.entries.get(syllable) {
                for candidate in candidates {
                    inverse.insert(candidate, syllable);
                }
            }
        }
        let mut tones: Vec<(&Tone, &Vec<Tone>)> = self.tones.iter().collect();
        tones.sort();
        for (from, targets) in tones {
            for to in targets {
                inverse.insert_tone(*to, *from);
            }
        }
        for (from, to) in &self.punctuation {
            inverse.insert_punctuation(to, from);
        }
        inverse
    }

    fn tone_candidates(&self, entity: &Entity, ctx: &MappingContext<'_>) -> Result<Vec<Option<Tone>>, ConversionError> {
        let target = ctx.target_reading;
        match entity.tone() {
            Some(tone) => {
                let mapped = self
                    .tones
                    .get(&tone)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| ConversionError::no_tone_mapping(&self.direction, entity))?;
                let narrowed = target.narrow_tones(mapped.clone(), ctx.target);
                Ok(narrowed.into_iter().map(Some).collect())
            }
            None if target.can_express(None, ctx.target) => Ok(vec![None]),
            None => match target.missing_tone_mark(ctx.target) {
                MissingToneMark::Ignore => Ok(vec![None]),
                MissingToneMark::Substitute(tone) => Ok(vec![Some(tone)]),
                MissingToneMark::Error => {
                    let all: Vec<Option<Tone>> = target.parse_tones(ctx.target).into_iter().filter(Option::is_some).collect();
                    if all.is_empty() {
                        Err(ConversionError::no_tone_mapping(&self.direction, entity))
                    } else {
                        Ok(all)
                    }
                }
            },
        }
    }
}

impl EntityMapper for TableMapper {
    fn direction(&self) -> &ConversionDirection {
        &self.direction
    }

    fn map_entity(&self, entity: &Entity, ctx: &MappingContext<'_>) -> Result<Vec<Entity>, ConversionError> {
        let syllables = self
            .entries
            .get(entity.syllable())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ConversionError::no_mapping(&self.direction, entity))?;
        let tones = self.tone_candidates(entity, ctx)?;
        let case = if ctx.target_reading.is_cased() {
            entity.case()
        } else {
            LetterCase::Lower
        };
        Ok(syllables
            .iter()
            .flat_map(|syllable| {
                tones
                    .iter()
                    .map(move |tone| Entity::new(syllable.clone(), *tone).with_case(case))
            })
            .collect())
    }

    fn hooks(&self, stage: HookStage, target: &DialectConfig) -> Vec<HookBinding> {
        self.hooks
            .iter()
            .filter(|b| b.stage == stage && b.is_active(target))
            .cloned()
            .collect()
    }

    fn map_passthrough(&self, text: &str) -> String {
        if self.punctuation.is_empty() {
            return text.to_owned();
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        'outer: while !rest.is_empty() {
            for (from, to) in &self.punctuation {
                if let Some(tail) = rest.strip_prefix(from.as_str()) {
                    out.push_str(to);
                    rest = tail;
                    continue 'outer;
                }
            }
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
        out
    }
}
