//! Writes segments back to text under a target dialect.

use std::sync::Arc;

use crate::decomposer::Decomposer;
use crate::dialect::DialectConfig;
use crate::entity::{Entity, Segment};
use crate::error::{ConversionError, UnsupportedError};
use crate::reading::{Reading, SeparatorPolicy};
use crate::tone::ToneCodec;

/// Composer for one (reading, dialect).
///
/// Carries its own [`Decomposer`] to decide whether two adjacent entities need
/// a separator: one is written when the joined surfaces would not decompose
/// back into the same two entities.
#[derive(Debug)]
pub struct Composer {
    decomposer: Decomposer,
}

impl Composer {
    pub fn new(reading: Arc<dyn Reading>, dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        Ok(Self::from_decomposer(Decomposer::new(reading, dialect)?))
    }

    pub fn from_decomposer(decomposer: Decomposer) -> Self {
        Self { decomposer }
    }

    pub fn decomposer(&self) -> &Decomposer {
        &self.decomposer
    }

    pub fn reading(&self) -> &Arc<dyn Reading> {
        self.decomposer.reading()
    }

    pub fn dialect(&self) -> &DialectConfig {
        self.decomposer.dialect()
    }

    /// Canonical surface of one entity, tone rendered and case applied.
    pub fn spell_entity(&self, entity: &Entity) -> Result<String, ConversionError> {
        let (_, surface) = self.render(entity)?;
        Ok(entity.case().apply(&surface))
    }

    pub fn compose(&self, segments: &[Segment]) -> Result<String, ConversionError> {
        let mut out = String::new();
        let mut previous: Option<(Entity, String)> = None;
        for segment in segments {
            match segment {
                Segment::Passthrough(text) => {
                    out.push_str(text);
                    previous = None;
                }
                Segment::ReadingEntity(entity) => {
                    let (rendered, surface) = self.render(entity)?;
                    if let Some((prev_entity, prev_surface)) = &previous {
                        if self.needs_separator(prev_entity, prev_surface, &rendered, &surface) {
                            if let Some(separator) = self.reading().separator_before(&rendered, self.dialect()) {
                                out.push_str(&separator);
                            }
                        }
                    }
                    out.push_str(&entity.case().apply(&surface));
                    previous = Some((rendered, surface));
                }
            }
        }
        Ok(out)
    }

    /// Rendered entity and its lowercase canonical surface.
    fn render(&self, entity: &Entity) -> Result<(Entity, String), ConversionError> {
        let reading = self.reading();
        if !self.decomposer.has_syllable(entity.syllable()) {
            return Err(ConversionError::not_in_vocabulary(reading.name(), entity));
        }
        let rendered = reading.render_tone(entity, reading.name(), self.dialect())?;
        let surface = reading
            .spell(rendered.syllable(), rendered.tone(), self.dialect())
            .into_iter()
            .next()
            .ok_or_else(|| ConversionError::tone_not_expressible(reading.name(), &rendered))?;
        Ok((rendered, surface))
    }

    fn needs_separator(&self, left: &Entity, left_surface: &str, right: &Entity, right_surface: &str) -> bool {
        match self.reading().separator_policy() {
            SeparatorPolicy::Never => false,
            SeparatorPolicy::Always => true,
            SeparatorPolicy::WhenAmbiguous => {
                let joined = format!("{left_surface}{right_surface}");
                !self.decomposer.decomposes_to(&joined, &[left, right])
            }
        }
    }
}
