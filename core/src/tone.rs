//! Tone codec contract and shared tone-mark helpers.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::dialect::{DialectConfig, MISSING_TONE_MARK};
use crate::entity::{Entity, Tone};
use crate::error::ConversionError;

pub const MACRON: char = '\u{0304}';
pub const ACUTE: char = '\u{0301}';
pub const CARON: char = '\u{030C}';
pub const GRAVE: char = '\u{0300}';

/// How tones are written. Readings accept the subset that applies to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToneMarkType {
    Diacritics,
    Numbers,
    SuperscriptNumbers,
    Braille,
    Marks,
    ChaoLetters,
    ChaoDigits,
    None,
}

impl ToneMarkType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "diacritics" => ToneMarkType::Diacritics,
            "numbers" => ToneMarkType::Numbers,
            "superscriptNumbers" => ToneMarkType::SuperscriptNumbers,
            "braille" => ToneMarkType::Braille,
            "marks" => ToneMarkType::Marks,
            "chaoLetters" => ToneMarkType::ChaoLetters,
            "chaoDigits" => ToneMarkType::ChaoDigits,
            "none" => ToneMarkType::None,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            ToneMarkType::Diacritics => "diacritics",
            ToneMarkType::Numbers => "numbers",
            ToneMarkType::SuperscriptNumbers => "superscriptNumbers",
            ToneMarkType::Braille => "braille",
            ToneMarkType::Marks => "marks",
            ToneMarkType::ChaoLetters => "chaoLetters",
            ToneMarkType::ChaoDigits => "chaoDigits",
            ToneMarkType::None => "none",
        }
    }
}

/// Policy for tones that are missing on input or cannot be written on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingToneMark {
    Error,
    Ignore,
    Substitute(Tone),
}

impl MissingToneMark {
    pub fn from_dialect(dialect: &DialectConfig, tones: &[Tone]) -> Self {
        match dialect.text(MISSING_TONE_MARK) {
            "ignore" => MissingToneMark::Ignore,
            name => match Tone::find(tones, name) {
                Some(tone) => MissingToneMark::Substitute(tone),
                None => MissingToneMark::Error,
            },
        }
    }
}

/// Encodes and decodes the tone of an entity under a dialect.
///
/// The decomposer builds its surface table from [`ToneCodec::spell`] over
/// [`ToneCodec::parse_tones`]; the composer writes the first spelling.
pub trait ToneCodec: Send + Sync {
    /// The reading's tone inventory.
    fn tones(&self) -> &[Tone];

    /// Tone carried by a syllable written without a mark, or `None` when the
    /// selected encoding leaves unmarked syllables without tone information.
    fn unmarked_tone(&self, dialect: &DialectConfig) -> Option<Tone>;

    /// Every surface of `syllable` with `tone`, canonical spelling first.
    /// `None` spells the bare syllable. Empty when the pair cannot be written.
    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String>;

    /// Whether `tone` (or "unknown") can be written under `dialect`.
    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        match tone {
            Some(_) => true,
            None => self.unmarked_tone(dialect).is_none(),
        }
    }

    /// Tones recognised on input.
    fn parse_tones(&self, dialect: &DialectConfig) -> Vec<Option<Tone>> {
        let mut tones: Vec<Option<Tone>> = self
            .tones()
            .iter()
            .copied()
            .map(Some)
            .filter(|t| self.can_express(*t, dialect))
            .collect();
        if self.can_express(None, dialect) {
            tones.push(None);
        }
        tones
    }

    /// Narrows tone candidates coming from another reading.
    fn narrow_tones(&self, candidates: Vec<Tone>, _dialect: &DialectConfig) -> Vec<Tone> {
        candidates
    }

    fn missing_tone_mark(&self, dialect: &DialectConfig) -> MissingToneMark {
        MissingToneMark::from_dialect(dialect, self.tones())
    }

    /// Applies the decode side of `missingToneMark`.
    fn normalize_tone(&self, entity: Entity, dialect: &DialectConfig) -> Entity {
        if entity.tone().is_none() && self.unmarked_tone(dialect).is_none() {
            if let MissingToneMark::Substitute(tone) = self.missing_tone_mark(dialect) {
                return entity.with_tone(Some(tone));
            }
        }
        entity
    }

    /// Makes the entity's tone writable under `dialect`, or fails.
    fn render_tone(&self, entity: &Entity, reading: &str, dialect: &DialectConfig) -> Result<Entity, ConversionError> {
        if self.can_express(entity.tone(), dialect) {
            return Ok(entity.clone());
        }
        match self.missing_tone_mark(dialect) {
            MissingToneMark::Ignore => Ok(entity.clone().with_tone(None)),
            MissingToneMark::Substitute(tone) if self.can_express(Some(tone), dialect) => {
                Ok(entity.clone().with_tone(Some(tone)))
            }
            _ => Err(ConversionError::tone_not_expressible(reading, entity)),
        }
    }
}

/// Puts the combining `mark` after the character at `index` and recomposes.
pub fn place_mark(syllable: &str, index: usize, mark: char) -> String {
    let mut out = String::with_capacity(syllable.len() + 2);
    for (i, ch) in syllable.chars().enumerate() {
        out.push(ch);
        if i == index {
            out.push(mark);
        }
    }
    out.nfc().collect()
}

/// Character indices of `vowels` in `syllable`.
pub fn vowel_positions(syllable: &str, vowels: &[char]) -> Vec<usize> {
    syllable
        .chars()
        .enumerate()
        .filter(|(_, c)| vowels.contains(c))
        .map(|(i, _)| i)
        .collect()
}

pub fn superscript(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}
