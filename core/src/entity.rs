//! Entities, segments and conversion directions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tone of some reading, identified by its name in that reading's inventory
/// (e.g. `"3"` for Pinyin, `"1stToneFalling"` for Cantonese Yale).
///
/// Tones are only meaningful together with the reading that declared them;
/// mappers translate between inventories through tone tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tone(&'static str);

impl Tone {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }

    /// Look a tone up by name in an inventory.
    pub fn find(inventory: &[Tone], name: &str) -> Option<Tone> {
        inventory.iter().copied().find(|t| t.0 == name)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Letter case of an entity as found in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LetterCase {
    #[default]
    Lower,
    Title,
    Upper,
}

impl LetterCase {
    /// Classify the cased letters of `surface`.
    ///
    /// Surfaces without cased letters, or with a mix that is neither title nor
    /// upper case, count as lower case.
    pub fn detect(surface: &str) -> Self {
        let cased: Vec<char> = surface
            .chars()
            .filter(|c| c.is_uppercase() || c.is_lowercase())
            .collect();
        let Some((first, rest)) = cased.split_first() else {
            return LetterCase::Lower;
        };
        if !first.is_uppercase() {
            return LetterCase::Lower;
        }
        if rest.is_empty() || rest.iter().all(|c| c.is_lowercase()) {
            LetterCase::Title
        } else if rest.iter().all(|c| c.is_uppercase()) {
            LetterCase::Upper
        } else {
            LetterCase::Lower
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            LetterCase::Lower => text.to_owned(),
            LetterCase::Upper => text.to_uppercase(),
            LetterCase::Title => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// One syllable of a reading: canonical base syllable, optional tone and the
/// letter case it was written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    syllable: String,
    tone: Option<Tone>,
    case: LetterCase,
}

impl Entity {
    pub fn new(syllable: impl Into<String>, tone: Option<Tone>) -> Self {
        Self {
            syllable: syllable.into(),
            tone,
            case: LetterCase::Lower,
        }
    }

    pub fn syllable(&self) -> &str {
        &self.syllable
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    pub fn case(&self) -> LetterCase {
        self.case
    }

    pub fn with_tone(mut self, tone: Option<Tone>) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_case(mut self, case: LetterCase) -> Self {
        self.case = case;
        self
    }

    pub fn with_syllable(mut self, syllable: impl Into<String>) -> Self {
        self.syllable = syllable.into();
        self
    }

    /// Same syllable and tone, case ignored.
    pub fn same_sound(&self, other: &Entity) -> bool {
        self.syllable == other.syllable && self.tone == other.tone
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tone {
            Some(tone) => write!(f, "{}[{}]", self.syllable, tone),
            None => f.write_str(&self.syllable),
        }
    }
}

/// Unit of decomposed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    ReadingEntity(Entity),
    Passthrough(String),
}

impl Segment {
    pub fn passthrough(text: impl Into<String>) -> Self {
        Segment::Passthrough(text.into())
    }

    pub fn entity(&self) -> Option<&Entity> {
        match self {
            Segment::ReadingEntity(e) => Some(e),
            Segment::Passthrough(_) => None,
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Segment::ReadingEntity(_))
    }
}

impl From<Entity> for Segment {
    fn from(entity: Entity) -> Self {
        Segment::ReadingEntity(entity)
    }
}

/// Ordered pair of reading names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversionDirection {
    pub source: String,
    pub target: String,
}

impl ConversionDirection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Source and target are the same reading.
    pub fn is_dialect_conversion(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}
