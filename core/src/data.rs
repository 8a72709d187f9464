//! Mapping tables loaded from TOML or JSON.
//!
//! ```toml
//! source = "Pinyin"
//! target = "MandarinBraille"
//!
//! [entries]
//! mo = ["⠍⠢"]
//!
//! [tones]
//! "1" = ["1"]
//!
//! [punctuation]
//! "!" = "⠰⠂"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{ConversionDirection, Tone};
use crate::error::ConfigError;
use crate::mapper::TableMapper;
use crate::reading::Reading;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappingTableData {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub tones: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub punctuation: BTreeMap<String, String>,
}

impl MappingTableData {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn direction(&self) -> ConversionDirection {
        ConversionDirection::new(&self.source, &self.target)
    }

    /// Validates the table against both readings and builds the mapper.
    ///
    /// Every entry must be non-empty and name syllables of the respective
    /// readings; tone names must exist in the readings' inventories.
    pub fn build(&self, source: &dyn Reading, target: &dyn Reading) -> Result<TableMapper, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidTable {
            direction: self.direction(),
            message,
        };
        if source.name() != self.source || target.name() != self.target {
            return Err(invalid(format!(
                "readings {} → {} do not match the table",
                source.name(),
                target.name()
            )));
        }

        let mut mapper = TableMapper::new(&self.source, &self.target);
        for (syllable, candidates) in &self.entries {
            if candidates.is_empty() {
                return Err(invalid(format!("entry {syllable:?} has no candidates")));
            }
            if !source.syllables().contains(syllable) {
                return Err(invalid(format!("{syllable:?} is not a syllable of {}", self.source)));
            }
            for candidate in candidates {
                if !target.syllables().contains(candidate) {
                    return Err(invalid(format!("{candidate:?} is not a syllable of {}", self.target)));
                }
                mapper.insert(syllable, candidate);
            }
        }
        for (from, targets) in &self.tones {
            let from_tone = Tone::find(source.tones(), from)
                .ok_or_else(|| invalid(format!("unknown {} tone {from:?}", self.source)))?;
            if targets.is_empty() {
                return Err(invalid(format!("tone {from:?} has no candidates")));
            }
            for to in targets {
                let to_tone = Tone::find(target.tones(), to)
                    .ok_or_else(|| invalid(format!("unknown {} tone {to:?}", self.target)))?;
                mapper.insert_tone(from_tone, to_tone);
            }
        }
        for (from, to) in &self.punctuation {
            mapper.insert_punctuation(from, to);
        }
        Ok(mapper)
    }
}
