/// Typed dialect options for the Cantonese readings.
///
/// Both structs flatten the options every reading carries (`CommonOptions`)
/// and add the reading's own tone options.
///
/// # Example
///
/// ```rust
/// use libcantonese::YaleDialect;
///
/// let dialect = YaleDialect::default();
/// assert_eq!(dialect.first_tone, "1stToneLevel");
/// ```
use serde::{Deserialize, Serialize};

use libreading_core::dialect::{STRICT_DIACRITIC_PLACEMENT, TONE_MARK_TYPE};
use libreading_core::{CommonOptions, DialectConfig, DialectOptions, OptionValue, ToneMarkType, UnsupportedError};

use crate::{jyutping, yale};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JyutpingDialect {
    #[serde(flatten)]
    pub common: CommonOptions,

    pub tone_mark_type: ToneMarkType,
}

impl Default for JyutpingDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            tone_mark_type: ToneMarkType::Numbers,
        }
    }
}

impl DialectOptions for JyutpingDialect {
    const READING: &'static str = jyutping::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            tone_mark_type: ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::Numbers),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        let mut overrides = vec![(TONE_MARK_TYPE.to_owned(), self.tone_mark_type.name().into())];
        overrides.extend(self.common.overrides());
        overrides
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YaleDialect {
    #[serde(flatten)]
    pub common: CommonOptions,

    pub tone_mark_type: ToneMarkType,
    pub strict_diacritic_placement: bool,
    /// "1stToneLevel" or "1stToneFalling".
    #[serde(rename = "YaleFirstTone")]
    pub first_tone: String,
}

impl Default for YaleDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            tone_mark_type: ToneMarkType::Diacritics,
            strict_diacritic_placement: false,
            first_tone: yale::FIRST_TONE_LEVEL.name().to_owned(),
        }
    }
}

impl DialectOptions for YaleDialect {
    const READING: &'static str = yale::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            tone_mark_type: ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::Diacritics),
            strict_diacritic_placement: dialect.flag(STRICT_DIACRITIC_PLACEMENT),
            first_tone: dialect.text(yale::YALE_FIRST_TONE).to_owned(),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        let mut overrides = vec![
            (TONE_MARK_TYPE.to_owned(), self.tone_mark_type.name().into()),
            (STRICT_DIACRITIC_PLACEMENT.to_owned(), self.strict_diacritic_placement.into()),
            (yale::YALE_FIRST_TONE.to_owned(), self.first_tone.clone().into()),
        ];
        overrides.extend(self.common.overrides());
        overrides
    }
}
