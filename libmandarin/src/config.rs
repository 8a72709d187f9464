/// Typed dialect options for the Mandarin readings.
///
/// Each struct is a view over a schema-validated `DialectConfig`:
/// - the options every reading carries (`CommonOptions`, flattened via serde)
/// - the reading's own options (tone marks, apostrophes, sandhi rules)
///
/// # Example
///
/// ```rust
/// use libmandarin::PinyinDialect;
/// use libreading_core::ToneMarkType;
///
/// let dialect = PinyinDialect {
///     tone_mark_type: ToneMarkType::Numbers,
///     ..PinyinDialect::default()
/// };
/// assert_eq!(dialect.y_vowel, "ü");
/// ```
use serde::{Deserialize, Serialize};

use libreading_core::dialect::{STRICT_DIACRITIC_PLACEMENT, TONE_MARK_TYPE};
use libreading_core::{CommonOptions, DialectConfig, DialectOptions, OptionValue, ToneMarkType, UnsupportedError};

use crate::{braille, gr, ipa, pinyin, wade_giles};

fn tone_mark_type(dialect: &DialectConfig, fallback: ToneMarkType) -> ToneMarkType {
    ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(fallback)
}

fn with_common(common: &CommonOptions, own: Vec<(String, OptionValue)>) -> Vec<(String, OptionValue)> {
    let mut overrides = own;
    overrides.extend(common.overrides());
    overrides
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinyinDialect {
    #[serde(flatten)]
    pub common: CommonOptions,

    pub tone_mark_type: ToneMarkType,
    pub strict_diacritic_placement: bool,
    pub pinyin_apostrophe: String,
    /// Keep apostrophes found in the input, even where not needed.
    pub keep_pinyin_apostrophes: bool,
    /// "ü" or "v".
    pub y_vowel: String,
    /// "twoSyllables" or "ignore".
    pub erhua: String,
    /// "auto", "on" or "off".
    pub break_up_erhua: String,
}

impl Default for PinyinDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            tone_mark_type: ToneMarkType::Diacritics,
            strict_diacritic_placement: false,
            pinyin_apostrophe: "'".to_owned(),
            keep_pinyin_apostrophes: false,
            y_vowel: "ü".to_owned(),
            erhua: "twoSyllables".to_owned(),
            break_up_erhua: "auto".to_owned(),
        }
    }
}

impl DialectOptions for PinyinDialect {
    const READING: &'static str = pinyin::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            tone_mark_type: tone_mark_type(dialect, ToneMarkType::Diacritics),
            strict_diacritic_placement: dialect.flag(STRICT_DIACRITIC_PLACEMENT),
            pinyin_apostrophe: dialect.text(pinyin::PINYIN_APOSTROPHE).to_owned(),
            keep_pinyin_apostrophes: dialect.flag(pinyin::KEEP_PINYIN_APOSTROPHES),
            y_vowel: dialect.text(pinyin::Y_VOWEL).to_owned(),
            erhua: dialect.text(pinyin::ERHUA_OPTION).to_owned(),
            break_up_erhua: dialect.text(pinyin::BREAK_UP_ERHUA).to_owned(),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        with_common(
            &self.common,
            vec![
                (TONE_MARK_TYPE.to_owned(), self.tone_mark_type.name().into()),
                (STRICT_DIACRITIC_PLACEMENT.to_owned(), self.strict_diacritic_placement.into()),
                (pinyin::PINYIN_APOSTROPHE.to_owned(), self.pinyin_apostrophe.clone().into()),
                (pinyin::KEEP_PINYIN_APOSTROPHES.to_owned(), self.keep_pinyin_apostrophes.into()),
                (pinyin::Y_VOWEL.to_owned(), self.y_vowel.clone().into()),
                (pinyin::ERHUA_OPTION.to_owned(), self.erhua.clone().into()),
                (pinyin::BREAK_UP_ERHUA.to_owned(), self.break_up_erhua.clone().into()),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WadeGilesDialect {
    #[serde(flatten)]
    pub common: CommonOptions,

    pub tone_mark_type: ToneMarkType,
    #[serde(rename = "WadeGilesApostrophe")]
    pub apostrophe: String,
}

impl Default for WadeGilesDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            tone_mark_type: ToneMarkType::Numbers,
            apostrophe: "’".to_owned(),
        }
    }
}

impl DialectOptions for WadeGilesDialect {
    const READING: &'static str = wade_giles::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            tone_mark_type: tone_mark_type(dialect, ToneMarkType::Numbers),
            apostrophe: dialect.text(wade_giles::WADE_GILES_APOSTROPHE).to_owned(),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        with_common(
            &self.common,
            vec![
                (TONE_MARK_TYPE.to_owned(), self.tone_mark_type.name().into()),
                (wade_giles::WADE_GILES_APOSTROPHE.to_owned(), self.apostrophe.clone().into()),
            ],
        )
    }
}

/// GR spells tones with letters, so there is no tone mark type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrDialect {
    #[serde(flatten)]
    pub common: CommonOptions,

    #[serde(rename = "GRSyllableSeparatorApostrophe")]
    pub syllable_separator_apostrophe: String,
    #[serde(rename = "GRRhotacisedFinalApostrophe")]
    pub rhotacised_final_apostrophe: String,
    #[serde(rename = "keepGRApostrophes")]
    pub keep_apostrophes: bool,
    /// "neutral" or "original".
    #[serde(rename = "GROptionalNeutralToneMapping")]
    pub optional_neutral_tone_mapping: String,
}

impl Default for GrDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            syllable_separator_apostrophe: "’".to_owned(),
            rhotacised_final_apostrophe: "’".to_owned(),
            keep_apostrophes: false,
            optional_neutral_tone_mapping: "neutral".to_owned(),
        }
    }
}

impl DialectOptions for GrDialect {
    const READING: &'static str = gr::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            syllable_separator_apostrophe: dialect.text(gr::SYLLABLE_SEPARATOR_APOSTROPHE).to_owned(),
            rhotacised_final_apostrophe: dialect.text(gr::RHOTACISED_FINAL_APOSTROPHE).to_owned(),
            keep_apostrophes: dialect.flag(gr::KEEP_GR_APOSTROPHES),
            optional_neutral_tone_mapping: dialect.text(gr::OPTIONAL_NEUTRAL_TONE_MAPPING).to_owned(),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        with_common(
            &self.common,
            vec![
                (
                    gr::SYLLABLE_SEPARATOR_APOSTROPHE.to_owned(),
                    self.syllable_separator_apostrophe.clone().into(),
                ),
                (
                    gr::RHOTACISED_FINAL_APOSTROPHE.to_owned(),
                    self.rhotacised_final_apostrophe.clone().into(),
                ),
                (gr::KEEP_GR_APOSTROPHES.to_owned(), self.keep_apostrophes.into()),
                (
                    gr::OPTIONAL_NEUTRAL_TONE_MAPPING.to_owned(),
                    self.optional_neutral_tone_mapping.clone().into(),
                ),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrailleDialect {
    #[serde(flatten)]
    pub common: CommonOptions,

    pub tone_mark_type: ToneMarkType,
}

impl Default for BrailleDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions {
                missing_tone_mark: "ignore".to_owned(),
                ..CommonOptions::default()
            },
            tone_mark_type: ToneMarkType::Braille,
        }
    }
}

impl DialectOptions for BrailleDialect {
    const READING: &'static str = braille::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            tone_mark_type: tone_mark_type(dialect, ToneMarkType::Braille),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        with_common(
            &self.common,
            vec![(TONE_MARK_TYPE.to_owned(), self.tone_mark_type.name().into())],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpaDialect {
    #[serde(flatten)]
    pub common: CommonOptions,

    pub tone_mark_type: ToneMarkType,
    /// "lowThirdAndSandhi" or "none".
    pub sandhi: String,
    /// "finalE" or "none".
    pub coarticulation: String,
}

impl Default for IpaDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            tone_mark_type: ToneMarkType::ChaoLetters,
            sandhi: "lowThirdAndSandhi".to_owned(),
            coarticulation: "none".to_owned(),
        }
    }
}

impl DialectOptions for IpaDialect {
    const READING: &'static str = ipa::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            tone_mark_type: tone_mark_type(dialect, ToneMarkType::ChaoLetters),
            sandhi: dialect.text(ipa::SANDHI).to_owned(),
            coarticulation: dialect.text(ipa::COARTICULATION).to_owned(),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        with_common(
            &self.common,
            vec![
                (TONE_MARK_TYPE.to_owned(), self.tone_mark_type.name().into()),
                (ipa::SANDHI.to_owned(), self.sandhi.clone().into()),
                (ipa::COARTICULATION.to_owned(), self.coarticulation.clone().into()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GwoyeuRomatzyh, MandarinBraille, MandarinIpa, Pinyin, WadeGiles};
    use libreading_core::Reading;

    #[test]
    fn defaults_match_the_schemas() {
        assert_eq!(PinyinDialect::from_dialect(&Pinyin::new().default_options()).unwrap(), PinyinDialect::default());
        assert_eq!(
            WadeGilesDialect::from_dialect(&WadeGiles::new().default_options()).unwrap(),
            WadeGilesDialect::default()
        );
        assert_eq!(
            BrailleDialect::from_dialect(&MandarinBraille::new().default_options()).unwrap(),
            BrailleDialect::default()
        );
        assert_eq!(IpaDialect::from_dialect(&MandarinIpa::new().default_options()).unwrap(), IpaDialect::default());
        assert_eq!(GrDialect::from_dialect(&GwoyeuRomatzyh::new().default_options()).unwrap(), GrDialect::default());
    }

    #[test]
    fn overrides_rebuild_the_config() {
        let pinyin = Pinyin::new();
        let typed = PinyinDialect {
            tone_mark_type: ToneMarkType::Numbers,
            y_vowel: "v".to_owned(),
            break_up_erhua: "on".to_owned(),
            keep_pinyin_apostrophes: true,
            ..PinyinDialect::default()
        };
        let dialect = DialectConfig::new(pinyin::NAME, pinyin.option_schema(), typed.overrides()).unwrap();
        assert_eq!(dialect.text(TONE_MARK_TYPE), "numbers");
        assert_eq!(PinyinDialect::from_dialect(&dialect).unwrap(), typed);
    }

    #[test]
    fn other_reading_is_rejected() {
        let wade_giles = WadeGiles::new().default_options();
        assert!(PinyinDialect::from_dialect(&wade_giles).is_err());
    }

    #[test]
    fn serde_uses_option_names() {
        let json = serde_json::to_value(WadeGilesDialect::default()).unwrap();
        assert_eq!(json["toneMarkType"], "numbers");
        assert_eq!(json["WadeGilesApostrophe"], "’");
        assert_eq!(json["missingToneMark"], "error");

        let json = serde_json::to_value(GrDialect::default()).unwrap();
        assert_eq!(json["GRRhotacisedFinalApostrophe"], "’");
        assert_eq!(json["keepGRApostrophes"], false);
    }
}
