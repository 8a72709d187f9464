/// Bopomofo dialect options that extend the common options from core.
///
/// This configuration includes:
/// - All options every reading carries (`CommonOptions`, flattened via serde)
/// - The tone mark style (`marks`, `numbers` or `none`)
///
/// # Example
///
/// ```rust
/// use libzhuyin::ZhuyinDialect;
/// use libreading_core::ToneMarkType;
///
/// let dialect = ZhuyinDialect::default();
/// assert_eq!(dialect.tone_mark_type, ToneMarkType::Marks);
/// ```
use serde::{Deserialize, Serialize};

use libreading_core::dialect::TONE_MARK_TYPE;
use libreading_core::{CommonOptions, DialectConfig, DialectOptions, OptionValue, ToneMarkType, UnsupportedError};

use crate::bopomofo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZhuyinDialect {
    /// Options shared by every reading (strictSegmentation, missingToneMark)
    #[serde(flatten)]
    pub common: CommonOptions,

    pub tone_mark_type: ToneMarkType,
}

impl Default for ZhuyinDialect {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            tone_mark_type: ToneMarkType::Marks,
        }
    }
}

impl DialectOptions for ZhuyinDialect {
    const READING: &'static str = bopomofo::NAME;

    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(Self::READING)?;
        Ok(Self {
            common: CommonOptions::from(dialect),
            tone_mark_type: ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::Marks),
        })
    }

    fn overrides(&self) -> Vec<(String, OptionValue)> {
        let mut overrides = vec![(TONE_MARK_TYPE.to_owned(), self.tone_mark_type.name().into())];
        overrides.extend(self.common.overrides());
        overrides
    }
}
