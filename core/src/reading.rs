//! The `Reading` trait: what a phonetic transcription declares to the engine.

use crate::dialect::{DialectConfig, OptionSchema, OptionValue};
use crate::entity::Entity;
use crate::tone::ToneCodec;

/// When the composer writes a separator between two adjacent entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorPolicy {
    Never,
    /// Only where the concatenation would not decompose back into the two
    /// entities.
    WhenAmbiguous,
    Always,
}

/// A phonetic transcription system.
///
/// Implementations are static data plus their tone codec; they are shared
/// read-only behind `Arc<dyn Reading>` once registered.
pub trait Reading: ToneCodec {
    fn name(&self) -> &str;

    /// Canonical base syllables (lowercase, toneless).
    fn syllables(&self) -> &[String];

    fn option_schema(&self) -> &OptionSchema;

    /// Whether letter case is significant and preserved.
    fn is_cased(&self) -> bool {
        false
    }

    /// Separator strings recognised between entities; the first one is
    /// written by the composer.
    fn separators(&self, _dialect: &DialectConfig) -> Vec<String> {
        Vec::new()
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        SeparatorPolicy::Never
    }

    /// Separator the composer writes before `next` when the policy asks for
    /// one; `None` attaches `next` directly.
    fn separator_before(&self, _next: &Entity, dialect: &DialectConfig) -> Option<String> {
        self.separators(dialect).into_iter().next()
    }

    /// Whether separators found in the source survive a conversion within
    /// the reading. Otherwise the composer writes only the ones needed.
    fn keeps_separators(&self, _dialect: &DialectConfig) -> bool {
        true
    }

    /// Whether `next` may directly follow another entity without a separator.
    fn allows_boundary_before(&self, _next: &Entity) -> bool {
        true
    }

    /// Suffix entities (the erhua "r") are only written after another entity.
    fn requires_predecessor(&self, _entity: &Entity) -> bool {
        false
    }

    /// Option overrides that fit `text` better than the defaults.
    fn guess_dialect(&self, _text: &str) -> Vec<(String, OptionValue)> {
        Vec::new()
    }

    fn default_options(&self) -> DialectConfig {
        DialectConfig::defaults(self.name(), self.option_schema())
    }
}
