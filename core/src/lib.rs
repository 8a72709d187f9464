//! libreading-core
//!
//! Reading conversion engine shared by the language crates (libmandarin,
//! libzhuyin, libcantonese).
//!
//! A reading is a phonetic transcription (Pinyin, Jyutping, ...). Text is
//! decomposed into entities, their tones normalized, mapped to the target
//! reading (directly or through a pivot) and composed back to text.
//!
//! Public API:
//! - `Reading` / `ToneCodec` - what a transcription declares
//! - `DialectConfig` - validated option set selecting a reading variant
//! - `Decomposer` / `Composer` - text ↔ segments for one dialect
//! - `EntityMapper`, `TableMapper`, `PhonologicalHook` - mapping layer
//! - `ConversionRegistry` - readings, mappers and resolved paths
//! - `Engine` - the conversion pipeline

pub mod bridge;
pub use bridge::{BridgeChain, MappingPath};

pub mod composer;
pub use composer::Composer;

pub mod data;
pub use data::MappingTableData;

pub mod decomposer;
pub use decomposer::Decomposer;

pub mod dialect;
pub use dialect::{CommonOptions, DialectConfig, DialectOptions, OptionKind, OptionSchema, OptionSpec, OptionValue};

pub mod engine;
pub use engine::{ConversionOptions, ConversionState, Disambiguation, Engine};

pub mod entity;
pub use entity::{ConversionDirection, Entity, LetterCase, Segment, Tone};

pub mod error;
pub use error::{
    AmbiguousConversionError, ConfigError, ConversionError, DecompositionError, DecompositionFailure, ErrorKind,
    ReadingError, Stage, UnsupportedError,
};

pub mod hooks;
pub use hooks::{FnHook, HookBinding, HookStage, PhonologicalHook};

pub mod mapper;
pub use mapper::{DialectMapper, EntityMapper, MappingContext, TableMapper};

pub mod reading;
pub use reading::{Reading, SeparatorPolicy};

pub mod registry;
pub use registry::{ConversionRegistry, RegistryBuilder};

pub mod tone;
pub use tone::{MissingToneMark, ToneCodec, ToneMarkType};

pub mod trie;
pub use trie::TrieNode;

/// Utility helpers.
pub mod utils {
    use unicode_normalization::UnicodeNormalization;

    /// NFC-normalize a string. Whitespace is kept as is.
    pub fn normalize(s: &str) -> String {
        s.nfc().collect::<String>()
    }

    /// Whether `s` contains a combining tone diacritic once decomposed.
    pub fn has_combining_mark(s: &str) -> bool {
        s.nfd().any(|c| ('\u{0300}'..='\u{036F}').contains(&c))
    }
}
