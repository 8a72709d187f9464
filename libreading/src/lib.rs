//! libreading crate root
//!
//! Converts text between phonetic transcriptions ("readings") of Chinese:
//! Pinyin, Wade-Giles, Gwoyeu Romatzyh, Mandarin Braille, Mandarin IPA,
//! Bopomofo, Jyutping and Cantonese Yale.
//!
//! ```
//! use libreading::ReadingFactory;
//!
//! let factory = ReadingFactory::new().unwrap();
//! let text = factory
//!     .convert("lao3shi1", "Pinyin", "MandarinBraille", &[("toneMarkType", "numbers".into())], &[])
//!     .unwrap();
//! assert_eq!(text, "⠇⠖⠄⠱⠁");
//! ```
//!
//! Public API exported here:
//! - `ReadingFactory` from `factory`
//! - `standard_registry` / `standard_builder` with every reading registered
//! - the core types callers need to name options, segments and errors

pub mod factory;

pub use factory::ReadingFactory;

pub use libreading_core::{
    ConfigError, ConversionDirection, ConversionOptions, ConversionRegistry, DialectConfig, DialectOptions,
    Disambiguation, Entity, ErrorKind, MappingTableData, OptionValue, ReadingError, RegistryBuilder, Segment, Tone,
    ToneMarkType, UnsupportedError,
};

pub use libcantonese::{JyutpingDialect, YaleDialect};
pub use libmandarin::{BrailleDialect, GrDialect, IpaDialect, PinyinDialect, WadeGilesDialect};
pub use libzhuyin::ZhuyinDialect;

/// Pivots tried for directions without a direct mapper.
pub const PIVOTS: [&str; 2] = [libmandarin::pinyin::NAME, libcantonese::jyutping::NAME];

/// Builder with every reading and mapper of the language crates registered
/// and the standard pivots set. Add tables before calling `build`.
pub fn standard_builder() -> Result<RegistryBuilder, ConfigError> {
    let mut builder = ConversionRegistry::builder();
    libmandarin::register(&mut builder)?;
    libzhuyin::register(&mut builder)?;
    libcantonese::register(&mut builder)?;
    builder.pivot_priority(PIVOTS);
    Ok(builder)
}

pub fn standard_registry() -> Result<ConversionRegistry, ConfigError> {
    standard_builder()?.build()
}
