//! libmandarin crate root
//!
//! Mandarin readings for the `libreading-core` engine: Hanyu Pinyin (the
//! Mandarin pivot), Wade-Giles, Gwoyeu Romatzyh, Mandarin Braille and
//! Mandarin IPA, with the tables connecting each of them to Pinyin.
//!
//! Public API exported here:
//! - the readings `Pinyin`, `WadeGiles`, `GR`, `MandarinBraille`,
//!   `MandarinIpa`
//! - typed dialect options from `config`
//! - `register` to add all of the above to a `RegistryBuilder`

pub mod braille;
pub mod config;
pub mod gr;
pub mod ipa;
pub mod pinyin;
pub mod wade_giles;

use std::sync::Arc;

use libreading_core::{ConfigError, RegistryBuilder};

pub use braille::MandarinBraille;
pub use config::{BrailleDialect, GrDialect, IpaDialect, PinyinDialect, WadeGilesDialect};
pub use gr::GwoyeuRomatzyh;
pub use ipa::MandarinIpa;
pub use pinyin::{Pinyin, PINYIN_SYLLABLES};
pub use wade_giles::WadeGiles;

/// Registers the Mandarin readings and their mapping tables.
///
/// Wade-Giles, GR and Braille convert both ways with Pinyin; IPA is reached
/// from Pinyin only. Pinyin → Pinyin carries the erhua break-up rule.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), ConfigError> {
    builder
        .register_reading(Arc::new(Pinyin::new()))?
        .register_reading(Arc::new(WadeGiles::new()))?
        .register_reading(Arc::new(GwoyeuRomatzyh::new()))?
        .register_reading(Arc::new(MandarinBraille::new()))?
        .register_reading(Arc::new(MandarinIpa::new()))?;

    let (to_wade_giles, from_wade_giles) = wade_giles::mappers();
    let (to_gr, from_gr) = gr::mappers();
    let (to_braille, from_braille) = braille::mappers();
    builder
        .register_mapper(Arc::new(pinyin::dialect_mapper()))?
        .register_mapper(Arc::new(to_wade_giles))?
        .register_mapper(Arc::new(from_wade_giles))?
        .register_mapper(Arc::new(to_gr))?
        .register_mapper(Arc::new(from_gr))?
        .register_mapper(Arc::new(to_braille))?
        .register_mapper(Arc::new(from_braille))?
        .register_mapper(Arc::new(ipa::mapper()))?;
    Ok(())
}
