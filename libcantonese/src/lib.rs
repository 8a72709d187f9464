//! libcantonese crate root
//!
//! Cantonese readings for the `libreading-core` engine: Jyutping (the
//! Cantonese pivot) and Cantonese Yale, with the tables between them.
//!
//! Public API exported here:
//! - the readings `Jyutping` and `CantoneseYale`
//! - typed dialect options `JyutpingDialect` and `YaleDialect`
//! - `register` to add all of the above to a `RegistryBuilder`

pub mod config;
pub mod jyutping;
pub mod yale;

use std::sync::Arc;

use libreading_core::{ConfigError, RegistryBuilder};

pub use config::{JyutpingDialect, YaleDialect};
pub use jyutping::{Jyutping, JYUTPING_SYLLABLES};
pub use yale::CantoneseYale;

/// Registers Jyutping, Cantonese Yale and the tables between them.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), ConfigError> {
    builder
        .register_reading(Arc::new(Jyutping::new()))?
        .register_reading(Arc::new(CantoneseYale::new()))?;
    let (to_yale, from_yale) = yale::mappers();
    builder
        .register_mapper(Arc::new(to_yale))?
        .register_mapper(Arc::new(from_yale))?;
    Ok(())
}
