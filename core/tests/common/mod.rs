// core/tests/common/mod.rs
//
// Toy readings shared by the core integration tests.
//
// - Alpha: digit tones "1"/"2" (or unmarked with toneMarkType=none), cased,
//   apostrophe separator, vowel-initial syllables may not follow another one.
// - Beta: high tone written with a trailing "ˉ", low tone unmarked.
// - Gamma: digit tones, mapped to Alpha only (reaches Beta through Alpha).

#![allow(dead_code)]

use std::sync::Arc;

use libreading_core::dialect::TONE_MARK_TYPE;
use libreading_core::{
    ConversionRegistry, DialectConfig, Engine, Entity, FnHook, HookBinding, HookStage, OptionSchema, OptionValue,
    Reading, RegistryBuilder, SeparatorPolicy, TableMapper, Tone, ToneCodec,
};

pub const ALPHA_TONES: [Tone; 2] = [Tone::new("1"), Tone::new("2")];
pub const BETA_TONES: [Tone; 2] = [Tone::new("H"), Tone::new("L")];
pub const GAMMA_TONES: [Tone; 2] = [Tone::new("1"), Tone::new("2")];

enum Marks {
    Digits,
    /// High tone written with a suffix, low tone unmarked.
    Suffix(&'static str),
}

pub struct ToyReading {
    name: &'static str,
    syllables: Vec<String>,
    tones: &'static [Tone],
    schema: OptionSchema,
    marks: Marks,
    cased: bool,
    separator: Option<&'static str>,
}

impl ToneCodec for ToyReading {
    fn tones(&self) -> &[Tone] {
        self.tones
    }

    fn unmarked_tone(&self, _dialect: &DialectConfig) -> Option<Tone> {
        match self.marks {
            Marks::Digits => None,
            Marks::Suffix(_) => Some(self.tones[1]),
        }
    }

    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        match self.marks {
            Marks::Digits => dialect.text(TONE_MARK_TYPE) != "none" || tone.is_none(),
            Marks::Suffix(_) => tone.is_some(),
        }
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, _dialect: &DialectConfig) -> Vec<String> {
        match (&self.marks, tone) {
            (Marks::Digits, Some(t)) => vec![format!("{syllable}{t}")],
            (Marks::Suffix(high), Some(t)) if t == self.tones[0] => vec![format!("{syllable}{high}")],
            _ => vec![syllable.to_owned()],
        }
    }
}

impl Reading for ToyReading {
    fn name(&self) -> &str {
        self.name
    }

    fn syllables(&self) -> &[String] {
        &self.syllables
    }

    fn option_schema(&self) -> &OptionSchema {
        &self.schema
    }

    fn is_cased(&self) -> bool {
        self.cased
    }

    fn separators(&self, _dialect: &DialectConfig) -> Vec<String> {
        self.separator.map(|s| vec![s.to_owned()]).unwrap_or_default()
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        if self.separator.is_some() {
            SeparatorPolicy::WhenAmbiguous
        } else {
            SeparatorPolicy::Never
        }
    }

    fn allows_boundary_before(&self, next: &Entity) -> bool {
        !next.syllable().starts_with(['a', 'e', 'o'])
    }

    fn guess_dialect(&self, text: &str) -> Vec<(String, OptionValue)> {
        if self.schema.get(TONE_MARK_TYPE).is_none() {
            return Vec::new();
        }
        let marks = if text.chars().any(|c| c.is_ascii_digit()) {
            "numbers"
        } else {
            "none"
        };
        vec![(TONE_MARK_TYPE.to_owned(), marks.into())]
    }
}

fn owned(syllables: &[&str]) -> Vec<String> {
    syllables.iter().map(|s| (*s).to_owned()).collect()
}

pub fn alpha() -> ToyReading {
    ToyReading {
        name: "Alpha",
        syllables: owned(&["ba", "ban", "an", "na", "ma"]),
        tones: &ALPHA_TONES,
        schema: OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["numbers", "none"], "numbers")
            .with_common(&ALPHA_TONES),
        marks: Marks::Digits,
        cased: true,
        separator: Some("'"),
    }
}

pub fn beta() -> ToyReading {
    ToyReading {
        name: "Beta",
        syllables: owned(&["pa", "pan", "ang", "la", "mo", "me"]),
        tones: &BETA_TONES,
        schema: OptionSchema::new()
            .choice("sandhi", &["on", "off"], "on")
            .with_common(&BETA_TONES),
        marks: Marks::Suffix("ˉ"),
        cased: false,
        separator: None,
    }
}

pub fn gamma() -> ToyReading {
    ToyReading {
        name: "Gamma",
        syllables: owned(&["ka", "kan", "ga"]),
        tones: &GAMMA_TONES,
        schema: OptionSchema::new().with_common(&GAMMA_TONES),
        marks: Marks::Digits,
        cased: false,
        separator: None,
    }
}

/// High tone before another high tone drops to low.
fn dissimilate(sequence: &[Entity], position: usize) -> Vec<Entity> {
    let entity = sequence[position].clone();
    let high = Some(BETA_TONES[0]);
    match sequence.get(position + 1) {
        Some(next) if entity.tone() == high && next.tone() == high => {
            vec![entity.with_tone(Some(BETA_TONES[1]))]
        }
        _ => vec![entity],
    }
}

pub fn alpha_to_beta() -> TableMapper {
    let mut table = TableMapper::new("Alpha", "Beta");
    for (from, to) in [("ba", "pa"), ("ban", "pan"), ("an", "ang"), ("na", "la"), ("ma", "mo"), ("ma", "me")] {
        table.insert(from, to);
    }
    table.insert_tone(ALPHA_TONES[0], BETA_TONES[0]);
    table.insert_tone(ALPHA_TONES[1], BETA_TONES[1]);
    table.insert_punctuation("!", "¡");
    table.with_hook(
        HookBinding::new(HookStage::AfterMapping, Arc::new(FnHook::new("dissimilate", dissimilate)))
            .when("sandhi", "on"),
    )
}

pub fn gamma_to_alpha() -> TableMapper {
    let mut table = TableMapper::new("Gamma", "Alpha");
    for (from, to) in [("ka", "ba"), ("kan", "ban"), ("ga", "ma")] {
        table.insert(from, to);
    }
    table.insert_tone(GAMMA_TONES[0], ALPHA_TONES[0]);
    table.insert_tone(GAMMA_TONES[1], ALPHA_TONES[1]);
    table
}

/// Readings and mappers, without pivots.
pub fn builder() -> RegistryBuilder {
    let alpha = alpha();
    let alpha_syllables = alpha.syllables().to_vec();
    let forward = alpha_to_beta();
    let backward = forward.inverted(&alpha_syllables);

    let mut builder = ConversionRegistry::builder();
    builder
        .register_reading(Arc::new(alpha))
        .and_then(|b| b.register_reading(Arc::new(beta())))
        .and_then(|b| b.register_reading(Arc::new(gamma())))
        .and_then(|b| b.register_mapper(Arc::new(forward)))
        .and_then(|b| b.register_mapper(Arc::new(backward)))
        .and_then(|b| b.register_mapper(Arc::new(gamma_to_alpha())))
        .expect("toy registrations are unique");
    builder
}

pub fn registry() -> ConversionRegistry {
    let mut builder = builder();
    builder.pivot_priority(["Alpha"]);
    builder.build().expect("toy registry builds")
}

pub fn engine() -> Engine {
    Engine::new(registry())
}

pub fn dialect(engine: &Engine, reading: &str, overrides: &[(&str, OptionValue)]) -> DialectConfig {
    engine
        .registry()
        .dialect(reading, overrides.iter().cloned())
        .expect("valid toy options")
}
