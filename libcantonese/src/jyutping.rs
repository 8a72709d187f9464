// libcantonese/src/jyutping.rs
//
// Jyutping, the LSHK romanization of Cantonese.
//
// Syllables are initial + final with the tone (1-6) written as a trailing
// digit. The inventory is generated from the initial and final tables below
// with the usual co-occurrence restrictions:
//
// - the zero initial only takes finals starting with a or o (not oe)
// - yu/oe/eo finals only follow dentals, velars, h and j
// - labialized gw/kw and w take a small set of finals
//
// Syllabic m and ng are added on their own.

use once_cell::sync::Lazy;
use regex::Regex;

use libreading_core::dialect::TONE_MARK_TYPE;
use libreading_core::{DialectConfig, Entity, OptionSchema, OptionValue, Reading, Tone, ToneCodec, ToneMarkType};

pub const NAME: &str = "Jyutping";

pub const TONES: [Tone; 6] = [
    Tone::new("1"),
    Tone::new("2"),
    Tone::new("3"),
    Tone::new("4"),
    Tone::new("5"),
    Tone::new("6"),
];

/// Initials, longest first so that splitting is greedy.
pub const INITIALS: [&str; 20] = [
    "gw", "kw", "ng", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "w", "z", "c", "s", "j", "",
];

pub const FINALS: [&str; 53] = [
    "aa", "aai", "aau", "aam", "aan", "aang", "aap", "aat", "aak",
    "ai", "au", "am", "an", "ang", "ap", "at", "ak",
    "e", "ei", "em", "eng", "ep", "ek",
    "i", "iu", "im", "in", "ing", "ip", "it", "ik",
    "o", "oi", "ou", "on", "ong", "ot", "ok",
    "oe", "oeng", "oek", "eoi", "eon", "eot",
    "u", "ui", "un", "ung", "ut", "uk",
    "yu", "yun", "yut",
];

pub const SYLLABIC_NASALS: [&str; 2] = ["m", "ng"];

static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[a-z][1-6]").expect("valid regex"));

fn takes_final(initial: &str, fin: &str) -> bool {
    let front_rounded = matches!(fin, "yu" | "yun" | "yut" | "oe" | "oeng" | "oek" | "eoi" | "eon" | "eot");
    match initial {
        "" => fin.starts_with(['a', 'o']) && !front_rounded,
        "gw" | "kw" => fin.starts_with('a') || matches!(fin, "o" | "ong" | "ok"),
        "w" => fin.starts_with('a') || matches!(fin, "o" | "ong" | "ok" | "u" | "ui" | "un" | "ut" | "ing" | "ik"),
        "b" | "p" | "m" | "f" | "ng" => !front_rounded,
        _ => true,
    }
}

/// Every (initial, final) pair of the inventory, in table order. Syllabic
/// nasals come last with an empty final.
pub fn syllable_parts() -> impl Iterator<Item = (&'static str, &'static str)> {
    INITIALS
        .iter()
        .flat_map(|i| FINALS.iter().map(move |f| (*i, *f)))
        .filter(|(i, f)| takes_final(i, f))
        .chain(SYLLABIC_NASALS.iter().map(|n| (*n, "")))
}

/// Splits a Jyutping syllable into initial and final.
///
/// ```
/// use libcantonese::jyutping::split_initial_final;
///
/// assert_eq!(split_initial_final("gwong"), Some(("gw", "ong")));
/// assert_eq!(split_initial_final("ngaa"), Some(("ng", "aa")));
/// assert_eq!(split_initial_final("aa"), Some(("", "aa")));
/// assert_eq!(split_initial_final("ng"), Some(("ng", "")));
/// ```
pub fn split_initial_final(syllable: &str) -> Option<(&'static str, &'static str)> {
    if let Some(nasal) = SYLLABIC_NASALS.iter().find(|n| **n == syllable) {
        return Some((*nasal, ""));
    }
    INITIALS.iter().find_map(|initial| {
        let rest = syllable.strip_prefix(initial)?;
        let fin = FINALS.iter().find(|f| **f == rest)?;
        takes_final(initial, fin).then_some((*initial, *fin))
    })
}

pub static JYUTPING_SYLLABLES: Lazy<Vec<String>> =
    Lazy::new(|| syllable_parts().map(|(i, f)| format!("{i}{f}")).collect());

pub struct Jyutping {
    schema: OptionSchema,
}

impl Default for Jyutping {
    fn default() -> Self {
        Self::new()
    }
}

impl Jyutping {
    pub fn new() -> Self {
        let schema = OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["numbers", "none"], "numbers")
            .with_common(&TONES);
        Self { schema }
    }

    fn marked(dialect: &DialectConfig) -> bool {
        ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)) != Some(ToneMarkType::None)
    }
}

impl ToneCodec for Jyutping {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, _dialect: &DialectConfig) -> Option<Tone> {
        None
    }

    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        Self::marked(dialect) || tone.is_none()
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        match tone {
            Some(t) if Self::marked(dialect) => vec![format!("{syllable}{t}")],
            _ => vec![syllable.to_owned()],
        }
    }
}

impl Reading for Jyutping {
    fn name(&self) -> &str {
        NAME
    }

    fn syllables(&self) -> &[String] {
        &JYUTPING_SYLLABLES
    }

    fn option_schema(&self) -> &OptionSchema {
        &self.schema
    }

    fn is_cased(&self) -> bool {
        true
    }

    fn allows_boundary_before(&self, next: &Entity) -> bool {
        let syllable = next.syllable();
        !(syllable.starts_with(['a', 'e', 'o']) || SYLLABIC_NASALS.contains(&syllable))
    }

    fn guess_dialect(&self, text: &str) -> Vec<(String, OptionValue)> {
        if text.chars().any(|c| c.is_ascii_alphabetic()) && !NUMBERED.is_match(text) {
            vec![(TONE_MARK_TYPE.to_owned(), "none".into())]
        } else {
            Vec::new()
        }
    }
}
