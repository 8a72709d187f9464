// libcantonese/src/yale.rs
//
// Cantonese Yale romanization.
//
// Yale spells the same syllables as Jyutping with a few different letters
// (j for z, ch for c, y for j, eu for oe) and writes tones with a diacritic
// on the first vowel plus an "h" after the vowels for the low tones:
//
//   tone        mark     example
//   1 (level)   macron   sā
//   1 (falling) grave    sà
//   2           acute    sá
//   3           -        sa
//   4           grave+h  sàh
//   5           acute+h  sáh
//   6           h        sah
//
// The first tone has two renderings; which one a converted "1" becomes is
// chosen by the YaleFirstTone option. With numbers both are written "1".

use once_cell::sync::Lazy;
use regex::Regex;

use libreading_core::dialect::{STRICT_DIACRITIC_PLACEMENT, TONE_MARK_TYPE};
use libreading_core::tone::{place_mark, vowel_positions, ACUTE, GRAVE, MACRON};
use libreading_core::{
    DialectConfig, Entity, OptionSchema, OptionValue, Reading, SeparatorPolicy, TableMapper, Tone, ToneCodec,
    ToneMarkType,
};

use crate::jyutping::{self, syllable_parts, JYUTPING_SYLLABLES};

pub const NAME: &str = "CantoneseYale";

pub const YALE_FIRST_TONE: &str = "YaleFirstTone";

pub const FIRST_TONE_LEVEL: Tone = Tone::new("1stToneLevel");
pub const FIRST_TONE_FALLING: Tone = Tone::new("1stToneFalling");
pub const SECOND_TONE: Tone = Tone::new("2ndTone");
pub const THIRD_TONE: Tone = Tone::new("3rdTone");
pub const FOURTH_TONE: Tone = Tone::new("4thTone");
pub const FIFTH_TONE: Tone = Tone::new("5thTone");
pub const SIXTH_TONE: Tone = Tone::new("6thTone");

pub const TONES: [Tone; 7] = [
    FIRST_TONE_LEVEL,
    FIRST_TONE_FALLING,
    SECOND_TONE,
    THIRD_TONE,
    FOURTH_TONE,
    FIFTH_TONE,
    SIXTH_TONE,
];

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[a-z][1-6]").expect("valid regex"));

/// Yale spelling of a Jyutping initial and final.
fn yale_spelling(initial: &str, fin: &str) -> String {
    let initial = match initial {
        "z" => "j",
        "c" => "ch",
        "j" => "y",
        other => other,
    };
    let fin = match fin {
        "aa" => "a",
        "oe" => "eu",
        "oeng" => "eung",
        "oek" => "euk",
        "eoi" => "eui",
        "eon" => "eun",
        "eot" => "eut",
        other => other,
    };
    // jyu → yu, not yyu
    if initial == "y" && fin.starts_with('y') {
        fin.to_owned()
    } else {
        format!("{initial}{fin}")
    }
}

/// Yale spelling of a toneless Jyutping syllable.
///
/// ```
/// use libcantonese::yale::from_jyutping;
///
/// assert_eq!(from_jyutping("zau").as_deref(), Some("jau"));
/// assert_eq!(from_jyutping("waa").as_deref(), Some("wa"));
/// assert_eq!(from_jyutping("jyut").as_deref(), Some("yut"));
/// assert_eq!(from_jyutping("hoeng").as_deref(), Some("heung"));
/// ```
pub fn from_jyutping(syllable: &str) -> Option<String> {
    let (initial, fin) = jyutping::split_initial_final(syllable)?;
    Some(yale_spelling(initial, fin))
}

static SYLLABLE_TABLE: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    syllable_parts()
        .map(|(i, f)| (format!("{i}{f}"), yale_spelling(i, f)))
        .collect()
});

fn tone_number(tone: Tone) -> Option<&'static str> {
    Some(match tone.name() {
        "1stToneLevel" | "1stToneFalling" => "1",
        "2ndTone" => "2",
        "3rdTone" => "3",
        "4thTone" => "4",
        "5thTone" => "5",
        "6thTone" => "6",
        _ => return None,
    })
}

/// Diacritic and whether an "h" follows the vowels.
fn tone_marking(tone: Tone) -> (Option<char>, bool) {
    match tone.name() {
        "1stToneLevel" => (Some(MACRON), false),
        "1stToneFalling" => (Some(GRAVE), false),
        "2ndTone" => (Some(ACUTE), false),
        "4thTone" => (Some(GRAVE), true),
        "5thTone" => (Some(ACUTE), true),
        "6thTone" => (None, true),
        _ => (None, false),
    }
}

fn is_syllabic_nasal(syllable: &str) -> bool {
    jyutping::SYLLABIC_NASALS.contains(&syllable)
}

/// Inserts the low-tone "h" after the last vowel, or at the end of a
/// syllabic nasal.
fn with_low_h(syllable: &str) -> String {
    match vowel_positions(syllable, &VOWELS).last() {
        Some(&last) if !is_syllabic_nasal(syllable) => {
            let mut out = String::with_capacity(syllable.len() + 1);
            for (i, c) in syllable.chars().enumerate() {
                out.push(c);
                if i == last {
                    out.push('h');
                }
            }
            out
        }
        _ => format!("{syllable}h"),
    }
}

pub struct CantoneseYale {
    syllables: Vec<String>,
    schema: OptionSchema,
}

impl Default for CantoneseYale {
    fn default() -> Self {
        Self::new()
    }
}

impl CantoneseYale {
    pub fn new() -> Self {
        let syllables = SYLLABLE_TABLE.iter().map(|(_, y)| y.clone()).collect();
        let schema = OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["diacritics", "numbers", "none"], "diacritics")
            .flag(STRICT_DIACRITIC_PLACEMENT, false)
            .choice(YALE_FIRST_TONE, &["1stToneLevel", "1stToneFalling"], "1stToneLevel")
            .with_common(&TONES);
        Self { syllables, schema }
    }

    fn mark_type(dialect: &DialectConfig) -> ToneMarkType {
        ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::Diacritics)
    }

    /// The first tone a bare "1" stands for.
    pub fn first_tone(dialect: &DialectConfig) -> Tone {
        if dialect.text(YALE_FIRST_TONE) == FIRST_TONE_FALLING.name() {
            FIRST_TONE_FALLING
        } else {
            FIRST_TONE_LEVEL
        }
    }

    fn is_first_tone(tone: Tone) -> bool {
        tone == FIRST_TONE_LEVEL || tone == FIRST_TONE_FALLING
    }
}

impl ToneCodec for CantoneseYale {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, dialect: &DialectConfig) -> Option<Tone> {
        match Self::mark_type(dialect) {
            ToneMarkType::Diacritics => Some(THIRD_TONE),
            _ => None,
        }
    }

    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        match Self::mark_type(dialect) {
            ToneMarkType::Diacritics => tone.is_some(),
            ToneMarkType::None => tone.is_none(),
            _ => true,
        }
    }

    /// With numbers only the selected first tone is read from a "1".
    fn parse_tones(&self, dialect: &DialectConfig) -> Vec<Option<Tone>> {
        match Self::mark_type(dialect) {
            ToneMarkType::Diacritics => TONES.iter().copied().map(Some).collect(),
            ToneMarkType::None => vec![None],
            _ => {
                let first = Self::first_tone(dialect);
                let mut tones: Vec<Option<Tone>> = TONES
                    .iter()
                    .copied()
                    .filter(|t| !Self::is_first_tone(*t) || *t == first)
                    .map(Some)
                    .collect();
                tones.push(None);
                tones
            }
        }
    }

    fn narrow_tones(&self, candidates: Vec<Tone>, dialect: &DialectConfig) -> Vec<Tone> {
        if candidates.len() < 2 {
            return candidates;
        }
        let first = Self::first_tone(dialect);
        candidates
            .into_iter()
            .filter(|t| !Self::is_first_tone(*t) || *t == first)
            .collect()
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        let Some(tone) = tone else {
            return vec![syllable.to_owned()];
        };
        match Self::mark_type(dialect) {
            ToneMarkType::Numbers => match tone_number(tone) {
                Some(digit) => vec![format!("{syllable}{digit}")],
                None => Vec::new(),
            },
            ToneMarkType::Diacritics => {
                let (mark, low) = tone_marking(tone);
                let base = if low { with_low_h(syllable) } else { syllable.to_owned() };
                let Some(mark) = mark else {
                    return vec![base];
                };
                let positions = vowel_positions(&base, &VOWELS);
                let canonical = positions.first().copied().unwrap_or(0);
                let mut surfaces = vec![place_mark(&base, canonical, mark)];
                if !dialect.flag(STRICT_DIACRITIC_PLACEMENT) {
                    for i in positions.into_iter().skip(1) {
                        surfaces.push(place_mark(&base, i, mark));
                    }
                }
                surfaces
            }
            _ => vec![syllable.to_owned()],
        }
    }
}

impl Reading for CantoneseYale {
    fn name(&self) -> &str {
        NAME
    }

    fn syllables(&self) -> &[String] {
        &self.syllables
    }

    fn option_schema(&self) -> &OptionSchema {
        &self.schema
    }

    fn is_cased(&self) -> bool {
        true
    }

    fn separators(&self, _dialect: &DialectConfig) -> Vec<String> {
        vec!["'".to_owned()]
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        SeparatorPolicy::WhenAmbiguous
    }

    fn allows_boundary_before(&self, next: &Entity) -> bool {
        let syllable = next.syllable();
        !(syllable.starts_with(['a', 'e', 'o']) || is_syllabic_nasal(syllable))
    }

    fn guess_dialect(&self, text: &str) -> Vec<(String, OptionValue)> {
        if NUMBERED.is_match(text) && !libreading_core::utils::has_combining_mark(text) {
            vec![(TONE_MARK_TYPE.to_owned(), "numbers".into())]
        } else {
            Vec::new()
        }
    }
}

/// Jyutping → Yale and Yale → Jyutping tables.
///
/// Jyutping "1" maps to both Yale first tones; the target dialect's
/// YaleFirstTone narrows it to one.
pub fn mappers() -> (TableMapper, TableMapper) {
    let mut forward = TableMapper::new(jyutping::NAME, NAME);
    for (j, y) in SYLLABLE_TABLE.iter() {
        forward.insert(j, y);
    }
    forward.insert_tone(jyutping::TONES[0], FIRST_TONE_LEVEL);
    forward.insert_tone(jyutping::TONES[0], FIRST_TONE_FALLING);
    for (j, y) in jyutping::TONES.iter().skip(1).zip(TONES.iter().skip(2)) {
        forward.insert_tone(*j, *y);
    }
    let backward = forward.inverted(&JYUTPING_SYLLABLES);
    (forward, backward)
}
