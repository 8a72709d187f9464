// libmandarin/src/braille.rs
//
// Mandarin (Chinese) Braille.
//
// One cell for the initial, one for the final (the apical vowel after
// z/c/s/zh/ch/sh/r is left out) and an optional tone cell. Initials j/q/x
// share their cells with g/k/h and e/o share a final cell, so several Pinyin
// syllables can be written alike. The fifth tone is never marked.
//
// The erhua suffix is the er cell ⠗ right after a syllable; written after
// another syllable it always reads as the suffix.

use once_cell::sync::Lazy;
use phf::phf_map;

use libreading_core::dialect::TONE_MARK_TYPE;
use libreading_core::{DialectConfig, Entity, OptionSchema, Reading, TableMapper, Tone, ToneCodec, ToneMarkType};

use crate::pinyin::{self, is_erhua, split_initial_final, PINYIN_SYLLABLES};

pub const NAME: &str = "MandarinBraille";

/// Base name of the erhua suffix, written "⠗".
pub const ERHUA: &str = "-⠗";

pub const TONES: [Tone; 5] = pinyin::TONES;

static INITIALS: phf::Map<&'static str, &'static str> = phf_map! {
    "b" => "⠃", "p" => "⠏", "m" => "⠍", "f" => "⠋",
    "d" => "⠙", "t" => "⠞", "n" => "⠝", "l" => "⠇",
    "g" => "⠛", "k" => "⠅", "h" => "⠓",
    "j" => "⠛", "q" => "⠅", "x" => "⠓",
    "zh" => "⠌", "ch" => "⠟", "sh" => "⠱", "r" => "⠚",
    "z" => "⠵", "c" => "⠉", "s" => "⠎",
};

static FINALS: phf::Map<&'static str, &'static str> = phf_map! {
    "a" => "⠔", "o" => "⠢", "e" => "⠢", "er" => "⠗",
    "ai" => "⠪", "ao" => "⠖", "ei" => "⠮", "ou" => "⠷",
    "an" => "⠧", "ang" => "⠦", "en" => "⠴", "eng" => "⠼", "ong" => "⠲",
    "i" => "⠊", "ia" => "⠫", "ie" => "⠑", "iao" => "⠜", "iou" => "⠳",
    "ian" => "⠩", "in" => "⠣", "iang" => "⠭", "ing" => "⠡", "iong" => "⠹",
    "u" => "⠥", "ua" => "⠿", "uo" => "⠕", "uai" => "⠽", "uei" => "⠺",
    "uan" => "⠻", "uen" => "⠒", "uang" => "⠶", "ueng" => "⠲",
    "ü" => "⠬", "üe" => "⠾", "üan" => "⠯", "ün" => "⠸",
    "-i" => "",
};

/// Punctuation written differently in Braille, Pinyin side first.
pub const PUNCTUATION: [(&str, &str); 4] = [("!", "⠰⠂"), ("?", "⠐⠄"), (",", "⠐"), (".", "⠐⠆")];

fn tone_cell(tone: Tone) -> Option<&'static str> {
    match tone.name() {
        "1" => Some("⠁"),
        "2" => Some("⠂"),
        "3" => Some("⠄"),
        "4" => Some("⠆"),
        _ => None,
    }
}

/// Braille cells of a Pinyin base syllable, without tone.
///
/// ```
/// use libmandarin::braille::from_pinyin;
///
/// assert_eq!(from_pinyin("lao").as_deref(), Some("⠇⠖"));
/// assert_eq!(from_pinyin("shi").as_deref(), Some("⠱"));
/// assert_eq!(from_pinyin("yong").as_deref(), Some("⠹"));
/// ```
pub fn from_pinyin(syllable: &str) -> Option<String> {
    if is_erhua(syllable) {
        return Some(ERHUA.to_owned());
    }
    let (initial, fin) = split_initial_final(syllable)?;
    let fin = *FINALS.get(fin.as_str())?;
    if initial.is_empty() {
        return Some(fin.to_owned());
    }
    Some(format!("{}{fin}", INITIALS.get(initial)?))
}

static SYLLABLE_TABLE: Lazy<Vec<(&'static str, String)>> = Lazy::new(|| {
    PINYIN_SYLLABLES
        .iter()
        .filter_map(|p| from_pinyin(p).map(|b| (*p, b)))
        .collect()
});

pub struct MandarinBraille {
    syllables: Vec<String>,
    schema: OptionSchema,
}

impl Default for MandarinBraille {
    fn default() -> Self {
        Self::new()
    }
}

impl MandarinBraille {
    pub fn new() -> Self {
        let mut syllables: Vec<String> = Vec::new();
        for (_, cells) in SYLLABLE_TABLE.iter() {
            if !syllables.contains(cells) {
                syllables.push(cells.clone());
            }
        }
        // Unknown tones are written without a tone cell unless asked otherwise.
        let schema = OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["braille", "none"], "braille")
            .with_common_defaults(&TONES, "ignore");
        Self { syllables, schema }
    }

    fn marked(dialect: &DialectConfig) -> bool {
        ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)) != Some(ToneMarkType::None)
    }
}

impl ToneCodec for MandarinBraille {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, dialect: &DialectConfig) -> Option<Tone> {
        Self::marked(dialect).then_some(TONES[4])
    }

    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        tone.is_some() == Self::marked(dialect)
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        if syllable == ERHUA {
            let unmarked = tone == self.unmarked_tone(dialect);
            return if unmarked { vec!["⠗".to_owned()] } else { Vec::new() };
        }
        match tone.and_then(tone_cell) {
            Some(cell) => vec![format!("{syllable}{cell}")],
            None => vec![syllable.to_owned()],
        }
    }
}

impl Reading for MandarinBraille {
    fn name(&self) -> &str {
        NAME
    }

    fn syllables(&self) -> &[String] {
        &self.syllables
    }

    fn option_schema(&self) -> &OptionSchema {
        &self.schema
    }

    fn requires_predecessor(&self, entity: &Entity) -> bool {
        entity.syllable() == ERHUA
    }
}

/// Pinyin → Braille and Braille → Pinyin tables, the latter with the erhua
/// break-up rule.
pub fn mappers() -> (TableMapper, TableMapper) {
    let mut forward = TableMapper::new(pinyin::NAME, NAME);
    for (p, cells) in SYLLABLE_TABLE.iter() {
        forward.insert(p, cells);
    }
    for tone in TONES {
        forward.insert_tone(tone, tone);
    }
    for (from, to) in PUNCTUATION {
        forward.insert_punctuation(from, to);
    }
    let order: Vec<String> = PINYIN_SYLLABLES.iter().map(|s| (*s).to_owned()).collect();
    let backward = pinyin::erhua_hooks()
        .into_iter()
        .fold(forward.inverted(&order), TableMapper::with_hook);
    (forward, backward)
}
