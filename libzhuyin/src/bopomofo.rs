// libzhuyin/src/bopomofo.rs
//
// Zhuyin fuhao (Bopomofo).
//
// Syllables are an initial symbol followed by up to two final symbols (medial
// ㄧ/ㄨ/ㄩ plus rhyme); the apical vowel after ㄓㄔㄕㄖㄗㄘㄙ is not written.
// Tone marks follow the syllable (ˊ ˇ ˋ), the neutral tone dot ˙ precedes it
// and the first tone is left unmarked.
//
// The inventory is derived from Pinyin through the initial/final split in
// libmandarin, so the two readings convert one to one. Pinyin's bare nasals
// "m" and "n" have no Bopomofo syllable: written alone ㄇ and ㄋ are initials.
// The erhua suffix is a bare ㄦ right after a syllable ("ㄏㄨㄚㄦ").

use once_cell::sync::Lazy;
use phf::phf_map;
use regex::Regex;

use libmandarin::pinyin::{self, is_erhua, split_initial_final, PINYIN_SYLLABLES};
use libreading_core::dialect::TONE_MARK_TYPE;
use libreading_core::{
    DialectConfig, Entity, OptionSchema, OptionValue, Reading, SeparatorPolicy, TableMapper, Tone, ToneCodec,
    ToneMarkType,
};

pub const NAME: &str = "Bopomofo";

pub const TONES: [Tone; 5] = pinyin::TONES;

/// Neutral tone dot, written before the syllable.
pub const NEUTRAL_DOT: char = '˙';

/// Base name of the erhua suffix, written "ㄦ" without any tone mark.
pub const ERHUA: &str = "-ㄦ";

static INITIALS: phf::Map<&'static str, &'static str> = phf_map! {
    "b" => "ㄅ", "p" => "ㄆ", "m" => "ㄇ", "f" => "ㄈ",
    "d" => "ㄉ", "t" => "ㄊ", "n" => "ㄋ", "l" => "ㄌ",
    "g" => "ㄍ", "k" => "ㄎ", "h" => "ㄏ",
    "j" => "ㄐ", "q" => "ㄑ", "x" => "ㄒ",
    "zh" => "ㄓ", "ch" => "ㄔ", "sh" => "ㄕ", "r" => "ㄖ",
    "z" => "ㄗ", "c" => "ㄘ", "s" => "ㄙ",
};

static FINALS: phf::Map<&'static str, &'static str> = phf_map! {
    "a" => "ㄚ", "o" => "ㄛ", "e" => "ㄜ", "ê" => "ㄝ", "er" => "ㄦ",
    "ai" => "ㄞ", "ei" => "ㄟ", "ao" => "ㄠ", "ou" => "ㄡ",
    "an" => "ㄢ", "en" => "ㄣ", "ang" => "ㄤ", "eng" => "ㄥ", "ong" => "ㄨㄥ",
    "i" => "ㄧ", "ia" => "ㄧㄚ", "io" => "ㄧㄛ", "ie" => "ㄧㄝ", "iai" => "ㄧㄞ",
    "iao" => "ㄧㄠ", "iou" => "ㄧㄡ", "ian" => "ㄧㄢ", "in" => "ㄧㄣ",
    "iang" => "ㄧㄤ", "ing" => "ㄧㄥ", "iong" => "ㄩㄥ",
    "u" => "ㄨ", "ua" => "ㄨㄚ", "uo" => "ㄨㄛ", "uai" => "ㄨㄞ", "uei" => "ㄨㄟ",
    "uan" => "ㄨㄢ", "uen" => "ㄨㄣ", "uang" => "ㄨㄤ", "ueng" => "ㄨㄥ",
    "ü" => "ㄩ", "üe" => "ㄩㄝ", "üan" => "ㄩㄢ", "ün" => "ㄩㄣ",
    "-i" => "",
};

static NASALS: phf::Map<&'static str, &'static str> = phf_map! {
    "ng" => "ㄫ", "hm" => "ㄏㄇ", "hng" => "ㄏㄫ",
};

/// Symbols a syllable may not start with when it directly follows another.
const RHYME_START: [char; 14] = [
    'ㄚ', 'ㄛ', 'ㄜ', 'ㄝ', 'ㄞ', 'ㄟ', 'ㄠ', 'ㄡ', 'ㄢ', 'ㄣ', 'ㄤ', 'ㄥ', 'ㄦ', 'ㄫ',
];

static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{3105}-\u{312F}][1-5]").expect("valid regex"));

fn tone_mark(tone: Tone) -> Option<char> {
    match tone.name() {
        "2" => Some('ˊ'),
        "3" => Some('ˇ'),
        "4" => Some('ˋ'),
        _ => None,
    }
}

/// Bopomofo spelling of a Pinyin base syllable, without tone.
///
/// ```
/// use libzhuyin::bopomofo::from_pinyin;
///
/// assert_eq!(from_pinyin("zhong").as_deref(), Some("ㄓㄨㄥ"));
/// assert_eq!(from_pinyin("yue").as_deref(), Some("ㄩㄝ"));
/// assert_eq!(from_pinyin("shi").as_deref(), Some("ㄕ"));
/// assert_eq!(from_pinyin("m"), None);
/// ```
pub fn from_pinyin(syllable: &str) -> Option<String> {
    if is_erhua(syllable) {
        return Some(ERHUA.to_owned());
    }
    if let Some(nasal) = NASALS.get(syllable) {
        return Some((*nasal).to_owned());
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

pub struct Bopomofo {
    syllables: Vec<String>,
    schema: OptionSchema,
}

impl Default for Bopomofo {
    fn default() -> Self {
        Self::new()
    }
}

impl Bopomofo {
    pub fn new() -> Self {
        let mut syllables: Vec<String> = Vec::new();
        for (_, b) in SYLLABLE_TABLE.iter() {
            if !syllables.contains(b) {
                syllables.push(b.clone());
            }
        }
        let schema = OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["marks", "numbers", "none"], "marks")
            .with_common(&TONES);
        Self { syllables, schema }
    }

    fn mark_type(dialect: &DialectConfig) -> ToneMarkType {
        ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::Marks)
    }
}

impl ToneCodec for Bopomofo {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, dialect: &DialectConfig) -> Option<Tone> {
        match Self::mark_type(dialect) {
            ToneMarkType::Marks => Some(TONES[0]),
            _ => None,
        }
    }

    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        match Self::mark_type(dialect) {
            ToneMarkType::Marks => tone.is_some(),
            ToneMarkType::None => tone.is_none(),
            _ => true,
        }
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        if syllable == ERHUA {
            return match (Self::mark_type(dialect), tone) {
                (ToneMarkType::Marks, Some(t)) if t == TONES[4] => vec!["ㄦ".to_owned()],
                (ToneMarkType::Numbers, Some(t)) if t == TONES[4] => vec!["ㄦ".to_owned(), "ㄦ5".to_owned()],
                (ToneMarkType::None, None) => vec!["ㄦ".to_owned()],
                _ => Vec::new(),
            };
        }
        match (Self::mark_type(dialect), tone) {
            (ToneMarkType::Numbers, Some(t)) => vec![format!("{syllable}{t}")],
            (ToneMarkType::Marks, Some(t)) if t == TONES[4] => vec![format!("{NEUTRAL_DOT}{syllable}")],
            // A written first tone mark is accepted but never produced.
            (ToneMarkType::Marks, Some(t)) if t == TONES[0] => {
                vec![syllable.to_owned(), format!("{syllable}ˉ")]
            }
            (ToneMarkType::Marks, Some(t)) => match tone_mark(t) {
                Some(mark) => vec![format!("{syllable}{mark}")],
                None => Vec::new(),
            },
            _ => vec![syllable.to_owned()],
        }
    }
}

impl Reading for Bopomofo {
    fn name(&self) -> &str {
        NAME
    }

    fn syllables(&self) -> &[String] {
        &self.syllables
    }

    fn option_schema(&self) -> &OptionSchema {
        &self.schema
    }

    fn separators(&self, _dialect: &DialectConfig) -> Vec<String> {
        vec![" ".to_owned()]
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        SeparatorPolicy::WhenAmbiguous
    }

    fn allows_boundary_before(&self, next: &Entity) -> bool {
        !next.syllable().starts_with(RHYME_START)
    }

    fn requires_predecessor(&self, entity: &Entity) -> bool {
        entity.syllable() == ERHUA
    }

    fn guess_dialect(&self, text: &str) -> Vec<(String, OptionValue)> {
        if NUMBERED.is_match(text) {
            vec![(TONE_MARK_TYPE.to_owned(), "numbers".into())]
        } else {
            Vec::new()
        }
    }
}

/// Pinyin → Bopomofo and Bopomofo → Pinyin tables, the latter with the
/// erhua break-up rule.
pub fn mappers() -> (TableMapper, TableMapper) {
    let mut forward = TableMapper::new(pinyin::NAME, NAME);
    for (p, b) in SYLLABLE_TABLE.iter() {
        forward.insert(p, b);
    }
    for tone in TONES {
        forward.insert_tone(tone, tone);
    }
    let order: Vec<String> = PINYIN_SYLLABLES.iter().map(|s| (*s).to_owned()).collect();
    let backward = pinyin::erhua_hooks()
        .into_iter()
        .fold(forward.inverted(&order), TableMapper::with_hook);
    (forward, backward)
}
