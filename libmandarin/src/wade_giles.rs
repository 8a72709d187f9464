// libmandarin/src/wade_giles.rs
//
// Wade-Giles romanization.
//
// Wade-Giles was the common romanization before Pinyin. Aspiration is marked
// with an apostrophe (p' t' k' ch' ts'), j q x and zh collapse onto "ch" /
// "hs", the apical vowel is "ih" after ch/sh/j and "ŭ" after tz/ss, and tones
// are trailing (superscript) numbers.
//
// The syllable inventory is derived from the Pinyin one, so every Wade-Giles
// syllable has a Pinyin counterpart. Syllables keep an ASCII apostrophe
// internally; the WadeGilesApostrophe option picks the written form.
//
// The erhua suffix is "rh", written straight after the tone ("hua1rh").

use once_cell::sync::Lazy;
use phf::phf_map;

use libreading_core::dialect::TONE_MARK_TYPE;
use libreading_core::tone::superscript;
use libreading_core::{
    DialectConfig, Entity, OptionSchema, OptionValue, Reading, SeparatorPolicy, TableMapper, Tone, ToneCodec,
    ToneMarkType,
};

use crate::pinyin::{self, is_erhua, is_syllabic_nasal, split_initial_final, PINYIN_SYLLABLES};

pub const NAME: &str = "WadeGiles";

pub const ERHUA: &str = "rh";

pub const WADE_GILES_APOSTROPHE: &str = "WadeGilesApostrophe";

pub const TONES: [Tone; 5] = pinyin::TONES;

const APOSTROPHES: [&str; 4] = ["’", "'", "‘", "ʼ"];

static INITIALS: phf::Map<&'static str, &'static str> = phf_map! {
    "b" => "p", "p" => "p'", "m" => "m", "f" => "f",
    "d" => "t", "t" => "t'", "n" => "n", "l" => "l",
    "g" => "k", "k" => "k'", "h" => "h",
    "j" => "ch", "q" => "ch'", "x" => "hs",
    "zh" => "ch", "ch" => "ch'", "sh" => "sh", "r" => "j",
    "z" => "ts", "c" => "ts'", "s" => "s",
};

static FINALS: phf::Map<&'static str, &'static str> = phf_map! {
    "a" => "a", "o" => "o", "e" => "ê", "ai" => "ai", "ei" => "ei", "ao" => "ao", "ou" => "ou",
    "an" => "an", "en" => "ên", "ang" => "ang", "eng" => "êng", "ong" => "ung",
    "i" => "i", "ia" => "ia", "ie" => "ieh", "iao" => "iao", "iou" => "iu", "ian" => "ien",
    "in" => "in", "iang" => "iang", "ing" => "ing", "iong" => "iung",
    "u" => "u", "ua" => "ua", "uo" => "uo", "uai" => "uai", "uei" => "ui", "uan" => "uan",
    "uen" => "un", "uang" => "uang",
    "ü" => "ü", "üe" => "üeh", "üan" => "üan", "ün" => "ün",
    "-i" => "ih",
};

/// Syllables without an initial, keyed by Pinyin final.
static ZERO_INITIAL: phf::Map<&'static str, &'static str> = phf_map! {
    "a" => "a", "o" => "o", "e" => "ê", "ai" => "ai", "ei" => "ei", "ao" => "ao", "ou" => "ou",
    "an" => "an", "en" => "ên", "ang" => "ang", "eng" => "êng", "er" => "êrh",
    "i" => "i", "ia" => "ya", "io" => "yo", "ie" => "yeh", "iao" => "yao", "iou" => "yu",
    "ian" => "yen", "in" => "yin", "iang" => "yang", "ing" => "ying", "iong" => "yung",
    "u" => "wu", "ua" => "wa", "uo" => "wo", "uai" => "wai", "uei" => "wei", "uan" => "wan",
    "uen" => "wên", "uang" => "wang", "ueng" => "wêng",
    "ü" => "yü", "üe" => "yüeh", "üan" => "yüan", "ün" => "yün",
};

/// Wade-Giles spelling of a Pinyin base syllable.
///
/// ```
/// use libmandarin::wade_giles::from_pinyin;
///
/// assert_eq!(from_pinyin("qing").as_deref(), Some("ch'ing"));
/// assert_eq!(from_pinyin("zhong").as_deref(), Some("chung"));
/// assert_eq!(from_pinyin("guo").as_deref(), Some("kuo"));
/// assert_eq!(from_pinyin("zi").as_deref(), Some("tzŭ"));
/// ```
pub fn from_pinyin(syllable: &str) -> Option<String> {
    if is_erhua(syllable) {
        return Some(ERHUA.to_owned());
    }
    if is_syllabic_nasal(syllable) {
        return Some(syllable.to_owned());
    }
    let (initial, fin) = split_initial_final(syllable)?;
    if initial.is_empty() {
        return ZERO_INITIAL.get(fin.as_str()).map(|s| (*s).to_owned());
    }

    let wg_initial = *INITIALS.get(initial)?;
    let spelled = match (initial, fin.as_str()) {
        ("z", "-i") => "tzŭ".to_owned(),
        ("c", "-i") => "tz'ŭ".to_owned(),
        ("s", "-i") => "ssŭ".to_owned(),
        ("g" | "k" | "h", "e") => format!("{wg_initial}o"),
        ("g" | "k", "uei") => format!("{wg_initial}uei"),
        ("d" | "t" | "n" | "l" | "z" | "c" | "s" | "zh" | "ch" | "r", "uo") => format!("{wg_initial}o"),
        (_, fin) => format!("{wg_initial}{}", FINALS.get(fin)?),
    };
    Some(spelled)
}

/// `(pinyin, wade-giles)` pairs in Pinyin syllable order.
static SYLLABLE_TABLE: Lazy<Vec<(&'static str, String)>> = Lazy::new(|| {
    PINYIN_SYLLABLES
        .iter()
        .filter_map(|p| from_pinyin(p).map(|w| (*p, w)))
        .collect()
});

pub struct WadeGiles {
    syllables: Vec<String>,
    schema: OptionSchema,
}

impl Default for WadeGiles {
    fn default() -> Self {
        Self::new()
    }
}

impl WadeGiles {
    pub fn new() -> Self {
        let mut syllables: Vec<String> = Vec::new();
        for (_, wg) in SYLLABLE_TABLE.iter() {
            if !syllables.contains(wg) {
                syllables.push(wg.clone());
            }
        }
        let schema = OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["numbers", "superscriptNumbers", "none"], "numbers")
            .choice(WADE_GILES_APOSTROPHE, &APOSTROPHES, "’")
            .with_common(&TONES);
        Self { syllables, schema }
    }

    fn mark_type(dialect: &DialectConfig) -> ToneMarkType {
        ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::Numbers)
    }
}

impl ToneCodec for WadeGiles {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, _dialect: &DialectConfig) -> Option<Tone> {
        None
    }

    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        Self::mark_type(dialect) != ToneMarkType::None || tone.is_none()
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        if syllable == ERHUA {
            return match (Self::mark_type(dialect), tone) {
                (ToneMarkType::Numbers, Some(t)) if t == TONES[4] => vec![ERHUA.to_owned(), format!("{ERHUA}5")],
                (ToneMarkType::SuperscriptNumbers, Some(t)) if t == TONES[4] => {
                    vec![ERHUA.to_owned(), format!("{ERHUA}⁵")]
                }
                (ToneMarkType::None, None) => vec![ERHUA.to_owned()],
                _ => Vec::new(),
            };
        }
        let mark = match (Self::mark_type(dialect), tone) {
            (ToneMarkType::Numbers, Some(t)) => t.name().to_owned(),
            (ToneMarkType::SuperscriptNumbers, Some(t)) => superscript(t.name()),
            _ => String::new(),
        };
        if !syllable.contains('\'') {
            return vec![format!("{syllable}{mark}")];
        }
        let chosen = dialect.text(WADE_GILES_APOSTROPHE);
        let mut surfaces = vec![format!("{}{mark}", syllable.replace('\'', chosen))];
        for apostrophe in APOSTROPHES.iter().filter(|a| **a != chosen) {
            surfaces.push(format!("{}{mark}", syllable.replace('\'', apostrophe)));
        }
        surfaces
    }
}

impl Reading for WadeGiles {
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
        vec!["-".to_owned()]
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        SeparatorPolicy::Always
    }

    fn separator_before(&self, next: &Entity, _dialect: &DialectConfig) -> Option<String> {
        (next.syllable() != ERHUA).then(|| "-".to_owned())
    }

    fn requires_predecessor(&self, entity: &Entity) -> bool {
        entity.syllable() == ERHUA
    }

    fn allows_boundary_before(&self, next: &Entity) -> bool {
        let syllable = next.syllable();
        !(syllable.starts_with(['a', 'e', 'ê', 'o']) || matches!(syllable, "m" | "n" | "ng"))
    }

    fn guess_dialect(&self, text: &str) -> Vec<(String, OptionValue)> {
        let mut overrides = Vec::new();
        if text.chars().any(|c| matches!(c, '¹' | '²' | '³' | '⁴' | '⁵')) {
            overrides.push((TONE_MARK_TYPE.to_owned(), "superscriptNumbers".into()));
        }
        let used = APOSTROPHES
            .iter()
            .find(|a| text.contains(**a));
        if let Some(apostrophe) = used {
            overrides.push((WADE_GILES_APOSTROPHE.to_owned(), (*apostrophe).into()));
        }
        overrides
    }
}

/// Pinyin → Wade-Giles and Wade-Giles → Pinyin tables. The backward table
/// carries the erhua break-up rule.
pub fn mappers() -> (TableMapper, TableMapper) {
    let mut forward = TableMapper::new(pinyin::NAME, NAME);
    for (p, w) in SYLLABLE_TABLE.iter() {
        forward.insert(p, w);
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
