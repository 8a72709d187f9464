// libmandarin/src/pinyin.rs
//
// Hanyu Pinyin.
//
// Base syllables are written with "ü" (or "v" under yVowel = "v"). Tones are
// diacritics on the nucleus vowel (fifth tone unmarked), trailing digits, or
// nothing. Vowel-initial syllables and the syllabic nasals need an apostrophe
// after another syllable ("xi'an", "fang'an").
//
// Erhua is the suffix entity "r" ("huār"), always in the neutral tone and
// only written after another syllable. breakUpErhua rewrites it as a full
// syllable "er" ("huā'er").

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use libreading_core::dialect::{STRICT_DIACRITIC_PLACEMENT, TONE_MARK_TYPE};
use libreading_core::tone::{place_mark, vowel_positions, ACUTE, CARON, GRAVE, MACRON};
use libreading_core::{
    DialectConfig, DialectMapper, Entity, FnHook, HookBinding, HookStage, OptionSchema, OptionValue,
    PhonologicalHook, Reading, SeparatorPolicy, Tone, ToneCodec, ToneMarkType,
};

pub const NAME: &str = "Pinyin";

pub const PINYIN_APOSTROPHE: &str = "pinyinApostrophe";
pub const KEEP_PINYIN_APOSTROPHES: &str = "keepPinyinApostrophes";
pub const Y_VOWEL: &str = "yVowel";
/// "twoSyllables" reads "r" as its own entity, "ignore" does not know it.
pub const ERHUA_OPTION: &str = "erhua";
/// "on", "off" or "auto" (break up when the target ignores erhua).
pub const BREAK_UP_ERHUA: &str = "breakUpErhua";

/// The erhua suffix.
pub const ERHUA: &str = "r";

/// Tones 1–4 and the neutral tone 5.
pub const TONES: [Tone; 5] = [Tone::new("1"), Tone::new("2"), Tone::new("3"), Tone::new("4"), Tone::new("5")];

/// Base syllables of standard Mandarin, toneless.
pub const PINYIN_SYLLABLES: &[&str] = &[
    "a", "ai", "an", "ang", "ao", "ba", "bai", "ban", "bang", "bao", "bei", "ben", "beng", "bi",
    "bian", "biao", "bie", "bin", "bing", "bo", "bu", "ca", "cai", "can", "cang", "cao", "ce",
    "cen", "ceng", "cha", "chai", "chan", "chang", "chao", "che", "chen", "cheng", "chi", "chong",
    "chou", "chu", "chuai", "chuan", "chuang", "chui", "chun", "chuo", "ci", "cong", "cou", "cu",
    "cuan", "cui", "cun", "cuo", "da", "dai", "dan", "dang", "dao", "de", "dei", "den", "deng", "di",
    "dia", "dian", "diao", "die", "ding", "diu", "dong", "dou", "du", "duan", "dui", "dun", "duo",
    "e", "ei", "en", "eng", "er", "fa", "fan", "fang", "fei", "fen", "feng", "fo", "fou", "fu", "ga",
    "gai", "gan", "gang", "gao", "ge", "gei", "gen", "geng", "gong", "gou", "gu", "gua", "guai",
    "guan", "guang", "gui", "gun", "guo", "ha", "hai", "han", "hang", "hao", "he", "hei", "hen",
    "heng", "hm", "hng", "hong", "hou", "hu", "hua", "huai", "huan", "huang", "hui", "hun", "huo",
    "ji", "jia", "jian", "jiang", "jiao", "jie", "jin", "jing", "jiong", "jiu", "ju", "juan", "jue",
    "jun", "ka", "kai", "kan", "kang", "kao", "ke", "kei", "ken", "keng", "kong", "kou", "ku", "kua",
    "kuai", "kuan", "kuang", "kui", "kun", "kuo", "la", "lai", "lan", "lang", "lao", "le", "lei",
    "leng", "li", "lia", "lian", "liang", "liao", "lie", "lin", "ling", "liu", "lo", "long", "lou",
    "lu", "luan", "lun", "luo", "lü", "lüe", "m", "ma", "mai", "man", "mang", "mao", "me", "mei",
    "men", "meng", "mi", "mian", "miao", "mie", "min", "ming", "miu", "mo", "mou", "mu", "n", "na",
    "nai", "nan", "nang", "nao", "ne", "nei", "nen", "neng", "ng", "ni", "nian", "niang", "niao",
    "nie", "nin", "ning", "niu", "nong", "nou", "nu", "nuan", "nun", "nuo", "nü", "nüe", "o", "ou",
    "pa", "pai", "pan", "pang", "pao", "pei", "pen", "peng", "pi", "pian", "piao", "pie", "pin",
    "ping", "po", "pou", "pu", "qi", "qia", "qian", "qiang", "qiao", "qie", "qin", "qing", "qiong",
    "qiu", "qu", "quan", "que", "qun", "r", "ran", "rang", "rao", "re", "ren", "reng", "ri", "rong", "rou",
    "ru", "rua", "ruan", "rui", "run", "ruo", "sa", "sai", "san", "sang", "sao", "se", "sen", "seng",
    "sha", "shai", "shan", "shang", "shao", "she", "shei", "shen", "sheng", "shi", "shou", "shu",
    "shua", "shuai", "shuan", "shuang", "shui", "shun", "shuo", "si", "song", "sou", "su", "suan",
    "sui", "sun", "suo", "ta", "tai", "tan", "tang", "tao", "te", "tei", "teng", "ti", "tian", "tiao",
    "tie", "ting", "tong", "tou", "tu", "tuan", "tui", "tun", "tuo", "wa", "wai", "wan", "wang",
    "wei", "wen", "weng", "wo", "wu", "xi", "xia", "xian", "xiang", "xiao", "xie", "xin", "xing",
    "xiong", "xiu", "xu", "xuan", "xue", "xun", "ya", "yan", "yang", "yao", "ye", "yi", "yin", "ying",
    "yo", "yong", "you", "yu", "yuan", "yue", "yun", "za", "zai", "zan", "zang", "zao", "ze", "zei",
    "zen", "zeng", "zha", "zhai", "zhan", "zhang", "zhao", "zhe", "zhei", "zhen", "zheng", "zhi",
    "zhong", "zhou", "zhu", "zhua", "zhuai", "zhuan", "zhuang", "zhui", "zhun", "zhuo", "zi", "zong",
    "zou", "zu", "zuan", "zui", "zun", "zuo",
];

/// Syllables made of a nasal alone (or h + nasal).
pub const SYLLABIC_NASALS: [&str; 5] = ["m", "n", "ng", "hm", "hng"];

const INITIALS: [&str; 23] = [
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r", "z", "c", "s",
    "y", "w",
];

const VOWELS: [char; 7] = ['a', 'e', 'i', 'o', 'u', 'ü', 'v'];

static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[a-zü][1-5]").expect("valid regex"));
static V_FOR_U: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(^|[^a-z])[ln]v").expect("valid regex"));

pub fn is_syllabic_nasal(syllable: &str) -> bool {
    SYLLABIC_NASALS.contains(&syllable)
}

pub fn is_erhua(syllable: &str) -> bool {
    syllable == ERHUA
}

/// Splits a base syllable into its initial and normalized final.
///
/// Finals follow the table spelling: y/w are folded into the final
/// ("you" → ("", "iou"), "wen" → ("", "uen")), ü is restored after j/q/x,
/// contracted finals are expanded ("liu" → "iou", "gui" → "uei", "lun" →
/// "uen") and the apical vowel after z/c/s/zh/ch/sh/r is written "-i".
/// Syllabic nasals and the erhua suffix have no split.
///
/// ```
/// use libmandarin::pinyin::split_initial_final;
///
/// assert_eq!(split_initial_final("zhuang"), Some(("zh", "uang".to_owned())));
/// assert_eq!(split_initial_final("xue"), Some(("x", "üe".to_owned())));
/// assert_eq!(split_initial_final("yu"), Some(("", "ü".to_owned())));
/// assert_eq!(split_initial_final("shi"), Some(("sh", "-i".to_owned())));
/// assert_eq!(split_initial_final("ng"), None);
/// assert_eq!(split_initial_final("r"), None);
/// ```
pub fn split_initial_final(syllable: &str) -> Option<(&'static str, String)> {
    if is_syllabic_nasal(syllable) || is_erhua(syllable) {
        return None;
    }
    let initial = INITIALS
        .iter()
        .copied()
        .find(|i| syllable.starts_with(i) && syllable.len() > i.len())
        .unwrap_or("");
    let rest = &syllable[initial.len()..];
    if rest.is_empty() {
        return None;
    }

    let (initial, fin) = match initial {
        "y" => {
            let fin = match rest {
                "i" | "in" | "ing" => rest.to_owned(),
                "u" => "ü".to_owned(),
                "ue" => "üe".to_owned(),
                "uan" => "üan".to_owned(),
                "un" => "ün".to_owned(),
                "ou" => "iou".to_owned(),
                "ong" => "iong".to_owned(),
                other => format!("i{other}"),
            };
            ("", fin)
        }
        "w" => {
            let fin = match rest {
                "u" => "u".to_owned(),
                "ei" => "uei".to_owned(),
                "en" => "uen".to_owned(),
                other => format!("u{other}"),
            };
            ("", fin)
        }
        "j" | "q" | "x" => {
            let fin = match rest.strip_prefix('u') {
                Some(tail) => format!("ü{tail}"),
                None => rest.to_owned(),
            };
            (initial, fin)
        }
        _ => (initial, rest.to_owned()),
    };

    let fin = match fin.as_str() {
        "iu" => "iou".to_owned(),
        "ui" => "uei".to_owned(),
        "un" => "uen".to_owned(),
        "i" if matches!(initial, "zh" | "ch" | "sh" | "r" | "z" | "c" | "s") => "-i".to_owned(),
        _ => fin,
    };
    Some((initial, fin))
}

/// Character index that carries the tone mark: a, then e, then the o of
/// "ou", then the last vowel; the nasal of a syllabic nasal.
pub fn mark_position(syllable: &str) -> usize {
    let chars: Vec<char> = syllable.chars().collect();
    let find = |c: char| chars.iter().position(|x| *x == c);
    if let Some(i) = find('a').or_else(|| find('e')) {
        return i;
    }
    if let Some(i) = syllable.find("ou") {
        return syllable[..i].chars().count();
    }
    if let Some(i) = chars.iter().rposition(|c| VOWELS.contains(c)) {
        return i;
    }
    chars.iter().position(|c| *c == 'm' || *c == 'n').unwrap_or(0)
}

/// The erhua suffix becomes the full syllable "er".
pub fn break_up_erhua(sequence: &[Entity], position: usize) -> Vec<Entity> {
    let entity = sequence[position].clone();
    if is_erhua(entity.syllable()) {
        vec![entity.with_syllable("er")]
    } else {
        vec![entity]
    }
}

/// Bindings of [`break_up_erhua`] for mappers into Pinyin.
pub fn erhua_hooks() -> Vec<HookBinding> {
    let hook: Arc<dyn PhonologicalHook> = Arc::new(FnHook::new("break up erhua", break_up_erhua));
    vec![
        HookBinding::new(HookStage::AfterMapping, hook.clone()).when(BREAK_UP_ERHUA, "on"),
        HookBinding::new(HookStage::AfterMapping, hook)
            .when(BREAK_UP_ERHUA, "auto")
            .when(ERHUA_OPTION, "ignore"),
    ]
}

/// Pinyin → Pinyin mapper carrying the erhua rule.
pub fn dialect_mapper() -> DialectMapper {
    erhua_hooks()
        .into_iter()
        .fold(DialectMapper::new(NAME), DialectMapper::with_hook)
}

fn diacritic(tone: Tone) -> Option<char> {
    match tone.name() {
        "1" => Some(MACRON),
        "2" => Some(ACUTE),
        "3" => Some(CARON),
        "4" => Some(GRAVE),
        _ => None,
    }
}

pub struct Pinyin {
    syllables: Vec<String>,
    schema: OptionSchema,
}

impl Default for Pinyin {
    fn default() -> Self {
        Self::new()
    }
}

impl Pinyin {
    pub fn new() -> Self {
        let schema = OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["diacritics", "numbers", "none"], "diacritics")
            .flag(STRICT_DIACRITIC_PLACEMENT, false)
            .choice(PINYIN_APOSTROPHE, &["'", "’"], "'")
            .flag(KEEP_PINYIN_APOSTROPHES, false)
            .choice(Y_VOWEL, &["ü", "v"], "ü")
            .choice(ERHUA_OPTION, &["twoSyllables", "ignore"], "twoSyllables")
            .choice(BREAK_UP_ERHUA, &["auto", "on", "off"], "auto")
            .with_common(&TONES);
        Self {
            syllables: PINYIN_SYLLABLES.iter().map(|s| (*s).to_owned()).collect(),
            schema,
        }
    }

    fn mark_type(dialect: &DialectConfig) -> ToneMarkType {
        ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::Diacritics)
    }

    /// "r" carries the neutral tone, unmarked in every tone mark type.
    fn spell_erhua(tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        if dialect.text(ERHUA_OPTION) == "ignore" {
            return Vec::new();
        }
        let neutral = tone == Some(TONES[4]);
        match Self::mark_type(dialect) {
            ToneMarkType::Numbers if neutral => vec![ERHUA.to_owned(), format!("{ERHUA}5")],
            ToneMarkType::Diacritics if neutral => vec![ERHUA.to_owned()],
            ToneMarkType::None if tone.is_none() => vec![ERHUA.to_owned()],
            _ => Vec::new(),
        }
    }
}

impl ToneCodec for Pinyin {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, dialect: &DialectConfig) -> Option<Tone> {
        match Self::mark_type(dialect) {
            ToneMarkType::Diacritics => Some(TONES[4]),
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

    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        if is_erhua(syllable) {
            return Self::spell_erhua(tone, dialect);
        }
        let base = if dialect.text(Y_VOWEL) == "v" {
            syllable.replace('ü', "v")
        } else {
            syllable.to_owned()
        };
        match (Self::mark_type(dialect), tone) {
            (ToneMarkType::Numbers, Some(t)) => vec![format!("{base}{t}")],
            (ToneMarkType::Diacritics, Some(t)) => {
                let Some(mark) = diacritic(t) else {
                    return vec![base];
                };
                let canonical = mark_position(&base);
                let mut surfaces = vec![place_mark(&base, canonical, mark)];
                if !dialect.flag(STRICT_DIACRITIC_PLACEMENT) {
                    for i in vowel_positions(&base, &VOWELS) {
                        if i != canonical {
                            surfaces.push(place_mark(&base, i, mark));
                        }
                    }
                }
                surfaces
            }
            _ => vec![base],
        }
    }
}

impl Reading for Pinyin {
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

    fn separators(&self, dialect: &DialectConfig) -> Vec<String> {
        let chosen = dialect.text(PINYIN_APOSTROPHE);
        let mut separators = vec![chosen.to_owned()];
        separators.extend(["'", "’"].iter().filter(|s| **s != chosen).map(|s| (*s).to_owned()));
        separators
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        SeparatorPolicy::WhenAmbiguous
    }

    fn keeps_separators(&self, dialect: &DialectConfig) -> bool {
        dialect.flag(KEEP_PINYIN_APOSTROPHES)
    }

    fn allows_boundary_before(&self, next: &Entity) -> bool {
        let syllable = next.syllable();
        !(syllable.starts_with(['a', 'e', 'o']) || matches!(syllable, "m" | "n" | "ng"))
    }

    fn requires_predecessor(&self, entity: &Entity) -> bool {
        is_erhua(entity.syllable())
    }

    fn guess_dialect(&self, text: &str) -> Vec<(String, OptionValue)> {
        let mut overrides = Vec::new();
        if NUMBERED.is_match(text) && !libreading_core::utils::has_combining_mark(text) {
            overrides.push((TONE_MARK_TYPE.to_owned(), "numbers".into()));
        }
        if text.contains('’') && !text.contains('\'') {
            overrides.push((PINYIN_APOSTROPHE.to_owned(), "’".into()));
        }
        if V_FOR_U.is_match(text) && !text.contains(['ü', 'Ü']) {
            overrides.push((Y_VOWEL.to_owned(), "v".into()));
        }
        overrides
    }
}
