// libmandarin/src/gr.rs
//
// Gwoyeu Romatzyh (GR), the National Romanization.
//
// GR writes the tone with the spelling itself. The first tone is the basic
// form (m/n/l/r take an h after the initial). The second tone turns a leading
// i/u of the final into y/w or inserts an r after the vowels; the third
// turns a medial i/u into e/o or doubles the main vowel; the fourth changes
// a final i/u/n/ng/l into y/w/nn/nq/ll or adds h. A dot before the basic
// form marks the neutral tone. A dot before a tonal spelling is an optional
// neutral tone that keeps the tone the syllable has in isolation.
//
// Rhotacised finals are written as the suffix "l" after an apostrophe
// ("jie’l"). The syllabic nasals have no GR syllable.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use phf::phf_map;

use libreading_core::{
    ConversionDirection, ConversionError, DialectConfig, Entity, EntityMapper, HookBinding, HookStage, MappingContext,
    OptionSchema, OptionValue, Reading, SeparatorPolicy, TableMapper, Tone, ToneCodec,
};

use crate::pinyin::{self, split_initial_final, PINYIN_SYLLABLES};

pub const NAME: &str = "GR";

pub const KEEP_GR_APOSTROPHES: &str = "keepGRApostrophes";
pub const SYLLABLE_SEPARATOR_APOSTROPHE: &str = "GRSyllableSeparatorApostrophe";
pub const RHOTACISED_FINAL_APOSTROPHE: &str = "GRRhotacisedFinalApostrophe";
/// "neutral" reads an optional neutral tone as the fifth Pinyin tone,
/// "original" as the tone it is written with.
pub const OPTIONAL_NEUTRAL_TONE_MAPPING: &str = "GROptionalNeutralToneMapping";

/// The rhotacised final suffix.
pub const ERHUA: &str = "l";

pub const NEUTRAL_DOT: char = '.';

/// Optional neutral tones, one per tone they keep ("o" for optional).
pub const OPTIONAL_NEUTRAL_TONES: [Tone; 4] = [Tone::new("1o"), Tone::new("2o"), Tone::new("3o"), Tone::new("4o")];

pub const TONES: [Tone; 9] = [
    Tone::new("1"),
    Tone::new("2"),
    Tone::new("3"),
    Tone::new("4"),
    Tone::new("5"),
    Tone::new("1o"),
    Tone::new("2o"),
    Tone::new("3o"),
    Tone::new("4o"),
];

const APOSTROPHES: [&str; 2] = ["’", "'"];

static INITIALS: phf::Map<&'static str, &'static str> = phf_map! {
    "b" => "b", "p" => "p", "m" => "m", "f" => "f",
    "d" => "d", "t" => "t", "n" => "n", "l" => "l",
    "g" => "g", "k" => "k", "h" => "h",
    "j" => "j", "q" => "ch", "x" => "sh",
    "zh" => "j", "ch" => "ch", "sh" => "sh", "r" => "r",
    "z" => "tz", "c" => "ts", "s" => "s",
};

static FINALS: phf::Map<&'static str, &'static str> = phf_map! {
    "a" => "a", "o" => "o", "e" => "e", "er" => "el",
    "ai" => "ai", "ei" => "ei", "ao" => "au", "ou" => "ou",
    "an" => "an", "en" => "en", "ang" => "ang", "eng" => "eng", "ong" => "ong",
    "i" => "i", "ia" => "ia", "io" => "io", "ie" => "ie", "iao" => "iau", "iou" => "iou",
    "ian" => "ian", "in" => "in", "iang" => "iang", "ing" => "ing", "iong" => "iong",
    "u" => "u", "ua" => "ua", "uo" => "uo", "uai" => "uai", "uei" => "uei",
    "uan" => "uan", "uen" => "uen", "uang" => "uang", "ueng" => "ueng",
    "ü" => "iu", "üe" => "iue", "üan" => "iuan", "ün" => "iun",
    "-i" => "y",
};

fn second_tone(fin: &str) -> String {
    match fin {
        "i" => "yi".to_owned(),
        "u" => "wu".to_owned(),
        _ => {
            if let Some(rest) = fin.strip_prefix('i') {
                format!("y{rest}")
            } else if let Some(rest) = fin.strip_prefix('u') {
                format!("w{rest}")
            } else {
                let stem = ["ng", "n", "l"]
                    .iter()
                    .find_map(|coda| fin.strip_suffix(coda))
                    .unwrap_or(fin);
                format!("{stem}r{}", &fin[stem.len()..])
            }
        }
    }
}

fn third_tone(fin: &str) -> String {
    match fin {
        "ie" => return "iee".to_owned(),
        "uo" => return "uoo".to_owned(),
        "ai" => return "ae".to_owned(),
        "au" => return "ao".to_owned(),
        _ => {}
    }
    if let Some(rest) = fin.strip_prefix("iu") {
        return format!("eu{rest}");
    }
    let mut chars = fin.chars();
    match (chars.next(), chars.next()) {
        (Some('i'), Some('a' | 'e' | 'o')) => format!("e{}", &fin[1..]),
        (Some('u'), Some('a' | 'e' | 'o')) => format!("o{}", &fin[1..]),
        (Some(main), _) => format!("{main}{fin}"),
        (None, _) => String::new(),
    }
}

fn fourth_tone(fin: &str) -> String {
    for (diphthong, changed) in [("ai", "ay"), ("ei", "ey"), ("au", "aw"), ("ou", "ow")] {
        if let Some(stem) = fin.strip_suffix(diphthong) {
            return format!("{stem}{changed}");
        }
    }
    if let Some(stem) = fin.strip_suffix("ng") {
        return format!("{stem}nq");
    }
    match fin.chars().last() {
        Some(coda @ ('n' | 'l')) => format!("{fin}{coda}"),
        _ => format!("{fin}h"),
    }
}

/// A syllable without initial starts with y/w in the fourth tone.
fn zero_initial_glide(fin: &str) -> String {
    match fin {
        "i" | "in" | "ing" => format!("y{fin}"),
        "u" => "wu".to_owned(),
        _ => {
            if let Some(rest) = fin.strip_prefix('i') {
                format!("y{rest}")
            } else if let Some(rest) = fin.strip_prefix('u') {
                format!("w{rest}")
            } else {
                fin.to_owned()
            }
        }
    }
}

fn zero_initial_third(basic: &str, third: String) -> String {
    match basic.chars().next() {
        Some('i') if third.starts_with("ii") || third.starts_with('e') => format!("y{third}"),
        Some('i') => format!("y{}", &third[1..]),
        Some('u') if third.starts_with("uu") || third.starts_with('o') => format!("w{third}"),
        Some('u') => format!("w{}", &third[1..]),
        _ => third,
    }
}

/// Base form and tonal spellings of one syllable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spelling {
    pub pinyin: &'static str,
    pub base: String,
    /// Tones one to four.
    pub tonal: [String; 4],
}

impl Spelling {
    /// Canonical surface of the syllable in `tone`.
    pub fn surface(&self, tone: Tone) -> Option<String> {
        if let Some(i) = TONES[..4].iter().position(|t| *t == tone) {
            return Some(self.tonal[i].clone());
        }
        let neutral = format!("{NEUTRAL_DOT}{}", self.base);
        if tone == TONES[4] {
            return Some(neutral);
        }
        // Written like the neutral tone, the optional form does not exist.
        let i = OPTIONAL_NEUTRAL_TONES.iter().position(|t| *t == tone)?;
        let optional = format!("{NEUTRAL_DOT}{}", self.tonal[i]);
        (optional != neutral).then_some(optional)
    }
}

/// GR spellings of a Pinyin base syllable.
///
/// ```
/// use libmandarin::gr::spelling;
///
/// let guo = spelling("guo").unwrap();
/// assert_eq!(guo.base, "guo");
/// assert_eq!(guo.tonal, ["guo", "gwo", "guoo", "guoh"]);
/// let ming = spelling("ming").unwrap();
/// assert_eq!(ming.tonal, ["mhing", "ming", "miing", "minq"]);
/// assert_eq!(spelling("ng"), None);
/// ```
pub fn spelling(syllable: &'static str) -> Option<Spelling> {
    let (initial, fin) = split_initial_final(syllable)?;
    let basic = *FINALS.get(fin.as_str())?;
    if initial.is_empty() {
        let third = zero_initial_third(basic, third_tone(basic));
        return Some(Spelling {
            pinyin: syllable,
            base: basic.to_owned(),
            tonal: [
                basic.to_owned(),
                second_tone(basic),
                third,
                fourth_tone(&zero_initial_glide(basic)),
            ],
        });
    }

    let gr_initial = *INITIALS.get(initial)?;
    let base = format!("{gr_initial}{basic}");
    let sonorant = matches!(initial, "m" | "n" | "l" | "r");
    let (first, second) = if sonorant {
        (format!("{gr_initial}h{basic}"), base.clone())
    } else {
        (base.clone(), format!("{gr_initial}{}", second_tone(basic)))
    };
    Some(Spelling {
        pinyin: syllable,
        tonal: [
            first,
            second,
            format!("{gr_initial}{}", third_tone(basic)),
            format!("{gr_initial}{}", fourth_tone(basic)),
        ],
        base,
    })
}

/// Spellings in Pinyin syllable order.
static SYLLABLE_TABLE: Lazy<Vec<Spelling>> = Lazy::new(|| PINYIN_SYLLABLES.iter().filter_map(|p| spelling(*p)).collect());

static BY_BASE: Lazy<HashMap<&'static str, &'static Spelling>> =
    Lazy::new(|| SYLLABLE_TABLE.iter().map(|s| (s.base.as_str(), s)).collect());

pub struct GwoyeuRomatzyh {
    syllables: Vec<String>,
    schema: OptionSchema,
}

impl Default for GwoyeuRomatzyh {
    fn default() -> Self {
        Self::new()
    }
}

impl GwoyeuRomatzyh {
    pub fn new() -> Self {
        let mut syllables: Vec<String> = Vec::new();
        for spelling in SYLLABLE_TABLE.iter() {
            if !syllables.contains(&spelling.base) {
                syllables.push(spelling.base.clone());
            }
        }
        syllables.push(ERHUA.to_owned());
        let schema = OptionSchema::new()
            .choice(SYLLABLE_SEPARATOR_APOSTROPHE, &APOSTROPHES, "’")
            .choice(RHOTACISED_FINAL_APOSTROPHE, &APOSTROPHES, "’")
            .flag(KEEP_GR_APOSTROPHES, false)
            .choice(OPTIONAL_NEUTRAL_TONE_MAPPING, &["neutral", "original"], "neutral")
            .with_common(&TONES);
        Self { syllables, schema }
    }

    /// Canonical surface, lowercase.
    fn surface(syllable: &str, tone: Option<Tone>) -> Option<String> {
        if syllable == ERHUA {
            return Some(ERHUA.to_owned());
        }
        let spelling = BY_BASE.get(syllable)?;
        match tone {
            Some(tone) => spelling.surface(tone),
            None => Some(spelling.base.clone()),
        }
    }
}

impl ToneCodec for GwoyeuRomatzyh {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, _dialect: &DialectConfig) -> Option<Tone> {
        None
    }

    fn can_express(&self, tone: Option<Tone>, _dialect: &DialectConfig) -> bool {
        tone.is_some()
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, _dialect: &DialectConfig) -> Vec<String> {
        match tone {
            Some(t) if syllable == ERHUA => {
                if t == TONES[4] {
                    vec![ERHUA.to_owned()]
                } else {
                    Vec::new()
                }
            }
            Some(_) => Self::surface(syllable, tone).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

impl Reading for GwoyeuRomatzyh {
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
        let chosen = dialect.text(SYLLABLE_SEPARATOR_APOSTROPHE);
        let mut separators = vec![chosen.to_owned()];
        separators.extend(APOSTROPHES.iter().filter(|a| **a != chosen).map(|a| (*a).to_owned()));
        separators
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        SeparatorPolicy::WhenAmbiguous
    }

    fn separator_before(&self, next: &Entity, dialect: &DialectConfig) -> Option<String> {
        let option = if next.syllable() == ERHUA {
            RHOTACISED_FINAL_APOSTROPHE
        } else {
            SYLLABLE_SEPARATOR_APOSTROPHE
        };
        Some(dialect.text(option).to_owned())
    }

    fn keeps_separators(&self, dialect: &DialectConfig) -> bool {
        dialect.flag(KEEP_GR_APOSTROPHES)
    }

    /// The written form decides: "an" needs an apostrophe, "yan" does not.
    fn allows_boundary_before(&self, next: &Entity) -> bool {
        match Self::surface(next.syllable(), next.tone()) {
            Some(surface) => next.syllable() != ERHUA && !surface.starts_with(['a', 'e', 'i', 'o', 'u']),
            None => true,
        }
    }

    fn requires_predecessor(&self, entity: &Entity) -> bool {
        entity.syllable() == ERHUA
    }

    fn guess_dialect(&self, text: &str) -> Vec<(String, OptionValue)> {
        if text.contains('\'') && !text.contains('’') {
            vec![
                (SYLLABLE_SEPARATOR_APOSTROPHE.to_owned(), "'".into()),
                (RHOTACISED_FINAL_APOSTROPHE.to_owned(), "'".into()),
            ]
        } else {
            Vec::new()
        }
    }
}

/// GR → Pinyin: the reverse table, reading optional neutral tones by the
/// source dialect's `GROptionalNeutralToneMapping`.
#[derive(Debug, Clone)]
pub struct GrPinyinMapper {
    table: TableMapper,
}

impl GrPinyinMapper {
    pub fn table(&self) -> &TableMapper {
        &self.table
    }
}

impl EntityMapper for GrPinyinMapper {
    fn direction(&self) -> &ConversionDirection {
        self.table.direction()
    }

    fn map_entity(&self, entity: &Entity, ctx: &MappingContext<'_>) -> Result<Vec<Entity>, ConversionError> {
        let optional = entity.tone().is_some_and(|t| OPTIONAL_NEUTRAL_TONES.contains(&t));
        if optional && ctx.source.text(OPTIONAL_NEUTRAL_TONE_MAPPING) == "neutral" {
            let neutral = entity.clone().with_tone(Some(TONES[4]));
            return self.table.map_entity(&neutral, ctx);
        }
        self.table.map_entity(entity, ctx)
    }

    fn hooks(&self, stage: HookStage, target: &DialectConfig) -> Vec<HookBinding> {
        self.table.hooks(stage, target)
    }

    fn map_passthrough(&self, text: &str) -> String {
        self.table.map_passthrough(text)
    }
}

/// Pinyin → GR table and the GR → Pinyin mapper with the erhua break-up
/// rule.
pub fn mappers() -> (TableMapper, GrPinyinMapper) {
    let mut forward = TableMapper::new(pinyin::NAME, NAME);
    for spelling in SYLLABLE_TABLE.iter() {
        forward.insert(spelling.pinyin, &spelling.base);
    }
    forward.insert(pinyin::ERHUA, ERHUA);
    for tone in pinyin::TONES {
        forward.insert_tone(tone, tone);
    }
    let order: Vec<String> = PINYIN_SYLLABLES.iter().map(|s| (*s).to_owned()).collect();
    let mut backward = forward.inverted(&order);
    for (optional, tone) in OPTIONAL_NEUTRAL_TONES.into_iter().zip(pinyin::TONES) {
        backward.insert_tone(optional, tone);
    }
    let table = pinyin::erhua_hooks().into_iter().fold(backward, TableMapper::with_hook);
    (forward, GrPinyinMapper { table })
}
