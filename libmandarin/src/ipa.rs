// libmandarin/src/ipa.rs
//
// Mandarin in the International Phonetic Alphabet.
//
// Tones are written with Chao tone letters (or their digits) after the
// syllable; the neutral tone is unmarked. Conversion from Pinyin runs two
// context rules: third-tone sandhi on the Pinyin side and the half third
// tone on the IPA side (both under sandhi = lowThirdAndSandhi), plus optional
// reduction of a final neutral-tone ɤ to ə (coarticulation = finalE).
//
// The erhua suffix is a toneless ɻ joined to the syllable before it. The tone
// rules look past it.

use std::sync::Arc;

use once_cell::sync::Lazy;
use phf::phf_map;

use libreading_core::dialect::TONE_MARK_TYPE;
use libreading_core::{
    DialectConfig, Entity, FnHook, HookBinding, HookStage, OptionSchema, Reading, SeparatorPolicy, TableMapper, Tone,
    ToneCodec, ToneMarkType,
};

use crate::pinyin::{self, is_erhua, split_initial_final, PINYIN_SYLLABLES};

pub const NAME: &str = "MandarinIPA";

pub const ERHUA: &str = "ɻ";

pub const SANDHI: &str = "sandhi";
pub const COARTICULATION: &str = "coarticulation";

pub const HIGH_LEVEL: Tone = Tone::new("HighLevel");
pub const MID_RISING: Tone = Tone::new("MidRising");
pub const LOW_FALLING_RISING: Tone = Tone::new("LowFallingRising");
/// The "half third" tone.
pub const LOW_FALLING: Tone = Tone::new("LowFalling");
pub const HIGH_FALLING: Tone = Tone::new("HighFalling");
pub const NEUTRAL: Tone = Tone::new("Neutral");

pub const TONES: [Tone; 6] = [HIGH_LEVEL, MID_RISING, LOW_FALLING_RISING, LOW_FALLING, HIGH_FALLING, NEUTRAL];

static INITIALS: phf::Map<&'static str, &'static str> = phf_map! {
    "b" => "p", "p" => "pʰ", "m" => "m", "f" => "f",
    "d" => "t", "t" => "tʰ", "n" => "n", "l" => "l",
    "g" => "k", "k" => "kʰ", "h" => "x",
    "j" => "tɕ", "q" => "tɕʰ", "x" => "ɕ",
    "zh" => "ʈʂ", "ch" => "ʈʂʰ", "sh" => "ʂ", "r" => "ʐ",
    "z" => "ts", "c" => "tsʰ", "s" => "s",
};

static FINALS: phf::Map<&'static str, &'static str> = phf_map! {
    "a" => "a", "o" => "o", "e" => "ɤ", "er" => "ɚ",
    "ai" => "ai", "ei" => "ei", "ao" => "au", "ou" => "ou",
    "an" => "an", "en" => "ən", "ang" => "aŋ", "eng" => "əŋ", "ong" => "ʊŋ",
    "i" => "i", "ia" => "ia", "io" => "io", "ie" => "iɛ", "iao" => "iau", "iou" => "iou",
    "ian" => "iɛn", "in" => "in", "iang" => "iaŋ", "ing" => "iŋ", "iong" => "iʊŋ",
    "u" => "u", "ua" => "ua", "uo" => "uo", "uai" => "uai", "uei" => "uei",
    "uan" => "uan", "uen" => "uən", "uang" => "uaŋ", "ueng" => "uəŋ",
    "ü" => "y", "üe" => "yɛ", "üan" => "yɛn", "ün" => "yn",
};

static SYLLABIC_NASALS: phf::Map<&'static str, &'static str> = phf_map! {
    "m" => "m\u{0329}", "n" => "n\u{0329}", "ng" => "ŋ\u{030D}",
    "hm" => "hm\u{0329}", "hng" => "hŋ\u{030D}",
};

/// IPA transcription of a Pinyin base syllable.
///
/// ```
/// use libmandarin::ipa::from_pinyin;
///
/// assert_eq!(from_pinyin("lao").as_deref(), Some("lau"));
/// assert_eq!(from_pinyin("shi").as_deref(), Some("ʂʅ"));
/// assert_eq!(from_pinyin("zi").as_deref(), Some("tsɿ"));
/// assert_eq!(from_pinyin("xue").as_deref(), Some("ɕyɛ"));
/// ```
pub fn from_pinyin(syllable: &str) -> Option<String> {
    if is_erhua(syllable) {
        return Some(ERHUA.to_owned());
    }
    if let Some(nasal) = SYLLABIC_NASALS.get(syllable) {
        return Some((*nasal).to_owned());
    }
    let (initial, fin) = split_initial_final(syllable)?;
    let fin = match (initial, fin.as_str()) {
        ("zh" | "ch" | "sh" | "r", "-i") => "ʅ",
        ("z" | "c" | "s", "-i") => "ɿ",
        (_, other) => *FINALS.get(other)?,
    };
    if initial.is_empty() {
        return Some(fin.to_owned());
    }
    Some(format!("{}{fin}", INITIALS.get(initial)?))
}

static SYLLABLE_TABLE: Lazy<Vec<(&'static str, String)>> = Lazy::new(|| {
    PINYIN_SYLLABLES
        .iter()
        .filter_map(|p| from_pinyin(p).map(|i| (*p, i)))
        .collect()
});

fn chao_letters(tone: Tone) -> &'static str {
    match tone.name() {
        "HighLevel" => "˥˥",
        "MidRising" => "˧˥",
        "LowFallingRising" => "˨˩˦",
        "LowFalling" => "˨˩",
        "HighFalling" => "˥˩",
        _ => "",
    }
}

fn chao_digits(tone: Tone) -> &'static str {
    match tone.name() {
        "HighLevel" => "55",
        "MidRising" => "35",
        "LowFallingRising" => "214",
        "LowFalling" => "21",
        "HighFalling" => "51",
        _ => "",
    }
}

pub struct MandarinIpa {
    syllables: Vec<String>,
    schema: OptionSchema,
}

impl Default for MandarinIpa {
    fn default() -> Self {
        Self::new()
    }
}

impl MandarinIpa {
    pub fn new() -> Self {
        let mut syllables: Vec<String> = Vec::new();
        for (_, ipa) in SYLLABLE_TABLE.iter() {
            if !syllables.contains(ipa) {
                syllables.push(ipa.clone());
            }
        }
        // Reduced forms produced by the final-e rule.
        let reduced: Vec<String> = syllables
            .iter()
            .filter_map(|s| s.strip_suffix('ɤ').map(|stem| format!("{stem}ə")))
            .collect();
        syllables.extend(reduced);

        let schema = OptionSchema::new()
            .choice(TONE_MARK_TYPE, &["chaoLetters", "chaoDigits", "none"], "chaoLetters")
            .choice(SANDHI, &["lowThirdAndSandhi", "none"], "lowThirdAndSandhi")
            .choice(COARTICULATION, &["finalE", "none"], "none")
            .with_common(&TONES);
        Self { syllables, schema }
    }

    fn mark_type(dialect: &DialectConfig) -> ToneMarkType {
        ToneMarkType::from_name(dialect.text(TONE_MARK_TYPE)).unwrap_or(ToneMarkType::ChaoLetters)
    }
}

impl ToneCodec for MandarinIpa {
    fn tones(&self) -> &[Tone] {
        &TONES
    }

    fn unmarked_tone(&self, dialect: &DialectConfig) -> Option<Tone> {
        match Self::mark_type(dialect) {
            ToneMarkType::None => None,
            _ => Some(NEUTRAL),
        }
    }

    fn can_express(&self, tone: Option<Tone>, dialect: &DialectConfig) -> bool {
        match Self::mark_type(dialect) {
            ToneMarkType::None => tone.is_none(),
            _ => tone.is_some(),
        }
    }

    fn spell(&self, syllable: &str, tone: Option<Tone>, dialect: &DialectConfig) -> Vec<String> {
        let mark = match (Self::mark_type(dialect), tone) {
            (ToneMarkType::ChaoLetters, Some(t)) => chao_letters(t),
            (ToneMarkType::ChaoDigits, Some(t)) => chao_digits(t),
            _ => "",
        };
        vec![format!("{syllable}{mark}")]
    }
}

impl Reading for MandarinIpa {
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
        vec![".".to_owned()]
    }

    fn separator_policy(&self) -> SeparatorPolicy {
        SeparatorPolicy::Always
    }

    fn separator_before(&self, next: &Entity, _dialect: &DialectConfig) -> Option<String> {
        (next.syllable() != ERHUA).then(|| ".".to_owned())
    }

    fn requires_predecessor(&self, entity: &Entity) -> bool {
        entity.syllable() == ERHUA
    }
}

/// Third tone followed by a third tone is read as a second tone. Runs over
/// Pinyin entities.
pub fn third_tone_sandhi(sequence: &[Entity], position: usize) -> Vec<Entity> {
    let entity = sequence[position].clone();
    let third = Some(pinyin::TONES[2]);
    let next = sequence[position + 1..].iter().find(|e| !is_erhua(e.syllable()));
    match next {
        Some(next) if entity.tone() == third && next.tone() == third => vec![entity.with_tone(Some(pinyin::TONES[1]))],
        _ => vec![entity],
    }
}

/// A full third tone is only realized at the end of the sequence; elsewhere
/// it loses its rise.
pub fn half_third_tone(sequence: &[Entity], position: usize) -> Vec<Entity> {
    let entity = sequence[position].clone();
    let followed = sequence[position + 1..].iter().any(|e| e.syllable() != ERHUA);
    if entity.tone() == Some(LOW_FALLING_RISING) && followed {
        vec![entity.with_tone(Some(LOW_FALLING))]
    } else {
        vec![entity]
    }
}

/// A neutral-tone syllable ending in ɤ is reduced to ə.
pub fn final_e_coarticulation(sequence: &[Entity], position: usize) -> Vec<Entity> {
    let entity = sequence[position].clone();
    if entity.tone() != Some(NEUTRAL) {
        return vec![entity];
    }
    match entity.syllable().strip_suffix('ɤ') {
        Some(stem) => {
            let reduced = format!("{stem}ə");
            vec![entity.with_syllable(reduced)]
        }
        None => vec![entity],
    }
}

/// Pinyin → IPA table with its context rules.
pub fn mapper() -> TableMapper {
    let mut table = TableMapper::new(pinyin::NAME, NAME);
    for (p, ipa) in SYLLABLE_TABLE.iter() {
        table.insert(p, ipa);
    }
    for (from, to) in pinyin::TONES.into_iter().zip([HIGH_LEVEL, MID_RISING, LOW_FALLING_RISING, HIGH_FALLING, NEUTRAL]) {
        table.insert_tone(from, to);
    }
    table
        .with_hook(
            HookBinding::new(
                HookStage::BeforeMapping,
                Arc::new(FnHook::new("third-tone sandhi", third_tone_sandhi)),
            )
            .when(SANDHI, "lowThirdAndSandhi"),
        )
        .with_hook(
            HookBinding::new(HookStage::AfterMapping, Arc::new(FnHook::new("half third tone", half_third_tone)))
                .when(SANDHI, "lowThirdAndSandhi"),
        )
        .with_hook(
            HookBinding::new(
                HookStage::AfterMapping,
                Arc::new(FnHook::new("final e coarticulation", final_e_coarticulation)),
            )
            .when(COARTICULATION, "finalE"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use libreading_core::hooks::apply_hook;

    #[test]
    fn every_pinyin_syllable_has_a_transcription() {
        for syllable in PINYIN_SYLLABLES {
            assert!(from_pinyin(syllable).is_some(), "{syllable}");
        }
    }

    #[test]
    fn reduced_forms_are_in_the_vocabulary() {
        let ipa = MandarinIpa::new();
        assert!(ipa.syllables().iter().any(|s| s == "tɤ"));
        assert!(ipa.syllables().iter().any(|s| s == "tə"));
    }

    #[test]
    fn chao_marks() {
        let ipa = MandarinIpa::new();
        let letters = ipa.default_options();
        assert_eq!(ipa.spell("ʂʅ", Some(HIGH_LEVEL), &letters), vec!["ʂʅ˥˥"]);
        assert_eq!(ipa.spell("tə", Some(NEUTRAL), &letters), vec!["tə"]);
        let digits = DialectConfig::new(NAME, ipa.option_schema(), [(TONE_MARK_TYPE, "chaoDigits")]).unwrap();
        assert_eq!(ipa.spell("lau", Some(LOW_FALLING_RISING), &digits), vec!["lau214"]);
    }

    #[test]
    fn sandhi_rules() {
        let three = Some(pinyin::TONES[2]);
        let sequence = vec![Entity::new("ni", three), Entity::new("hao", three)];
        let sandhi = FnHook::new("sandhi", third_tone_sandhi);
        let adjusted = apply_hook(&sandhi, &sequence);
        assert_eq!(adjusted[0].tone(), Some(pinyin::TONES[1]));
        assert_eq!(adjusted[1].tone(), three);

        let ipa = vec![
            Entity::new("lau", Some(LOW_FALLING_RISING)),
            Entity::new("ʂʅ", Some(HIGH_LEVEL)),
            Entity::new("xau", Some(LOW_FALLING_RISING)),
        ];
        let half = apply_hook(&FnHook::new("half", half_third_tone), &ipa);
        assert_eq!(half[0].tone(), Some(LOW_FALLING));
        assert_eq!(half[2].tone(), Some(LOW_FALLING_RISING));
    }

    #[test]
    fn tone_rules_look_past_erhua() {
        let three = Some(pinyin::TONES[2]);
        let pinyin = vec![
            Entity::new("na", three),
            Entity::new(pinyin::ERHUA, Some(pinyin::TONES[4])),
            Entity::new("hao", three),
        ];
        let sandhi = apply_hook(&FnHook::new("sandhi", third_tone_sandhi), &pinyin);
        assert_eq!(sandhi[0].tone(), Some(pinyin::TONES[1]));

        let ipa = vec![Entity::new("na", Some(LOW_FALLING_RISING)), Entity::new(ERHUA, Some(NEUTRAL))];
        let half = apply_hook(&FnHook::new("half", half_third_tone), &ipa);
        assert_eq!(half[0].tone(), Some(LOW_FALLING_RISING));

        let reading = MandarinIpa::new();
        let dialect = reading.default_options();
        assert_eq!(reading.spell(ERHUA, Some(NEUTRAL), &dialect), vec!["ɻ"]);
        assert_eq!(reading.separator_before(&ipa[1], &dialect), None);
    }

    #[test]
    fn final_e_only_in_neutral_tone() {
        let sequence = vec![Entity::new("tɤ", Some(NEUTRAL)), Entity::new("kɤ", Some(HIGH_FALLING))];
        let reduced = apply_hook(&FnHook::new("final e", final_e_coarticulation), &sequence);
        assert_eq!(reduced[0].syllable(), "tə");
        assert_eq!(reduced[1].syllable(), "kɤ");
    }
}
