// libmandarin/tests/ported_conversion_vectors.rs
//
// Reference conversion vectors for the Mandarin readings.
//
// Each case runs a full pipeline (decompose, tone normalization, mapping,
// compose) through a registry that holds only the Mandarin readings, with
// Pinyin as the pivot.

use libmandarin::{braille, gr, ipa, pinyin, wade_giles};
use libreading_core::dialect::{MISSING_TONE_MARK, STRICT_SEGMENTATION, TONE_MARK_TYPE};
use libreading_core::{ConversionOptions, ConversionRegistry, Engine, ErrorKind, OptionValue, ReadingError};

fn engine() -> Engine {
    let mut builder = ConversionRegistry::builder();
    libmandarin::register(&mut builder).expect("mandarin readings register");
    builder.pivot_priority([pinyin::NAME]);
    Engine::new(builder.build().expect("registry builds"))
}

fn convert(
    text: &str,
    from: &str,
    source: &[(&str, OptionValue)],
    to: &str,
    target: &[(&str, OptionValue)],
) -> Result<String, ReadingError> {
    let engine = engine();
    let registry = engine.registry();
    let source = registry.dialect(from, source.iter().cloned()).unwrap();
    let target = registry.dialect(to, target.iter().cloned()).unwrap();
    engine.convert(text, &source, &target, &ConversionOptions::default())
}

fn numbers() -> Vec<(&'static str, OptionValue)> {
    vec![(TONE_MARK_TYPE, "numbers".into())]
}

#[test]
fn ported_pinyin_dialect_conversion() {
    assert_eq!(
        convert("lao3shi1", pinyin::NAME, &numbers(), pinyin::NAME, &[]).unwrap(),
        "lǎoshī"
    );
    assert_eq!(
        convert("lǎoshī", pinyin::NAME, &[], pinyin::NAME, &numbers()).unwrap(),
        "lao3shi1"
    );
}

#[test]
fn ported_pinyin_diacritics_leave_numbered_text_alone() {
    assert_eq!(convert("lao3shi1", pinyin::NAME, &[], pinyin::NAME, &[]).unwrap(), "lao3shi1");
}

#[test]
fn ported_pinyin_apostrophe_is_kept_where_needed() {
    assert_eq!(
        convert("Xi1'an1", pinyin::NAME, &numbers(), pinyin::NAME, &[]).unwrap(),
        "Xī'ān"
    );
    assert_eq!(
        convert("Xī'ān", pinyin::NAME, &[], pinyin::NAME, &[("pinyinApostrophe", "’".into())]).unwrap(),
        "Xī’ān"
    );
}

#[test]
fn ported_wade_giles_missing_tone_is_ambiguous() {
    let err = convert("kuo", wade_giles::NAME, &[], pinyin::NAME, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ambiguous);
}

#[test]
fn ported_wade_giles_superscript_source() {
    let superscript = [(TONE_MARK_TYPE, OptionValue::from("superscriptNumbers"))];
    assert_eq!(
        convert("kuo³-yü²", wade_giles::NAME, &superscript, pinyin::NAME, &[]).unwrap(),
        "guǒyú"
    );
}

#[test]
fn ported_wade_giles_default_dialect_keeps_superscripts() {
    assert_eq!(
        convert("kuo³-yü²", wade_giles::NAME, &[], pinyin::NAME, &[]).unwrap(),
        "kuo³-yü²"
    );
}

#[test]
fn ported_wade_giles_aspiration() {
    assert_eq!(
        convert("ch’ang2-ch’eng2", wade_giles::NAME, &[], pinyin::NAME, &numbers()).unwrap(),
        "chang2cheng2"
    );
    assert_eq!(
        convert("chang2cheng2", pinyin::NAME, &numbers(), wade_giles::NAME, &[]).unwrap(),
        "ch’ang2-ch’eng2"
    );
}

#[test]
fn ported_braille_to_pinyin_shared_cells_are_ambiguous() {
    for text in ["⠍⠢⠆", "⠇⠢⠆", "⠢⠆"] {
        let err = convert(text, braille::NAME, &[], pinyin::NAME, &numbers()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Ambiguous, "{text}");
    }
}

#[test]
fn ported_braille_to_pinyin() {
    assert_eq!(convert("⠛⠥", braille::NAME, &[], pinyin::NAME, &numbers()).unwrap(), "gu5");
    assert_eq!(convert("⠛⠥⠁", braille::NAME, &[], pinyin::NAME, &numbers()).unwrap(), "gu1");
    assert_eq!(convert("⠛⠬", braille::NAME, &[], pinyin::NAME, &numbers()).unwrap(), "ju5");
}

#[test]
fn ported_pinyin_to_braille_from_diacritics() {
    assert_eq!(convert("lǎoshī", pinyin::NAME, &[], braille::NAME, &[]).unwrap(), "⠇⠖⠄⠱⠁");
    assert_eq!(convert("lao3shi1", pinyin::NAME, &[], braille::NAME, &[]).unwrap(), "lao3shi1");
    assert_eq!(convert("mò", pinyin::NAME, &[], braille::NAME, &[]).unwrap(), "⠍⠢⠆");
    assert_eq!(convert("mè", pinyin::NAME, &[], braille::NAME, &[]).unwrap(), "⠍⠢⠆");
    assert_eq!(convert("gu", pinyin::NAME, &[], braille::NAME, &[]).unwrap(), "⠛⠥");
}

#[test]
fn ported_pinyin_to_braille_from_numbers() {
    let cases = [
        ("lao3shi1", "⠇⠖⠄⠱⠁"),
        ("Qing ni deng yi1xia!", "⠅⠡ ⠝⠊ ⠙⠼ ⠊⠁⠓⠫⠰⠂"),
        ("mangwen shushe", "⠍⠦⠒ ⠱⠥⠱⠢"),
        ("shi4yong", "⠱⠆⠹"),
        ("yi1xia", "⠊⠁⠓⠫"),
        ("yi3xia", "⠊⠄⠓⠫"),
        ("gu", "⠛⠥"),
    ];
    for (text, expected) in cases {
        assert_eq!(
            convert(text, pinyin::NAME, &numbers(), braille::NAME, &[]).unwrap(),
            expected,
            "{text}"
        );
    }
}

#[test]
fn braille_missing_tone_lists_every_tone_cell() {
    let error = [(MISSING_TONE_MARK, OptionValue::from("error"))];
    let err = convert("gu", pinyin::NAME, &numbers(), braille::NAME, &error).unwrap_err();
    let ReadingError::Ambiguous(amb) = err else {
        panic!("expected an ambiguous conversion, got {err:?}");
    };
    assert_eq!(amb.entity, "gu");
    assert_eq!(amb.candidates, vec!["⠛⠥⠁", "⠛⠥⠂", "⠛⠥⠄", "⠛⠥⠆", "⠛⠥"]);
}

#[test]
fn braille_missing_tone_can_be_substituted() {
    let fifth = [(MISSING_TONE_MARK, OptionValue::from("5"))];
    assert_eq!(convert("gu", pinyin::NAME, &numbers(), braille::NAME, &fifth).unwrap(), "⠛⠥");
}

#[test]
fn ported_pinyin_to_ipa() {
    assert_eq!(
        convert("lao3shi1", pinyin::NAME, &numbers(), ipa::NAME, &[]).unwrap(),
        "lau˨˩.ʂʅ˥˥"
    );
    assert_eq!(convert("lao3shi1", pinyin::NAME, &[], ipa::NAME, &[]).unwrap(), "lao3shi1");
}

#[test]
fn strict_segmentation_rejects_foreign_text() {
    let strict = [(STRICT_SEGMENTATION, OptionValue::from(true))];
    let err = convert("lao3shi1", pinyin::NAME, &strict, ipa::NAME, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decomposition);
}

#[test]
fn braille_bridges_to_wade_giles_through_pinyin() {
    assert_eq!(
        convert("⠛⠥⠁", braille::NAME, &[], wade_giles::NAME, &[]).unwrap(),
        "ku1"
    );
}

#[test]
fn pinyin_apostrophes_are_dropped_unless_kept() {
    assert_eq!(convert("ni3'hao3", pinyin::NAME, &numbers(), pinyin::NAME, &[]).unwrap(), "nǐhǎo");
    let keep = [(pinyin::KEEP_PINYIN_APOSTROPHES, OptionValue::from(true))];
    assert_eq!(
        convert("ni3'hao3", pinyin::NAME, &numbers(), pinyin::NAME, &keep).unwrap(),
        "nǐ'hǎo"
    );
    let curly = [
        (pinyin::KEEP_PINYIN_APOSTROPHES, OptionValue::from(true)),
        (pinyin::PINYIN_APOSTROPHE, OptionValue::from("’")),
    ];
    assert_eq!(convert("Xī'ān", pinyin::NAME, &[], pinyin::NAME, &curly).unwrap(), "Xī’ān");
}

#[test]
fn erhua_to_wade_giles_and_back() {
    assert_eq!(convert("huār", pinyin::NAME, &[], wade_giles::NAME, &[]).unwrap(), "hua1rh");
    assert_eq!(convert("wánr", pinyin::NAME, &[], wade_giles::NAME, &[]).unwrap(), "wan2rh");
    assert_eq!(convert("nǎr", pinyin::NAME, &[], wade_giles::NAME, &[]).unwrap(), "na3rh");
    assert_eq!(convert("hua1rh", wade_giles::NAME, &[], pinyin::NAME, &[]).unwrap(), "huār");
    assert_eq!(convert("êrh2", wade_giles::NAME, &[], pinyin::NAME, &[]).unwrap(), "ér");
}

#[test]
fn erhua_to_braille_and_ipa() {
    assert_eq!(convert("huār", pinyin::NAME, &[], braille::NAME, &[]).unwrap(), "⠓⠿⠁⠗");
    assert_eq!(convert("⠓⠿⠁⠗", braille::NAME, &[], pinyin::NAME, &[]).unwrap(), "huār");
    assert_eq!(convert("huār", pinyin::NAME, &[], ipa::NAME, &[]).unwrap(), "xua˥˥ɻ");
}

#[test]
fn erhua_is_a_suffix_not_a_syllable() {
    assert_eq!(convert("ér", pinyin::NAME, &[], pinyin::NAME, &numbers()).unwrap(), "er2");
    assert_eq!(convert("hua1r", pinyin::NAME, &numbers(), pinyin::NAME, &[]).unwrap(), "huār");
    assert_eq!(convert("hua1r5", pinyin::NAME, &numbers(), pinyin::NAME, &[]).unwrap(), "huār");
    assert_eq!(convert("huār", pinyin::NAME, &[], pinyin::NAME, &numbers()).unwrap(), "hua1r");
}

#[test]
fn erhua_breaks_up_on_request() {
    let on = [(pinyin::BREAK_UP_ERHUA, OptionValue::from("on"))];
    assert_eq!(convert("huār", pinyin::NAME, &[], pinyin::NAME, &on).unwrap(), "huā'er");
    assert_eq!(convert("hua1rh", wade_giles::NAME, &[], pinyin::NAME, &on).unwrap(), "huā'er");

    // "auto" breaks up when the target does not know erhua.
    let ignore = [(pinyin::ERHUA_OPTION, OptionValue::from("ignore"))];
    assert_eq!(convert("huār", pinyin::NAME, &[], pinyin::NAME, &ignore).unwrap(), "huā'er");

    let off = [
        (pinyin::ERHUA_OPTION, OptionValue::from("ignore")),
        (pinyin::BREAK_UP_ERHUA, OptionValue::from("off")),
    ];
    let err = convert("huār", pinyin::NAME, &[], pinyin::NAME, &off).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

#[test]
fn ported_gr_dialect_apostrophes() {
    let source = [(gr::SYLLABLE_SEPARATOR_APOSTROPHE, OptionValue::from("'"))];
    let target = [(gr::RHOTACISED_FINAL_APOSTROPHE, OptionValue::from("'"))];
    assert_eq!(convert("tian'anmen", gr::NAME, &source, gr::NAME, &target).unwrap(), "tian’anmen");
    assert_eq!(convert("jie’l", gr::NAME, &source, gr::NAME, &target).unwrap(), "jie'l");
}

#[test]
fn gr_apostrophes_can_be_kept() {
    let keep = [(gr::KEEP_GR_APOSTROPHES, OptionValue::from(true))];
    assert_eq!(convert("Jong’gwo", gr::NAME, &[], gr::NAME, &[]).unwrap(), "Jonggwo");
    assert_eq!(convert("Jong’gwo", gr::NAME, &[], gr::NAME, &keep).unwrap(), "Jong’gwo");
}

#[test]
fn ported_gr_to_pinyin_words() {
    let cases = [
        ("Hannshyue", "Hànxué"),
        ("mingcheng", "míngchēng"),
        ("duey", "duì"),
        ("Jonggwo", "Zhōngguó"),
        ("yeou", "yǒu"),
        ("idean", "yīdiǎn"),
        ("buhtzuenjinq", "bùzūnjìng"),
        ("yihwey", "yìwèi"),
        ("Woo.men", "Wǒmen"),
        ("tingshuo", "tīngshuō"),
        ("Yinnduhshyue", "Yìndùxué"),
        ("Aijyishyue", "Āijíxué"),
        ("erl", "ér"),
        ("meiyeou", "méiyǒu"),
        ("Shilahshyue", "Xīlàxué"),
        ("Luomaashyue", "Luómǎxué"),
        ("genq", "gèng"),
        ("Inggwoshyue", "Yīngguóxué"),
        ("Meeigwoshyue", "Měiguóxué"),
        ("jey.geh", "zhèige"),
        ("wanchyuan", "wánquán"),
        ("beaushyh", "biǎoshì"),
        ("Ou-Meei", "Ōu-Měi"),
        ("shyuejee", "xuézhě"),
        ("nahshie", "nàxiē"),
        ("yii.jing", "yǐjing"),
        ("chernluen", "chénlún"),
        ("guulao-gwojia", "gǔlǎo-guójiā"),
        ("wenhuah", "wénhuà"),
        ("ijoong", "yīzhǒng"),
        ("chingkann", "qīngkàn"),
        ("tayduh", "tàidù"),
        (".de", "de"),
    ];
    for (text, expected) in cases {
        assert_eq!(convert(text, gr::NAME, &[], pinyin::NAME, &[]).unwrap(), expected, "{text}");
    }
}

#[test]
fn ported_gr_to_pinyin_sentence() {
    let text = "\"Hannshyue\" .de mingcheng duey Jonggwo yeou idean buhtzuenjinq .de yihwey. \
                Woo.men tingshuo yeou \"Yinnduhshyue\", \"Aijyishyue\", \"Hannshyue\", erl meiyeou tingshuo yeou \
                \"Shilahshyue\", \"Luomaashyue\", genq meiyeou tingshuo yeou \"Inggwoshyue\", \"Meeigwoshyue\". \
                \"Hannshyue\" jey.geh mingcheng wanchyuan beaushyh Ou-Meei shyuejee duey nahshie yii.jing chernluen \
                .de guulao-gwojia .de wenhuah .de ijoong chingkann .de tayduh.";
    let expected = "\"Hànxué\" de míngchēng duì Zhōngguó yǒu yīdiǎn bùzūnjìng de yìwèi. \
                    Wǒmen tīngshuō yǒu \"Yìndùxué\", \"Āijíxué\", \"Hànxué\", ér méiyǒu tīngshuō yǒu \
                    \"Xīlàxué\", \"Luómǎxué\", gèng méiyǒu tīngshuō yǒu \"Yīngguóxué\", \"Měiguóxué\". \
                    \"Hànxué\" zhèige míngchēng wánquán biǎoshì Ōu-Měi xuézhě duì nàxiē yǐjing chénlún \
                    de gǔlǎo-guójiā de wénhuà de yīzhǒng qīngkàn de tàidù.";
    assert_eq!(convert(text, gr::NAME, &[], pinyin::NAME, &[]).unwrap(), expected);
}

#[test]
fn gr_optional_neutral_tone_can_keep_its_tone() {
    let original = [(gr::OPTIONAL_NEUTRAL_TONE_MAPPING, OptionValue::from("original"))];
    assert_eq!(convert("jey.geh", gr::NAME, &original, pinyin::NAME, &[]).unwrap(), "zhèigè");
    assert_eq!(convert("yii.jing", gr::NAME, &original, pinyin::NAME, &[]).unwrap(), "yǐjing");
}

#[test]
fn pinyin_to_gr() {
    let cases = [
        ("Zhōngguó", "Jonggwo"),
        ("Wǒmen", "Woo.men"),
        ("Xī'ān", "Shi’an"),
        ("huār", "hua’l"),
        ("tiān'ānmén", "tian’anmen"),
        ("nǚrén", "neuren"),
    ];
    for (text, expected) in cases {
        assert_eq!(convert(text, pinyin::NAME, &[], gr::NAME, &[]).unwrap(), expected, "{text}");
    }
}

#[test]
fn gr_bridges_to_wade_giles() {
    assert_eq!(convert("Jonggwo", gr::NAME, &[], wade_giles::NAME, &[]).unwrap(), "Chung1-kuo2");
}
