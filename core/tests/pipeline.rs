// core/tests/pipeline.rs
//
// End-to-end conversions over the toy readings in `common`.

mod common;

use common::{dialect, engine};
use libreading_core::dialect::{MISSING_TONE_MARK, STRICT_SEGMENTATION, TONE_MARK_TYPE};
use libreading_core::{
    ConversionOptions, ConversionState, Disambiguation, ErrorKind, OptionValue, ReadingError, Segment,
    UnsupportedError,
};

fn convert(text: &str, from: &str, to: &str) -> Result<String, ReadingError> {
    convert_with(text, from, &[], to, &[])
}

fn convert_with(
    text: &str,
    from: &str,
    source: &[(&str, OptionValue)],
    to: &str,
    target: &[(&str, OptionValue)],
) -> Result<String, ReadingError> {
    let engine = engine();
    let source = dialect(&engine, from, source);
    let target = dialect(&engine, to, target);
    engine.convert(text, &source, &target, &ConversionOptions::default())
}

#[test]
fn direct_conversion_maps_syllables_and_tones() {
    assert_eq!(convert("ba1ban2", "Alpha", "Beta").unwrap(), "paˉpan");
    assert_eq!(convert("na2, ban1!", "Alpha", "Beta").unwrap(), "la, panˉ¡");
}

#[test]
fn target_case_is_dropped_for_uncased_readings() {
    assert_eq!(convert("Ba1", "Alpha", "Beta").unwrap(), "paˉ");
}

#[test]
fn same_reading_round_trip_keeps_case_and_separator() {
    assert_eq!(convert("Ba1'an2", "Alpha", "Alpha").unwrap(), "Ba1'an2");
}

#[test]
fn composer_inserts_separator_only_when_needed() {
    let engine = engine();
    let plain = dialect(&engine, "Alpha", &[(TONE_MARK_TYPE, "none".into())]);
    let segments = engine.decompose("ba'an bana", &plain).unwrap();
    assert_eq!(segments.len(), 6);
    let entities: Vec<Segment> = segments.into_iter().filter(Segment::is_entity).collect();
    assert_eq!(engine.compose(&entities, &plain).unwrap(), "ba'anbana");
}

#[test]
fn tone_the_target_cannot_write_follows_policy() {
    let err = convert_with("ba1'an2", "Alpha", &[], "Alpha", &[(TONE_MARK_TYPE, "none".into())]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);

    let out = convert_with(
        "ba1'an2",
        "Alpha",
        &[],
        "Alpha",
        &[(TONE_MARK_TYPE, "none".into()), (MISSING_TONE_MARK, "ignore".into())],
    )
    .unwrap();
    assert_eq!(out, "ba'an");
}

#[test]
fn unknown_tone_expands_to_every_target_tone() {
    let err = convert("ba", "Alpha", "Beta").unwrap_err();
    match err {
        ReadingError::Ambiguous(amb) => {
            assert_eq!(amb.entity, "ba");
            assert_eq!(amb.candidates, vec!["paˉ".to_owned(), "pa".to_owned()]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }

    let out = convert_with("ba", "Alpha", &[], "Beta", &[(MISSING_TONE_MARK, "H".into())]).unwrap();
    assert_eq!(out, "paˉ");
}

#[test]
fn missing_tone_substituted_on_decode() {
    let out = convert_with("ba", "Alpha", &[(MISSING_TONE_MARK, "2".into())], "Beta", &[]).unwrap();
    assert_eq!(out, "pa");
}

#[test]
fn ambiguity_is_surfaced_or_resolved_by_priority() {
    let err = convert("ma1", "Alpha", "Beta").unwrap_err();
    let ReadingError::Ambiguous(amb) = err else {
        panic!("expected ambiguity");
    };
    assert_eq!(amb.candidates, vec!["moˉ".to_owned(), "meˉ".to_owned()]);

    let engine = engine();
    let source = engine.registry().default_options("Alpha").unwrap();
    let target = engine.registry().default_options("Beta").unwrap();
    let options = ConversionOptions {
        disambiguation: Disambiguation::PreferFirst,
    };
    assert_eq!(engine.convert("ma1", &source, &target, &options).unwrap(), "moˉ");
}

#[test]
fn post_mapping_hook_follows_target_option() {
    assert_eq!(convert("ba1ba1", "Alpha", "Beta").unwrap(), "papaˉ");
    let out = convert_with("ba1ba1", "Alpha", &[], "Beta", &[("sandhi", "off".into())]).unwrap();
    assert_eq!(out, "paˉpaˉ");
}

#[test]
fn hook_adjusts_every_candidate_of_an_ambiguous_slot() {
    let err = convert("ma1ba1", "Alpha", "Beta").unwrap_err();
    let ReadingError::Ambiguous(amb) = err else {
        panic!("expected ambiguity");
    };
    assert_eq!(amb.candidates, vec!["mo".to_owned(), "me".to_owned()]);

    let engine = engine();
    let source = engine.registry().default_options("Alpha").unwrap();
    let target = engine.registry().default_options("Beta").unwrap();
    let options = ConversionOptions {
        disambiguation: Disambiguation::PreferFirst,
    };
    assert_eq!(engine.convert("ma1ba1", &source, &target, &options).unwrap(), "mopaˉ");
    assert_eq!(engine.convert("ba1ma1", &source, &target, &options).unwrap(), "pamoˉ");
}

#[test]
fn reverse_table_maps_collisions_back() {
    assert_eq!(convert("moˉme", "Beta", "Alpha").unwrap(), "ma1ma2");
    assert_eq!(convert("pa¡", "Beta", "Alpha").unwrap(), "ba2!");
}

#[test]
fn bridged_conversion_equals_manual_chaining() {
    let bridged = convert("ka1kan2", "Gamma", "Beta").unwrap();
    let via_alpha = convert("ka1kan2", "Gamma", "Alpha").unwrap();
    let chained = convert(&via_alpha, "Alpha", "Beta").unwrap();
    assert_eq!(via_alpha, "ka1kan2".replace("ka", "ba"));
    assert_eq!(bridged, chained);
    assert_eq!(bridged, "paˉpan");
}

#[test]
fn bridged_ambiguity_reports_the_source_entity() {
    let err = convert("ga1", "Gamma", "Beta").unwrap_err();
    let ReadingError::Ambiguous(amb) = err else {
        panic!("expected ambiguity");
    };
    assert_eq!(amb.entity, "ga[1]");
    assert_eq!(amb.candidates.len(), 2);
}

#[test]
fn unsupported_directions_and_readings() {
    let err = convert("paˉ", "Beta", "Gamma").unwrap_err();
    assert_eq!(
        err,
        ReadingError::Unsupported(UnsupportedError::Direction {
            from: "Beta".into(),
            to: "Gamma".into(),
        })
    );

    let engine = engine();
    assert!(matches!(
        engine.registry().default_options("Delta"),
        Err(UnsupportedError::Reading(_))
    ));
    assert!(matches!(
        engine.registry().dialect("Alpha", [("bogus", true)]),
        Err(UnsupportedError::OptionName { .. })
    ));
}

#[test]
fn strict_segmentation_errors_surface() {
    let err = convert_with("ba1 bx", "Alpha", &[(STRICT_SEGMENTATION, true.into())], "Beta", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decomposition);

    // Lenient: the unknown chunk passes through untouched.
    assert_eq!(convert("ba1 bx", "Alpha", "Beta").unwrap(), "paˉ bx");
}

#[test]
fn state_machine_ends_in_done_or_failed() {
    let engine = engine();
    let source = engine.registry().default_options("Alpha").unwrap();
    let target = engine.registry().default_options("Beta").unwrap();
    let options = ConversionOptions::default();

    let (state, result) = engine.convert_traced("ba1", &source, &target, &options);
    assert_eq!(state, ConversionState::Done);
    assert!(result.is_ok());

    let (state, result) = engine.convert_traced("ma1", &source, &target, &options);
    assert_eq!(state, ConversionState::Failed(ErrorKind::Ambiguous));
    assert!(result.is_err());
}

#[test]
fn default_options_are_stable() {
    let engine = engine();
    let first = engine.registry().default_options("Alpha").unwrap();
    let second = engine.registry().default_options("Alpha").unwrap();
    assert_eq!(first, second);

    let explicit = dialect(&engine, "Alpha", &[(TONE_MARK_TYPE, "numbers".into())]);
    let target = engine.registry().default_options("Beta").unwrap();
    let options = ConversionOptions::default();
    assert_eq!(
        engine.convert("ban2", &first, &target, &options).unwrap(),
        engine.convert("ban2", &explicit, &target, &options).unwrap()
    );
}

#[test]
fn convert_entities_checks_each_surface() {
    let engine = engine();
    let source = engine.registry().default_options("Alpha").unwrap();
    let target = engine.registry().default_options("Beta").unwrap();
    let options = ConversionOptions::default();
    let out = engine
        .convert_entities(&["ba1", "ban2"], &source, &target, &options)
        .unwrap();
    assert_eq!(out, vec!["paˉ".to_owned(), "pan".to_owned()]);

    let err = engine
        .convert_entities(&["ba1ban2"], &source, &target, &options)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decomposition);
}

#[test]
fn guess_dialect_detects_tone_marks() {
    let engine = engine();
    let guessed = engine.guess_dialect("ba ban", "Alpha").unwrap();
    assert_eq!(guessed.text(TONE_MARK_TYPE), "none");
    let guessed = engine.guess_dialect("ba1", "Alpha").unwrap();
    assert_eq!(guessed, engine.registry().default_options("Alpha").unwrap());
}

#[test]
fn reading_entity_check_uses_dialect() {
    let engine = engine();
    let numbers = engine.registry().default_options("Alpha").unwrap();
    let plain = dialect(&engine, "Alpha", &[(TONE_MARK_TYPE, "none".into())]);
    assert!(engine.is_reading_entity("ban2", &numbers).unwrap());
    assert!(!engine.is_reading_entity("ban2", &plain).unwrap());
    assert!(engine.is_reading_entity("Ban", &plain).unwrap());
}
