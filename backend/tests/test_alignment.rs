use morphtier_backend::align::fix_misalignments;
use morphtier_backend::corpus::builtin;
use morphtier_backend::parser::SessionParser;
use morphtier_backend::types::{Utterance, Warning};

fn parse(corpus: &str, raw: &str) -> Utterance {
    let config = builtin(corpus).unwrap().build().unwrap();
    let mut parser = SessionParser::new(&config, "session");
    parser.parse_block(raw).unwrap()
}

#[test]
fn test_all_or_nothing_never_splices() {
    // three segment tokens against two gloss tokens: the gloss tier is
    // nulled wholesale, no positional reuse
    let mut tiers = vec![
        vec!["seg1".to_string(), "seg2".to_string(), "seg3".to_string()],
        vec!["gloss1".to_string(), "gloss2".to_string()],
    ];
    assert!(fix_misalignments(&mut tiers));
    assert_eq!(tiers[0], vec!["seg1", "seg2", "seg3"]);
    assert_eq!(tiers[1], vec!["", "", ""]);
}

#[test]
fn test_word_count_invariant_holds_with_morphology() {
    let utt = parse("chat_default", "*CHI:\tdoggy runs .\n%mor:\tn|doggy v|run-3S .");
    assert_eq!(utt.words.len(), 2);
    assert!(utt.words.iter().all(|w| !w.morphemes.is_empty()));
}

#[test]
fn test_word_count_invariant_holds_without_morphology() {
    let utt = parse("chat_default", "*CHI:\tdoggy runs fast .");
    assert_eq!(utt.words.len(), 3);
    assert!(utt.words.iter().all(|w| w.morphemes.is_empty()));
    assert_eq!(utt.warning, None);
}

#[test]
fn test_misaligned_morphology_tier_is_nulled_for_the_utterance() {
    let utt = parse("chat_default", "*CHI:\tdoggy runs .\n%mor:\tn|doggy .");
    assert_eq!(utt.warning, Some(Warning::TierMisaligned));
    assert!(utt.words.iter().all(|w| w.morphemes.is_empty()));
    // the word tier stays authoritative
    assert_eq!(utt.words.len(), 2);
}

#[test]
fn test_morpheme_count_mismatch_nulls_within_the_word() {
    // %xseg and %xgls are separate tiers in this profile
    let mut profile = builtin("chat_default").unwrap();
    profile.tier_map.segment = "xseg".to_string();
    profile.tier_map.gloss = "xgls".to_string();
    profile.tier_map.pos = "xseg".to_string();
    let config = profile.build().unwrap();
    let mut parser = SessionParser::new(&config, "session");

    let utt = parser
        .parse_block("*CHI:\tdoggy .\n%xseg:\tn|doggy .\n%xgls:\tn|dog-PL .")
        .unwrap();

    let word = &utt.words[0];
    assert_eq!(word.warning, Some(Warning::MorphemeMisaligned));
    // segment count is authoritative, the gloss slots are empty
    assert_eq!(word.morphemes.len(), 1);
    assert_eq!(word.morphemes[0].segment, "doggy");
    assert_eq!(word.morphemes[0].gloss, "");
}

#[test]
fn test_absent_tier_is_not_misalignment() {
    let utt = parse("chat_default", "*CHI:\tdoggy .");
    assert_eq!(utt.warning, None);
    assert_eq!(utt.words[0].warning, None);
}
