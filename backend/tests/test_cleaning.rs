use morphtier_backend::clean::{self, RuleSet, DEFAULT_UTTERANCE_RULES};

#[test]
fn test_default_pipeline_on_annotated_utterance() {
    let rules = RuleSet::from_names(DEFAULT_UTTERANCE_RULES).unwrap();
    let clean = rules.apply("+< <wo wo> [x 2] &=laughs xxx da@g , ne ?");
    assert_eq!(clean, "wo wo wo wo ??? da@g ne");
}

#[test]
fn test_whitespace_collapse_is_idempotent() {
    for input in ["", "   ", "a  b", " a\tb  c ", "a b c"] {
        let once = clean::squeeze_whitespace(input);
        let twice = clean::squeeze_whitespace(&once);
        assert_eq!(once, twice, "input {:?}", input);
    }
}

#[test]
fn test_rule_order_is_the_contract() {
    // scoped-symbol removal before repetition handling deletes the marker
    let reversed = RuleSet::from_names(&["remove_scoped_symbols", "handle_repetitions"]).unwrap();
    assert_eq!(reversed.apply("ha [x 2]"), "ha");

    let correct = RuleSet::from_names(&["handle_repetitions", "remove_scoped_symbols"]).unwrap();
    assert_eq!(correct.apply("ha [x 2]"), "ha ha");
}

#[test]
fn test_terminator_before_postcode() {
    let rules = RuleSet::from_names(&["remove_terminator", "remove_scoped_symbols"]).unwrap();
    assert_eq!(rules.apply("doa ne ? [+ bch]"), "doa ne");
}

#[test]
fn test_null_utterances() {
    let rules = RuleSet::from_names(&[
        "unify_untranscribed",
        "null_event_utterances",
        "null_untranscribed",
    ])
    .unwrap();
    assert_eq!(rules.apply("xxx"), "");
    assert_eq!(rules.apply("0"), "");
}

#[test]
fn test_empty_string_survives_every_default_rule() {
    let rules = RuleSet::from_names(DEFAULT_UTTERANCE_RULES).unwrap();
    assert_eq!(rules.apply(""), "");
}
