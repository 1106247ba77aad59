use morphtier_backend::segment::{segment_word, GrammarKind, MorphGrammar, StemGlossDefault};
use morphtier_backend::types::Warning;

fn triples(word: &str, grammar: &MorphGrammar) -> Vec<(String, String, String)> {
    let (morphemes, _) = segment_word(word, grammar);
    morphemes
        .into_iter()
        .map(|m| (m.segment, m.gloss, m.pos))
        .collect()
}

fn t(segment: &str, gloss: &str, pos: &str) -> (String, String, String) {
    (segment.to_string(), gloss.to_string(), pos.to_string())
}

#[test]
fn test_template_full_shape() {
    // prefix + stem with fusion + mixed suffixes + right-edge glosses
    let grammar = MorphGrammar::new(GrammarKind::Template);
    assert_eq!(
        triples("o#v|asob&NEG-ta=play_PAST", &grammar),
        vec![
            t("o", "", "pfx"),
            t("asob", "play.NEG", "v"),
            t("ta", "PAST", "sfx"),
        ]
    );
}

#[test]
fn test_template_compound_gloss_propagation() {
    let grammar = MorphGrammar::new(GrammarKind::Template);
    let ms = triples("n|+n|ringo+n|ki=appletree", &grammar);
    assert_eq!(
        ms,
        vec![t("=ringo", "appletree", "n"), t("=ki", "appletree", "n")]
    );
}

#[test]
fn test_template_contr_subgloss_is_not_a_segment() {
    let grammar = MorphGrammar::new(GrammarKind::Template);
    let ms = triples("n|kore-wa:contr", &grammar);
    // the part after the colon stays in the suffix, it is not a segment
    assert_eq!(ms[1], t("wa:contr", "", "sfx"));
}

#[test]
fn test_stem_gloss_default_policy_per_grammar() {
    // documented default: the suffix-chain stem glosses itself
    let mut chain = MorphGrammar::new(GrammarKind::SuffixChain);
    chain.stem_gloss_default = StemGlossDefault::SegmentItself;
    assert_eq!(triples("n|doggy", &chain), vec![t("doggy", "doggy", "n")]);

    // documented default: the template stem gloss stays empty
    let template = MorphGrammar::new(GrammarKind::Template);
    assert_eq!(triples("n|inu", &template), vec![t("inu", "", "n")]);
}

#[test]
fn test_suffix_chain_with_subglosses() {
    let grammar = MorphGrammar::new(GrammarKind::SuffixChain);
    assert_eq!(
        triples("N:PROP|Ali-ACC&3S", &grammar),
        vec![t("Ali", "", "N:PROP"), t("", "ACC&3S", "sfx")]
    );
}

#[test]
fn test_unstructured_material_is_flagged_not_fatal() {
    let chain = MorphGrammar::new(GrammarKind::SuffixChain);
    let (morphemes, warning) = segment_word("mangled", &chain);
    assert_eq!(morphemes.len(), 1);
    assert_eq!(morphemes[0].segment, "???");
    assert_eq!(warning, Some(Warning::UnstructuredMorpheme));

    let block = MorphGrammar::new(GrammarKind::TripleBlock);
    let (morphemes, warning) = segment_word("WH|nauk^where+mangled", &block);
    assert_eq!(morphemes.len(), 2);
    assert_eq!(morphemes[0].gloss, "where");
    assert_eq!(morphemes[1].pos, "???");
    assert_eq!(warning, Some(Warning::UnstructuredMorpheme));
}

#[test]
fn test_triple_block_word() {
    let grammar = MorphGrammar::new(GrammarKind::TripleBlock);
    assert_eq!(
        triples("NR|ana^mother+NN|ga^NOM+VZ|u^be", &grammar),
        vec![
            t("ana", "mother", "NR"),
            t("ga", "NOM", "NN"),
            t("u", "be", "VZ"),
        ]
    );
}

#[test]
fn test_empty_morpheme_word_yields_no_triples() {
    for kind in [
        GrammarKind::Template,
        GrammarKind::SuffixChain,
        GrammarKind::TripleBlock,
    ] {
        let grammar = MorphGrammar::new(kind);
        let (morphemes, warning) = segment_word("", &grammar);
        assert!(morphemes.is_empty());
        assert_eq!(warning, None);
    }
}

#[test]
fn test_custom_marker_characters() {
    let mut grammar = MorphGrammar::new(GrammarKind::SuffixChain);
    grammar.stem_marker = '/';
    grammar.suffix_marker = '~';
    assert_eq!(
        triples("n/orip~PL", &grammar),
        vec![t("orip", "", "n"), t("", "PL", "sfx")]
    );
}
