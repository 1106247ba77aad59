//! Morpheme segmentation.
//!
//! One generic segmenter driven by a `MorphGrammar` covers the three
//! morpheme-word shapes attested in the corpora:
//!
//! - `Template`: `prefix#POS|stem&fusion-suffix=stemgloss_SFXGLOSS`,
//!   compounds joined by `+` with the leading group holding shared
//!   prefixes and the compound POS tag.
//! - `SuffixChain`: `POS|stem-SFX1-SFX2`, glosses only on suffixes.
//! - `TripleBlock`: `POS|segment^gloss` blocks joined by `+`.
//!
//! A morpheme word always yields at least one triple; material that does
//! not match the grammar yields placeholder triples plus a warning, never
//! an error.

use serde::{Serialize, Deserialize};

use crate::types::{Morpheme, Warning};
use crate::UNKNOWN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrammarKind {
    #[serde(rename = "template")]
    Template,
    #[serde(rename = "suffix_chain")]
    SuffixChain,
    #[serde(rename = "triple_block")]
    TripleBlock,
}

/// Gloss of a stem that carries no explicit stem gloss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StemGlossDefault {
    /// The stem glosses itself: gloss = segment.
    #[serde(rename = "segment itself")]
    SegmentItself,
    /// The gloss stays empty.
    #[serde(rename = "empty")]
    Empty,
}

impl Default for StemGlossDefault {
    fn default() -> Self {
        StemGlossDefault::Empty
    }
}

/// Marker characters of a corpus morpheme grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphGrammar {
    pub kind: GrammarKind,
    /// Compound / morpheme-block joiner.
    #[serde(default = "default_compound")]
    pub compound_marker: char,
    /// Prefix delimiter (Template only).
    #[serde(default = "default_prefix")]
    pub prefix_marker: char,
    /// POS-from-stem delimiter.
    #[serde(default = "default_stem")]
    pub stem_marker: char,
    /// Suffix delimiter.
    #[serde(default = "default_suffix")]
    pub suffix_marker: char,
    /// Stem-gloss delimiter at the right edge (Template only).
    #[serde(default = "default_stem_gloss")]
    pub stem_gloss_marker: char,
    /// Fusional-suffix delimiter on the stem (Template only).
    #[serde(default = "default_fusion")]
    pub fusion_marker: char,
    /// Segment-from-gloss delimiter (TripleBlock only).
    #[serde(default = "default_gloss")]
    pub gloss_marker: char,
    #[serde(default)]
    pub stem_gloss_default: StemGlossDefault,
}

fn default_compound() -> char { '+' }
fn default_prefix() -> char { '#' }
fn default_stem() -> char { '|' }
fn default_suffix() -> char { '-' }
fn default_stem_gloss() -> char { '=' }
fn default_fusion() -> char { '&' }
fn default_gloss() -> char { '^' }

impl MorphGrammar {
    pub fn new(kind: GrammarKind) -> MorphGrammar {
        MorphGrammar {
            kind,
            compound_marker: default_compound(),
            prefix_marker: default_prefix(),
            stem_marker: default_stem(),
            suffix_marker: default_suffix(),
            stem_gloss_marker: default_stem_gloss(),
            fusion_marker: default_fusion(),
            gloss_marker: default_gloss(),
            stem_gloss_default: StemGlossDefault::default(),
        }
    }
}

fn triple(segment: &str, gloss: &str, pos: &str) -> Morpheme {
    Morpheme {
        segment: segment.to_string(),
        gloss: gloss.to_string(),
        pos: pos.to_string(),
        language: None,
    }
}

fn unknown_triple() -> Morpheme {
    triple(UNKNOWN, UNKNOWN, UNKNOWN)
}

/// Python-style lowercase test: at least one cased character and no
/// uppercase character.
fn is_lowercase_word(text: &str) -> bool {
    text.chars().any(|c| c.is_lowercase()) && !text.chars().any(|c| c.is_uppercase())
}

/// Segment one morpheme word into ordered (segment, gloss, POS) triples.
///
/// The returned warning, if any, marks material that did not match the
/// grammar and was replaced with `???` placeholders.
pub fn segment_word(word: &str, grammar: &MorphGrammar) -> (Vec<Morpheme>, Option<Warning>) {
    // a nulled or absent morpheme word yields no triples at all
    if word.is_empty() {
        return (Vec::new(), None);
    }
    match grammar.kind {
        GrammarKind::Template => segment_template(word, grammar),
        GrammarKind::SuffixChain => segment_suffix_chain(word, grammar),
        GrammarKind::TripleBlock => segment_triple_block(word, grammar),
    }
}

// ---------- Template ----------

/// Split the right-edge stem gloss off a template morpheme word.
///
/// `n|inu-PL=dog_PL` splits into (`n|inu-PL`, stem gloss `dog`, suffix
/// gloss `PL`): the suffix part is the earliest `_` whose right side is
/// all uppercase/underscores.
fn split_stem_gloss(word: &str, marker: char) -> (String, String, String) {
    let Some(idx) = word.rfind(marker) else {
        return (word.to_string(), String::new(), String::new());
    };
    let gloss_part = &word[idx + marker.len_utf8()..];
    if idx == 0 || gloss_part.is_empty() || gloss_part.contains(char::is_whitespace) {
        return (word.to_string(), String::new(), String::new());
    }
    let rest = word[..idx].to_string();

    for (i, c) in gloss_part.char_indices() {
        if c != '_' {
            continue;
        }
        let tail = &gloss_part[i + 1..];
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
            return (rest, gloss_part[..i].to_string(), tail.to_string());
        }
    }

    (rest, gloss_part.to_string(), String::new())
}

enum TemplateToken {
    Prefix(String),
    Suffix(String),
    Stem(String),
}

/// Tokenize one word group into prefix/stem/suffix chunks.
fn template_tokens(group: &str, grammar: &MorphGrammar) -> Vec<TemplateToken> {
    let prefix = grammar.prefix_marker;
    let suffix = grammar.suffix_marker;

    let mut tokens = Vec::new();
    let mut rest = group;

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix(suffix) {
            // suffix chunk: the marker plus everything up to the next one
            let end = stripped.find(suffix).unwrap_or(stripped.len());
            tokens.push(TemplateToken::Suffix(stripped[..end].to_string()));
            rest = &stripped[end..];
        } else if let Some(hash) = rest.find(prefix) {
            if hash > 0 {
                tokens.push(TemplateToken::Prefix(rest[..hash].to_string()));
            }
            rest = &rest[hash + prefix.len_utf8()..];
        } else {
            let end = rest.find(suffix).unwrap_or(rest.len());
            tokens.push(TemplateToken::Stem(rest[..end].to_string()));
            rest = &rest[end..];
        }
    }

    tokens
}

fn segment_template(word: &str, grammar: &MorphGrammar) -> (Vec<Morpheme>, Option<Warning>) {
    let (word, stem_gloss, sfx_seg_gloss) = split_stem_gloss(word, grammar.stem_gloss_marker);

    let mut groups: Vec<&str> = word.split(grammar.compound_marker).collect();
    let is_compound = groups.len() > 1;

    let mut morphemes = Vec::new();
    let mut warning = None;

    if is_compound {
        // the leading group holds shared prefixes plus the POS tag of the
        // whole compound, which is dropped
        let head = groups.remove(0);
        let pieces: Vec<&str> = head.split(grammar.prefix_marker).collect();
        for pfx in &pieces[..pieces.len() - 1] {
            if !pfx.is_empty() {
                morphemes.push(triple(pfx, "", "pfx"));
            }
        }
    }

    for group in groups {
        for token in template_tokens(group, grammar) {
            match token {
                TemplateToken::Prefix(segment) => {
                    morphemes.push(triple(&segment, "", "pfx"));
                }
                TemplateToken::Suffix(sfx) => {
                    morphemes.push(template_suffix(&sfx, &sfx_seg_gloss));
                }
                TemplateToken::Stem(stem) => {
                    match template_stem(&stem, grammar, &stem_gloss, is_compound) {
                        Some(m) => morphemes.push(m),
                        None => {
                            morphemes.push(unknown_triple());
                            warning = Some(Warning::UnstructuredMorpheme);
                        }
                    }
                }
            }
        }
    }

    if morphemes.is_empty() {
        morphemes.push(unknown_triple());
        warning = Some(Warning::UnstructuredMorpheme);
    }

    (morphemes, warning)
}

/// Suffix of a template word.
///
/// `gloss:segment` overrides the segment unless the part after the colon
/// is the `contr` subgloss; all-lowercase suffixes are segments glossed by
/// the word-final suffix gloss; anything else is a bare gloss.
fn template_suffix(sfx: &str, sfx_seg_gloss: &str) -> Morpheme {
    if let Some((lhs, rhs)) = sfx.split_once(':') {
        if rhs != "contr" {
            return triple(rhs, lhs, "sfx");
        }
    }
    if is_lowercase_word(sfx) {
        triple(sfx, sfx_seg_gloss, "sfx")
    } else {
        triple("", sfx, "sfx")
    }
}

fn template_stem(
    stem: &str,
    grammar: &MorphGrammar,
    stem_gloss: &str,
    is_compound: bool,
) -> Option<Morpheme> {
    let (pos, rest) = stem.split_once(grammar.stem_marker)?;

    let (segment, fusion) = match rest.split_once(grammar.fusion_marker) {
        Some((seg, fus)) => (seg, Some(fus)),
        None => (rest, None),
    };

    let mut gloss = stem_gloss.to_string();
    if let Some(fusion) = fusion {
        gloss.push('.');
        gloss.push_str(fusion);
    }
    if gloss.is_empty() && grammar.stem_gloss_default == StemGlossDefault::SegmentItself {
        gloss = segment.to_string();
    }

    let segment = if is_compound {
        // compound-part segments are tagged with a leading marker
        format!("={}", segment)
    } else {
        segment.to_string()
    };

    Some(triple(&segment, &gloss, pos))
}

// ---------- SuffixChain ----------

fn segment_suffix_chain(word: &str, grammar: &MorphGrammar) -> (Vec<Morpheme>, Option<Warning>) {
    let mut parts = word.split(grammar.suffix_marker);

    // the first morpheme is always the stem
    let stem = parts.next().unwrap_or("");

    let mut morphemes = Vec::new();
    let mut warning = None;

    match stem.split_once(grammar.stem_marker) {
        Some((pos, segment)) => {
            let gloss = match grammar.stem_gloss_default {
                StemGlossDefault::SegmentItself => segment,
                StemGlossDefault::Empty => "",
            };
            morphemes.push(triple(segment, gloss, pos));
        }
        None => {
            morphemes.push(unknown_triple());
            warning = Some(Warning::UnstructuredMorpheme);
        }
    }

    for sfx in parts {
        morphemes.push(triple("", sfx, "sfx"));
    }

    (morphemes, warning)
}

// ---------- TripleBlock ----------

/// Parse one `POS|segment^gloss` block. POS tags may themselves contain
/// the stem marker, so the split is on the last stem marker that still
/// leaves a gloss marker to its right.
fn triple_block(block: &str, grammar: &MorphGrammar) -> Option<Morpheme> {
    let stem = grammar.stem_marker;
    let gloss_marker = grammar.gloss_marker;

    let mut split = None;
    for (i, c) in block.char_indices() {
        if c == stem && block[i + stem.len_utf8()..].contains(gloss_marker) {
            split = Some(i);
        }
    }
    let i = split?;

    let pos = &block[..i];
    let rest = &block[i + stem.len_utf8()..];
    let (segment, gloss) = rest.split_once(gloss_marker)?;

    Some(triple(segment, gloss, pos))
}

fn segment_triple_block(word: &str, grammar: &MorphGrammar) -> (Vec<Morpheme>, Option<Warning>) {
    let mut morphemes = Vec::new();
    let mut warning = None;

    for block in word.split(grammar.compound_marker) {
        match triple_block(block, grammar) {
            Some(m) => morphemes.push(m),
            None => {
                morphemes.push(unknown_triple());
                warning = Some(Warning::UnstructuredMorpheme);
            }
        }
    }

    (morphemes, warning)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> MorphGrammar {
        MorphGrammar::new(GrammarKind::Template)
    }

    fn suffix_chain() -> MorphGrammar {
        MorphGrammar::new(GrammarKind::SuffixChain)
    }

    fn triple_block_grammar() -> MorphGrammar {
        MorphGrammar::new(GrammarKind::TripleBlock)
    }

    fn parts(morphemes: &[Morpheme]) -> Vec<(&str, &str, &str)> {
        morphemes
            .iter()
            .map(|m| (m.segment.as_str(), m.gloss.as_str(), m.pos.as_str()))
            .collect()
    }

    #[test]
    fn test_template_stem_only() {
        let (ms, warning) = segment_word("n|inu", &template());
        assert_eq!(parts(&ms), vec![("inu", "", "n")]);
        assert_eq!(warning, None);
    }

    #[test]
    fn test_template_stem_gloss_and_suffix() {
        let (ms, warning) = segment_word("v|asob-TA=play_PAST", &template());
        assert_eq!(parts(&ms), vec![("asob", "play", "v"), ("", "TA", "sfx")]);
        assert_eq!(warning, None);
    }

    #[test]
    fn test_template_lowercase_suffix_takes_suffix_gloss() {
        let (ms, _) = segment_word("v|ik-ta=go_PAST", &template());
        assert_eq!(parts(&ms), vec![("ik", "go", "v"), ("ta", "PAST", "sfx")]);
    }

    #[test]
    fn test_template_prefix() {
        let (ms, _) = segment_word("o#n|cha=tea", &template());
        assert_eq!(parts(&ms), vec![("o", "", "pfx"), ("cha", "tea", "n")]);
    }

    #[test]
    fn test_template_fusion() {
        let (ms, _) = segment_word("v|ar&IMP=exist", &template());
        assert_eq!(parts(&ms), vec![("ar", "exist.IMP", "v")]);
    }

    #[test]
    fn test_template_compound() {
        let (ms, _) = segment_word("n|+n|ringo+n|ki=appletree", &template());
        assert_eq!(
            parts(&ms),
            vec![("=ringo", "appletree", "n"), ("=ki", "appletree", "n")]
        );
    }

    #[test]
    fn test_template_compound_with_prefix() {
        let (ms, _) = segment_word("o#n|+n|ringo+n|ki=appletree", &template());
        assert_eq!(
            parts(&ms),
            vec![
                ("o", "", "pfx"),
                ("=ringo", "appletree", "n"),
                ("=ki", "appletree", "n"),
            ]
        );
    }

    #[test]
    fn test_template_suffix_colon_segment() {
        let (ms, _) = segment_word("n|kore-COP:da", &template());
        assert_eq!(parts(&ms), vec![("kore", "", "n"), ("da", "COP", "sfx")]);
    }

    #[test]
    fn test_template_unstructured() {
        let (ms, warning) = segment_word("gibberish", &template());
        assert_eq!(parts(&ms), vec![("???", "???", "???")]);
        assert_eq!(warning, Some(Warning::UnstructuredMorpheme));
    }

    #[test]
    fn test_suffix_chain() {
        let (ms, warning) = segment_word("N|top-ACC-PL", &suffix_chain());
        assert_eq!(
            parts(&ms),
            vec![("top", "", "N"), ("", "ACC", "sfx"), ("", "PL", "sfx")]
        );
        assert_eq!(warning, None);
    }

    #[test]
    fn test_suffix_chain_malformed_stem() {
        let (ms, warning) = segment_word("garbled-ACC", &suffix_chain());
        assert_eq!(parts(&ms), vec![("???", "???", "???"), ("", "ACC", "sfx")]);
        assert_eq!(warning, Some(Warning::UnstructuredMorpheme));
    }

    #[test]
    fn test_suffix_chain_stem_glosses_itself() {
        let mut grammar = suffix_chain();
        grammar.stem_gloss_default = StemGlossDefault::SegmentItself;
        let (ms, _) = segment_word("n|doggy-PL", &grammar);
        assert_eq!(parts(&ms), vec![("doggy", "doggy", "n"), ("", "PL", "sfx")]);
    }

    #[test]
    fn test_triple_block() {
        let (ms, warning) = segment_word("NR|ana^mother+NN|ga^NOM", &triple_block_grammar());
        assert_eq!(
            parts(&ms),
            vec![("ana", "mother", "NR"), ("ga", "NOM", "NN")]
        );
        assert_eq!(warning, None);
    }

    #[test]
    fn test_triple_block_nested_pos_marker() {
        let (ms, _) = segment_word("VR|IACT|nir^say", &triple_block_grammar());
        assert_eq!(parts(&ms), vec![("nir", "say", "VR|IACT")]);
    }

    #[test]
    fn test_triple_block_unstructured() {
        let (ms, warning) = segment_word("mat+NN|ga^NOM", &triple_block_grammar());
        assert_eq!(
            parts(&ms),
            vec![("???", "???", "???"), ("ga", "NOM", "NN")]
        );
        assert_eq!(warning, Some(Warning::UnstructuredMorpheme));
    }
}
