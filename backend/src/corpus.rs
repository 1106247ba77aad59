//! Corpus configuration.
//!
//! A `CorpusProfile` is plain serializable data describing how one corpus
//! is transcribed: which tiers carry which roles, the cleaning rule lists,
//! the morpheme grammar and the language tagging conventions. `build`
//! resolves all rule names up front into a `CorpusConfig`; name resolution
//! is the only fatal step and never happens while processing a record.

use std::path::Path;

use anyhow::Context;
use serde::{Serialize, Deserialize};

use crate::actual_target::StandardForm;
use crate::clean::{RuleSet, DEFAULT_UTTERANCE_RULES, DEFAULT_WORD_RULES};
use crate::record::TierMap;
use crate::segment::{GrammarKind, MorphGrammar, StemGlossDefault};
use crate::types::ConfigError;

/// Which morphology tier's token count is authoritative within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainMorpheme {
    #[serde(rename = "segment")]
    Segment,
    #[serde(rename = "gloss")]
    Gloss,
}

impl Default for MainMorpheme {
    fn default() -> Self {
        MainMorpheme::Segment
    }
}

/// Language tagging conventions of a corpus.
///
/// Word languages are coded by word suffixes (`@s:eng`), morpheme
/// languages by segment suffixes (`@e`) or POS tag prefixes (`eng`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageTagging {
    #[serde(default)]
    pub default_language: String,
    #[serde(default)]
    pub word_suffixes: Vec<(String, String)>,
    #[serde(default)]
    pub segment_suffixes: Vec<(String, String)>,
    #[serde(default)]
    pub pos_prefixes: Vec<(String, String)>,
}

impl LanguageTagging {
    fn default_language(&self) -> Option<String> {
        if self.default_language.is_empty() {
            None
        } else {
            Some(self.default_language.clone())
        }
    }

    /// Language of an utterance word, read off the raw word before the
    /// form markers are cleaned away.
    pub fn word_language(&self, word: &str) -> Option<String> {
        for (suffix, language) in &self.word_suffixes {
            if word.ends_with(suffix.as_str()) {
                return Some(language.clone());
            }
        }
        self.default_language()
    }

    /// Language of one morpheme, read off its segment and POS tag.
    pub fn morpheme_language(&self, segment: &str, pos: &str) -> Option<String> {
        for (suffix, language) in &self.segment_suffixes {
            if segment.ends_with(suffix.as_str()) {
                return Some(language.clone());
            }
        }
        for (prefix, language) in &self.pos_prefixes {
            if pos.starts_with(prefix.as_str()) {
                return Some(language.clone());
            }
        }
        self.default_language()
    }
}

fn default_utterance_rules() -> Vec<String> {
    DEFAULT_UTTERANCE_RULES.iter().map(|s| s.to_string()).collect()
}

fn default_word_rules() -> Vec<String> {
    DEFAULT_WORD_RULES.iter().map(|s| s.to_string()).collect()
}

fn default_morph_tier_rules() -> Vec<String> {
    vec!["remove_terminator".to_string()]
}

fn default_grammar() -> MorphGrammar {
    let mut grammar = MorphGrammar::new(GrammarKind::SuffixChain);
    grammar.stem_gloss_default = StemGlossDefault::SegmentItself;
    grammar
}

/// Serializable description of one corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusProfile {
    pub name: String,
    #[serde(default)]
    pub tier_map: TierMap,
    #[serde(default)]
    pub main_morpheme: MainMorpheme,
    #[serde(default)]
    pub standard_form: StandardForm,
    #[serde(default = "default_utterance_rules")]
    pub utterance_rules: Vec<String>,
    #[serde(default = "default_word_rules")]
    pub word_rules: Vec<String>,
    /// Rules run over the whole morphology tier before tokenization.
    #[serde(default = "default_morph_tier_rules")]
    pub morph_tier_rules: Vec<String>,
    /// Rules run over each morpheme component after segmentation.
    #[serde(default)]
    pub morpheme_rules: Vec<String>,
    /// Extra separator characters when tokenizing morphology tiers.
    #[serde(default)]
    pub morpheme_word_separators: Vec<char>,
    #[serde(default = "default_grammar")]
    pub grammar: MorphGrammar,
    #[serde(default)]
    pub languages: LanguageTagging,
    #[serde(default)]
    pub reconstruct_repetitions: bool,
    #[serde(default)]
    pub reconstruct_retracings: bool,
}

impl CorpusProfile {
    /// Resolve all rule names. This is the only place a `ConfigError` can
    /// arise; a built configuration processes records infallibly.
    pub fn build(&self) -> Result<CorpusConfig, ConfigError> {
        // repetition markup and scoped symbols must survive the re-clean
        // used by the repetition reconstructor
        let cross_names: Vec<&String> = self
            .utterance_rules
            .iter()
            .filter(|n| *n != "handle_repetitions" && *n != "remove_scoped_symbols")
            .collect();

        Ok(CorpusConfig {
            name: self.name.clone(),
            tier_map: self.tier_map.clone(),
            main_morpheme: self.main_morpheme,
            standard_form: self.standard_form,
            utterance_rules: RuleSet::from_names(&self.utterance_rules)?,
            word_rules: RuleSet::from_names(&self.word_rules)?,
            morph_tier_rules: RuleSet::from_names(&self.morph_tier_rules)?,
            morpheme_rules: RuleSet::from_names(&self.morpheme_rules)?,
            cross_rules: RuleSet::from_names(&cross_names)?,
            morpheme_word_separators: self.morpheme_word_separators.clone(),
            grammar: self.grammar.clone(),
            languages: self.languages.clone(),
            reconstruct_repetitions: self.reconstruct_repetitions,
            reconstruct_retracings: self.reconstruct_retracings,
        })
    }

    pub fn from_json(json: &str) -> anyhow::Result<CorpusProfile> {
        let profile: CorpusProfile =
            serde_json::from_str(json).context("Can't parse corpus profile")?;
        Ok(profile)
    }

    pub fn load_file(path: &Path) -> anyhow::Result<CorpusProfile> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Can't read corpus profile {}", path.display()))?;
        CorpusProfile::from_json(&json)
    }
}

/// A corpus profile with all rule names resolved.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub name: String,
    pub tier_map: TierMap,
    pub main_morpheme: MainMorpheme,
    pub standard_form: StandardForm,
    pub utterance_rules: RuleSet,
    pub word_rules: RuleSet,
    pub morph_tier_rules: RuleSet,
    pub morpheme_rules: RuleSet,
    pub cross_rules: RuleSet,
    pub morpheme_word_separators: Vec<char>,
    pub grammar: MorphGrammar,
    pub languages: LanguageTagging,
    pub reconstruct_repetitions: bool,
    pub reconstruct_retracings: bool,
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn chat_default() -> CorpusProfile {
    CorpusProfile {
        name: "chat_default".to_string(),
        tier_map: TierMap {
            translation: "eng".to_string(),
            segment: "mor".to_string(),
            gloss: "mor".to_string(),
            pos: "mor".to_string(),
            time: String::new(),
            addressee: "add".to_string(),
            comments: vec![
                "com".to_string(),
                "sit".to_string(),
                "act".to_string(),
                "exp".to_string(),
            ],
        },
        main_morpheme: MainMorpheme::Segment,
        standard_form: StandardForm::Actual,
        utterance_rules: default_utterance_rules(),
        word_rules: default_word_rules(),
        morph_tier_rules: default_morph_tier_rules(),
        morpheme_rules: Vec::new(),
        morpheme_word_separators: Vec::new(),
        grammar: default_grammar(),
        languages: LanguageTagging::default(),
        reconstruct_repetitions: false,
        reconstruct_retracings: false,
    }
}

fn template_ja() -> CorpusProfile {
    let mut grammar = MorphGrammar::new(GrammarKind::Template);
    grammar.stem_gloss_default = StemGlossDefault::Empty;

    CorpusProfile {
        name: "template_ja".to_string(),
        tier_map: TierMap {
            segment: "xmor".to_string(),
            gloss: "xmor".to_string(),
            pos: "xmor".to_string(),
            ..chat_default().tier_map
        },
        grammar,
        languages: LanguageTagging {
            default_language: "Japanese".to_string(),
            word_suffixes: pairs(&[("@s:eng", "English"), ("@s:deu", "German")]),
            ..Default::default()
        },
        reconstruct_repetitions: true,
        reconstruct_retracings: true,
        ..chat_default()
    }
}

fn suffix_chain_tr() -> CorpusProfile {
    let mut grammar = MorphGrammar::new(GrammarKind::SuffixChain);
    grammar.stem_gloss_default = StemGlossDefault::Empty;

    CorpusProfile {
        name: "suffix_chain_tr".to_string(),
        tier_map: TierMap {
            segment: "xmor".to_string(),
            gloss: "xmor".to_string(),
            pos: "xmor".to_string(),
            time: "tim".to_string(),
            ..chat_default().tier_map
        },
        grammar,
        languages: LanguageTagging {
            default_language: "Turkish".to_string(),
            word_suffixes: pairs(&[
                ("@s:eng", "English"),
                ("@s:deu", "German"),
                ("@s:rus", "Russian"),
            ]),
            ..Default::default()
        },
        ..chat_default()
    }
}

fn triple_block_iu() -> CorpusProfile {
    CorpusProfile {
        name: "triple_block_iu".to_string(),
        tier_map: TierMap {
            segment: "xmor".to_string(),
            gloss: "xmor".to_string(),
            pos: "xmor".to_string(),
            time: "tim".to_string(),
            ..chat_default().tier_map
        },
        grammar: MorphGrammar::new(GrammarKind::TripleBlock),
        languages: LanguageTagging {
            default_language: "Inuktitut".to_string(),
            segment_suffixes: pairs(&[("@e", "English")]),
            ..Default::default()
        },
        ..chat_default()
    }
}

pub static BUILTIN_NAMES: &[&str] = &[
    "chat_default",
    "template_ja",
    "suffix_chain_tr",
    "triple_block_iu",
];

pub fn builtin(name: &str) -> Option<CorpusProfile> {
    match name {
        "chat_default" => Some(chat_default()),
        "template_ja" => Some(template_ja()),
        "suffix_chain_tr" => Some(suffix_chain_tr()),
        "triple_block_iu" => Some(triple_block_iu()),
        _ => None,
    }
}
