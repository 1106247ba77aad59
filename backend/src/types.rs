use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Sentence type of an utterance, derived from its terminator.
///
/// CHAT codes thirteen terminators; the ones attested in the corpora are
/// mapped below, everything else falls back to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentenceType {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "question")]
    Question,
    #[serde(rename = "exclamation")]
    Exclamation,
    #[serde(rename = "trail off")]
    TrailOff,
    #[serde(rename = "trail off of question")]
    TrailOffQuestion,
    #[serde(rename = "question with exclamation")]
    QuestionExclamation,
    #[serde(rename = "interruption")]
    Interruption,
    #[serde(rename = "interruption of a question")]
    InterruptionQuestion,
    #[serde(rename = "self-interruption")]
    SelfInterruption,
    #[serde(rename = "self-interrupted question")]
    SelfInterruptedQuestion,
    #[serde(rename = "quotation follows")]
    QuotationFollows,
    #[serde(rename = "quotation precedes")]
    QuotationPrecedes,
}

impl Default for SentenceType {
    fn default() -> Self {
        SentenceType::Default
    }
}

impl SentenceType {
    pub fn from_terminator(terminator: &str) -> Self {
        match terminator {
            "." => SentenceType::Default,
            "?" => SentenceType::Question,
            "!" => SentenceType::Exclamation,
            "+..." => SentenceType::TrailOff,
            "+..?" => SentenceType::TrailOffQuestion,
            "+!?" => SentenceType::QuestionExclamation,
            "+/." => SentenceType::Interruption,
            "+/?" => SentenceType::InterruptionQuestion,
            "+//." => SentenceType::SelfInterruption,
            "+//?" => SentenceType::SelfInterruptedQuestion,
            "+\"/." => SentenceType::QuotationFollows,
            "+\"." => SentenceType::QuotationPrecedes,
            _ => SentenceType::Default,
        }
    }
}

/// Warning codes attached to utterances and words.
///
/// A missing tier is NOT a warning; tiers are legitimately optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// A morphology tier had a word count differing from the authoritative
    /// count and was nulled for the whole utterance.
    #[serde(rename = "tier misaligned")]
    TierMisaligned,
    /// A morphology tier had a morpheme count differing from the
    /// authoritative count and was nulled for the word.
    #[serde(rename = "morpheme tier misaligned")]
    MorphemeMisaligned,
    /// A morpheme token did not match the corpus grammar; placeholders
    /// were emitted instead.
    #[serde(rename = "unstructured morpheme")]
    UnstructuredMorpheme,
}

/// The (segment, gloss, POS) decomposition of one morpheme.
///
/// An empty string means the component was nulled or is not coded for this
/// morpheme type (e.g. suffixes carry no segment in some corpora); the
/// `???` placeholder means the material exists but could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Morpheme {
    pub segment: String,
    pub gloss: String,
    pub pos: String,
    pub language: Option<String>,
}

/// One aligned word of an utterance with its morpheme decomposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub word_actual: String,
    pub word_target: String,
    pub language: Option<String>,
    pub morphemes: Vec<Morpheme>,
    pub warning: Option<Warning>,
}

/// The output record of the engine: one fully processed utterance.
///
/// Every field is either populated or an empty string / `None`; the engine
/// never raises for malformed input (see `ConfigError` for the only fatal
/// class, which cannot occur during record processing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub source_id: String,
    pub speaker_label: String,
    pub addressee: String,
    pub utterance_raw: String,
    /// Cleaned utterance, rebuilt by joining the cleaned words.
    pub utterance: String,
    pub translation: String,
    pub comment: String,
    #[serde(default)]
    pub sentence_type: SentenceType,
    pub start: String,
    pub end: String,
    pub words: Vec<Word>,
    pub warning: Option<Warning>,
}

/// Errors raised while building a corpus configuration.
///
/// This is the only fatal error class: it can occur at corpus registration
/// time only, never while processing a record.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown cleaning rule: {0}")]
    UnknownRule(String),
    #[error("invalid morpheme grammar: {0}")]
    BadGrammar(String),
}
