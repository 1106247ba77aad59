//! Actual vs. target utterance forms.
//!
//! CHAT codes three actual/target oppositions on the main line:
//! shortenings `na(ra)da`, replacements `gonna [: going to]` and
//! fragments `&word`. A corpus standardizes on one of the two forms;
//! the other is kept per word in `word_actual`/`word_target`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Serialize, Deserialize};

use crate::UNKNOWN;

lazy_static! {
    // Shortening: parentheses within a word. Flanking by non-whitespace is
    // checked manually since the pattern has no look-around; standalone
    // pause markers like (.) are flanked by spaces and stay untouched.
    static ref RE_SHORTENING: Regex = Regex::new(r"\(([^\s)]+)\)").unwrap();

    // Replacement: the replaced material is a scoped span or one word.
    static ref RE_REPLACEMENT_SCOPED: Regex = Regex::new(r"<(.*?)> ?\[: .*?\]").unwrap();
    static ref RE_REPLACEMENT_WORD: Regex = Regex::new(r"(\S+) ?\[: .*?\]").unwrap();
    static ref RE_REPLACEMENT_TARGET: Regex =
        Regex::new(r"(?:<.*?>|\S+) ?\[: (.*?)\]").unwrap();

    // Fragment: word-initial & not followed by - or = (those are fillers
    // and clitic markers).
    static ref RE_FRAGMENT: Regex = Regex::new(r"(^|\s)&([^-=\s]\S*)").unwrap();
}

/// Which of the two utterance forms a corpus standardizes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardForm {
    #[serde(rename = "actual")]
    Actual,
    #[serde(rename = "target")]
    Target,
}

impl Default for StandardForm {
    fn default() -> Self {
        StandardForm::Actual
    }
}

fn flanked(utterance: &str, start: usize, end: usize) -> bool {
    let before = utterance[..start].chars().next_back();
    let after = utterance[end..].chars().next();
    before.map_or(false, |c| !c.is_whitespace())
        || after.map_or(false, |c| !c.is_whitespace())
}

fn sub_shortenings(utterance: &str, keep_content: bool) -> String {
    let mut clean = String::with_capacity(utterance.len());
    let mut match_end = 0;

    for caps in RE_SHORTENING.captures_iter(utterance) {
        let whole = caps.get(0).unwrap();
        clean.push_str(&utterance[match_end..whole.start()]);
        if flanked(utterance, whole.start(), whole.end()) {
            if keep_content {
                clean.push_str(&caps[1]);
            }
        } else {
            clean.push_str(whole.as_str());
        }
        match_end = whole.end();
    }

    clean.push_str(&utterance[match_end..]);
    clean
}

/// Actual form of shortenings: the parenthesized material is dropped.
pub fn shortening_actual(utterance: &str) -> String {
    sub_shortenings(utterance, false)
}

/// Target form of shortenings: the material is kept, parentheses removed.
pub fn shortening_target(utterance: &str) -> String {
    sub_shortenings(utterance, true)
}

/// Actual form of replacements: keep the spoken words, drop the bracket.
pub fn replacement_actual(utterance: &str) -> String {
    let clean = RE_REPLACEMENT_SCOPED.replace_all(utterance, "$1");
    RE_REPLACEMENT_WORD.replace_all(&clean, "$1").to_string()
}

/// Target form of replacements: substitute the bracketed words, joined by
/// an underscore when there are several.
pub fn replacement_target(utterance: &str) -> String {
    RE_REPLACEMENT_TARGET
        .replace_all(utterance, |caps: &Captures| caps[1].replace(' ', "_"))
        .to_string()
}

/// Actual form of fragments: keep the word, drop the `&`.
pub fn fragment_actual(utterance: &str) -> String {
    RE_FRAGMENT.replace_all(utterance, "${1}${2}").to_string()
}

/// Target form of fragments: the fragment counts as untranscribed.
pub fn fragment_target(utterance: &str) -> String {
    RE_FRAGMENT
        .replace_all(utterance, format!("${{1}}{}", UNKNOWN).as_str())
        .to_string()
}

pub fn to_actual_utterance(utterance: &str) -> String {
    let clean = shortening_actual(utterance);
    let clean = fragment_actual(&clean);
    replacement_actual(&clean)
}

pub fn to_target_utterance(utterance: &str) -> String {
    let clean = shortening_target(utterance);
    let clean = fragment_target(&clean);
    replacement_target(&clean)
}

pub fn to_standard_utterance(utterance: &str, form: StandardForm) -> String {
    match form {
        StandardForm::Actual => to_actual_utterance(utterance),
        StandardForm::Target => to_target_utterance(utterance),
    }
}
