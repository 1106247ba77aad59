//! Repetition and retracing reconstruction on morphology tiers.
//!
//! Repetition markup (`[x N]`) and retracings (`[/]`) expand words on the
//! utterance line, but the morphology tiers code each word only once. The
//! two passes here re-expand the morphology tiers so that word-level
//! alignment succeeds afterwards.

use lazy_static::lazy_static;
use regex::Regex;

use crate::clean::{squeeze_whitespace, RuleSet};

lazy_static! {
    // scoped symbols other than repetition markers
    static ref RE_NON_REPETITION_SCOPE: Regex = Regex::new(r"\[[^x].*?\]").unwrap();

    static ref RE_REPETITION_MARKER: Regex = Regex::new(r"\[x (\d+)").unwrap();
}

/// Split an utterance on blank spaces, except those adjacent to a `[x N]`
/// marker, so the marker stays glued to the word or span it scopes over.
fn split_keeping_repetition_markers(utterance: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;

    for (i, c) in utterance.char_indices() {
        if c != ' ' {
            continue;
        }
        if utterance[..i].ends_with("[x") || utterance[i + 1..].starts_with("[x") {
            continue;
        }
        words.push(&utterance[start..i]);
        start = i + 1;
    }
    words.push(&utterance[start..]);

    words
}

/// Expand repeated words on the morphology tier.
///
/// The raw utterance is re-cleaned with `cross_rules` (the utterance rules
/// minus repetition expansion and scoped-symbol removal) so that its word
/// count matches the morphology tier; on a mismatch the tier is returned
/// unchanged. Each `[x N]` marker then copies the aligned morphology
/// token, or the token group of the nearest angle-bracket span, N-1 extra
/// times.
pub fn add_repetitions(raw_utt: &str, morph_tier: &str, cross_rules: &RuleSet) -> String {
    if !raw_utt.contains("[x ") {
        return morph_tier.to_string();
    }

    let clean = cross_rules.apply(raw_utt);
    let clean = RE_NON_REPETITION_SCOPE.replace_all(&clean, "");
    let clean = squeeze_whitespace(&clean);
    if clean.is_empty() {
        return morph_tier.to_string();
    }

    let utt_words = split_keeping_repetition_markers(&clean);
    let morph_words: Vec<&str> = morph_tier.split(' ').collect();

    if utt_words.len() != morph_words.len() {
        return morph_tier.to_string();
    }

    let mut morph_new: Vec<&str> = Vec::new();
    let mut group: Vec<&str> = Vec::new();

    for (uw, mw) in utt_words.iter().copied().zip(morph_words.iter().copied()) {
        morph_new.push(mw);

        let marker = RE_REPETITION_MARKER.captures(uw);

        if uw.starts_with('<') {
            group = vec![mw];
        } else if let Some(caps) = marker {
            let reps: usize = caps[1].parse().unwrap_or(1);
            if group.is_empty() {
                for _ in 1..reps {
                    morph_new.push(mw);
                }
            } else {
                group.push(mw);
                for _ in 1..reps {
                    morph_new.extend(group.iter().copied());
                }
                group.clear();
            }
        } else if !group.is_empty() {
            group.push(mw);
        }
    }

    morph_new.join(" ")
}

/// A span of immediately repeated words in the actual utterance: one word
/// or a two-word pair, repeated `extra` more times.
#[derive(Debug, Clone, PartialEq)]
enum RepeatedSpan {
    One { word: String, extra: usize },
    Pair { first: String, second: String, extra: usize },
}

/// Locate repeated spans left to right. One-word runs take precedence
/// over pairs starting at the same position; spans longer than two words
/// are not recognized.
fn find_repeated_spans(words: &[String]) -> Vec<RepeatedSpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < words.len() {
        let mut run = 1;
        while i + run < words.len() && words[i + run] == words[i] {
            run += 1;
        }
        if run > 1 {
            spans.push(RepeatedSpan::One { word: words[i].clone(), extra: run - 1 });
            i += run;
            continue;
        }

        let mut pairs = 1;
        while i + 2 * pairs + 1 < words.len()
            && words[i + 2 * pairs] == words[i]
            && words[i + 2 * pairs + 1] == words[i + 1]
        {
            pairs += 1;
        }
        if i + 1 < words.len() && pairs > 1 {
            spans.push(RepeatedSpan::Pair {
                first: words[i].clone(),
                second: words[i + 1].clone(),
                extra: pairs - 1,
            });
            i += 2 * pairs;
            continue;
        }

        i += 1;
    }

    spans
}

fn prefix3(word: &str) -> String {
    word.chars().take(3).collect()
}

/// Expand retraced words on the morphology tier.
///
/// Retracing markers are matched fuzzily against the actual utterance:
/// the annotation convention does not reliably distinguish retracing from
/// repetition, so the repeated spans are located in the actual words and
/// matched against the morphology tokens by their first three characters.
/// Only spans of one or two words are handled.
pub fn add_retracings(
    raw_utt: &str,
    actual_utt: &str,
    morph_tier: &str,
    word_rules: &RuleSet,
) -> String {
    if !raw_utt.contains("[/]") || morph_tier.is_empty() {
        return morph_tier.to_string();
    }

    let actual_words: Vec<String> = actual_utt
        .split(' ')
        .map(|w| word_rules.apply(w))
        .collect();
    let mut spans = find_repeated_spans(&actual_words);

    let morph_words: Vec<&str> = morph_tier.split(' ').collect();
    let mut new: Vec<&str> = Vec::new();

    for (i, mword) in morph_words.iter().copied().enumerate() {
        new.push(mword);

        let Some(span) = spans.first().cloned() else {
            continue;
        };

        match span {
            RepeatedSpan::One { word, extra } => {
                if mword.contains(&prefix3(&word)) {
                    for _ in 0..extra {
                        new.push(mword);
                    }
                    spans.remove(0);
                }
            }
            RepeatedSpan::Pair { first, second, extra } => {
                if i > 0
                    && morph_words[i - 1].contains(&prefix3(&first))
                    && mword.contains(&prefix3(&second))
                {
                    for _ in 0..extra {
                        new.push(morph_words[i - 1]);
                        new.push(mword);
                    }
                }
            }
        }
    }

    new.join(" ")
}
