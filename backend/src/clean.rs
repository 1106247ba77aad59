//! Text cleaning rules and rule sets.
//!
//! Each rule is a pure `&str -> String` function registered under a name.
//! A `RuleSet` is an ordered list of rules applied strictly in sequence;
//! the order is part of the contract (repetition markup must be expanded
//! before scoped symbols are removed, which would delete the markers).

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::ConfigError;
use crate::UNKNOWN;

pub type CleaningRule = fn(&str) -> String;

lazy_static! {
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Terminators: [+/.!?"]*[!?.], either utterance-final or preceding a
    // bracketed postcode. Regex look-ahead is not supported, so the postcode
    // case keeps the bracket in the replacement instead.
    static ref RE_TERMINATOR_FINAL: Regex = Regex::new(r#"[+/.!?"]*[!?.]$"#).unwrap();
    static ref RE_TERMINATOR_POSTCODE: Regex = Regex::new(r#"[+/.!?"]*[!?.] \[\+"#).unwrap();

    // xxx, yyy, www code untranscribed material
    static ref RE_UNTRANSCRIBED: Regex = Regex::new(r"xxx|yyy|www").unwrap();

    // <span> [x N] or word [x N], with an optional scoped annotation in between
    static ref RE_REPETITION: Regex = Regex::new(
        r"(?:<([^<]*?)>|(\S+))( \[.*?\])? ?\[x (\d+)\]"
    ).unwrap();

    // events are words starting with &=
    static ref RE_EVENT: Regex = Regex::new(r"&=\S+").unwrap();

    // linkers occur at the very beginning of the utterance
    static ref RE_LINKER: Regex = Regex::new(r#"^\+["^,+<]"#).unwrap();

    // separators are commas, colons or semi-colons surrounded by whitespace
    static ref RE_SEPARATOR: Regex = Regex::new(r" [,:;] ").unwrap();

    // conversation analysis and satellite markers attested in the corpora
    static ref RE_CA: Regex = Regex::new(r"[↓↑‡„“”]").unwrap();

    // pauses between words: (.), (..), (...)
    static ref RE_PAUSE: Regex = Regex::new(r"\(\.{1,3}\)").unwrap();

    // scoped symbols: angle brackets are stripped, square brackets are
    // removed together with their content. Nesting depth is unbounded, so
    // these are two flat pattern strips, not a bracket matcher.
    static ref RE_SCOPED: Regex = Regex::new(r"<|>|\[.*?\]").unwrap();

    static ref RE_EVENT_ZERO: Regex = Regex::new(r"\b0\b").unwrap();

    // word-level rules
    static ref RE_FORM_MARKER: Regex = Regex::new(r"@.*").unwrap();
    static ref RE_WORD_PAUSE: Regex = Regex::new(r"(\S+?)\^").unwrap();
    static ref RE_FILLER: Regex = Regex::new(r"&([^-=\s]\S*)").unwrap();
}

/// Strip multiple, leading and trailing whitespace. Routinely run after
/// every removing rule; idempotent.
pub fn squeeze_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim_matches(' ').to_string()
}

/// Remove the utterance terminator. A terminator directly preceding a
/// bracketed postcode is removed while the postcode is preserved.
pub fn remove_terminator(utterance: &str) -> String {
    let clean = RE_TERMINATOR_POSTCODE.replace_all(utterance, " [+");
    let clean = RE_TERMINATOR_FINAL.replace(&clean, "");
    squeeze_whitespace(&clean)
}

/// Unify the three untranscribed-material markers as `???`.
pub fn unify_untranscribed(utterance: &str) -> String {
    RE_UNTRANSCRIBED.replace_all(utterance, UNKNOWN).to_string()
}

/// Write out repeated words: `word [x N]` and `<span> [x N]` are replaced
/// by the content repeated N times, space-joined. Material before and
/// after each match is preserved verbatim.
pub fn handle_repetitions(utterance: &str) -> String {
    let mut clean = String::new();
    let mut match_end = 0;

    for caps in RE_REPETITION.captures_iter(utterance) {
        let whole = caps.get(0).unwrap();
        clean.push_str(&utterance[match_end..whole.start()]);

        // scope over several words (angle brackets) or a single word
        let mut words = match caps.get(1).or_else(|| caps.get(2)) {
            Some(m) => m.as_str().to_string(),
            None => String::new(),
        };

        // carry an intervening scoped annotation on each copy
        if let Some(scoped) = caps.get(3) {
            words.push_str(scoped.as_str());
        }

        let repetitions: usize = caps[4].parse().unwrap_or(1);
        clean.push_str(&vec![words; repetitions].join(" "));

        match_end = whole.end();
    }

    clean.push_str(&utterance[match_end..]);

    if clean.is_empty() {
        utterance.to_string()
    } else {
        clean
    }
}

/// Remove events (words starting with `&=`).
pub fn remove_events(utterance: &str) -> String {
    squeeze_whitespace(&RE_EVENT.replace_all(utterance, ""))
}

/// Remove omitted words (words starting with `0`). Omissions within square
/// brackets and null utterances starting with `0[` are kept.
pub fn remove_omissions(utterance: &str) -> String {
    if utterance.starts_with("0[") {
        return utterance.to_string();
    }

    let kept: Vec<&str> = utterance
        .split_whitespace()
        .filter(|w| !(w.starts_with('0') && w.len() > 2 && !w.ends_with(']')))
        .collect();

    kept.join(" ")
}

/// Remove linkers (`+"`, `+^`, `+,`, `++`, `+<` at the utterance start).
pub fn remove_linkers(utterance: &str) -> String {
    RE_LINKER.replace(utterance, "").trim_start_matches(' ').to_string()
}

/// Remove separator punctuation surrounded by whitespace.
pub fn remove_separators(utterance: &str) -> String {
    RE_SEPARATOR.replace_all(utterance, " ").to_string()
}

/// Remove conversation analysis and satellite markers.
pub fn remove_ca(utterance: &str) -> String {
    squeeze_whitespace(&RE_CA.replace_all(utterance, ""))
}

/// Remove pauses between words.
pub fn remove_pauses_between_words(utterance: &str) -> String {
    squeeze_whitespace(&RE_PAUSE.replace_all(utterance, ""))
}

/// Remove scoped symbols: `<`, `>` and `[...]` with contents. Scoped
/// symbols can be nested to any depth.
pub fn remove_scoped_symbols(utterance: &str) -> String {
    squeeze_whitespace(&RE_SCOPED.replace_all(utterance, ""))
}

pub fn remove_commas(utterance: &str) -> String {
    utterance.replace(',', "")
}

/// Null utterances consisting only of untranscribed material.
pub fn null_untranscribed(utterance: &str) -> String {
    if utterance == UNKNOWN {
        String::new()
    } else {
        utterance.to_string()
    }
}

/// Remove standalone zeros coding events.
pub fn null_event_utterances(utterance: &str) -> String {
    squeeze_whitespace(&RE_EVENT_ZERO.replace_all(utterance, ""))
}

// ---------- word-level rules ----------

/// Remove form markers (`@` and everything after it).
pub fn remove_form_markers(word: &str) -> String {
    RE_FORM_MARKER.replace(word, "").to_string()
}

/// Remove drawls (`:` within or after the word).
pub fn remove_drawls(word: &str) -> String {
    word.replace(':', "")
}

/// Remove pauses within the word (`^`).
pub fn remove_pauses_within_words(word: &str) -> String {
    RE_WORD_PAUSE.replace_all(word, "$1").to_string()
}

/// Remove blockings (`^` or `≠` at the beginning of the word).
pub fn remove_blocking(word: &str) -> String {
    word.trim_start_matches('^').trim_start_matches('≠').to_string()
}

/// Remove the filler marker (`&-` or word-initial `&`, but not `&=`).
pub fn remove_filler(word: &str) -> String {
    let word = word.replace("&-", "");
    RE_FILLER.replace_all(&word, "$1").to_string()
}

/// Replace plus by an underscore (complex/compound join marker).
pub fn replace_plus(unit: &str) -> String {
    unit.replace('+', "_")
}

lazy_static! {
    /// Global rule registry. Corpus profiles reference rules by name; the
    /// names are resolved once, at registration.
    static ref RULE_REGISTRY: HashMap<&'static str, CleaningRule> = {
        let mut map: HashMap<&'static str, CleaningRule> = HashMap::new();
        map.insert("squeeze_whitespace", squeeze_whitespace);
        map.insert("remove_terminator", remove_terminator);
        map.insert("unify_untranscribed", unify_untranscribed);
        map.insert("handle_repetitions", handle_repetitions);
        map.insert("remove_events", remove_events);
        map.insert("remove_omissions", remove_omissions);
        map.insert("remove_linkers", remove_linkers);
        map.insert("remove_separators", remove_separators);
        map.insert("remove_ca", remove_ca);
        map.insert("remove_pauses_between_words", remove_pauses_between_words);
        map.insert("remove_scoped_symbols", remove_scoped_symbols);
        map.insert("remove_commas", remove_commas);
        map.insert("null_untranscribed", null_untranscribed);
        map.insert("null_event_utterances", null_event_utterances);
        map.insert("remove_form_markers", remove_form_markers);
        map.insert("remove_drawls", remove_drawls);
        map.insert("remove_pauses_within_words", remove_pauses_within_words);
        map.insert("remove_blocking", remove_blocking);
        map.insert("remove_filler", remove_filler);
        map.insert("replace_plus", replace_plus);
        map
    };
}

/// Default utterance rule list. The relative order of `handle_repetitions`
/// and `remove_scoped_symbols` is load-bearing.
pub static DEFAULT_UTTERANCE_RULES: &[&str] = &[
    "remove_terminator",
    "unify_untranscribed",
    "handle_repetitions",
    "remove_events",
    "remove_omissions",
    "remove_linkers",
    "remove_separators",
    "remove_ca",
    "remove_pauses_between_words",
    "remove_scoped_symbols",
    "remove_commas",
    "null_event_utterances",
];

/// Default word rule list.
pub static DEFAULT_WORD_RULES: &[&str] = &[
    "remove_form_markers",
    "remove_drawls",
    "remove_pauses_within_words",
    "remove_blocking",
    "remove_filler",
];

/// An ordered sequence of cleaning rules.
#[derive(Clone)]
pub struct RuleSet {
    names: Vec<String>,
    rules: Vec<CleaningRule>,
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet").field("names", &self.names).finish()
    }
}

impl RuleSet {
    /// Resolve a list of rule names against the registry.
    ///
    /// An unknown name is a `ConfigError`: it can only happen at corpus
    /// registration time and aborts startup.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<RuleSet, ConfigError> {
        let mut rules = Vec::with_capacity(names.len());
        let mut resolved_names = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            match RULE_REGISTRY.get(name) {
                Some(rule) => {
                    rules.push(*rule);
                    resolved_names.push(name.to_string());
                }
                None => return Err(ConfigError::UnknownRule(name.to_string())),
            }
        }

        Ok(RuleSet { names: resolved_names, rules })
    }

    pub fn empty() -> RuleSet {
        RuleSet { names: Vec::new(), rules: Vec::new() }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Apply the rules strictly in sequence, each operating on the previous
    /// rule's output.
    pub fn apply(&self, text: &str) -> String {
        let mut text = text.to_string();
        for rule in &self.rules {
            text = rule(&text);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squeeze_whitespace_idempotent() {
        let once = squeeze_whitespace("  a   b\tc ");
        let twice = squeeze_whitespace(&once);
        assert_eq!(once, "a b c");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_terminator_simple() {
        assert_eq!(remove_terminator("ja ne ."), "ja ne");
        assert_eq!(remove_terminator("doggy ?"), "doggy");
        assert_eq!(remove_terminator("we drink +..."), "we drink");
    }

    #[test]
    fn test_remove_terminator_keeps_postcode() {
        assert_eq!(remove_terminator("doa ne ? [+ bch]"), "doa ne [+ bch]");
    }

    #[test]
    fn test_terminator_not_removed_mid_utterance() {
        assert_eq!(remove_terminator("a.b stays ."), "a.b stays");
    }

    #[test]
    fn test_unify_untranscribed() {
        assert_eq!(unify_untranscribed("ah xxx oh yyy www"), "ah ??? oh ??? ???");
    }

    #[test]
    fn test_handle_repetitions_single_word() {
        assert_eq!(handle_repetitions("ab [x 2]"), "ab ab");
        assert_eq!(handle_repetitions("a b [x 3] c"), "a b b b c");
    }

    #[test]
    fn test_handle_repetitions_scoped_span() {
        assert_eq!(handle_repetitions("<ab cd> [x 2]"), "ab cd ab cd");
    }

    #[test]
    fn test_handle_repetitions_carries_annotation() {
        assert_eq!(handle_repetitions("ab [?] [x 2]"), "ab [?] ab [?]");
    }

    #[test]
    fn test_remove_events() {
        assert_eq!(remove_events("ha &=laughs ho"), "ha ho");
    }

    #[test]
    fn test_remove_omissions() {
        assert_eq!(remove_omissions("ich 0bin da"), "ich da");
        assert_eq!(remove_omissions("0[x] bleibt"), "0[x] bleibt");
    }

    #[test]
    fn test_remove_linkers() {
        assert_eq!(remove_linkers("+\" und dann"), "und dann");
        assert_eq!(remove_linkers("+< na ja"), "na ja");
    }

    #[test]
    fn test_remove_scoped_symbols_nested() {
        assert_eq!(
            remove_scoped_symbols("<<wo wo> [?] da> [!] ."),
            "wo wo da ."
        );
    }

    #[test]
    fn test_word_rules() {
        assert_eq!(remove_form_markers("nee@g"), "nee");
        assert_eq!(remove_drawls("na:ja"), "naja");
        assert_eq!(remove_pauses_within_words("bi^tte"), "bitte");
        assert_eq!(remove_blocking("^da"), "da");
        assert_eq!(remove_filler("&-ähm"), "ähm");
        assert_eq!(remove_filler("&mm"), "mm");
        // events are not fillers
        assert_eq!(remove_filler("&=coughs"), "&=coughs");
    }

    #[test]
    fn test_ruleset_rejects_unknown_name() {
        let err = RuleSet::from_names(&["remove_commas", "no_such_rule"]).unwrap_err();
        assert_eq!(
            err,
            crate::types::ConfigError::UnknownRule("no_such_rule".to_string())
        );
    }

    #[test]
    fn test_default_rules_resolve() {
        assert!(RuleSet::from_names(DEFAULT_UTTERANCE_RULES).is_ok());
        assert!(RuleSet::from_names(DEFAULT_WORD_RULES).is_ok());
    }
}
