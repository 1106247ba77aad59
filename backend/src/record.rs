use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Deserialize};

use crate::types::SentenceType;

lazy_static! {
    // *MOT:	ja ne . 4973_6356
    // Start and end times are optional and may be wrapped in control chars.
    static ref RE_MAIN_LINE: Regex = Regex::new(
        r"\*([A-Za-z0-9]{2,3}):\t(.*?)(\s*\D?(\d+)(_(\d+))?\D?$|$)"
    ).unwrap();

    // %tim:	19:43:04-19:43:07 (end part optional)
    static ref RE_TIME_TIER_START: Regex = Regex::new(r"([\d:]+)").unwrap();
    static ref RE_TIME_TIER_END: Regex = Regex::new(r"-([\d:]+)").unwrap();

    // Terminator, either at the very end or preceding a bracketed postcode.
    static ref RE_TERMINATOR_END: Regex = Regex::new(r#"([+/.!?"]*[!?.])$"#).unwrap();
    static ref RE_TERMINATOR_POSTCODE: Regex = Regex::new(r#"([+/.!?"]*[!?.]) \[\+"#).unwrap();
}

/// One speaker turn as delivered by the record reader: the main line fields
/// plus the raw dependent tiers. All downstream cleaning happens elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub speaker_label: String,
    pub utterance: String,
    pub start_time: String,
    pub end_time: String,
    pub dependent_tiers: HashMap<String, String>,
}

impl Record {
    /// Parse one raw record block.
    ///
    /// The block starts with the main line `*LBL:\t<utterance> [<start>_<end>]`
    /// followed by `%key:\t<text>` dependent tiers. Line breaks within a tier
    /// are coded as newline + tab and are replaced by a blank space first.
    ///
    /// Returns `None` if the block has no parseable main line.
    pub fn from_raw(raw: &str) -> Option<Record> {
        let unwrapped = raw.replace("\n\t", " ");

        let mut lines = unwrapped.lines();
        let main_line = lines.next()?;
        let caps = RE_MAIN_LINE.captures(main_line)?;

        let mut record = Record {
            speaker_label: caps.get(1).map_or("", |m| m.as_str()).to_string(),
            utterance: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            start_time: caps.get(4).map_or("", |m| m.as_str()).to_string(),
            end_time: caps.get(6).map_or("", |m| m.as_str()).to_string(),
            dependent_tiers: HashMap::new(),
        };

        for line in lines {
            if !line.starts_with('%') {
                continue;
            }
            // Some corpora have a blank space instead of a tab after the key.
            let (key, content) = match line.split_once(":\t") {
                Some(pair) => pair,
                None => match line.split_once(": ") {
                    Some(pair) => pair,
                    None => continue,
                },
            };
            record
                .dependent_tiers
                .insert(key.trim_start_matches('%').to_string(), content.to_string());
        }

        Some(record)
    }

    /// Raw text of a dependent tier, empty string if the tier is absent.
    /// Absence is a valid, empty input to all downstream stages.
    pub fn tier(&self, key: &str) -> &str {
        match self.dependent_tiers.get(key) {
            Some(text) => text.as_str(),
            None => "",
        }
    }

    /// Sentence type as coded by the utterance terminator.
    pub fn sentence_type(&self) -> SentenceType {
        if let Some(caps) = RE_TERMINATOR_POSTCODE.captures(&self.utterance) {
            return SentenceType::from_terminator(&caps[1]);
        }
        if let Some(caps) = RE_TERMINATOR_END.captures(&self.utterance) {
            return SentenceType::from_terminator(&caps[1]);
        }
        SentenceType::Default
    }
}

/// Maps logical tier roles to the tier keys a corpus uses.
///
/// Roles may share one key (e.g. segment, gloss and POS all on `xmor`).
/// An empty key means the role is not coded in the corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierMap {
    pub translation: String,
    pub segment: String,
    pub gloss: String,
    pub pos: String,
    /// Tier holding the start/end times; empty means the main line is used.
    pub time: String,
    pub addressee: String,
    /// Comment-like tiers, joined in order into the comment field.
    pub comments: Vec<String>,
}

impl TierMap {
    pub fn translation<'a>(&self, record: &'a Record) -> &'a str {
        record.tier(&self.translation)
    }

    pub fn seg_tier<'a>(&self, record: &'a Record) -> &'a str {
        record.tier(&self.segment)
    }

    pub fn gloss_tier<'a>(&self, record: &'a Record) -> &'a str {
        record.tier(&self.gloss)
    }

    pub fn pos_tier<'a>(&self, record: &'a Record) -> &'a str {
        record.tier(&self.pos)
    }

    pub fn addressee<'a>(&self, record: &'a Record) -> &'a str {
        record.tier(&self.addressee)
    }

    /// Join all present comment-like tiers with `; `.
    pub fn comment(&self, record: &Record) -> String {
        let fields: Vec<&str> = self
            .comments
            .iter()
            .map(|key| record.tier(key))
            .filter(|text| !text.is_empty())
            .collect();

        fields.join("; ")
    }

    pub fn start_time(&self, record: &Record) -> String {
        if self.time.is_empty() {
            return record.start_time.clone();
        }
        let time = record.tier(&self.time);
        match RE_TIME_TIER_START.find(time) {
            Some(m) => m.as_str().to_string(),
            None => String::new(),
        }
    }

    pub fn end_time(&self, record: &Record) -> String {
        if self.time.is_empty() {
            return record.end_time.clone();
        }
        let time = record.tier(&self.time);
        match RE_TIME_TIER_END.captures(time) {
            Some(caps) => caps[1].to_string(),
            None => String::new(),
        }
    }
}
