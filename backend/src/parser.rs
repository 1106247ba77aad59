//! The record engine: one `Record` in, one `Utterance` out.
//!
//! The transform is pure and synchronous. Malformed input never raises;
//! the engine produces a best-effort partial record and flags uncertainty
//! through warning codes.

use crate::actual_target::{to_actual_utterance, to_target_utterance, StandardForm};
use crate::align::fix_misalignments;
use crate::corpus::{CorpusConfig, MainMorpheme};
use crate::logger::warn;
use crate::reconstruct::{add_repetitions, add_retracings};
use crate::record::Record;
use crate::segment::segment_word;
use crate::tokenize;
use crate::types::{Morpheme, Utterance, Warning, Word};

/// Per-session parsing state: the session stem and the strictly increasing
/// utterance counter that makes up the source ids.
pub struct SessionParser<'a> {
    config: &'a CorpusConfig,
    session_stem: String,
    uid: usize,
}

impl<'a> SessionParser<'a> {
    pub fn new(config: &'a CorpusConfig, session_stem: &str) -> SessionParser<'a> {
        SessionParser {
            config,
            session_stem: session_stem.to_string(),
            uid: 0,
        }
    }

    fn next_source_id(&mut self) -> String {
        let source_id = format!("{}_{}", self.session_stem, self.uid);
        self.uid += 1;
        source_id
    }

    /// Parse one raw record block. `None` if the block has no main line.
    pub fn parse_block(&mut self, raw: &str) -> Option<Utterance> {
        let record = Record::from_raw(raw)?;
        Some(self.parse_record(&record))
    }

    /// Process one record into an utterance.
    pub fn parse_record(&mut self, record: &Record) -> Utterance {
        let config = self.config;
        let tier_map = &config.tier_map;

        let source_id = self.next_source_id();

        let mut utt = Utterance {
            source_id,
            speaker_label: record.speaker_label.clone(),
            addressee: tier_map.addressee(record).to_string(),
            utterance_raw: record.utterance.clone(),
            utterance: String::new(),
            translation: tier_map.translation(record).to_string(),
            comment: tier_map.comment(record),
            sentence_type: record.sentence_type(),
            start: tier_map.start_time(record),
            end: tier_map.end_time(record),
            words: Vec::new(),
            warning: None,
        };

        // clean the morphology tiers
        let mut seg_tier = config.morph_tier_rules.apply(tier_map.seg_tier(record));
        let mut gloss_tier = config.morph_tier_rules.apply(tier_map.gloss_tier(record));
        let mut pos_tier = config.morph_tier_rules.apply(tier_map.pos_tier(record));

        // actual and target forms of the utterance
        let actual_utt = config.utterance_rules.apply(&to_actual_utterance(&record.utterance));
        let target_utt = config.utterance_rules.apply(&to_target_utterance(&record.utterance));

        // cross cleaning: re-expand repeated and retraced words on the
        // morphology tiers so word alignment can succeed
        if config.reconstruct_repetitions {
            for tier in [&mut seg_tier, &mut gloss_tier, &mut pos_tier] {
                *tier = add_repetitions(&record.utterance, tier, &config.cross_rules);
            }
        }
        if config.reconstruct_retracings {
            for tier in [&mut seg_tier, &mut gloss_tier, &mut pos_tier] {
                *tier = add_retracings(&record.utterance, &actual_utt, tier, &config.word_rules);
            }
        }

        self.add_words(&mut utt, &actual_utt, &target_utt);
        self.add_morphemes(&mut utt, &seg_tier, &gloss_tier, &pos_tier);

        utt
    }

    /// Tokenize the actual/target utterances and zip them into words. The
    /// cleaned utterance is rebuilt from the cleaned standard-form words.
    fn add_words(&self, utt: &mut Utterance, actual_utt: &str, target_utt: &str) {
        let config = self.config;

        let actual_words = tokenize::words(actual_utt);
        let target_words = tokenize::words(target_utt);

        for (word_actual, word_target) in actual_words.iter().zip(&target_words) {
            let word = match config.standard_form {
                StandardForm::Actual => word_actual,
                StandardForm::Target => word_target,
            };

            // the language marker sits on the raw word and is cleaned away
            let language = config.languages.word_language(word);

            utt.words.push(Word {
                word: config.word_rules.apply(word),
                word_actual: config.word_rules.apply(word_actual),
                word_target: config.word_rules.apply(word_target),
                language,
                morphemes: Vec::new(),
                warning: None,
            });
        }

        let cleaned: Vec<&str> = utt.words.iter().map(|w| w.word.as_str()).collect();
        utt.utterance = cleaned.join(" ");
    }

    /// Word-level alignment of the morphology tiers, then per-word
    /// morpheme segmentation and morpheme-level alignment.
    fn add_morphemes(
        &self,
        utt: &mut Utterance,
        seg_tier: &str,
        gloss_tier: &str,
        pos_tier: &str,
    ) {
        let config = self.config;
        let separators = &config.morpheme_word_separators;

        let mut wsegs = tokenize::words_with_separators(seg_tier, separators);
        let mut wglosses = tokenize::words_with_separators(gloss_tier, separators);
        let mut wposes = tokenize::words_with_separators(pos_tier, separators);

        let tier_nulled = match config.main_morpheme {
            MainMorpheme::Segment => {
                let mut tiers = [wsegs, wglosses, wposes];
                let nulled = fix_misalignments(&mut tiers);
                [wsegs, wglosses, wposes] = tiers;
                nulled
            }
            MainMorpheme::Gloss => {
                let mut tiers = [wglosses, wsegs, wposes];
                let nulled = fix_misalignments(&mut tiers);
                [wglosses, wsegs, wposes] = tiers;
                nulled
            }
        };

        if tier_nulled {
            warn(&format!(
                "{}: word counts of the morphology tiers disagree",
                utt.source_id
            ));
            utt.warning = Some(Warning::TierMisaligned);
        }

        let morph_len = wsegs.len();
        if morph_len == 0 {
            // no morphology coded; absence is not misalignment
            return;
        }

        if morph_len != utt.words.len() {
            warn(&format!(
                "{}: {} morphology words against {} utterance words",
                utt.source_id,
                morph_len,
                utt.words.len()
            ));
            utt.warning = Some(Warning::TierMisaligned);
            return;
        }

        for (word, ((wseg, wgloss), wpos)) in utt
            .words
            .iter_mut()
            .zip(wsegs.iter().zip(&wglosses).zip(&wposes))
        {
            let (morphemes, warning) = self.word_morphemes(wseg, wgloss, wpos);
            word.morphemes = morphemes;
            word.warning = warning;
        }
    }

    /// Segment the three morpheme words of one utterance word and align
    /// their triples into `Morpheme`s.
    fn word_morphemes(
        &self,
        wseg: &str,
        wgloss: &str,
        wpos: &str,
    ) -> (Vec<Morpheme>, Option<Warning>) {
        let config = self.config;

        let (seg_triples, seg_warning) = segment_word(wseg, &config.grammar);
        let (gloss_triples, gloss_warning) = segment_word(wgloss, &config.grammar);
        let (pos_triples, pos_warning) = segment_word(wpos, &config.grammar);
        let unstructured = seg_warning.or(gloss_warning).or(pos_warning);

        let mut segments: Vec<String> =
            seg_triples.into_iter().map(|m| m.segment).collect();
        let mut glosses: Vec<String> =
            gloss_triples.into_iter().map(|m| m.gloss).collect();
        let mut poses: Vec<String> = pos_triples.into_iter().map(|m| m.pos).collect();

        let nulled = match config.main_morpheme {
            MainMorpheme::Segment => {
                let mut tiers = [segments, glosses, poses];
                let nulled = fix_misalignments(&mut tiers);
                [segments, glosses, poses] = tiers;
                nulled
            }
            MainMorpheme::Gloss => {
                let mut tiers = [glosses, segments, poses];
                let nulled = fix_misalignments(&mut tiers);
                [glosses, segments, poses] = tiers;
                nulled
            }
        };

        let mut morphemes = Vec::with_capacity(segments.len());
        for ((segment, gloss), pos) in segments.iter().zip(&glosses).zip(&poses) {
            morphemes.push(Morpheme {
                language: config.languages.morpheme_language(segment, pos),
                segment: config.morpheme_rules.apply(segment),
                gloss: config.morpheme_rules.apply(gloss),
                pos: config.morpheme_rules.apply(pos),
            });
        }

        let warning = if nulled {
            Some(Warning::MorphemeMisaligned)
        } else {
            unstructured
        };

        (morphemes, warning)
    }
}
