//! Shipped grammar tables: lexeme rule bundles and read-out rules for
//! English, Russian and Chinese.
//!
//! The reason indices layer deliberately: index 0 is the default gate, and
//! several part-of-speech bundles close a fiber under 0 while lifting a
//! never-set index 1, so that a later preposition can close index 1 on the
//! same fiber without undoing the noun's own bookkeeping.

use std::collections::BTreeMap;

use pb_sim::AreaName;

use crate::language::{
    ACC, ADJ, ADVERB, DAT, DET, LEX, Language, LanguageSpec, NOM, OBJ, PRED, PREP, PREP_P, QUANT,
    SUBJ, VERB,
};
use crate::rules::{GateOp, Lexeme, Rule};

fn open_area(area: AreaName, index: u32) -> Rule {
    Rule::Area {
        op: GateOp::Disinhibit,
        area,
        index,
    }
}

fn close_area(area: AreaName, index: u32) -> Rule {
    Rule::Area {
        op: GateOp::Inhibit,
        area,
        index,
    }
}

fn open_fiber(from: AreaName, to: AreaName, index: u32) -> Rule {
    Rule::Fiber {
        op: GateOp::Disinhibit,
        from,
        to,
        index,
    }
}

fn close_fiber(from: AreaName, to: AreaName, index: u32) -> Rule {
    Rule::Fiber {
        op: GateOp::Inhibit,
        from,
        to,
        index,
    }
}

// ---------------------------------------------------------------------------
// Part-of-speech rule bundles
// ---------------------------------------------------------------------------

fn determiner(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_area(DET, 0), open_fiber(LEX, DET, 0)],
        vec![close_fiber(LEX, DET, 0), close_fiber(VERB, ADJ, 0)],
    )
}

fn english_noun(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![
            open_fiber(LEX, SUBJ, 0),
            open_fiber(LEX, OBJ, 0),
            open_fiber(LEX, PREP_P, 0),
            open_fiber(DET, SUBJ, 0),
            open_fiber(DET, OBJ, 0),
            open_fiber(DET, PREP_P, 0),
            open_fiber(ADJ, SUBJ, 0),
            open_fiber(ADJ, OBJ, 0),
            open_fiber(ADJ, PREP_P, 0),
            open_fiber(VERB, OBJ, 0),
            open_fiber(PREP_P, PREP, 0),
            open_fiber(PREP_P, SUBJ, 0),
            open_fiber(PREP_P, OBJ, 0),
        ],
        vec![
            close_area(DET, 0),
            close_area(ADJ, 0),
            close_area(PREP_P, 0),
            close_area(PREP, 0),
            close_fiber(LEX, SUBJ, 0),
            close_fiber(LEX, OBJ, 0),
            close_fiber(LEX, PREP_P, 0),
            close_fiber(ADJ, SUBJ, 0),
            close_fiber(ADJ, OBJ, 0),
            close_fiber(ADJ, PREP_P, 0),
            close_fiber(DET, SUBJ, 0),
            close_fiber(DET, OBJ, 0),
            close_fiber(DET, PREP_P, 0),
            close_fiber(VERB, OBJ, 0),
            close_fiber(PREP_P, PREP, 0),
            close_fiber(PREP_P, VERB, 0),
            open_fiber(LEX, SUBJ, 1),
            open_fiber(LEX, OBJ, 1),
            open_fiber(DET, SUBJ, 1),
            open_fiber(DET, OBJ, 1),
            open_fiber(ADJ, SUBJ, 1),
            open_fiber(ADJ, OBJ, 1),
            close_fiber(PREP_P, SUBJ, 0),
            close_fiber(PREP_P, OBJ, 0),
            close_fiber(VERB, ADJ, 0),
        ],
    )
}

fn transitive_verb(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![
            open_fiber(LEX, VERB, 0),
            open_fiber(VERB, SUBJ, 0),
            open_fiber(VERB, ADVERB, 0),
            open_area(ADVERB, 1),
        ],
        vec![
            close_fiber(LEX, VERB, 0),
            open_area(OBJ, 0),
            close_area(SUBJ, 0),
            close_area(ADVERB, 0),
        ],
    )
}

fn intransitive_verb(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![
            open_fiber(LEX, VERB, 0),
            open_fiber(VERB, SUBJ, 0),
            open_fiber(VERB, ADVERB, 0),
            open_area(ADVERB, 1),
        ],
        vec![
            close_fiber(LEX, VERB, 0),
            close_area(SUBJ, 0),
            close_area(ADVERB, 0),
        ],
    )
}

fn copula(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_fiber(LEX, VERB, 0), open_fiber(VERB, SUBJ, 0)],
        vec![
            close_fiber(LEX, VERB, 0),
            open_area(PRED, 0),
            close_area(SUBJ, 0),
            open_fiber(VERB, PRED, 0),
            open_fiber(VERB, ADJ, 0),
        ],
    )
}

fn adverb(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_area(ADVERB, 0), open_fiber(LEX, ADVERB, 0)],
        vec![close_fiber(LEX, ADVERB, 0)],
    )
}

fn preposition(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_area(PREP, 0), open_fiber(LEX, PREP, 0)],
        vec![
            close_fiber(LEX, PREP, 0),
            open_area(PREP_P, 0),
            close_fiber(LEX, SUBJ, 1),
            close_fiber(LEX, OBJ, 1),
            close_fiber(DET, SUBJ, 1),
            close_fiber(DET, OBJ, 1),
            close_fiber(ADJ, SUBJ, 1),
            close_fiber(ADJ, OBJ, 1),
        ],
    )
}

fn english_adjective(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_area(ADJ, 0), open_fiber(LEX, ADJ, 0)],
        vec![close_fiber(LEX, ADJ, 0), close_fiber(VERB, ADJ, 0)],
    )
}

/// Noun for languages with a predicative-complement area (Chinese).
fn noun(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![
            open_fiber(LEX, SUBJ, 0),
            open_fiber(LEX, OBJ, 0),
            open_fiber(LEX, PRED, 0),
            open_fiber(QUANT, SUBJ, 0),
            open_fiber(QUANT, OBJ, 0),
            open_fiber(QUANT, PRED, 0),
            open_fiber(ADJ, SUBJ, 0),
            open_fiber(ADJ, OBJ, 0),
            open_fiber(ADJ, PRED, 0),
            open_fiber(VERB, OBJ, 0),
            open_fiber(VERB, PRED, 0),
        ],
        vec![
            close_area(QUANT, 0),
            close_area(ADJ, 0),
            close_fiber(LEX, SUBJ, 0),
            close_fiber(LEX, OBJ, 0),
            close_fiber(LEX, PRED, 0),
            close_fiber(ADJ, SUBJ, 0),
            close_fiber(ADJ, OBJ, 0),
            close_fiber(ADJ, PRED, 0),
            close_fiber(QUANT, SUBJ, 0),
            close_fiber(QUANT, OBJ, 0),
            close_fiber(QUANT, PRED, 0),
            close_fiber(VERB, OBJ, 0),
            close_fiber(VERB, PRED, 0),
            open_fiber(LEX, SUBJ, 1),
            open_fiber(LEX, OBJ, 1),
            open_fiber(LEX, PRED, 1),
            open_fiber(QUANT, SUBJ, 1),
            open_fiber(QUANT, OBJ, 1),
            open_fiber(QUANT, PRED, 1),
            open_fiber(ADJ, SUBJ, 1),
            open_fiber(ADJ, OBJ, 1),
            open_fiber(ADJ, PRED, 1),
            close_fiber(VERB, ADJ, 0),
        ],
    )
}

/// Attributive adjective: binds into the upcoming noun's role area, then
/// detaches from roles that are already committed.
fn adjective(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_area(ADJ, 0), open_fiber(LEX, ADJ, 0)],
        vec![
            close_fiber(LEX, ADJ, 0),
            close_fiber(ADJ, SUBJ, 0),
            close_fiber(ADJ, OBJ, 0),
        ],
    )
}

/// Predicative adjective acting as the sentence predicate. Leaves the
/// subject and adverb fibers open so a coordinated sequence of these can
/// share them; only the last one keeps the final binding.
fn predicative_adjective(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![
            open_fiber(LEX, VERB, 0),
            open_fiber(VERB, SUBJ, 0),
            open_fiber(VERB, ADVERB, 0),
            open_area(ADVERB, 1),
        ],
        vec![close_fiber(LEX, VERB, 0)],
    )
    .predicative()
}

fn quantifier(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_area(QUANT, 0), open_fiber(LEX, QUANT, 0)],
        vec![
            close_fiber(LEX, QUANT, 0),
            open_fiber(QUANT, SUBJ, 0),
            open_fiber(QUANT, OBJ, 0),
        ],
    )
}

// Russian relies on case morphology instead of word order: each noun form
// opens exactly one case area, each verb opens the case fibers it governs.

fn russian_verb(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![
            open_area(VERB, 0),
            open_fiber(LEX, VERB, 0),
            open_fiber(VERB, NOM, 0),
            open_fiber(VERB, ACC, 0),
        ],
        vec![close_fiber(LEX, VERB, 0)],
    )
}

fn russian_ditransitive_verb(index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![
            open_area(VERB, 0),
            open_fiber(LEX, VERB, 0),
            open_fiber(VERB, NOM, 0),
            open_fiber(VERB, ACC, 0),
            open_fiber(VERB, DAT, 0),
        ],
        vec![close_fiber(LEX, VERB, 0)],
    )
}

fn russian_case_noun(case: AreaName, index: usize) -> Lexeme {
    Lexeme::new(
        index,
        vec![open_area(case, 0), open_fiber(LEX, case, 0)],
        vec![close_fiber(LEX, case, 0)],
    )
}

// ---------------------------------------------------------------------------
// Language specs
// ---------------------------------------------------------------------------

pub fn english() -> LanguageSpec {
    let lexicon: BTreeMap<&'static str, Lexeme> = BTreeMap::from([
        ("the", determiner(0)),
        ("a", determiner(1)),
        ("dogs", english_noun(2)),
        ("cats", english_noun(3)),
        ("mice", english_noun(4)),
        ("people", english_noun(5)),
        ("chase", transitive_verb(6)),
        ("love", transitive_verb(7)),
        ("bite", transitive_verb(8)),
        ("of", preposition(9)),
        ("big", english_adjective(10)),
        ("bad", english_adjective(11)),
        ("run", intransitive_verb(12)),
        ("fly", intransitive_verb(13)),
        ("quickly", adverb(14)),
        ("in", preposition(15)),
        ("are", copula(16)),
        ("man", english_noun(17)),
        ("woman", english_noun(18)),
        ("saw", transitive_verb(19)),
    ]);

    let readout = BTreeMap::from([
        (VERB, vec![LEX, SUBJ, OBJ, PREP_P, ADVERB, ADJ]),
        (SUBJ, vec![LEX, DET, ADJ, PREP_P]),
        (OBJ, vec![LEX, DET, ADJ, PREP_P]),
        (PREP_P, vec![LEX, PREP, ADJ, DET]),
        (PREP, vec![LEX]),
        (ADJ, vec![LEX]),
        (DET, vec![LEX]),
        (ADVERB, vec![LEX]),
        (LEX, vec![]),
    ]);

    LanguageSpec {
        language: Language::English,
        areas: vec![LEX, DET, SUBJ, OBJ, VERB, ADJ, ADVERB, PREP, PREP_P],
        initial_active: vec![LEX, SUBJ, VERB],
        recurrent: vec![SUBJ, OBJ, VERB, ADJ, ADVERB, PREP, PREP_P],
        lex_sized: vec![DET],
        lex_slots: 21,
        root: VERB,
        readout,
        lexicon,
        null_det_slot: Some(20),
    }
}

pub fn russian() -> LanguageSpec {
    let lexicon: BTreeMap<&'static str, Lexeme> = BTreeMap::from([
        ("vidit", russian_verb(0)),
        ("lyubit", russian_verb(1)),
        ("kot", russian_case_noun(NOM, 2)),
        ("kota", russian_case_noun(ACC, 2)),
        ("kotu", russian_case_noun(DAT, 2)),
        ("sobaka", russian_case_noun(NOM, 3)),
        ("sobaku", russian_case_noun(ACC, 3)),
        ("sobakie", russian_case_noun(DAT, 3)),
        ("dayet", russian_ditransitive_verb(4)),
    ]);

    let readout = BTreeMap::from([
        (VERB, vec![LEX, NOM, ACC, DAT]),
        (NOM, vec![LEX]),
        (ACC, vec![LEX]),
        (DAT, vec![LEX]),
        (LEX, vec![]),
    ]);

    LanguageSpec {
        language: Language::Russian,
        areas: vec![LEX, NOM, VERB, ACC, DAT],
        initial_active: vec![LEX],
        recurrent: vec![NOM, VERB, ACC, DAT],
        lex_sized: vec![],
        lex_slots: 7,
        root: VERB,
        readout,
        lexicon,
        null_det_slot: None,
    }
}

pub fn chinese() -> LanguageSpec {
    let lexicon: BTreeMap<&'static str, Lexeme> = BTreeMap::from([
        ("我", noun(0)),
        ("你", noun(1)),
        ("人类", noun(2)),
        ("球", noun(3)),
        ("无可奈何地", adverb(4)),
        ("愤怒地", adverb(5)),
        ("真", adverb(6)),
        ("并非", copula(7)),
        ("红温了", intransitive_verb(8)),
        ("踢", transitive_verb(9)),
        ("善良", predicative_adjective(10)),
        ("愚蠢的", adjective(11)),
        ("硬邦邦的", adjective(12)),
        ("聪明的", adjective(13)),
        ("一颗", quantifier(14)),
        ("温柔", predicative_adjective(15)),
        ("大度", predicative_adjective(16)),
    ]);

    let readout = BTreeMap::from([
        (VERB, vec![LEX, SUBJ, OBJ, PRED, ADVERB, ADJ]),
        (SUBJ, vec![LEX, ADJ, QUANT]),
        (OBJ, vec![LEX, ADJ, QUANT]),
        (PRED, vec![LEX, ADJ, QUANT]),
        (ADJ, vec![LEX]),
        (ADVERB, vec![LEX]),
        (QUANT, vec![LEX]),
        (LEX, vec![]),
    ]);

    LanguageSpec {
        language: Language::Chinese,
        areas: vec![LEX, SUBJ, OBJ, VERB, ADJ, ADVERB, QUANT, PRED],
        initial_active: vec![LEX, SUBJ, VERB],
        recurrent: vec![SUBJ, OBJ, VERB, ADJ, ADVERB, QUANT, PRED],
        lex_sized: vec![QUANT],
        lex_slots: 20,
        root: VERB,
        readout,
        lexicon,
        null_det_slot: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_vocabulary() {
        let spec = english();
        assert_eq!(spec.lexicon.len(), 20);
        assert!(spec.lexicon.contains_key("chase"));
        assert!(spec.lexicon.contains_key("are"));
    }

    #[test]
    fn test_russian_case_forms_share_slots() {
        let spec = russian();
        // kot/kota/kotu are one lemma in three cases
        assert_eq!(spec.lexicon["kot"].index, spec.lexicon["kota"].index);
        assert_eq!(spec.lexicon["kot"].index, spec.lexicon["kotu"].index);
        assert_ne!(spec.lexicon["kot"].index, spec.lexicon["sobaka"].index);
    }

    #[test]
    fn test_chinese_predicative_flags() {
        let spec = chinese();
        for word in ["温柔", "善良", "大度"] {
            assert!(spec.lexicon[word].predicative, "{word} should be flagged");
        }
        assert!(!spec.lexicon["愚蠢的"].predicative);
        assert!(!spec.lexicon["你"].predicative);
    }

    #[test]
    fn test_noun_layers_reason_indices() {
        // the noun bundle closes role fibers under reason 0 but lifts
        // reason 1, so a following preposition's index-1 inhibits stack
        let lex = english_noun(2);
        let closes = lex
            .post_rules
            .iter()
            .filter(|r| matches!(r, Rule::Fiber { op: GateOp::Inhibit, from: LEX, to: SUBJ, index: 0 }))
            .count();
        let reopens = lex
            .post_rules
            .iter()
            .filter(|r| matches!(r, Rule::Fiber { op: GateOp::Disinhibit, from: LEX, to: SUBJ, index: 1 }))
            .count();
        assert_eq!(closes, 1);
        assert_eq!(reopens, 1);
    }
}
