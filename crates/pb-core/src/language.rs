use std::collections::BTreeMap;

use pb_sim::AreaName;

use crate::lexicon;
use crate::rules::Lexeme;

// Brain areas shared across languages
pub const LEX: AreaName = "LEX";
pub const DET: AreaName = "DET";
pub const SUBJ: AreaName = "SUBJ";
pub const OBJ: AreaName = "OBJ";
pub const VERB: AreaName = "VERB";
pub const PREP: AreaName = "PREP";
pub const PREP_P: AreaName = "PREP_P";
pub const ADJ: AreaName = "ADJ";
pub const ADVERB: AreaName = "ADVERB";
/// Predicative complement area (copula constructions).
pub const PRED: AreaName = "PRED";
/// Quantifier/measure-word area.
pub const QUANT: AreaName = "QUANT";

// Case areas unique to Russian
pub const NOM: AreaName = "NOM";
pub const ACC: AreaName = "ACC";
pub const DAT: AreaName = "DAT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    English,
    Russian,
    Chinese,
}

/// Everything that defines one language's grammar, built once per parse
/// and injected into the controller. No global tables.
pub struct LanguageSpec {
    pub language: Language,
    pub areas: Vec<AreaName>,
    /// Areas whose gate starts open.
    pub initial_active: Vec<AreaName>,
    /// Non-lexical areas participating in the strong-plasticity loop.
    pub recurrent: Vec<AreaName>,
    /// Non-lexical areas sized like the lexical assembly (closed-class).
    pub lex_sized: Vec<AreaName>,
    /// Slot capacity of the lexical area, including reserved sentinel slots.
    pub lex_slots: usize,
    /// Read-out starts here.
    pub root: AreaName,
    /// Per-area list of areas it may be read out into.
    pub readout: BTreeMap<AreaName, Vec<AreaName>>,
    pub lexicon: BTreeMap<&'static str, Lexeme>,
    /// Reserved lexical slot matched as "no determiner", if the language
    /// has one.
    pub null_det_slot: Option<usize>,
}

impl LanguageSpec {
    pub fn new(language: Language) -> Self {
        match language {
            Language::English => lexicon::english(),
            Language::Russian => lexicon::russian(),
            Language::Chinese => lexicon::chinese(),
        }
    }
}
