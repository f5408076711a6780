//! Gated assembly dependency parser.
//!
//! Encodes grammar as sequences of gating operations over simulated brain
//! areas and the fibers between them, drives the simulation substrate one
//! word at a time, and inverts the resulting connectivity trace into a
//! dependency graph. English, Russian and Chinese grammars ship as data.
//!
//! Pure logic, zero I/O: every parse runs on its own controller instance
//! with its own seedable randomness.

pub mod constants;
pub mod controller;
pub mod error;
pub mod gating;
pub mod language;
pub mod lexicon;
pub mod parse;
pub mod readout;
pub mod rules;
pub mod tokenize;

pub use constants::{FALLBACK_OVERLAP, MIN_OVERLAP, NULL_DETERMINER, UNKNOWN_WORD};
pub use controller::Controller;
pub use error::{ParseError, Result};
pub use gating::GateMap;
pub use language::{Language, LanguageSpec};
pub use parse::{ParseOptions, ParseResult, parse};
pub use readout::{Dependency, ReadoutStrategy, prune_history, transitive_reduction};
pub use rules::{GateOp, Lexeme, Rule};
pub use tokenize::tokenize;
