use std::fmt;

use pb_sim::AreaName;

use crate::readout::ReadoutStrategy;

/// Errors that abort a single sentence's parse. Every parse runs on a
/// fresh controller, so none of these can corrupt later parses.
#[derive(Debug)]
pub enum ParseError {
    /// A token is missing from the active lexicon. Carries the full token
    /// list so segmentation problems are visible in the report.
    LexiconMiss { token: String, tokens: Vec<String> },
    /// The lexical area would establish more than one grammatical relation
    /// in a single step.
    FiberWar { targets: Vec<AreaName> },
    /// The requested read-out strategy has no implementation.
    UnsupportedStrategy(ReadoutStrategy),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::LexiconMiss { token, tokens } => {
                write!(f, "token {token:?} not in the active lexicon (tokenized: {tokens:?})")
            }
            ParseError::FiberWar { targets } => {
                write!(f, "fiber war: lexical area projecting into {targets:?}")
            }
            ParseError::UnsupportedStrategy(strategy) => {
                write!(f, "read-out strategy {strategy:?} is not implemented")
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub type Result<T> = std::result::Result<T, ParseError>;
