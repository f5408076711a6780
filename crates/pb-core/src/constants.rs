/// Cell capacity of non-lexical areas.
pub const NON_LEX_N: usize = 10_000;

/// Assembly size of non-lexical areas.
pub const NON_LEX_K: usize = 100;

/// Baseline Hebbian scaling factor.
pub const DEFAULT_BETA: f64 = 0.2;

/// Scaling for connectomes touching the lexical area, both directions.
pub const LEX_BETA: f64 = 1.0;

/// Scaling for an area's recurrent connectome.
pub const RECURRENT_BETA: f64 = 0.05;

/// Scaling between distinct non-lexical areas.
pub const INTERAREA_BETA: f64 = 0.5;

/// Overlap fraction of the assembly size required to identify a word.
pub const MIN_OVERLAP: f64 = 0.7;

/// Lowered fraction retried when identification fails at the default.
pub const FALLBACK_OVERLAP: f64 = 0.4;

/// Sentinel returned when no lexeme matches a winner set.
pub const UNKNOWN_WORD: &str = "<NON-WORD>";

/// Sentinel for the reserved empty-determiner slot.
pub const NULL_DETERMINER: &str = "<null-det>";
