use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::debug;

use crate::controller::Controller;
use crate::error::{ParseError, Result};
use crate::language::{ADVERB, Language, LanguageSpec, SUBJ};
use crate::readout::{Dependency, ReadoutStrategy, extract, prune_history, transitive_reduction};
use crate::tokenize::tokenize;

/// Invocation configuration for one parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    pub language: Language,
    /// Synapse connection probability of the substrate.
    pub density: f64,
    /// Lexical assembly size.
    pub lex_k: usize,
    /// Simulation rounds per word.
    pub rounds: usize,
    pub strategy: ReadoutStrategy,
    /// Fixed seed for reproducible parses; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            language: Language::English,
            density: 0.1,
            lex_k: 20,
            rounds: 20,
            strategy: ReadoutStrategy::FiberBased,
            seed: None,
        }
    }
}

/// Parse output: the tokenization that was simulated and the unordered
/// dependency list read out of the trace.
#[derive(Clone, Debug, Serialize)]
pub struct ParseResult {
    pub tokens: Vec<String>,
    pub dependencies: Vec<Dependency>,
}

/// Parse one sentence. Builds a fresh controller, runs the per-word
/// protocol, then reads the dependency graph out of the activated-fiber
/// trace. Fatal conditions abort this parse only.
pub fn parse(sentence: &str, options: &ParseOptions) -> Result<ParseResult> {
    let spec = LanguageSpec::new(options.language);
    let tokens = tokenize(sentence, &spec);
    let seed = options
        .seed
        .unwrap_or_else(|| SmallRng::from_os_rng().random());
    let mut controller = Controller::new(spec, options.density, options.lex_k, seed);

    // coordinated predicative words, in sentence order
    let mut flagged: Vec<&'static str> = Vec::new();

    for token in &tokens {
        let Some((&word, lexeme)) = controller.spec().lexicon.get_key_value(token.as_str()) else {
            return Err(ParseError::LexiconMiss {
                token: token.clone(),
                tokens: tokens.clone(),
            });
        };
        let lexeme = lexeme.clone();
        debug!(word, "processing");

        if lexeme.predicative {
            flagged.push(word);
        }

        controller.activate_slot(lexeme.index);
        for rule in &lexeme.pre_rules {
            controller.apply_rule(rule);
        }
        controller.stage_word_areas()?;
        for _ in 0..options.rounds {
            controller.step_round()?;
        }
        for rule in &lexeme.post_rules {
            controller.apply_rule(rule);
        }
    }

    controller.finish_sentence();

    let adjacency = match options.strategy {
        ReadoutStrategy::FiberBased => {
            let mut adjacency =
                prune_history(controller.history(), &controller.spec().readout);
            transitive_reduction(&mut adjacency);
            adjacency
        }
        ReadoutStrategy::FixedMap => controller
            .spec()
            .readout
            .iter()
            .map(|(&from, targets)| (from, targets.iter().copied().collect()))
            .collect(),
        ReadoutStrategy::Natural => {
            return Err(ParseError::UnsupportedStrategy(ReadoutStrategy::Natural));
        }
    };
    debug!(?adjacency, "read-out adjacency");

    let mut dependencies = extract(&mut controller, &adjacency);
    propagate_coordinated(&mut dependencies, &flagged);
    dedup(&mut dependencies);

    Ok(ParseResult {
        tokens,
        dependencies,
    })
}

/// Coordinated predicative words share one subject/adverb binding: only
/// the last flagged word re-established the fibers during simulation, so
/// its SUBJ and ADVERB targets become the template copied to each earlier
/// flagged word. The union is idempotent.
fn propagate_coordinated(dependencies: &mut Vec<Dependency>, flagged: &[&'static str]) {
    let Some((&last, earlier)) = flagged.split_last() else {
        return;
    };
    if earlier.is_empty() {
        return;
    }

    let template = |relation| {
        dependencies
            .iter()
            .find(|d| d.head == last && d.relation == relation)
            .map(|d| d.dependent)
    };
    let subject = template(SUBJ);
    let adverb = template(ADVERB);

    for &word in earlier {
        for (dependent, relation) in [(subject, SUBJ), (adverb, ADVERB)] {
            let Some(dependent) = dependent else { continue };
            let candidate = Dependency {
                head: word,
                dependent,
                relation,
            };
            if !dependencies.contains(&candidate) {
                dependencies.push(candidate);
            }
        }
    }
}

fn dedup(dependencies: &mut Vec<Dependency>) {
    let mut seen = std::collections::BTreeSet::new();
    dependencies.retain(|d| seen.insert((d.head, d.dependent, d.relation)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(head: &'static str, dependent: &'static str, relation: &'static str) -> Dependency {
        Dependency {
            head,
            dependent,
            relation,
        }
    }

    #[test]
    fn test_propagation_copies_template_to_earlier_words() {
        let mut deps = vec![dep("大度", "你", SUBJ), dep("大度", "真", ADVERB)];
        propagate_coordinated(&mut deps, &["温柔", "善良", "大度"]);
        for word in ["温柔", "善良"] {
            assert!(deps.contains(&dep(word, "你", SUBJ)), "{word} missing SUBJ");
            assert!(deps.contains(&dep(word, "真", ADVERB)), "{word} missing ADVERB");
        }
        assert_eq!(deps.len(), 6);
    }

    #[test]
    fn test_propagation_single_flagged_word_is_noop() {
        let mut deps = vec![dep("善良", "你", SUBJ)];
        propagate_coordinated(&mut deps, &["善良"]);
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_propagation_skips_existing_triples() {
        let mut deps = vec![
            dep("大度", "你", SUBJ),
            dep("温柔", "你", SUBJ),
        ];
        propagate_coordinated(&mut deps, &["温柔", "大度"]);
        assert_eq!(
            deps.iter().filter(|d| d.head == "温柔").count(),
            1,
            "existing triple must not duplicate"
        );
    }

    #[test]
    fn test_propagation_without_template_adds_nothing() {
        let mut deps = vec![dep("大度", "你", "OBJ")];
        propagate_coordinated(&mut deps, &["温柔", "大度"]);
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_dedup_preserves_first_occurrence_order() {
        let mut deps = vec![
            dep("chase", "cats", SUBJ),
            dep("chase", "mice", "OBJ"),
            dep("chase", "cats", SUBJ),
        ];
        dedup(&mut deps);
        assert_eq!(deps, vec![dep("chase", "cats", SUBJ), dep("chase", "mice", "OBJ")]);
    }

    #[test]
    fn test_natural_strategy_is_rejected() {
        let options = ParseOptions {
            strategy: ReadoutStrategy::Natural,
            rounds: 1,
            ..ParseOptions::default()
        };
        match parse("cats chase mice", &options) {
            Err(ParseError::UnsupportedStrategy(ReadoutStrategy::Natural)) => {}
            other => panic!("expected unsupported strategy, got {other:?}"),
        }
    }

    #[test]
    fn test_lexicon_miss_is_fatal_and_reported() {
        let options = ParseOptions {
            rounds: 1,
            seed: Some(1),
            ..ParseOptions::default()
        };
        match parse("unicorns chase mice", &options) {
            Err(ParseError::LexiconMiss { token, tokens }) => {
                assert_eq!(token, "unicorns");
                assert_eq!(tokens, vec!["unicorns", "chase", "mice"]);
            }
            other => panic!("expected lexicon miss, got {other:?}"),
        }
    }
}
