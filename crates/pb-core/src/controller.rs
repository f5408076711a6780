use std::collections::{BTreeMap, BTreeSet};

use pb_sim::{AreaName, Brain, ProjectionMap};
use tracing::debug;

use crate::constants::{
    DEFAULT_BETA, FALLBACK_OVERLAP, INTERAREA_BETA, LEX_BETA, MIN_OVERLAP, NON_LEX_K, NON_LEX_N,
    NULL_DETERMINER, RECURRENT_BETA, UNKNOWN_WORD,
};
use crate::error::{ParseError, Result};
use crate::gating::GateMap;
use crate::language::{DET, LEX, LanguageSpec};
use crate::rules::Rule;

/// Cumulative record of every (from → to) pair that appeared in any
/// round's projection map. Consumed once at read-out.
pub type FiberHistory = BTreeMap<AreaName, BTreeSet<AreaName>>;

/// One sentence's parser state: the simulation substrate, the gating
/// machine, and the activated-fiber history. Owned exclusively by a single
/// parse invocation; concurrent parses each build their own.
pub struct Controller {
    brain: Brain,
    spec: LanguageSpec,
    gates: GateMap,
    history: FiberHistory,
}

impl Controller {
    pub fn new(spec: LanguageSpec, density: f64, lex_k: usize, seed: u64) -> Self {
        let mut brain = Brain::new(density, seed);
        brain.add_explicit_area(LEX, spec.lex_slots * lex_k, lex_k, DEFAULT_BETA);
        for &area in &spec.areas {
            if area == LEX {
                continue;
            }
            let k = if spec.lex_sized.contains(&area) { lex_k } else { NON_LEX_K };
            brain.add_area(area, NON_LEX_N, k, DEFAULT_BETA);
        }

        // strong lexical loop, weak recurrence, medium cross-area binding
        for &area in &spec.recurrent {
            brain.set_plasticity(LEX, area, LEX_BETA);
            brain.set_plasticity(area, LEX, LEX_BETA);
            brain.set_plasticity(area, area, RECURRENT_BETA);
            for &other in &spec.recurrent {
                if other != area {
                    brain.set_plasticity(other, area, INTERAREA_BETA);
                }
            }
        }

        let gates = GateMap::new(&spec.areas, &spec.initial_active);
        Self {
            brain,
            spec,
            gates,
            history: FiberHistory::new(),
        }
    }

    pub fn spec(&self) -> &LanguageSpec {
        &self.spec
    }

    pub fn history(&self) -> &FiberHistory {
        &self.history
    }

    pub fn brain_mut(&mut self) -> &mut Brain {
        &mut self.brain
    }

    pub fn apply_rule(&mut self, rule: &Rule) {
        self.gates.apply(rule);
    }

    /// Activate a lexeme's fixed slot assembly in the lexical area.
    pub fn activate_slot(&mut self, slot: usize) {
        self.brain.activate_assembly(LEX, slot);
    }

    /// Infer the legal signal flow for one round.
    ///
    /// For every unordered pair of distinct areas with both gates open and
    /// the fiber open, each side that currently holds winners flows into
    /// the other. If the lexical area would flow into more than one area,
    /// the one-relation-per-step invariant is violated and the parse dies.
    pub fn projection_map(&self) -> Result<ProjectionMap> {
        let mut map = ProjectionMap::new();
        let areas = &self.spec.areas;
        for (i, &a) in areas.iter().enumerate() {
            for &b in &areas[i + 1..] {
                if !self.gates.area_open(a) || !self.gates.area_open(b) {
                    continue;
                }
                if !self.gates.fiber_open(a, b) {
                    continue;
                }
                if !self.brain.winners(a).is_empty() {
                    map.entry(a).or_default().insert(b);
                }
                if !self.brain.winners(b).is_empty() {
                    map.entry(b).or_default().insert(a);
                }
            }
        }

        if let Some(targets) = map.get(LEX)
            && targets.len() > 1
        {
            return Err(ParseError::FiberWar {
                targets: targets.iter().copied().collect(),
            });
        }
        Ok(map)
    }

    /// Pre-round staging: freeze every flowing area the lexical area is
    /// not feeding, and clear the ones it is about to rewrite. Committed
    /// assemblies survive as syntactic memory; areas receiving the new
    /// word start from scratch.
    pub fn stage_word_areas(&mut self) -> Result<()> {
        let map = self.projection_map()?;
        let lex_targets = map.get(LEX).cloned().unwrap_or_default();
        for &area in map.keys() {
            if !lex_targets.contains(area) {
                self.brain.fix_assembly(area);
                debug!(area, "froze assembly");
            } else if area != LEX {
                self.brain.unfix_assembly(area);
                self.brain.clear_assembly(area);
                debug!(area, "cleared assembly for incoming word");
            }
        }
        Ok(())
    }

    /// One simulation round: infer flow, remember it, advance the engine.
    pub fn step_round(&mut self) -> Result<()> {
        let map = self.projection_map()?;
        for (&from, targets) in &map {
            self.history.entry(from).or_default().extend(targets.iter().copied());
        }
        self.brain.project(&map);
        Ok(())
    }

    /// Sentence epilogue: release every assembly and stop learning so
    /// read-out projections cannot disturb the trace.
    pub fn finish_sentence(&mut self) {
        for &area in &self.spec.areas.clone() {
            self.brain.unfix_assembly(area);
        }
        self.brain.disable_plasticity = true;
    }

    /// Project one area into the given targets, bypassing gating and
    /// history; read-out drives the engine directly.
    pub fn project_for_readout(&mut self, from: AreaName, targets: &BTreeSet<AreaName>) {
        let mut map = ProjectionMap::new();
        map.insert(from, targets.clone());
        self.brain.project(&map);
    }

    /// Find the lexeme whose slot assembly overlaps the area's winners by
    /// at least `min_overlap × k`. The English determiner area also matches
    /// its reserved "no determiner" slot.
    pub fn match_word(&self, area: AreaName, min_overlap: f64) -> Option<&'static str> {
        let winners: BTreeSet<usize> = self.brain.winners(area).iter().copied().collect();
        if winners.is_empty() {
            return None;
        }
        let k = self.brain.area(area).k;
        let threshold = min_overlap * k as f64;

        let slot_overlap = |slot: usize| {
            let start = slot * k;
            winners.iter().filter(|&&w| w >= start && w < start + k).count() as f64
        };

        for (&word, lexeme) in &self.spec.lexicon {
            if slot_overlap(lexeme.index) >= threshold {
                return Some(word);
            }
        }
        if area == DET
            && let Some(slot) = self.spec.null_det_slot
            && slot_overlap(slot) >= threshold
        {
            return Some(NULL_DETERMINER);
        }
        None
    }

    /// Identification with the standard fallback: the default overlap
    /// fraction first, the lowered one on failure.
    pub fn resolve_word(&self, area: AreaName) -> Option<&'static str> {
        self.match_word(area, MIN_OVERLAP)
            .or_else(|| self.match_word(area, FALLBACK_OVERLAP))
    }

    /// Human-readable reading of an area's assembly; unidentifiable winner
    /// sets show up as the unknown-word sentinel rather than vanishing.
    pub fn interpret(&self, area: AreaName) -> &'static str {
        self.resolve_word(area).unwrap_or(UNKNOWN_WORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{Language, OBJ, SUBJ, VERB};
    use crate::rules::GateOp;

    fn english_controller() -> Controller {
        Controller::new(LanguageSpec::new(Language::English), 0.1, 20, 42)
    }

    #[test]
    fn test_initial_projection_is_empty() {
        let ctl = english_controller();
        // no winners anywhere yet, so nothing flows
        let map = ctl.projection_map().expect("no fiber war");
        assert!(map.is_empty());
    }

    #[test]
    fn test_lex_flows_through_open_fiber() {
        let mut ctl = english_controller();
        ctl.activate_slot(3);
        ctl.apply_rule(&Rule::Fiber {
            op: GateOp::Disinhibit,
            from: LEX,
            to: SUBJ,
            index: 0,
        });
        let map = ctl.projection_map().expect("no fiber war");
        assert_eq!(map[LEX], BTreeSet::from([SUBJ]));
        assert!(!map.contains_key(SUBJ), "empty areas do not flow");
    }

    #[test]
    fn test_fiber_war_detected() {
        let mut ctl = english_controller();
        ctl.activate_slot(0);
        // SUBJ and VERB are both initially active; open LEX to both
        for to in [SUBJ, VERB] {
            ctl.apply_rule(&Rule::Fiber {
                op: GateOp::Disinhibit,
                from: LEX,
                to,
                index: 0,
            });
        }
        match ctl.projection_map() {
            Err(ParseError::FiberWar { targets }) => {
                assert_eq!(targets, vec![SUBJ, VERB]);
            }
            other => panic!("expected fiber war, got {other:?}"),
        }
    }

    #[test]
    fn test_inhibited_area_does_not_flow() {
        let mut ctl = english_controller();
        ctl.activate_slot(0);
        // OBJ starts inhibited; an open fiber alone is not enough
        ctl.apply_rule(&Rule::Fiber {
            op: GateOp::Disinhibit,
            from: LEX,
            to: OBJ,
            index: 0,
        });
        let map = ctl.projection_map().expect("no fiber war");
        assert!(map.get(LEX).is_none_or(|t| !t.contains(OBJ)));
    }

    #[test]
    fn test_word_resolution_thresholds() {
        let mut ctl = english_controller();
        let k = 20;
        let slot = ctl.spec().lexicon["cats"].index;
        let start = slot * k;

        // strays land in the reserved slot so they match no vocabulary word
        let stray = 20 * k;

        // 70% overlap matches at the default fraction
        let mut winners: Vec<usize> = (start..start + 14).collect();
        winners.extend(stray..stray + 6);
        ctl.brain_mut().set_winners(LEX, winners);
        assert_eq!(ctl.match_word(LEX, MIN_OVERLAP), Some("cats"));

        // 50% overlap: below the default, above the fallback
        let mut winners: Vec<usize> = (start..start + 10).collect();
        winners.extend(stray..stray + 10);
        ctl.brain_mut().set_winners(LEX, winners);
        assert_eq!(ctl.match_word(LEX, MIN_OVERLAP), None);
        assert_eq!(ctl.resolve_word(LEX), Some("cats"));

        // 30% overlap: unidentifiable
        let mut winners: Vec<usize> = (start..start + 6).collect();
        winners.extend(stray..stray + 14);
        ctl.brain_mut().set_winners(LEX, winners);
        assert_eq!(ctl.resolve_word(LEX), None);
        assert_eq!(ctl.interpret(LEX), UNKNOWN_WORD);
    }

    #[test]
    fn test_history_accumulates_across_rounds() {
        let mut ctl = english_controller();
        ctl.activate_slot(3);
        ctl.apply_rule(&Rule::Fiber {
            op: GateOp::Disinhibit,
            from: LEX,
            to: SUBJ,
            index: 0,
        });
        ctl.step_round().expect("round");
        ctl.step_round().expect("round");
        assert!(ctl.history()[LEX].contains(SUBJ));
        // once SUBJ formed an assembly it flows back
        assert!(ctl.history()[SUBJ].contains(LEX));
    }
}
